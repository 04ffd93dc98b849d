//! `-l`, `-i` and `-g`: questions about formats rather than conversions.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use xydata::{FormatInfo, Registry};

/// Print one line per registered format: name and description.
pub fn list<W: Write>(registry: &Registry, out: &mut W) -> Result<()> {
    for format in registry.formats() {
        writeln!(out, "{}: {}", name_column(format.name), format.description)?;
    }
    Ok(())
}

#[cfg(feature = "colorized_output")]
fn name_column(name: &str) -> String {
    console::style(format!("{:<20}", name)).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn name_column(name: &str) -> String {
    format!("{:<20}", name)
}

/// Print name, description, extensions and flags of the format `name`.
pub fn describe<W: Write>(registry: &Registry, name: &str, out: &mut W) -> Result<()> {
    let format = registry.resolve(name)?;
    write_description(format, out)
}

fn write_description<W: Write>(format: &FormatInfo, out: &mut W) -> Result<()> {
    writeln!(out, "Name: {}", format.name)?;
    writeln!(out, "Description: {}", format.description)?;
    if format.extensions.is_empty() {
        writeln!(out, "Possible extensions: (not specified)")?;
    } else {
        writeln!(out, "Possible extensions: {}", format.extensions.join(" "))?;
    }
    writeln!(
        out,
        "Other flags: {} {}",
        if format.binary { "binary-file" } else { "text-file" },
        if format.multiblock {
            "multi-block"
        } else {
            "single-block"
        }
    )?;
    Ok(())
}

/// Print the format guessed for `path`, or that none was detected.
pub fn guess<W: Write>(registry: &Registry, path: &Path, out: &mut W) -> Result<()> {
    let guessed = registry
        .guess_format(path)
        .with_context(|| format!("Failed to guess the format of {}", path.display()))?;
    match guessed {
        Some(format) => writeln!(out, "{}: {}", format.name, format.description)?,
        None => writeln!(out, "Format of the file was not detected")?,
    }
    Ok(())
}
