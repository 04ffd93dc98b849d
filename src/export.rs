//! Plain-text export of a dataset
//!
//! ```text
//! # exported by xydata from a uxd file
//! # wavelength: 1.54056
//!
//! ### block #0 scan1
//! # anode: Cu
//! # 2theta	counts
//! 10.000000	120.000000
//! 10.020000	118.000000
//! ```
//!
//! Rows are limited to the block's point count, i.e. the shortest bounded
//! column.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, RunTimeError};
use crate::model::{Block, DataSet, MetaData};

/// Layout choices for [`write_plain_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write `# key: value` meta-data lines
    pub with_metadata: bool,
    /// Digits after the decimal point
    pub precision: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            with_metadata: true,
            precision: 6,
        }
    }
}

/// Write `dataset` as commented, tab-separated text.
pub fn write_plain_text<W: Write + ?Sized>(
    dataset: &DataSet,
    out: &mut W,
    options: &ExportOptions,
) -> Result<()> {
    writeln!(
        out,
        "# exported by xydata from a {} file",
        dataset.format().name
    )?;
    if options.with_metadata {
        write_meta(out, &dataset.meta)?;
    }

    let blocks = dataset.blocks();
    for (i, block) in blocks.iter().enumerate() {
        if blocks.len() > 1 || !block.name.is_empty() {
            writeln!(out)?;
            let separator = format!("### block #{} {}", i, block.name);
            writeln!(out, "{}", separator.trim_end())?;
        }
        if options.with_metadata {
            write_meta(out, &block.meta)?;
        }
        write_block(out, block, options.precision)?;
    }
    out.flush()?;
    Ok(())
}

/// Create `path` and export `dataset` into it.
pub fn export_plain_text(
    dataset: &DataSet,
    path: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| RunTimeError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    write_plain_text(dataset, &mut out, options)
}

fn write_meta<W: Write + ?Sized>(out: &mut W, meta: &MetaData) -> Result<()> {
    for (key, value) in meta {
        if value.is_empty() {
            writeln!(out, "# {}:", key)?;
        }
        for line in value.lines() {
            writeln!(out, "# {}: {}", key, line)?;
        }
    }
    Ok(())
}

fn write_block<W: Write + ?Sized>(out: &mut W, block: &Block, precision: usize) -> Result<()> {
    let header: Vec<String> = block
        .columns()
        .iter()
        .enumerate()
        .map(|(k, c)| {
            if c.name.is_empty() {
                format!("column_{}", k + 1)
            } else {
                c.name.clone()
            }
        })
        .collect();
    writeln!(out, "# {}", header.join("\t"))?;

    let width = precision + 2;
    let rows = block.point_count().unwrap_or(0);
    let mut line = String::new();
    for j in 0..rows {
        line.clear();
        for (k, column) in block.columns().iter().enumerate() {
            if k > 0 {
                line.push('\t');
            }
            line.push_str(&format!(
                "{:>width$.precision$}",
                column.value(j)?,
                width = width,
                precision = precision
            ));
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
