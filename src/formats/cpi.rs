//! Sietronics Sieray CPI
//!
//! ```text
//! SIETRONICS XRD SCAN
//! 10.00          start
//! 155.00         end
//! 0.010          step
//! Cu             anode
//! 1.54056        wavelength
//! 1-1-1900       date
//! 0.600
//! HH117 CaO:Nb2O5 neutron batch .0
//! SCANDATA
//! 8992           one intensity per line
//! 9077
//! ```

use crate::decode::text::{expect_line, parse_f64, read_line};
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, DataSet, StepColumn, VectorColumn};
use crate::registry::{DataSource, FormatInfo};

const MAGIC: &str = "SIETRONICS XRD SCAN";

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "cpi",
    description: "Sietronics Sieray CPI",
    extensions: &["cpi"],
    binary: false,
    multiblock: false,
    detect,
    fill,
};

fn detect(src: &mut dyn DataSource) -> bool {
    matches!(read_line(src), Ok(Some(line)) if line.starts_with(MAGIC))
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let first = expect_line(src)?;
    ds.format_assert(first.starts_with(MAGIC), "missing SIETRONICS XRD SCAN")?;

    let start = parse_f64(&expect_line(src)?)?;
    let _end = expect_line(src)?;
    let step = parse_f64(&expect_line(src)?)?;

    let mut block = Block::new();
    for key in ["anode", "wavelength", "date"] {
        let line = expect_line(src)?;
        if line.trim_start().starts_with("SCANDATA") {
            return Err(FormatError::unexpected(FORMAT.name, "header too short").into());
        }
        block.meta.set(key, line.trim());
    }
    loop {
        let line = read_line(src)?
            .ok_or_else(|| FormatError::unexpected(FORMAT.name, "SCANDATA not found"))?;
        if line.starts_with("SCANDATA") {
            break;
        }
    }

    let mut ycol = VectorColumn::new();
    while let Some(line) = read_line(src)? {
        if line.trim().is_empty() {
            continue;
        }
        ycol.push(parse_f64(&line)?);
    }

    block.add_column(Column::step(StepColumn::new(start, step)));
    block.add_column(Column::vector(ycol));
    ds.push_block(block);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "SIETRONICS XRD SCAN\n10.00\n155.00\n0.010\nCu\n1.54056\n\
                          1-1-1900\n0.600\nHH117 CaO:Nb2O5\nSCANDATA\n8992\n9077\n9017\n";

    #[test]
    fn test_fill() {
        let mut ds = FORMAT.create();
        fill(&mut ds, &mut Cursor::new(SAMPLE.as_bytes().to_vec())).unwrap();
        let block = ds.block(0).unwrap();
        assert_eq!(block.point_count(), Some(3));
        assert!((block.column(0).unwrap().value(2).unwrap() - 10.02).abs() < 1e-12);
        assert_eq!(block.column(1).unwrap().value(1).unwrap(), 9077.0);
        assert_eq!(block.meta.get("wavelength").unwrap(), "1.54056");
    }

    #[test]
    fn test_detect() {
        assert!(detect(&mut Cursor::new(SAMPLE.as_bytes().to_vec())));
        assert!(!detect(&mut Cursor::new(b"SIETRONICS\n".to_vec())));
    }

    #[test]
    fn test_missing_scandata() {
        let truncated = &SAMPLE[..SAMPLE.find("SCANDATA").unwrap()];
        let mut ds = FORMAT.create();
        let err = fill(&mut ds, &mut Cursor::new(truncated.as_bytes().to_vec())).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_bad_intensity() {
        let broken = format!("{}abc\n", SAMPLE);
        let mut ds = FORMAT.create();
        assert!(fill(&mut ds, &mut Cursor::new(broken.into_bytes())).is_err());
    }
}
