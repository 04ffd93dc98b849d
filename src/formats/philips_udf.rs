//! Philips UDF
//!
//! Header lines have the form `Key, value[, value...] ,/`; intensities follow
//! the `RawScan` line and end with a `/`.
//!
//! ```text
//! SampleIdent,Sample5 ,/
//! DataAngleRange,   5.0000, 120.0000,/
//! ScanStepSize,    0.020,/
//! RawScan
//!     6234,    6185,    5969,    6129
//!      442/
//! ```

use crate::decode::text::{expect_line, parse_f64, read_line};
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, DataSet, StepColumn, VectorColumn};
use crate::registry::{DataSource, FormatInfo};

use super::common::{push_values, starts_with_magic};

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "philips_udf",
    description: "Philips UDF",
    extensions: &["udf"],
    binary: false,
    multiblock: false,
    detect,
    fill,
};

fn detect(src: &mut dyn DataSource) -> bool {
    starts_with_magic(src, b"SampleIdent")
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let mut block = Block::new();
    let (mut start, mut step) = (0.0, 0.0);

    loop {
        let raw = expect_line(src)?;
        let line = raw.trim();
        if line == "RawScan" {
            break;
        }
        let (Some(first), Some(last)) = (line.find(','), line.rfind(',')) else {
            return Err(unexpected(format!("not a key-value line: {}", line)));
        };
        if first == last {
            return Err(unexpected(format!("not a key-value line: {}", line)));
        }
        let key = line[..first].trim();
        let value = line[first + 1..last].trim();
        match key {
            "DataAngleRange" => {
                let from = value.split(',').next().unwrap_or(value);
                start = parse_f64(from)?;
            }
            "ScanStepSize" => step = parse_f64(value)?,
            _ => {
                block.meta.set(key, value);
            }
        }
    }

    let mut ycol = VectorColumn::new();
    while let Some(line) = read_line(src)? {
        let (data, end) = match line.find('/') {
            Some(pos) => (&line[..pos], true),
            None => (line.as_str(), false),
        };
        if data.chars().any(|c| !(c.is_ascii_digit() || c.is_whitespace() || c == ',')) {
            return Err(unexpected(format!("unexpected char when reading data: {}", line)));
        }
        push_values(&mut ycol, data, ',')?;
        if end {
            break;
        }
    }

    block.add_column(Column::step(StepColumn::new(start, step)).named("data angle"));
    block.add_column(Column::vector(ycol).named("raw scan"));
    ds.push_block(block);
    Ok(())
}

fn unexpected(detail: String) -> crate::error::Error {
    FormatError::unexpected(FORMAT.name, detail).into()
}
