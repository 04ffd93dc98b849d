//! DBWS data file
//!
//! The first line holds start, step and end as three 8-character fields
//! (`3F8.2` in Fortran terms, sometimes with more decimals), followed by a
//! title. Intensities follow, separated by spaces or commas.

use crate::decode::text::{expect_line, read_line};
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, DataSet, StepColumn, VectorColumn};
use crate::registry::{DataSource, FormatInfo};

use super::common::push_values;

const FIELD: usize = 8;

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "dbws",
    description: "DBWS data file",
    extensions: &["dbw", "rit", "neu"],
    binary: false,
    multiblock: false,
    detect,
    fill,
};

/// The three leading fixed-width fields, each fully numeric.
fn header_fields(line: &str) -> Option<[f64; 3]> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 * FIELD {
        return None;
    }
    let mut fields = [0.0; 3];
    for (i, field) in fields.iter_mut().enumerate() {
        let text = std::str::from_utf8(&bytes[i * FIELD..(i + 1) * FIELD]).ok()?;
        *field = text.trim().parse::<f64>().ok()?;
    }
    Some(fields)
}

fn detect(src: &mut dyn DataSource) -> bool {
    let Ok(Some(line)) = read_line(src) else {
        return false;
    };
    let Some([start, step, stop]) = header_fields(&line) else {
        return false;
    };
    if step <= 0.0 || start + step > stop {
        return false;
    }
    let count = (stop - start) / step;
    (count.round() - count).abs() <= 1e-6
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let line = expect_line(src)?;
    let [start, step, _] = header_fields(&line).ok_or_else(|| {
        FormatError::unexpected(FORMAT.name, "first line must start with 3 fields of 8 characters")
    })?;

    let mut ycol = VectorColumn::new();
    while let Some(line) = read_line(src)? {
        push_values(&mut ycol, &line, ',')?;
    }

    let mut block = Block::new();
    block.add_column(Column::step(StepColumn::new(start, step)));
    block.add_column(Column::vector(ycol));
    ds.push_block(block);
    Ok(())
}
