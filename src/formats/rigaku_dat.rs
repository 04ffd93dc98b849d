//! Rigaku `.dat`
//!
//! ```text
//! *TYPE           =  Raw
//! *GROUP_COUNT    =  2
//! *BEGIN
//! *START          =  10.0000
//! *STEP           =  0.0200
//! *COUNT          =  4657
//!  1048, 1162, 1108, 1163
//! *END
//! ...
//! *EOF
//! ```
//!
//! `#` starts a comment. Every `*BEGIN`/`*END` group becomes a block.

use crate::decode::text::{next_valid_line, parse_f64, parse_i64, split_key_value};
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, DataSet, StepColumn, VectorColumn};
use crate::registry::{DataSource, FormatInfo};

use super::common::{push_values, starts_with_magic};

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "rigaku_dat",
    description: "Rigaku dat Format",
    extensions: &["dat"],
    binary: false,
    multiblock: true,
    detect,
    fill,
};

fn detect(src: &mut dyn DataSource) -> bool {
    starts_with_magic(src, b"*TYPE")
}

struct Group {
    block: Block,
    values: VectorColumn,
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let mut group: Option<Group> = None;
    let mut group_count: Option<i64> = None;
    let (mut start, mut step, mut count) = (0.0, 0.0, 0i64);

    while let Some(line) = next_valid_line(src, '#')? {
        if line.starts_with("*BEGIN") {
            group = Some(Group {
                block: Block::new(),
                values: VectorColumn::new(),
            });
        } else if line.starts_with("*END") {
            let Group { mut block, values } = group
                .take()
                .ok_or_else(|| FormatError::unexpected(FORMAT.name, "*END without *BEGIN"))?;
            let n = usize::try_from(count).ok().filter(|&n| n == values.len());
            let n = n.ok_or_else(|| {
                FormatError::unexpected(
                    FORMAT.name,
                    format!("*COUNT={} but {} values found", count, values.len()),
                )
            })?;
            block.add_column(Column::step(StepColumn::with_count(start, step, n)));
            block.add_column(Column::vector(values));
            ds.push_block(block);
        } else if line.starts_with("*EOF") {
            break;
        } else if let Some(rest) = line.strip_prefix('*') {
            let (key, value) = split_key_value(rest, "=");
            match key {
                "START" => start = parse_f64(value)?,
                "STEP" => step = parse_f64(value)?,
                "COUNT" => count = parse_i64(value)?,
                "GROUP_COUNT" => group_count = Some(parse_i64(value)?),
                _ => {}
            }
            let meta = match group.as_mut() {
                Some(g) => &mut g.block.meta,
                None => &mut ds.meta,
            };
            meta.set(key, value);
        } else {
            let g = group.as_mut().ok_or_else(|| {
                FormatError::unexpected(FORMAT.name, format!("values outside a group: {}", line))
            })?;
            push_values(&mut g.values, &line, ',')?;
        }
    }

    let expected = group_count
        .ok_or_else(|| FormatError::unexpected(FORMAT.name, "no GROUP_COUNT attribute given"))?;
    ds.format_assert(
        usize::try_from(expected).is_ok_and(|n| n == ds.block_count()),
        "block count different from expected",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
*TYPE           =  Raw
*GROUP_COUNT    =  2
# first group
*BEGIN
*GROUP          =  0
*START          =  10.0000
*STEP           =  0.0200
*COUNT          =  5
 1048, 1162, 1108, 1163
 1071
*END
*BEGIN
*GROUP          =  1
*START          =  20.0
*STEP           =  1.0
*COUNT          =  2
 1, 2
*END
*EOF
";

    fn load(content: &str) -> Result<DataSet> {
        let mut ds = FORMAT.create();
        fill(&mut ds, &mut Cursor::new(content.as_bytes().to_vec()))?;
        Ok(ds)
    }

    #[test]
    fn test_groups() {
        let ds = load(SAMPLE).unwrap();
        assert_eq!(ds.block_count(), 2);
        assert_eq!(ds.meta.get("TYPE").unwrap(), "Raw");

        let first = ds.block(0).unwrap();
        assert_eq!(first.meta.get("GROUP").unwrap(), "0");
        assert_eq!(first.point_count(), Some(5));
        assert_eq!(first.column(1).unwrap().value(4).unwrap(), 1071.0);

        let second = ds.block(1).unwrap();
        assert_eq!(second.column(0).unwrap().value(1).unwrap(), 21.0);
    }

    #[test]
    fn test_count_mismatch() {
        let broken = SAMPLE.replace("*COUNT          =  5", "*COUNT          =  6");
        assert!(load(&broken).unwrap_err().is_format_error());
    }

    #[test]
    fn test_group_count_mismatch() {
        let broken = SAMPLE.replace("*GROUP_COUNT    =  2", "*GROUP_COUNT    =  3");
        assert!(load(&broken).is_err());
        let missing = SAMPLE.replace("*GROUP_COUNT    =  2\n", "");
        assert!(load(&missing).is_err());
    }

    #[test]
    fn test_detect() {
        assert!(detect(&mut Cursor::new(SAMPLE.as_bytes().to_vec())));
        assert!(!detect(&mut Cursor::new(b"1 2\n".to_vec())));
    }
}
