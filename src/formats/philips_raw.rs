//! Philips RD raw scan, versions V3 (`.rd`) and V5 (`.sd`)
//!
//! Fixed-offset records without delimiters; one range per file. Intensities
//! are stored packed as `u16` values `p` with `y = p² / 100`.

use crate::decode::binary::{read_bytes, read_f64_le, read_string, read_u16_le, read_u8, skip};
use crate::error::Result;
use crate::model::{Block, Column, DataSet, StepColumn, VectorColumn};
use crate::registry::{DataSource, FormatInfo};

use super::common::MAX_PREALLOCATED;

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "philips_rd",
    description: "Philips RD raw scan format V3/V5",
    extensions: &["rd", "sd"],
    binary: true,
    multiblock: false,
    detect,
    fill,
};

const DIFFRACTOR_TYPES: [&str; 6] = [
    "PW1800",
    "PW1710 based system",
    "PW1840",
    "PW3710 based system",
    "Undefined",
    "X'Pert MPD",
];
const ANODE_MATERIALS: [&str; 5] = ["Cu", "Mo", "Fe", "Cr", "Other"];
const FOCUS_TYPES: [&str; 4] = ["BF", "NF", "FF", "LFF"];

fn detect(src: &mut dyn DataSource) -> bool {
    matches!(read_bytes(src, 4).as_deref(), Ok(b"V3RD" | b"V5RD"))
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let version = read_string(src, 2)?;
    ds.format_assert(version == "V3" || version == "V5", "unknown version")?;
    let mut block = Block::new();

    skip(src, 82)?;
    let lookups: [(&str, &[&str]); 3] = [
        ("diffractor type", &DIFFRACTOR_TYPES),
        ("tube anode material", &ANODE_MATERIALS),
        ("focus type of x-ray tube", &FOCUS_TYPES),
    ];
    for (key, names) in lookups {
        let index = usize::from(read_u8(src)?);
        if let Some(name) = names.get(index) {
            block.meta.set(key, *name);
        }
    }

    // offset 87
    skip(src, 51)?;
    block.meta.set("name of the file", read_string(src, 8)?);
    block.meta.set("sample identification", read_string(src, 20)?);

    // offset 166
    skip(src, 48)?;
    let step = read_f64_le(src)?;
    let start = read_f64_le(src)?;
    let end = read_f64_le(src)?;
    let count = ((end - start) / step + 1.0).round();
    ds.format_assert(
        step != 0.0 && count.is_finite() && count >= 0.0,
        "bad scan range",
    )?;
    let count = count as usize;

    // offset 238
    skip(src, if version == "V3" { 12 } else { 572 })?;
    let mut ycol = VectorColumn::with_capacity(count.min(MAX_PREALLOCATED));
    for _ in 0..count {
        let packed = f64::from(read_u16_le(src)?);
        ycol.push(packed * packed / 100.0);
    }

    block.add_column(Column::step(StepColumn::with_count(start, step, count)));
    block.add_column(Column::vector(ycol));
    ds.push_block(block);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn file(version: &[u8; 4], data_offset: usize, packed: &[u16]) -> Vec<u8> {
        let mut buf = vec![0u8; data_offset];
        buf[..4].copy_from_slice(version);
        buf[84] = 5;
        buf[85] = 0;
        buf[86] = 9;
        buf[138..146].copy_from_slice(b"scan.rd\0");
        buf[146..152].copy_from_slice(b"quartz");
        for (i, v) in [0.5f64, 10.0, 11.0].iter().enumerate() {
            buf[214 + 8 * i..222 + 8 * i].copy_from_slice(&v.to_le_bytes());
        }
        for p in packed {
            buf.extend_from_slice(&p.to_le_bytes());
        }
        buf
    }

    fn load(bytes: Vec<u8>) -> Result<DataSet> {
        let mut ds = FORMAT.create();
        fill(&mut ds, &mut Cursor::new(bytes))?;
        Ok(ds)
    }

    #[test]
    fn test_v3() {
        let ds = load(file(b"V3RD", 250, &[10, 20, 30])).unwrap();
        let block = ds.block(0).unwrap();
        assert_eq!(block.meta.get("diffractor type").unwrap(), "X'Pert MPD");
        assert_eq!(block.meta.get("tube anode material").unwrap(), "Cu");
        assert!(!block.meta.has_key("focus type of x-ray tube"));
        assert_eq!(block.meta.get("name of the file").unwrap(), "scan.rd");
        assert_eq!(block.meta.get("sample identification").unwrap(), "quartz");
        assert_eq!(block.point_count(), Some(3));
        assert_eq!(block.column(0).unwrap().value(2).unwrap(), 11.0);
        assert_eq!(block.column(1).unwrap().value(1).unwrap(), 4.0);
    }

    #[test]
    fn test_v5_data_offset() {
        let ds = load(file(b"V5RD", 810, &[100, 0, 1])).unwrap();
        let block = ds.block(0).unwrap();
        assert_eq!(block.column(1).unwrap().value(0).unwrap(), 100.0);
        assert_eq!(block.column(1).unwrap().value(2).unwrap(), 0.01);
    }

    #[test]
    fn test_truncated_data() {
        let err = load(file(b"V3RD", 250, &[10, 20])).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_detect() {
        assert!(detect(&mut Cursor::new(b"V3RD....".to_vec())));
        assert!(detect(&mut Cursor::new(b"V5RD....".to_vec())));
        assert!(!detect(&mut Cursor::new(b"V4RD....".to_vec())));
    }
}
