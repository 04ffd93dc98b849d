//! Siemens/Bruker Diffrac-AT RAW, versions 1, 2 and 3
//!
//! | magic | version | layout |
//! |-------|---------|--------|
//! | `RAW ` | 1 | per range: 156-byte header, then `f32` counts; a flag in the header says whether another range follows |
//! | `RAW2` | 2 | 256-byte file header with the range count; per range: header of declared length, then `f32` counts |
//! | `RAW1.01` | 3 | 712-byte file header; per range: 304-byte header, supplementary headers, then `f32` counts |

use log::trace;

use crate::decode::binary::{
    read_f32_le, read_f64_le, read_string, read_u16_le, read_u32_le, skip,
};
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, DataSet, StepColumn, VectorColumn};
use crate::registry::{DataSource, FormatInfo};

use super::common::MAX_PREALLOCATED;

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "bruker_raw",
    description: "Siemens/Bruker RAW ver. 1/2/3",
    extensions: &["raw"],
    binary: true,
    multiblock: true,
    detect,
    fill,
};

/// Header fields that hold this value are unset.
const UNSET: f32 = -1e6;

fn detect(src: &mut dyn DataSource) -> bool {
    match read_string(src, 4).as_deref() {
        Ok("RAW ") | Ok("RAW2") => true,
        Ok("RAW1") => matches!(read_string(src, 3).as_deref(), Ok(".01")),
        _ => false,
    }
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let head = read_string(src, 4)?;
    match head.as_str() {
        "RAW " => load_version1(ds, src),
        "RAW2" => load_version2(ds, src),
        "RAW1" => {
            let suffix = read_string(src, 3)?;
            ds.format_assert(suffix == ".01", "unknown RAW1 version")?;
            load_version3(ds, src)
        }
        _ => Err(FormatError::unexpected(FORMAT.name, format!("unknown magic {:?}", head)).into()),
    }
}

fn read_counts(src: &mut dyn DataSource, steps: usize) -> Result<VectorColumn> {
    let mut ycol = VectorColumn::with_capacity(steps.min(MAX_PREALLOCATED));
    for _ in 0..steps {
        ycol.push(f64::from(read_f32_le(src)?));
    }
    Ok(ycol)
}

fn load_version1(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    ds.meta.set("format version", "1");
    let raw_as_u32 = u32::from_le_bytes(*b"RAW ");

    loop {
        let mut block = Block::new();

        let mut steps = read_u32_le(src)?;
        // later ranges may or may not repeat the magic
        if ds.block_count() > 0 && steps == raw_as_u32 {
            steps = read_u32_le(src)?;
        }

        block
            .meta
            .set("MEASUREMENT_TIME_PER_STEP", read_f32_le(src)?.to_string());
        let step = read_f32_le(src)?;
        block.meta.set("SCAN_MODE", read_u32_le(src)?.to_string());
        skip(src, 4)?;
        let start = read_f32_le(src)?;

        for key in ["THETA_START", "KHI_START", "PHI_START"] {
            let angle = read_f32_le(src)?;
            if angle != UNSET {
                block.meta.set(key, angle.to_string());
            }
        }
        block.meta.set("SAMPLE_NAME", read_string(src, 32)?);
        block.meta.set("K_ALPHA1", read_f32_le(src)?.to_string());
        block.meta.set("K_ALPHA2", read_f32_le(src)?.to_string());
        skip(src, 72)?;
        let following = read_u32_le(src)?;

        block.add_column(Column::step(StepColumn::new(
            f64::from(start),
            f64::from(step),
        )));
        block.add_column(Column::vector(read_counts(src, steps as usize)?));
        ds.push_block(block);
        trace!("bruker_raw v1: range {} with {} steps", ds.block_count(), steps);

        if following == 0 {
            return Ok(());
        }
    }
}

fn load_version2(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    ds.meta.set("format version", "2");

    let range_count = read_u16_le(src)?;
    skip(src, 162)?;
    ds.meta.set("DATE_TIME_MEASURE", read_string(src, 20)?);
    ds.meta.set("CEMICAL SYMBOL FOR TUBE ANODE", read_string(src, 2)?);
    ds.meta.set("LAMDA1", read_f32_le(src)?.to_string());
    ds.meta.set("LAMDA2", read_f32_le(src)?.to_string());
    ds.meta.set("INTENSITY_RATIO", read_f32_le(src)?.to_string());
    skip(src, 8)?;
    ds.meta
        .set("TOTAL_SAMPLE_RUNTIME_IN_SEC", read_f32_le(src)?.to_string());
    skip(src, 42)?;

    for _ in 0..range_count {
        let mut block = Block::new();

        let header_len = read_u16_le(src)?;
        ds.format_assert(header_len > 48, "range header shorter than 48 bytes")?;
        let steps = read_u16_le(src)?;
        skip(src, 4)?;
        block.meta.set("SEC_PER_STEP", read_f32_le(src)?.to_string());
        let step = read_f32_le(src)?;
        let start = read_f32_le(src)?;
        skip(src, 26)?;
        block.meta.set("TEMP_IN_K", read_u16_le(src)?.to_string());
        skip(src, u64::from(header_len) - 48)?;

        block.add_column(Column::step(StepColumn::new(
            f64::from(start),
            f64::from(step),
        )));
        block.add_column(Column::vector(read_counts(src, usize::from(steps))?));
        ds.push_block(block);
    }
    Ok(())
}

fn load_version3(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    ds.meta.set("format version", "3");

    // file header, 712 bytes; magic "RAW1.01" already read
    skip(src, 1)?;
    let status = match read_u32_le(src)? {
        1 => Some("done"),
        2 => Some("active"),
        3 => Some("aborted"),
        4 => Some("interrupted"),
        _ => None,
    };
    if let Some(status) = status {
        ds.meta.set("file status", status);
    }
    let range_count = read_u32_le(src)?;
    ds.meta.set("MEASURE_DATE", read_string(src, 10)?);
    ds.meta.set("MEASURE_TIME", read_string(src, 10)?);
    ds.meta.set("USER", read_string(src, 72)?);
    ds.meta.set("SITE", read_string(src, 218)?);
    ds.meta.set("SAMPLE_ID", read_string(src, 60)?);
    ds.meta.set("COMMENT", read_string(src, 160)?);
    skip(src, 62)?; // goniometer and optics codes, offset 546
    ds.meta.set("ANODE_MATERIAL", read_string(src, 4)?);
    skip(src, 4)?;
    for key in ["ALPHA_AVERAGE", "ALPHA1", "ALPHA2", "BETA", "ALPHA_RATIO"] {
        ds.meta.set(key, read_f64_le(src)?.to_string());
    }
    skip(src, 8)?;
    ds.meta.set("measurement time", read_f32_le(src)?.to_string());
    skip(src, 44)?;

    for _ in 0..range_count {
        let mut block = Block::new();

        // range header, 304 bytes
        let header_len = read_u32_le(src)?;
        ds.format_assert(header_len == 304, "range header length is not 304")?;
        let steps = read_u32_le(src)?;
        block.meta.set("STEPS", steps.to_string());
        block.meta.set("START_THETA", read_f64_le(src)?.to_string());
        let start = read_f64_le(src)?;
        block.meta.set("START_2THETA", start.to_string());
        skip(src, 76)?; // drive positions, offset 24
        block.meta.set("HIGH_VOLTAGE", read_f32_le(src)?.to_string());
        block.meta.set("AMPLIFIER_GAIN", read_f32_le(src)?.to_string());
        block
            .meta
            .set("DISCRIMINATOR_1_LOWER_LEVEL", read_f32_le(src)?.to_string());
        skip(src, 64)?; // offset 112
        let step = read_f64_le(src)?;
        block.meta.set("STEP_SIZE", step.to_string());
        skip(src, 8)?;
        block.meta.set("TIME_PER_STEP", read_f32_le(src)?.to_string());
        skip(src, 12)?;
        block
            .meta
            .set("ROTATION_SPEED [rpm]", read_f32_le(src)?.to_string());
        skip(src, 12)?;
        block
            .meta
            .set("GENERATOR_VOLTAGE", read_u32_le(src)?.to_string());
        block
            .meta
            .set("GENERATOR_CURRENT", read_u32_le(src)?.to_string());
        skip(src, 8)?;
        block.meta.set("USED_LAMBDA", read_f64_le(src)?.to_string());
        skip(src, 8)?;
        let supplementary = read_u32_le(src)?;
        skip(src, 44)?; // offset 260
        skip(src, u64::from(supplementary))?;

        block.add_column(Column::step(StepColumn::new(start, step)));
        block.add_column(Column::vector(read_counts(src, steps as usize)?));
        ds.push_block(block);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn f32s(out: &mut Vec<u8>, values: &[f32]) {
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn v1_range(out: &mut Vec<u8>, with_magic: bool, start: f32, counts: &[f32], following: u32) {
        if with_magic {
            out.extend_from_slice(b"RAW ");
        }
        out.extend_from_slice(&(counts.len() as u32).to_le_bytes());
        f32s(out, &[1.0, 0.5]); // time per step, step
        out.extend_from_slice(&2u32.to_le_bytes()); // scan mode
        out.extend_from_slice(&[0u8; 4]);
        f32s(out, &[start, 5.0, UNSET, UNSET]);
        let mut name = b"quartz".to_vec();
        name.resize(32, 0);
        out.extend_from_slice(&name);
        f32s(out, &[1.5406, 1.5444]);
        out.extend_from_slice(&[0u8; 72]);
        out.extend_from_slice(&following.to_le_bytes());
        f32s(out, counts);
    }

    fn load(bytes: Vec<u8>) -> Result<DataSet> {
        let mut ds = FORMAT.create();
        fill(&mut ds, &mut Cursor::new(bytes))?;
        Ok(ds)
    }

    #[test]
    fn test_version1_two_ranges() {
        let mut bytes = Vec::new();
        v1_range(&mut bytes, true, 10.0, &[1.0, 2.0, 3.0], 1);
        v1_range(&mut bytes, false, 20.0, &[4.0, 5.0], 0);

        let ds = load(bytes).unwrap();
        assert_eq!(ds.meta.get("format version").unwrap(), "1");
        assert_eq!(ds.block_count(), 2);

        let first = ds.block(0).unwrap();
        assert_eq!(first.meta.get("SAMPLE_NAME").unwrap(), "quartz");
        assert_eq!(first.meta.get("THETA_START").unwrap(), "5");
        assert!(!first.meta.has_key("PHI_START"));
        assert_eq!(first.column(0).unwrap().value(2).unwrap(), 11.0);
        assert_eq!(first.column(1).unwrap().value(2).unwrap(), 3.0);

        let second = ds.block(1).unwrap();
        assert_eq!(second.point_count(), Some(2));
        assert_eq!(second.column(0).unwrap().value(0).unwrap(), 20.0);
    }

    #[test]
    fn test_version1_repeated_magic() {
        let mut bytes = Vec::new();
        v1_range(&mut bytes, true, 10.0, &[1.0], 1);
        v1_range(&mut bytes, true, 20.0, &[4.0, 5.0], 0);
        let ds = load(bytes).unwrap();
        assert_eq!(ds.block(1).unwrap().point_count(), Some(2));
    }

    #[test]
    fn test_version2() {
        let mut bytes = b"RAW2".to_vec();
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 162]);
        let mut date = b"2001-01-01".to_vec();
        date.resize(20, 0);
        bytes.extend_from_slice(&date);
        bytes.extend_from_slice(b"Cu");
        f32s(&mut bytes, &[1.5406, 1.5444, 0.5]);
        bytes.extend_from_slice(&[0u8; 8]);
        f32s(&mut bytes, &[3600.0]);
        bytes.extend_from_slice(&[0u8; 42]);
        assert_eq!(bytes.len(), 256);

        // range with a 52-byte header
        bytes.extend_from_slice(&52u16.to_le_bytes());
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 4]);
        f32s(&mut bytes, &[2.0, 0.25, 30.0]);
        bytes.extend_from_slice(&[0u8; 26]);
        bytes.extend_from_slice(&300u16.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 4]);
        f32s(&mut bytes, &[7.0, 8.0, 9.0]);

        let ds = load(bytes).unwrap();
        assert_eq!(ds.meta.get("CEMICAL SYMBOL FOR TUBE ANODE").unwrap(), "Cu");
        let block = ds.block(0).unwrap();
        assert_eq!(block.meta.get("TEMP_IN_K").unwrap(), "300");
        assert_eq!(block.column(0).unwrap().value(2).unwrap(), 30.5);
        assert_eq!(block.column(1).unwrap().value(2).unwrap(), 9.0);
    }

    #[test]
    fn test_version3() {
        let mut bytes = vec![0u8; 712];
        bytes[..7].copy_from_slice(b"RAW1.01");
        bytes[8..12].copy_from_slice(&1u32.to_le_bytes());
        bytes[12..16].copy_from_slice(&1u32.to_le_bytes());
        bytes[326..332].copy_from_slice(b"sample");
        bytes[608..610].copy_from_slice(b"Cu");
        bytes[624..632].copy_from_slice(&1.5406f64.to_le_bytes());

        let mut range = vec![0u8; 304];
        range[0..4].copy_from_slice(&304u32.to_le_bytes());
        range[4..8].copy_from_slice(&2u32.to_le_bytes());
        range[16..24].copy_from_slice(&15.0f64.to_le_bytes());
        range[176..184].copy_from_slice(&0.01f64.to_le_bytes());
        range[224..228].copy_from_slice(&40u32.to_le_bytes());
        range[256..260].copy_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&range);
        bytes.extend_from_slice(&[0u8; 8]);
        f32s(&mut bytes, &[100.0, 200.0]);

        let ds = load(bytes).unwrap();
        assert_eq!(ds.meta.get("format version").unwrap(), "3");
        assert_eq!(ds.meta.get("file status").unwrap(), "done");
        assert_eq!(ds.meta.get("SAMPLE_ID").unwrap(), "sample");
        assert_eq!(ds.meta.get("ANODE_MATERIAL").unwrap(), "Cu");
        assert_eq!(ds.meta.get("ALPHA1").unwrap(), "1.5406");

        let block = ds.block(0).unwrap();
        assert_eq!(block.meta.get("GENERATOR_VOLTAGE").unwrap(), "40");
        assert_eq!(block.column(0).unwrap().value(0).unwrap(), 15.0);
        assert_eq!(block.column(0).unwrap().step_size(), Some(0.01));
        assert_eq!(block.column(1).unwrap().value(1).unwrap(), 200.0);
    }

    #[test]
    fn test_version3_needs_full_magic() {
        let mut bytes = vec![0u8; 1024];
        bytes[..7].copy_from_slice(b"RAW1.02");
        let err = load(bytes).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("RAW1"));
    }

    #[test]
    fn test_truncated_is_format_error() {
        let mut bytes = Vec::new();
        v1_range(&mut bytes, true, 10.0, &[1.0, 2.0, 3.0], 0);
        bytes.truncate(bytes.len() - 2);
        assert!(load(bytes).unwrap_err().is_format_error());
    }

    #[test]
    fn test_detect() {
        assert!(detect(&mut Cursor::new(b"RAW \0\0".to_vec())));
        assert!(detect(&mut Cursor::new(b"RAW2".to_vec())));
        assert!(detect(&mut Cursor::new(b"RAW1.01".to_vec())));
        assert!(!detect(&mut Cursor::new(b"RAW1.02".to_vec())));
        assert!(!detect(&mut Cursor::new(b"RA".to_vec())));
    }
}
