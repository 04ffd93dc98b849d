//! Princeton Instruments WinSpec SPE
//!
//! A 4100-byte header followed by one spectrum per frame. Only
//! one-dimensional data (x or y dimension equal to 1) is supported.
//!
//! | offset | type | field |
//! |--------|------|-------|
//! | 42 | u16 | x dimension |
//! | 108 | u16 | data type (0 f32, 1 i32, 2 i16, 3 u16) |
//! | 656 | u16 | y dimension |
//! | 1446 | u32 | number of frames |
//! | 3000 | 489 bytes | x calibration |
//! | 3489 | 489 bytes | y calibration |
//! | 4100 | | data |

use std::io::SeekFrom;

use crate::decode::binary::{
    read_f32_le, read_f64_le, read_i16_le, read_i32_le, read_u16_le, read_u32_le, read_u8, skip,
};
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, DataSet, StepColumn, VectorColumn};
use crate::registry::{DataSource, FormatInfo};

use super::common::MAX_PREALLOCATED;

const HEADER_LEN: u64 = 4100;

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "spe",
    description: "Princeton Instruments WinSpec SPE Format",
    extensions: &["spe"],
    binary: true,
    multiblock: true,
    detect,
    fill,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataType {
    Float,
    Long,
    Int,
    UInt,
}

impl DataType {
    fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Float),
            1 => Some(Self::Long),
            2 => Some(Self::Int),
            3 => Some(Self::UInt),
            _ => None,
        }
    }

    fn read(self, src: &mut dyn DataSource) -> Result<f64> {
        Ok(match self {
            Self::Float => f64::from(read_f32_le(src)?),
            Self::Long => f64::from(read_i32_le(src)?),
            Self::Int => f64::from(read_i16_le(src)?),
            Self::UInt => f64::from(read_u16_le(src)?),
        })
    }
}

/// Polynomial calibration of one axis.
#[derive(Debug, Clone, Copy)]
struct Calibration {
    valid: bool,
    order: u8,
    coefficients: [f64; 6],
}

impl Calibration {
    fn read(src: &mut dyn DataSource) -> Result<Self> {
        skip(src, 98)?;
        let valid = read_u8(src)? != 0;
        skip(src, 2)?;
        let order = read_u8(src)?;
        skip(src, 161)?;
        let mut coefficients = [0.0; 6];
        for c in &mut coefficients {
            *c = read_f64_le(src)?;
        }
        skip(src, 178)?;
        Ok(Self {
            valid,
            order,
            coefficients,
        })
    }

    /// x column for `dim` points: the point index without calibration, a
    /// step column for a linear one, explicit values otherwise.
    fn column(&self, dim: usize) -> Column {
        if !self.valid {
            return Column::step(StepColumn::new(0.0, 1.0));
        }
        if self.order == 1 {
            return Column::step(StepColumn::new(self.coefficients[0], self.coefficients[1]));
        }
        let terms = &self.coefficients[..=usize::from(self.order)];
        let values: VectorColumn = (0..dim)
            .map(|i| {
                let x = (i + 1) as f64;
                terms.iter().rev().fold(0.0, |acc, c| acc * x + c)
            })
            .collect();
        Column::vector(values)
    }
}

fn detect(src: &mut dyn DataSource) -> bool {
    let Ok(len) = src.seek(SeekFrom::End(0)) else {
        return false;
    };
    if len <= HEADER_LEN {
        return false;
    }
    if src.seek(SeekFrom::Start(108)).is_err() {
        return false;
    }
    matches!(read_u16_le(src), Ok(code) if DataType::from_code(code).is_some())
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    skip(src, 42)?;
    let xdim = usize::from(read_u16_le(src)?);
    skip(src, 64)?;
    let code = read_u16_le(src)?;
    let data_type = DataType::from_code(code).ok_or_else(|| {
        FormatError::unexpected(FORMAT.name, format!("unknown data type {}", code))
    })?;
    skip(src, 546)?;
    let ydim = usize::from(read_u16_le(src)?);
    skip(src, 788)?;
    let frames = read_u32_le(src)?;
    skip(src, 1550)?;
    let x_calib = Calibration::read(src)?;
    let y_calib = Calibration::read(src)?;
    skip(src, 122)?;

    let (dim, calib) = if ydim == 1 {
        (xdim, x_calib)
    } else if xdim == 1 {
        (ydim, y_calib)
    } else {
        return Err(FormatError::unexpected(FORMAT.name, "2-D images are not supported").into());
    };
    ds.format_assert(
        !calib.valid || calib.order <= 5,
        "bad calibration polynomial order",
    )?;

    for _ in 0..frames {
        let mut ycol = VectorColumn::with_capacity(dim.min(MAX_PREALLOCATED));
        for _ in 0..dim {
            ycol.push(data_type.read(src)?);
        }
        let mut block = Block::new();
        block.add_column(calib.column(dim));
        block.add_column(Column::vector(ycol));
        ds.push_block(block);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn put_u16(buf: &mut [u8], at: usize, v: u16) {
        buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
    }

    fn header(xdim: u16, ydim: u16, dtype: u16, frames: u32) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN as usize];
        put_u16(&mut buf, 42, xdim);
        put_u16(&mut buf, 108, dtype);
        put_u16(&mut buf, 656, ydim);
        buf[1446..1450].copy_from_slice(&frames.to_le_bytes());
        buf
    }

    fn set_calibration(buf: &mut [u8], base: usize, order: u8, coefficients: &[f64]) {
        buf[base + 98] = 1;
        buf[base + 101] = order;
        for (i, c) in coefficients.iter().enumerate() {
            let at = base + 263 + 8 * i;
            buf[at..at + 8].copy_from_slice(&c.to_le_bytes());
        }
    }

    fn load(bytes: Vec<u8>) -> Result<DataSet> {
        let mut ds = FORMAT.create();
        fill(&mut ds, &mut Cursor::new(bytes))?;
        Ok(ds)
    }

    #[test]
    fn test_u16_frames_without_calibration() {
        let mut bytes = header(3, 1, 3, 2);
        for v in [1u16, 2, 3, 4, 5, 6] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let ds = load(bytes).unwrap();
        assert_eq!(ds.block_count(), 2);
        let second = ds.block(1).unwrap();
        assert_eq!(second.point_count(), Some(3));
        assert_eq!(second.column(0).unwrap().value(2).unwrap(), 2.0);
        assert_eq!(second.column(1).unwrap().value(0).unwrap(), 4.0);
    }

    #[test]
    fn test_linear_and_quadratic_calibration() {
        let mut bytes = header(2, 1, 0, 1);
        set_calibration(&mut bytes, 3000, 1, &[500.0, 0.5]);
        for v in [1.5f32, 2.5] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let ds = load(bytes).unwrap();
        let block = ds.block(0).unwrap();
        assert_eq!(block.column(0).unwrap().value(1).unwrap(), 500.5);
        assert_eq!(block.column(1).unwrap().value(1).unwrap(), 2.5);

        let mut bytes = header(1, 2, 1, 1);
        set_calibration(&mut bytes, 3489, 2, &[1.0, 2.0, 3.0]);
        for v in [-7i32, 8] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let ds = load(bytes).unwrap();
        let block = ds.block(0).unwrap();
        // 1 + 2x + 3x^2 at x = 1, 2
        assert_eq!(block.column(0).unwrap().value(0).unwrap(), 6.0);
        assert_eq!(block.column(0).unwrap().value(1).unwrap(), 17.0);
        assert_eq!(block.column(1).unwrap().value(0).unwrap(), -7.0);
    }

    #[test]
    fn test_image_rejected() {
        let mut bytes = header(2, 2, 3, 1);
        bytes.extend_from_slice(&[0u8; 8]);
        assert!(load(bytes).unwrap_err().is_format_error());
    }

    #[test]
    fn test_detect() {
        let mut bytes = header(2, 1, 2, 1);
        bytes.extend_from_slice(&[0u8; 4]);
        assert!(detect(&mut Cursor::new(bytes.clone())));

        put_u16(&mut bytes, 108, 9);
        assert!(!detect(&mut Cursor::new(bytes)));
        assert!(!detect(&mut Cursor::new(header(2, 1, 2, 1))));
    }
}
