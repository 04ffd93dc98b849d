//! Canberra MCA
//!
//! A fixed 9216-byte file: a 1024-byte header followed by 2048 `u32`
//! channel counts. The energy calibration (offset, slope, quadratic term) is
//! stored as DEC PDP-11 floats at offsets 108, 112 and 116; the data offset
//! is the `u16` at 24.

use crate::decode::binary::pdp11_f32;
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, DataSet, StepColumn, VectorColumn};
use crate::registry::{DataSource, FormatInfo};

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "canberra_mca",
    description: "Canberra MCA",
    extensions: &["mca"],
    binary: true,
    multiblock: false,
    detect,
    fill,
};

const FILE_SIZE: usize = 2 * 512 + CHANNELS * 4;
const CHANNELS: usize = 2048;

fn word(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn float(data: &[u8], at: usize) -> f64 {
    pdp11_f32([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn read_all(src: &mut dyn DataSource) -> Result<Vec<u8>> {
    let mut data = vec![0u8; FILE_SIZE];
    src.read_exact(&mut data)?;
    Ok(data)
}

fn detect(src: &mut dyn DataSource) -> bool {
    let Ok(data) = read_all(src) else {
        return false;
    };
    word(&data, 0) == 0
        && word(&data, 34) == 4
        && word(&data, 36) == CHANNELS as u16
        && word(&data, 38) == 1
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let data = read_all(src)?;

    let offset = usize::from(word(&data, 24));
    if offset + CHANNELS * 4 > FILE_SIZE {
        return Err(
            FormatError::unexpected(FORMAT.name, format!("data offset {} too large", offset))
                .into(),
        );
    }

    let energy_offset = float(&data, 108);
    let energy_slope = float(&data, 112);
    let energy_quadr = float(&data, 116);

    let xcol = if energy_quadr != 0.0 {
        let values: VectorColumn = (1..=CHANNELS)
            .map(|i| {
                let i = i as f64;
                energy_offset + energy_slope * i + energy_quadr * i * i
            })
            .collect();
        Column::vector(values)
    } else {
        Column::step(StepColumn::with_count(
            energy_offset + energy_slope,
            energy_slope,
            CHANNELS,
        ))
    };

    let ycol: VectorColumn = data[offset..offset + CHANNELS * 4]
        .chunks_exact(4)
        .map(|c| f64::from(u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
        .collect();

    let mut block = Block::new();
    block.add_column(xcol);
    block.add_column(Column::vector(ycol));
    ds.push_block(block);
    Ok(())
}
