//! RIET7/LHPM/CSRIET `.dat`, also ILL_D1A5 and PSI_DMC
//!
//! Up to five free-form header lines, a `START STEP END` line, then the
//! intensities.

use crate::decode::text::read_line;
use crate::error::Result;
use crate::model::DataSet;
use crate::registry::{DataSource, FormatInfo};

use super::common::{parse_start_step_end, read_ssel_and_data};

const MAX_HEADER_LINES: usize = 5;

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "riet7",
    description: "RIET7/ILL_D1A5/PSI_DMC DAT",
    extensions: &["dat"],
    binary: false,
    multiblock: false,
    detect,
    fill,
};

fn detect(src: &mut dyn DataSource) -> bool {
    for _ in 0..=MAX_HEADER_LINES {
        match read_line(src) {
            Ok(Some(line)) if parse_start_step_end(&line).is_some() => return true,
            Ok(Some(_)) => continue,
            _ => return false,
        }
    }
    false
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let block = read_ssel_and_data(src, FORMAT.name, MAX_HEADER_LINES)?;
    ds.push_block(block);
    Ok(())
}
