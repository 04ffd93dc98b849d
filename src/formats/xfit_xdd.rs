//! XFIT/Koalariet XDD
//!
//! An optional `/* ... */` comment, a `START STEP END` line, then the
//! intensities.

use crate::decode::text::read_line;
use crate::error::Result;
use crate::model::DataSet;
use crate::registry::{DataSource, FormatInfo};

use super::common::{parse_start_step_end, read_ssel_and_data, skip_c_comment};

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "xfit_xdd",
    description: "XFIT XDD",
    extensions: &["xdd"],
    binary: false,
    multiblock: false,
    detect,
    fill,
};

fn detect(src: &mut dyn DataSource) -> bool {
    if skip_c_comment(src).is_err() {
        return false;
    }
    matches!(read_line(src), Ok(Some(line)) if parse_start_step_end(&line).is_some())
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    skip_c_comment(src)?;
    let block = read_ssel_and_data(src, FORMAT.name, 0)?;
    ds.push_block(block);
    Ok(())
}
