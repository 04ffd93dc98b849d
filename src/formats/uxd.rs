//! Siemens/Bruker Diffrac-AT UXD
//!
//! A file header of `_KEY=VALUE` lines is followed by one section per range:
//!
//! ```text
//! _FILEVERSION=1
//! _SAMPLE='test'
//! ; Data for Range 1
//! _DRIVE='COUPLED'
//! _STEPSIZE=0.020000
//! _START=10.0000
//! _COUNTS
//!      1048      1162      1108      1163
//! ```
//!
//! `_COUNTS`/`_CPS` sections hold intensities on a fixed step;
//! `_2THETACOUNTS`/`_2THETACPS` sections hold angle-intensity pairs. Peak
//! lists (`_D-I`, `_2THETA-I`) are skipped. `;` starts a comment.

use log::trace;

use crate::decode::text::{
    is_numeric_start, next_valid_line, parse_f64, parse_values, read_line, split_key_value,
};
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, DataSet, StepColumn, VectorColumn};
use crate::registry::{DataSource, FormatInfo};

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "uxd",
    description: "Siemens/Bruker Diffrac-AT UXD",
    extensions: &["uxd"],
    binary: false,
    multiblock: true,
    detect,
    fill,
};

fn detect(src: &mut dyn DataSource) -> bool {
    // 256 lines of leading comments at most
    for _ in 0..256 {
        match read_line(src) {
            Ok(Some(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with(';') {
                    continue;
                }
                return line.starts_with("_FILEVERSION");
            }
            _ => return false,
        }
    }
    false
}

/// Where numbers of the current data section go.
enum Section {
    None,
    Counts(VectorColumn),
    Pairs(VectorColumn, VectorColumn),
    PeakList,
}

struct Range {
    block: Block,
    start: f64,
    step: f64,
    section: Section,
}

impl Range {
    fn new(start: f64, step: f64) -> Self {
        Self {
            block: Block::new(),
            start,
            step,
            section: Section::None,
        }
    }

    /// Move the collected data into the block; `None` if there was none.
    fn finish(mut self) -> Option<Block> {
        match std::mem::replace(&mut self.section, Section::None) {
            Section::Counts(y) => {
                self.block
                    .add_column(Column::step(StepColumn::new(self.start, self.step)));
                self.block.add_column(Column::vector(y));
            }
            Section::Pairs(x, y) => {
                self.block.add_column(Column::vector(x));
                self.block.add_column(Column::vector(y));
            }
            Section::None | Section::PeakList => return None,
        }
        Some(self.block)
    }
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let mut range: Option<Range> = None;
    let (mut start, mut step) = (0.0, 0.0);

    while let Some(line) = next_valid_line(src, ';')? {
        if line.starts_with("_DRIVE") {
            if let Some(block) = range.take().and_then(Range::finish) {
                ds.push_block(block);
            }
            range = Some(Range::new(start, step));
        } else if line.starts_with("_COUNT") || line.starts_with("_CPS") {
            let r = range.get_or_insert_with(|| Range::new(start, step));
            r.start = start;
            r.step = step;
            r.section = Section::Counts(VectorColumn::new());
        } else if line.starts_with("_2THETACOUNTS") || line.starts_with("_2THETACPS") {
            let r = range.get_or_insert_with(|| Range::new(start, step));
            r.section = Section::Pairs(VectorColumn::new(), VectorColumn::new());
        } else if line.starts_with("_D-I") || line.starts_with("_2THETA-I") {
            if let Some(r) = range.as_mut() {
                r.section = Section::PeakList;
            }
        } else if let Some(rest) = line.strip_prefix('_') {
            let (key, value) = split_key_value(rest, "=");
            match key {
                "START" => start = parse_f64(value)?,
                "STEPSIZE" => step = parse_f64(value)?,
                _ => {
                    let meta = match range.as_mut() {
                        Some(r) => &mut r.block.meta,
                        None => &mut ds.meta,
                    };
                    meta.set(key, value);
                }
            }
        } else {
            let section = range.as_mut().map(|r| &mut r.section);
            match section {
                Some(Section::PeakList) => {}
                Some(Section::Counts(y)) => {
                    ensure_numeric(&line)?;
                    y.extend(parse_values(&line, ',')?);
                }
                Some(Section::Pairs(x, y)) => {
                    ensure_numeric(&line)?;
                    for (i, value) in parse_values(&line, ',')?.into_iter().enumerate() {
                        if i % 2 == 0 {
                            x.push(value);
                        } else {
                            y.push(value);
                        }
                    }
                }
                Some(Section::None) | None => {
                    return Err(FormatError::unexpected(
                        FORMAT.name,
                        format!("data started without raw data keyword: {}", line),
                    )
                    .into());
                }
            }
        }
    }

    if let Some(block) = range.and_then(Range::finish) {
        ds.push_block(block);
    }
    ds.format_assert(ds.block_count() > 0, "no data section found")?;
    trace!("uxd: {} ranges", ds.block_count());
    Ok(())
}

fn ensure_numeric(line: &str) -> Result<()> {
    if line.starts_with(is_numeric_start) {
        Ok(())
    } else {
        Err(FormatError::unexpected(FORMAT.name, format!("line: {}", line)).into())
    }
}
