//! Helpers shared by several parsers

use crate::decode::text::{leading_numbers, parse_values, read_line};
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, StepColumn, VectorColumn};
use crate::registry::DataSource;

/// Upper bound for values reserved up front from a count read from a file.
pub(crate) const MAX_PREALLOCATED: usize = 1 << 16;

/// True if the stream starts with `magic`.
pub(crate) fn starts_with_magic(src: &mut dyn DataSource, magic: &[u8]) -> bool {
    let mut head = vec![0u8; magic.len()];
    src.read_exact(&mut head).is_ok() && head == magic
}

/// Parse every number of `line` (whitespace or `sep` separated) into `col`.
pub(crate) fn push_values(col: &mut VectorColumn, line: &str, sep: char) -> Result<()> {
    col.extend(parse_values(line, sep)?);
    Ok(())
}

/// Interpret `line` as `START STEP END`.
///
/// Accepted only if the step is non-zero and the range holds at least four
/// points, with the point count integral to within 1e-2.
pub(crate) fn parse_start_step_end(line: &str) -> Option<StepColumn> {
    let numbers = leading_numbers(line);
    let [start, step, end] = numbers.get(..3)? else {
        return None;
    };
    let (start, step, end) = (*start, *step, *end);
    if step == 0.0 || !step.is_finite() {
        return None;
    }
    let dcount = (end - start) / step + 1.0;
    if !dcount.is_finite() {
        return None;
    }
    let count = dcount.round();
    if count < 4.0 || (count - dcount).abs() > 1e-2 || count > u32::MAX as f64 {
        return None;
    }
    Some(StepColumn::with_count(start, step, count as usize))
}

/// Read a `START STEP END` line, allowing up to `max_headers` other lines
/// before it, followed by the intensities.
///
/// Intensities are read until the declared number of points is collected.
pub(crate) fn read_ssel_and_data(
    src: &mut dyn DataSource,
    format: &'static str,
    max_headers: usize,
) -> Result<Block> {
    let mut xcol = None;
    for _ in 0..=max_headers {
        let Some(line) = read_line(src)? else {
            break;
        };
        if let Some(col) = parse_start_step_end(&line) {
            xcol = Some(col);
            break;
        }
    }
    let xcol = xcol.ok_or_else(|| FormatError::unexpected(format, "start-step-end line not found"))?;
    let count = xcol.count.unwrap_or(0);

    let mut ycol = VectorColumn::with_capacity(count.min(MAX_PREALLOCATED));
    while ycol.len() < count {
        let Some(line) = read_line(src)? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        push_values(&mut ycol, &line, ',')?;
    }
    if ycol.len() < count {
        return Err(FormatError::unexpected(
            format,
            format!("expected {} points, found {}", count, ycol.len()),
        )
        .into());
    }
    let values: Vec<f64> = ycol.values()[..count].to_vec();

    let mut block = Block::new();
    block.add_column(Column::step(xcol));
    block.add_column(Column::vector(values));
    Ok(block)
}

/// Skip whitespace and one `/* ... */` comment, if present.
pub(crate) fn skip_c_comment(src: &mut dyn DataSource) -> Result<()> {
    skip_whitespace(src)?;
    if !src.fill_buf()?.starts_with(b"/*") {
        return Ok(());
    }
    src.consume(2);

    let mut prev = 0u8;
    loop {
        let mut byte = [0u8; 1];
        if src.read(&mut byte)? == 0 {
            return Err(FormatError::UnexpectedEof.into());
        }
        if prev == b'*' && byte[0] == b'/' {
            break;
        }
        prev = byte[0];
    }
    skip_whitespace(src)
}

fn skip_whitespace(src: &mut dyn DataSource) -> Result<()> {
    loop {
        let buf = src.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }
        let n = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
        let done = n < buf.len();
        src.consume(n);
        if done {
            return Ok(());
        }
    }
}
