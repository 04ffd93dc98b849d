//! Line and number helpers for text formats
//!
//! Number parsing follows the C `strtod` convention used by instrument
//! software: a number is the longest prefix that looks like a decimal
//! floating-point literal, and whatever follows is left to the caller.

use std::io::BufRead;

use crate::error::{FormatError, Result};

/// Read one line, without the trailing `\n` / `\r\n`.
///
/// Returns `None` at end of stream. Invalid UTF-8 is replaced rather than
/// rejected, since headers of vendor files are often Latin-1.
pub fn read_line<R: BufRead + ?Sized>(r: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    if r.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Read one line, failing with [`FormatError::UnexpectedEof`] at end of stream.
pub fn expect_line<R: BufRead + ?Sized>(r: &mut R) -> Result<String> {
    read_line(r)?.ok_or_else(|| FormatError::UnexpectedEof.into())
}

/// Read the next line that is neither blank nor a comment.
///
/// The returned line is trimmed, and a trailing comment starting with
/// `comment` is removed.
pub fn next_valid_line<R: BufRead + ?Sized>(r: &mut R, comment: char) -> Result<Option<String>> {
    while let Some(line) = read_line(r)? {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(comment) {
            continue;
        }
        let content = match trimmed.find(comment) {
            Some(pos) => trimmed[..pos].trim_end(),
            None => trimmed,
        };
        return Ok(Some(content.to_string()));
    }
    Ok(None)
}

/// True if `c` can start a number (`strtod` sense, without whitespace).
pub fn is_numeric_start(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.')
}

/// Length in bytes of the numeric literal at the start of `s`, if any.
fn numeric_prefix_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    Some(i)
}

/// Parse the number at the start of `s` (after leading whitespace).
///
/// Returns the value and the unparsed remainder, or `None` if `s` does not
/// start with a number.
pub fn leading_f64(s: &str) -> Option<(f64, &str)> {
    let s = s.trim_start();
    let len = numeric_prefix_len(s)?;
    let value = s[..len].parse::<f64>().ok()?;
    Some((value, &s[len..]))
}

/// Parse a floating-point number that starts the string.
///
/// Trailing text is ignored; a missing number or an overflow is a
/// [`FormatError`].
pub fn parse_f64(s: &str) -> Result<f64> {
    match leading_f64(s) {
        Some((value, _)) if value.is_infinite() => {
            Err(FormatError::NumericOverflow(s.trim().to_string()).into())
        }
        Some((value, _)) => Ok(value),
        None => Err(FormatError::NotANumber(s.trim().to_string()).into()),
    }
}

/// Parse an integer that starts the string (`strtol` sense).
pub fn parse_i64(s: &str) -> Result<i64> {
    let t = s.trim();
    let bytes = t.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return Err(FormatError::NotANumber(t.to_string()).into());
    }
    t[..end]
        .parse::<i64>()
        .map_err(|_| FormatError::NumericOverflow(t.to_string()).into())
}

/// Parse every number of a line separated by whitespace or `sep`.
///
/// Any token that is not a number is a [`FormatError`].
pub fn parse_values(line: &str, sep: char) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    let mut rest = line.trim_start_matches(|c: char| c.is_whitespace() || c == sep);
    while !rest.is_empty() {
        let (value, tail) = leading_f64(rest).ok_or_else(|| {
            FormatError::NotANumber(format!("number not found in line: {}", line.trim()))
        })?;
        if value.is_infinite() {
            return Err(FormatError::NumericOverflow(line.trim().to_string()).into());
        }
        values.push(value);
        rest = tail.trim_start_matches(|c: char| c.is_whitespace() || c == sep);
    }
    Ok(values)
}

/// Collect numbers from the start of a line until the first non-number.
///
/// `,`, `;` and `:` count as whitespace. A line that starts with text yields
/// no numbers, which is how free-form comment lines are recognised.
pub fn leading_numbers(line: &str) -> Vec<f64> {
    let cleaned: String = line
        .chars()
        .map(|c| if matches!(c, ',' | ';' | ':') { ' ' } else { c })
        .collect();

    let mut numbers = Vec::new();
    let mut rest = cleaned.as_str();
    while let Some((value, tail)) = leading_f64(rest) {
        // strtod-style: "12abc" is not a number token
        if !tail.is_empty() && !tail.starts_with(char::is_whitespace) {
            break;
        }
        numbers.push(value);
        rest = tail;
    }
    numbers
}

/// Split `KEY <sep> VALUE` at the first `sep`, trimming both sides.
///
/// Without a separator the whole line is the key and the value is empty.
pub fn split_key_value<'a>(line: &'a str, sep: &str) -> (&'a str, &'a str) {
    match line.find(sep) {
        Some(pos) => (line[..pos].trim(), line[pos + sep.len()..].trim()),
        None => (line, ""),
    }
}
