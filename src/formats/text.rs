//! Plain x-y text
//!
//! Each data line holds two or more numbers separated by whitespace, `,`,
//! `;` or `:`. Lines that do not start with a number are comments.
//!
//! ```text
//! ; Sample date: 2000/12/31 21:32
//! 38.834110      361
//! 38.872800  ,   318
//! 38.911500      352.431
//! ```
//!
//! With the `first-line-header` option the first line names the columns.

use std::io::{BufRead, Read};

use log::trace;

use crate::decode::text::{leading_numbers, read_line};
use crate::error::{FormatError, Result};
use crate::model::{Block, Column, DataSet};
use crate::registry::{DataSource, FormatInfo};

/// Option taking column names from the first line.
pub const FIRST_LINE_HEADER: &str = "first-line-header";

const DETECT_LINES: usize = 64;
const DETECT_BYTES: u64 = 64 * 1024;

/// Registry entry.
pub static FORMAT: FormatInfo = FormatInfo {
    name: "text",
    description: "ascii plain text",
    extensions: &["txt", "dat", "asc", "csv", "prn"],
    binary: false,
    multiblock: false,
    detect,
    fill,
};

fn detect(src: &mut dyn DataSource) -> bool {
    let mut head = Read::take(&mut *src, DETECT_BYTES);
    for _ in 0..DETECT_LINES {
        let mut buf = Vec::new();
        match head.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        if buf.contains(&0) {
            return false;
        }
        if leading_numbers(&String::from_utf8_lossy(&buf)).len() >= 2 {
            return true;
        }
    }
    false
}

fn fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    let names = if ds.has_option(FIRST_LINE_HEADER) {
        read_line(src)?.map(|line| header_names(&line)).unwrap_or_default()
    } else {
        Vec::new()
    };

    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut rows = 0usize;
    let mut line_no = 0usize;
    while let Some(line) = read_line(src)? {
        line_no += 1;
        let numbers = leading_numbers(&line);
        if numbers.is_empty() {
            continue;
        }
        if numbers.iter().any(|v| v.is_infinite()) {
            return Err(FormatError::NumericOverflow(line.trim().to_string()).into());
        }
        // a lone first row with a different width is treated as a header
        if rows <= 1 && numbers.len() != columns.len() {
            columns = vec![Vec::new(); numbers.len()];
            rows = 0;
        }
        if numbers.len() != columns.len() {
            return Err(FormatError::unexpected(
                FORMAT.name,
                format!(
                    "line {}: {} numbers where {} columns were found before",
                    line_no,
                    numbers.len(),
                    columns.len()
                ),
            )
            .into());
        }
        for (col, value) in columns.iter_mut().zip(numbers) {
            col.push(value);
        }
        rows += 1;
    }

    ds.format_assert(columns.len() >= 2, "no line with at least two numbers")?;
    trace!("text: {} columns x {} rows", columns.len(), rows);

    let mut block = Block::new();
    for (i, values) in columns.into_iter().enumerate() {
        let mut column = Column::vector(values);
        if let Some(name) = names.get(i) {
            column.name = name.clone();
        }
        block.add_column(column);
    }
    ds.push_block(block);
    Ok(())
}

fn header_names(line: &str) -> Vec<String> {
    let line = line.trim_start_matches(|c: char| c == '#' || c == ';' || c.is_whitespace());
    if line.contains('\t') || line.contains(',') {
        line.split(['\t', ','])
            .map(|s| s.trim().to_string())
            .collect()
    } else {
        line.split_whitespace().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(content: &str, options: &[&str]) -> Result<DataSet> {
        let mut ds = FORMAT.create();
        ds.options = options.iter().map(|s| s.to_string()).collect();
        fill(&mut ds, &mut Cursor::new(content.as_bytes().to_vec()))?;
        Ok(ds)
    }

    #[test]
    fn test_comment_line_then_two_columns() {
        let ds = load("; Sample date: 2000/12/31\n1 10\n2 20\n3 30\n", &[]).unwrap();
        assert_eq!(ds.block_count(), 1);
        let block = ds.block(0).unwrap();
        assert_eq!(block.column_count(), 2);
        assert_eq!(block.column(0).unwrap().point_count(), Some(3));
        assert_eq!(block.column(1).unwrap().value(2).unwrap(), 30.0);
    }

    #[test]
    fn test_mixed_separators() {
        let ds = load("38.834110      361\n38.872800  ,   318\n38.9115; 352.431\n", &[]).unwrap();
        let y = ds.block(0).unwrap().column(1).unwrap();
        assert_eq!(y.value(1).unwrap(), 318.0);
        assert_eq!(y.value(2).unwrap(), 352.431);
    }

    #[test]
    fn test_single_odd_first_row_is_dropped() {
        let ds = load("2024 1 1\n1 10\n2 20\n", &[]).unwrap();
        let block = ds.block(0).unwrap();
        assert_eq!(block.column_count(), 2);
        assert_eq!(block.point_count(), Some(2));
    }

    #[test]
    fn test_column_count_mismatch() {
        let err = load("1 10\n2 20\n3 30 300\n", &[]).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_overflowing_value() {
        let err = load("1 2\n2 1e999\n3 4\n", &[]).unwrap_err();
        assert!(err.is_format_error());
        assert!(matches!(
            err,
            crate::Error::Format(FormatError::NumericOverflow(_))
        ));
    }

    #[test]
    fn test_no_data() {
        assert!(load("only text\n", &[]).is_err());
        assert!(load("1\n2\n3\n", &[]).is_err());
    }

    #[test]
    fn test_first_line_header() {
        let ds = load("2theta\tcounts\tsigma\n1 10 1\n2 20 2\n", &[FIRST_LINE_HEADER]).unwrap();
        let block = ds.block(0).unwrap();
        let names: Vec<_> = block.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["2theta", "counts", "sigma"]);
    }

    #[test]
    fn test_detect() {
        assert!(detect(&mut Cursor::new(b"# title\n1.0 2.0\n".to_vec())));
        assert!(!detect(&mut Cursor::new(b"just words\n".to_vec())));
        assert!(!detect(&mut Cursor::new(b"1 2\0\n".to_vec())));
        assert!(!detect(&mut Cursor::new(Vec::new())));
    }
}
