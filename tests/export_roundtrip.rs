//! Property: text exported by `write_plain_text` loads back as the same
//! numbers, to the exported precision.

use std::io::Cursor;

use proptest::prelude::*;
use xydata::formats::text;
use xydata::{load_stream, write_plain_text, Block, Column, ExportOptions};

proptest! {
    /// Any table of finite values survives export and re-import as text
    #[test]
    fn test_plain_text_roundtrip(
        columns in 2usize..5,
        rows in prop::collection::vec(prop::collection::vec(-1e6f64..1e6, 5), 1..50),
        precision in 3usize..9,
        with_metadata in any::<bool>(),
    ) {
        let mut dataset = text::FORMAT.create();
        dataset.meta.set("comment", "generated\nby proptest");
        let mut block = Block::new();
        for k in 0..columns {
            block.add_column(Column::vector(rows.iter().map(|r| r[k]).collect::<Vec<_>>()));
        }
        dataset.push_block(block);

        let options = ExportOptions { with_metadata, precision };
        let mut out = Vec::new();
        write_plain_text(&dataset, &mut out, &options).unwrap();

        let reloaded = load_stream(&mut Cursor::new(out), &text::FORMAT, &[]).unwrap();
        prop_assert_eq!(reloaded.block_count(), 1);
        let block = reloaded.block(0).unwrap();
        prop_assert_eq!(block.column_count(), columns);
        prop_assert_eq!(block.point_count(), Some(rows.len()));

        let tolerance = 0.5 * 10f64.powi(-(precision as i32)) + 1e-9;
        for (n, row) in rows.iter().enumerate() {
            for (k, expected) in row.iter().take(columns).enumerate() {
                let got = block.column(k).unwrap().value(n).unwrap();
                prop_assert!((got - expected).abs() <= tolerance, "{} vs {}", got, expected);
            }
        }
    }
}
