#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Every parser must fail with an error, never panic, on arbitrary bytes.
    for format in xydata::formats() {
        let mut src = Cursor::new(data);
        let _ = format.check(&mut src);

        let mut src = Cursor::new(data);
        if let Ok(dataset) = xydata::load_stream(&mut src, format, &[]) {
            // Reading back every value must not panic either
            for block in dataset.blocks() {
                let rows = block.point_count().unwrap_or(0).min(1 << 16);
                for column in block.columns() {
                    for n in 0..rows {
                        let _ = column.value(n);
                    }
                }
            }
        }
    }
});
