#![no_main]

use fairaudit::config::ColumnSpec;
use fairaudit::dataset::{parse_csv, Dataset};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Neither parsing nor preparation may panic on arbitrary input
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(table) = parse_csv(input) {
            let _ = Dataset::prepare(&table, &ColumnSpec::default(), 7.0);
        }
    }
    let _ = Dataset::from_csv_bytes(data, &ColumnSpec::default(), 7.0, "fuzz");
});
