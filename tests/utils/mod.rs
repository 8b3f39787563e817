// Integration test utilities
//
// CSV fixtures shaped like the COMPAS two-year export.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "id,race,sex,decile_score,two_year_recid";

/// One fixture row: (race, decile score, recidivated)
pub type Row<'a> = (&'a str, u32, bool);

/// Render rows as CSV text with the COMPAS column names
pub fn compas_csv(rows: &[Row<'_>]) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for (i, (race, score, recid)) in rows.iter().enumerate() {
        let sex = if i % 2 == 0 { "Male" } else { "Female" };
        writeln!(csv, "{},{},{},{},{}", i + 1, race, sex, score, u8::from(*recid)).unwrap();
    }
    csv
}

/// Two groups of 20 where "African-American" is flagged far more often
pub fn biased_rows() -> Vec<Row<'static>> {
    let mut rows = Vec::new();
    for i in 0..20u32 {
        rows.push(("African-American", 3 + i % 8, i % 2 == 0));
    }
    for i in 0..20u32 {
        rows.push(("Caucasian", 1 + i % 7, i % 3 == 0));
    }
    rows
}

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
