#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const LUNCH: &str = "tests/fixtures/lunch.json";
pub const DISHES: &str = "tests/fixtures/dishes.csv";
pub const RECEIPT: &str = "tests/fixtures/receipt.txt";

/// Writes `contents` to a temporary file that lives as long as the handle.
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}
