use std::fmt::Write as _;

use serde::Serialize;
use tesswrap_ocr::{BoundingBox, TsvTable, TsvWord};

pub fn format_boxes(boxes: &[BoundingBox]) -> String {
    let mut out = String::new();
    for b in boxes {
        let _ = writeln!(
            out,
            "Character '{}' at ({},{},{},{}) on page {}",
            b.symbol, b.left, b.top, b.right, b.bottom, b.page
        );
    }
    out
}

#[derive(Serialize)]
struct DataReport<'a> {
    columns: Vec<&'a str>,
    rows: usize,
    words: Vec<TsvWord>,
    table: &'a TsvTable,
}

/// TSV layout data as pretty JSON
pub fn format_data(table: &TsvTable) -> serde_json::Result<String> {
    let report = DataReport {
        columns: table.headers().iter().map(String::as_str).collect(),
        rows: table.len(),
        words: table.words(),
        table,
    };
    serde_json::to_string_pretty(&report)
}
