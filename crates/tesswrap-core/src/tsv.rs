use tesswrap_types::TsvTable;

/// Parse tab-separated engine output into a [`TsvTable`].
///
/// The first non-blank line is the header. Fewer than two lines yields an
/// empty table with no headers.
pub fn parse_tsv(data: &str) -> TsvTable {
    let mut rows = data
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let Some(header) = rows.next() else {
        return TsvTable::default();
    };
    let mut rows = rows.peekable();
    if rows.peek().is_none() {
        return TsvTable::default();
    }

    let mut table = TsvTable::new(header.split('\t').map(str::to_string).collect());
    for row in rows {
        table.push_row(row.split('\t'));
    }
    tracing::debug!(
        "Parsed TSV with {} columns and {} rows",
        table.headers().len(),
        table.len()
    );
    table
}
