use tesswrap_types::BoundingBox;

/// Parse a `makebox` box file.
///
/// Each line is `symbol left bottom right top page`. Lines with a different
/// field count or non-numeric coordinates are skipped.
pub fn parse_boxes(content: &str) -> Vec<BoundingBox> {
    content
        .lines()
        .enumerate()
        .filter_map(|(n, line)| {
            let parsed = parse_line(line);
            if parsed.is_none() && !line.trim().is_empty() {
                tracing::debug!("Skipping box line {}: {:?}", n + 1, line);
            }
            parsed
        })
        .collect()
}

fn parse_line(line: &str) -> Option<BoundingBox> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [symbol, left, bottom, right, top, page] = fields.as_slice() else {
        return None;
    };

    Some(BoundingBox {
        symbol: symbol.to_string(),
        left: left.parse().ok()?,
        bottom: bottom.parse().ok()?,
        right: right.parse().ok()?,
        top: top.parse().ok()?,
        page: page.parse().ok()?,
    })
}
