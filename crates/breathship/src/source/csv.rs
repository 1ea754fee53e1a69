//! Minimal CSV reader for published spreadsheets.
//!
//! Published sheets only ever quote whole cells, so the reader does not
//! handle escaped quotes inside a quoted cell and does not support quoted
//! line breaks.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::model::Record;

fn whitespace() -> Option<&'static Regex> {
    static WHITESPACE: OnceLock<Option<Regex>> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").ok()).as_ref()
}

/// Split one line into cells.
///
/// A `"` toggles quoted mode and is dropped; a `,` outside quotes ends the
/// cell. Cells are trimmed.
#[must_use]
pub fn parse_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(finish_cell(&mut current)),
            _ => current.push(ch),
        }
    }
    cells.push(finish_cell(&mut current));
    cells
}

fn finish_cell(current: &mut String) -> String {
    let cell = std::mem::take(current);
    let cell = cell.trim();
    let cell = cell.strip_prefix('"').unwrap_or(cell);
    let cell = cell.strip_suffix('"').unwrap_or(cell);
    cell.to_string()
}

/// Parse a whole document, skipping blank lines.
#[must_use]
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Normalize a header cell into a record key: lowercased, whitespace runs
/// replaced by `_`.
#[must_use]
pub fn normalize_header(header: &str) -> String {
    let lowered = header.to_lowercase();
    match whitespace() {
        Some(re) => re.replace_all(&lowered, "_").into_owned(),
        None => lowered.split_whitespace().collect::<Vec<_>>().join("_"),
    }
}

/// Turn a sheet into records keyed by the normalized header row.
///
/// Fewer than two rows yields no records. Cells past the end of a short row
/// and columns with an empty header are left out of the record.
#[must_use]
pub fn sheet_to_records(text: &str) -> Vec<Record> {
    let rows = parse_csv(text);
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    if body.is_empty() {
        return Vec::new();
    }

    let keys: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();

    body.iter()
        .map(|row| {
            keys.iter()
                .zip(row.iter())
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, cell)| (key.clone(), Value::String(cell.clone())))
                .collect()
        })
        .collect()
}
