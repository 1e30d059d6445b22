use tracing::debug;

use super::table::{Link, RawCell, RawRow};
use crate::record::{self, Record};

const MIN_COLUMNS: usize = 5;
const TITLE_COL: usize = 1;
const AUTHORS_COL: usize = 2;
const DATE_COL: usize = 4;

const VIEW_LABEL: &str = "view";
const HIGHLIGHT_PREFIX: &str = "Highlight: ";
const PAPER_ID_PARAM: &str = "paper_id=";
const ET_AL: &str = " et. al.";

/// Turn raw table rows into records. Rows with fewer than five cells are skipped.
pub fn extract(rows: &[RawRow]) -> Vec<Record> {
    let mut skipped = 0usize;
    let records: Vec<Record> = rows
        .iter()
        .filter_map(|row| {
            let rec = extract_row(row);
            if rec.is_none() {
                skipped += 1;
            }
            rec
        })
        .collect();

    if skipped > 0 {
        debug!("Skipped {} malformed rows", skipped);
    }
    records
}

fn extract_row(row: &RawRow) -> Option<Record> {
    if row.cells.len() < MIN_COLUMNS {
        return None;
    }
    let title_cell = row.cells.get(TITLE_COL)?;
    let authors_cell = row.cells.get(AUTHORS_COL)?;
    let date_cell = row.cells.get(DATE_COL)?;

    let anchors: Vec<(&str, &str)> = title_cell
        .links
        .iter()
        .filter_map(|l| l.href.as_deref().map(|href| (l.text.as_str(), href)))
        .collect();

    let title = title_link(&anchors);
    let view = view_link(&anchors);

    let paper = title.map(|(text, _)| text).unwrap_or_default();
    let source_link = view.or(title).map(|(_, href)| href).unwrap_or_default();
    let name = title
        .map(|(_, href)| source_name(href))
        .unwrap_or_else(|| record::NO_SOURCE.to_string());

    Some(Record::new(
        paper,
        authors(authors_cell),
        description(title_cell),
        record::source_display(&name, source_link),
        source_link,
        date_cell.text.as_str(),
    ))
}

fn is_view(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(VIEW_LABEL)
}

/// First anchor not labelled "View", else the first anchor.
pub fn title_link<'a>(anchors: &[(&'a str, &'a str)]) -> Option<(&'a str, &'a str)> {
    anchors
        .iter()
        .find(|(text, _)| !is_view(text))
        .or_else(|| anchors.first())
        .copied()
}

/// First anchor labelled "View".
pub fn view_link<'a>(anchors: &[(&'a str, &'a str)]) -> Option<(&'a str, &'a str)> {
    anchors.iter().find(|(text, _)| is_view(text)).copied()
}

/// Display name for a source: the `paper_id` value, else the last path segment.
pub fn source_name(href: &str) -> String {
    if href.is_empty() {
        return record::NO_SOURCE.to_string();
    }
    if let Some((_, id)) = href.rsplit_once(PAPER_ID_PARAM) {
        return id.to_string();
    }
    match href.trim_end_matches('/').rsplit('/').next() {
        Some(seg) if !seg.is_empty() => seg.to_string(),
        _ => "Unknown".to_string(),
    }
}

fn description(cell: &RawCell) -> String {
    match &cell.italic {
        Some(text) => text.strip_prefix(HIGHLIGHT_PREFIX).unwrap_or(text).to_string(),
        None => String::new(),
    }
}

fn authors(cell: &RawCell) -> String {
    let joined = if cell.links.is_empty() {
        cell.text.clone()
    } else {
        cell.links
            .iter()
            .map(|Link { text, .. }| text.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    };

    if joined.starts_with(';') {
        format!("{}{}", joined.trim_start_matches(';').trim(), ET_AL)
    } else {
        joined
    }
}
