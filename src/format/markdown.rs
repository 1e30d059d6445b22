use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::record::Record;

/// A Source cell that is exactly `[label](url)`; the url may contain parentheses.
static SOURCE_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.*?)\]\((.*)\)$").unwrap());
/// Fallback for hand-edited cells with text around the link.
static SOURCE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\(([^)\s]+)\)").unwrap());

pub const COLUMNS: [&str; 5] = ["Paper", "Author(s)", "Description", "Source", "Date"];

/// `| Paper | Author(s) | Description | Source | Date |` plus its separator line.
pub fn header() -> String {
    format!("{}\n{}", join_row(&COLUMNS), join_row(&["---"; 5]))
}

/// Render a full table: header, separator, one line per record.
pub fn render(records: &[Record]) -> String {
    let mut lines = vec![header()];
    lines.extend(records.iter().map(render_row));
    lines.join("\n")
}

/// Render data rows only, for splicing under an existing header.
pub fn render_rows(records: &[Record]) -> String {
    records.iter().map(render_row).collect::<Vec<_>>().join("\n")
}

fn render_row(r: &Record) -> String {
    let cells = [
        r.paper(),
        r.authors(),
        r.description(),
        r.source_display(),
        r.date_text(),
    ]
    .map(escape_cell);
    join_row(&cells)
}

fn join_row<S: AsRef<str>>(cells: &[S]) -> String {
    let inner: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
    format!("| {} |", inner.join(" | "))
}

fn escape_cell(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
        .replace('\\', "\\\\")
        .replace('|', "\\|")
}

/// Parse a previously rendered table. Header, separator and non-table lines are skipped.
pub fn parse(text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for line in text.lines().map(str::trim) {
        if !line.starts_with('|') {
            continue;
        }
        let cols = split_row(line);
        if is_separator(&cols) || is_header(&cols) {
            continue;
        }
        let [paper, authors, description, source, date, ..] = cols.as_slice() else {
            skipped += 1;
            continue;
        };
        let link = source_link(source);
        records.push(Record::new(
            paper.as_str(),
            authors.as_str(),
            description.as_str(),
            source.as_str(),
            link,
            date.as_str(),
        ));
    }

    if skipped > 0 {
        debug!("Skipped {} short markdown rows", skipped);
    }
    records
}

/// Link target of a Source cell, empty when there is none.
fn source_link(cell: &str) -> &str {
    SOURCE_CELL_RE
        .captures(cell)
        .or_else(|| SOURCE_LINK_RE.captures(cell))
        .and_then(|caps| caps.get(2))
        .map_or("", |m| m.as_str())
}

/// Split `| a | b\|c |` into `["a", "b|c"]`.
fn split_row(line: &str) -> Vec<String> {
    let body = line.strip_prefix('|').unwrap_or(line);
    // Rendered rows always close with " |", so the final pipe is never escaped.
    let body = body.strip_suffix('|').unwrap_or(body);

    let mut cols = Vec::new();
    let mut cell = String::new();
    let mut escaped = false;
    // Only `\\` and `\|` are escapes; any other backslash is kept as written.
    for ch in body.chars() {
        match (escaped, ch) {
            (false, '\\') => escaped = true,
            (false, '|') => cols.push(std::mem::take(&mut cell)),
            (false, _) => cell.push(ch),
            (true, '\\' | '|') => {
                cell.push(ch);
                escaped = false;
            }
            (true, _) => {
                cell.push('\\');
                cell.push(ch);
                escaped = false;
            }
        }
    }
    if escaped {
        cell.push('\\');
    }
    cols.push(cell);
    cols.into_iter().map(|c| c.trim().to_string()).collect()
}

fn is_separator(cols: &[String]) -> bool {
    cols.iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':' | ' ')))
}

fn is_header(cols: &[String]) -> bool {
    cols.len() >= COLUMNS.len() && cols.iter().zip(COLUMNS).all(|(c, h)| c == h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::source_display;

    fn rec(paper: &str, link: &str, date: &str) -> Record {
        Record::new(paper, "A; B", "desc", source_display("id", link), link, date)
    }

    fn links(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.source_link()).collect()
    }

    #[test]
    fn header_is_fixed() {
        assert_eq!(
            header(),
            "| Paper | Author(s) | Description | Source | Date |\n| --- | --- | --- | --- | --- |"
        );
    }

    #[test]
    fn round_trip_keeps_links_and_order() {
        let rs = vec![
            rec("One", "https://a/1", "2025-01-02"),
            rec("Two", "", "unknown"),
            rec("Three", "https://c/?paper_id=3", "2024-01-01"),
        ];
        let parsed = parse(&render(&rs));
        assert_eq!(links(&parsed), links(&rs));
        assert_eq!(parsed[0], rs[0]);
        assert_eq!(parsed[1].source_display(), "N/A");
    }

    #[test]
    fn pipes_and_newlines_survive() {
        let r = Record::new("A | B", "x", "line\nbreak", "N/A", "", "2024-02-02");
        let text = render(&[r]);
        assert_eq!(text.lines().count(), 3);
        let back = &parse(&text)[0];
        assert_eq!(back.paper(), "A | B");
        assert_eq!(back.description(), "line break");
    }

    #[test]
    fn trailing_escaped_pipe() {
        let r = Record::new("ends with |", "x", "", "N/A", "", "");
        let back = parse(&render_rows(&[r]));
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].paper(), "ends with |");
    }

    #[test]
    fn links_with_parentheses_round_trip() {
        let link = "https://en.wikipedia.org/wiki/Market_(economics)";
        let rs = vec![rec("Markets", link, "2024-05-05"), rec("Other", "https://b/(x)/y", "")];
        let parsed = parse(&render(&rs));
        assert_eq!(links(&parsed), vec![link, "https://b/(x)/y"]);
        assert_eq!(parsed, rs);
    }

    #[test]
    fn link_inside_surrounding_text() {
        assert_eq!(source_link("see [x](https://x/1) here"), "https://x/1");
        assert_eq!(source_link("N/A"), "");
    }

    #[test]
    fn backslashes_survive() {
        let r = Record::new("a\\|b", "C:\\path\\", "", "N/A", "", "2024-02-02");
        let back = parse(&render_rows(&[r.clone()]));
        assert_eq!(back, vec![r]);
    }

    #[test]
    fn lone_backslash_is_kept_as_written() {
        let parsed = parse("| a\\b | x | | N/A | |");
        assert_eq!(parsed[0].paper(), "a\\b");
    }

    #[test]
    fn skips_noise_lines() {
        let text = "# Papers\n\n| Paper | Author(s) | Description | Source | Date |\n|---|---|---|---|---|\n| t | a | d | [x](https://x) | 2024-01-01 |\n| too | short |\nfooter\n";
        let parsed = parse(text);
        assert_eq!(links(&parsed), vec!["https://x"]);
    }

    #[test]
    fn fixture_file() {
        let text = std::fs::read_to_string("tests/fixtures/papers.md").unwrap();
        let parsed = parse(&text);
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].source_link(), "https://arxiv.org/abs/2412.04444");
        assert_eq!(parsed[2].source_link(), "");
    }
}
