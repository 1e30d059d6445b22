use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::PaperError;
use crate::files::read_lossy;
use crate::format::{csv_text, markdown};
use crate::record::{self, Record};

/// Columns the README table needs from the CSV store.
const REQUIRED: [&str; 5] = ["Paper", "Author(s)", "Description", "Source", "Date"];

/// The `n` most recent records. Unknown dates rank last but are kept.
pub fn top_n(records: &[Record], n: usize) -> Vec<Record> {
    let mut rows = records.to_vec();
    record::sort_newest_first(&mut rows);
    rows.truncate(n);
    rows
}

/// Read the CSV store and project its newest `n` rows, dates normalized to `YYYY-MM-DD`.
pub fn top_papers(csv: &str, n: usize) -> Result<Vec<Record>, PaperError> {
    let found = csv_text::headers(csv)?;
    let missing: Vec<String> = REQUIRED
        .iter()
        .filter(|col| !found.iter().any(|f| f == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PaperError::MissingColumns { missing, found });
    }

    let records = csv_text::parse(csv)?;
    info!("CSV store has {} papers", records.len());

    Ok(top_n(&records, n)
        .iter()
        .map(|r| {
            let date = r
                .date_value()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            r.with_date_text(date)
        })
        .collect())
}

/// Replace the rows under `heading`'s papers table, leaving the rest untouched.
///
/// The section is `heading`, a blank line, the table header and separator; the
/// rows run until the next line starting with `#` or the end of the document.
/// CRLF documents are matched on `\n` and written back with CRLF.
pub fn replace_section(document: &str, heading: &str, rows: &str) -> Result<String, PaperError> {
    let crlf = document.contains("\r\n");
    let document: Cow<'_, str> = if crlf {
        Cow::Owned(document.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(document)
    };

    let marker = format!("{}\n\n{}\n", heading, markdown::header());
    let start = document
        .find(&marker)
        .map(|i| i + marker.len())
        .ok_or_else(|| PaperError::SectionNotFound {
            heading: heading.to_string(),
        })?;

    let rest = &document[start..];
    let end = if rest.starts_with('#') {
        start
    } else {
        rest.find("\n#").map_or(document.len(), |i| start + i)
    };

    let mut out = String::with_capacity(document.len() + rows.len());
    out.push_str(&document[..start]);
    if !rows.is_empty() {
        out.push_str(rows);
        out.push('\n');
    }
    out.push_str(&document[end..]);

    Ok(if crlf { out.replace('\n', "\r\n") } else { out })
}

/// Rewrite the README section from the CSV store. Returns the number of rows written.
pub fn refresh(
    csv_path: &Path,
    readme_path: &Path,
    heading: &str,
    n: usize,
) -> Result<usize, PaperError> {
    let csv = read_lossy(csv_path)?;
    let top = top_papers(&csv, n)?;

    let document = read_lossy(readme_path)?;
    let updated = replace_section(&document, heading, &markdown::render_rows(&top))?;
    fs::write(readme_path, updated)?;

    info!("Wrote {} papers into {}", top.len(), readme_path.display());
    Ok(top.len())
}
