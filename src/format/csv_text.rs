use std::io;

use serde::Deserialize;

use crate::error::PaperError;
use crate::record::Record;

pub const COLUMNS: [&str; 6] = [
    "Paper",
    "Author(s)",
    "Description",
    "Source",
    "Source Link",
    "Date",
];

/// One persisted row, read by header name. Absent columns become empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(rename = "Paper")]
    paper: String,
    #[serde(rename = "Author(s)")]
    authors: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Source Link", alias = "source_link")]
    source_link: String,
    #[serde(rename = "Date")]
    date: String,
}

impl From<CsvRow> for Record {
    fn from(row: CsvRow) -> Self {
        Record::new(
            row.paper,
            row.authors,
            row.description,
            row.source,
            row.source_link.trim(),
            row.date,
        )
    }
}

pub fn render(records: &[Record]) -> Result<String, PaperError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(COLUMNS)?;
    for r in records {
        wtr.write_record([
            r.paper(),
            r.authors(),
            r.description(),
            r.source_display(),
            r.source_link(),
            r.date_text(),
        ])?;
    }

    let buf = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

pub fn parse(text: &str) -> Result<Vec<Record>, PaperError> {
    let mut rdr = reader(text);
    let mut records = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        records.push(row?.into());
    }
    Ok(records)
}

/// Header names as they appear in the file.
pub fn headers(text: &str) -> Result<Vec<String>, PaperError> {
    let mut rdr = reader(text);
    Ok(rdr.headers()?.iter().map(|h| h.trim().to_string()).collect())
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes())
}
