pub mod csv_text;
pub mod markdown;

use clap::ValueEnum;

use crate::error::PaperError;
use crate::record::Record;

/// Persisted/output table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Md,
    Csv,
}

pub fn render(records: &[Record], format: Format) -> Result<String, PaperError> {
    match format {
        Format::Md => Ok(markdown::render(records)),
        Format::Csv => csv_text::render(records),
    }
}

pub fn parse(text: &str, format: Format) -> Result<Vec<Record>, PaperError> {
    match format {
        Format::Md => Ok(markdown::parse(text)),
        Format::Csv => csv_text::parse(text),
    }
}
