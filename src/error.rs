use std::io;

use thiserror::Error;

/// Structural failures. Row-level problems never reach this type.
#[derive(Debug, Error)]
pub enum PaperError {
    #[error("No table found on the webpage.")]
    NoTableFound,
    #[error("CSV is missing expected columns: {missing:?}. Found columns: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },
    #[error("section '{heading}' with a papers table header was not found")]
    SectionNotFound { heading: String },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
