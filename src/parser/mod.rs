pub mod date;
pub mod extract;
pub mod table;

use tracing::info;

use crate::error::PaperError;
use crate::record::Record;

/// Two-step pipeline: html → raw rows → records.
pub fn process_page(html: &str) -> Result<Vec<Record>, PaperError> {
    let rows = table::find_rows(html)?;
    let records = extract::extract(&rows);
    info!("Extracted {} papers from {} table rows", records.len(), rows.len());
    Ok(records)
}
