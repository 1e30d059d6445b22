use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::PaperError;

/// Whole-file read; invalid UTF-8 is replaced rather than rejected.
pub fn read_lossy(path: &Path) -> Result<String, PaperError> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            warn!("{} is not valid UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(&e.into_bytes()).into_owned()
        }
    })
}

/// Existing store content. A file that does not exist yet reads as empty.
pub fn read_existing(path: &Path) -> Result<String, PaperError> {
    if !path.exists() {
        info!("{} does not exist yet, starting a new store", path.display());
        return Ok(String::new());
    }
    read_lossy(path)
}
