use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use crate::config::Settings;
use crate::error::PaperError;

/// Single GET of the source page. No retries.
pub fn fetch_html(settings: &Settings, url: &str) -> Result<String, PaperError> {
    let wrap = |source: reqwest::Error| PaperError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .map_err(wrap)?;

    info!("Fetching {}", url);
    let html = client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(wrap)?;

    info!("Fetched {} bytes", html.len());
    Ok(html)
}
