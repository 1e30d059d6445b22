use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

const DEFAULT_URL: &str =
    "https://www.paperdigest.org/2020/04/recent-papers-on-algorithmic-trading-high-frequency-trading/";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub source_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub readme: ReadmeSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadmeSettings {
    pub csv_path: PathBuf,
    pub readme_path: PathBuf,
    pub heading: String,
    pub top_n: usize,
}

impl Settings {
    /// Built-in defaults overridden by `PAPERS_*` env vars, e.g. `PAPERS_README__TOP_N=10`.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("source_url", DEFAULT_URL)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("timeout_secs", 30_i64)?
            .set_default("readme.csv_path", "hft_papers/papers.csv")?
            .set_default("readme.readme_path", "README.md")?
            .set_default("readme.heading", "## Most recent HFT papers")?
            .set_default("readme.top_n", 20_i64)?
            .add_source(
                Environment::with_prefix("PAPERS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
