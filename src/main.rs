mod config;
mod error;
mod fetch;
mod files;
mod format;
mod merge;
mod parser;
mod readme;
mod record;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::Settings;
use crate::format::Format;

#[derive(Parser)]
#[command(
    name = "paper_digest",
    about = "Scrape a PaperDigest papers table into Markdown or CSV, newest first"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the papers page and print or merge its table
    Scrape {
        /// Source URL containing the papers table
        #[arg(long)]
        url: Option<String>,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Same as scrape, from a saved HTML file
    Render {
        /// Saved HTML page
        path: PathBuf,
        #[command(flatten)]
        table: TableArgs,
    },
    /// Refresh the README papers section from the CSV store
    Readme {
        /// CSV store to read
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Document to rewrite
        #[arg(long)]
        readme: Option<PathBuf>,
        /// Number of papers to show
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Only include papers on/after this date (YYYY-MM-DD)
    #[arg(long)]
    since: Option<String>,
    /// Max rows to output (after sorting); 0 means no limit
    #[arg(short = 'n', long)]
    limit: Option<usize>,
    /// Existing papers file to merge into (deduplicated by source link)
    #[arg(long)]
    append: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Md)]
    format: Format,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;

    match cli.command {
        Commands::Scrape { url, table } => {
            let url = url.unwrap_or_else(|| settings.source_url.clone());
            let html = fetch::fetch_html(&settings, &url)?;
            run_table(&html, &table)?;
        }
        Commands::Render { path, table } => {
            let html = files::read_lossy(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            run_table(&html, &table)?;
        }
        Commands::Readme { csv, readme: doc, top } => {
            let csv = csv.unwrap_or(settings.readme.csv_path);
            let doc = doc.unwrap_or(settings.readme.readme_path);
            let top = top.unwrap_or(settings.readme.top_n);
            let written = readme::refresh(&csv, &doc, &settings.readme.heading, top)
                .with_context(|| format!("Failed to refresh {}", doc.display()))?;
            println!("Updated {} with {} papers.", doc.display(), written);
        }
    }

    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}

/// Extract, sort, filter, and either print the table or merge it into a file.
fn run_table(html: &str, args: &TableArgs) -> anyhow::Result<()> {
    let records = parser::process_page(html)?;

    let Some(path) = args.append.as_deref() else {
        let out = merge::merge(&records, args.since.as_deref(), args.limit, None, args.format)?;
        println!("{}", out.text);
        return Ok(());
    };

    let existing = files::read_existing(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let out = merge::merge(
        &records,
        args.since.as_deref(),
        args.limit,
        Some(&existing),
        args.format,
    )?;
    std::fs::write(path, &out.text)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Appended {} new papers. Total: {}.", out.added, out.total);
    Ok(())
}
