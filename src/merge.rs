use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::PaperError;
use crate::format::{self, Format};
use crate::parser::date;
use crate::record::{self, Record};

/// Result of a merge: the full new file content plus counts for the summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub text: String,
    pub added: usize,
    pub total: usize,
}

/// Sort fresh records newest first and merge them into `existing`, if given.
///
/// `since` is ignored when it does not parse. Without `existing` this is just
/// sort + filter + limit over the fresh set.
pub fn merge(
    fresh: &[Record],
    since: Option<&str>,
    limit: Option<usize>,
    existing: Option<&str>,
    format: Format,
) -> Result<MergeOutcome, PaperError> {
    let since = since.and_then(|s| {
        let parsed = date::parse(s);
        if parsed.is_none() {
            warn!("Ignoring unparseable since date {:?}", s);
        }
        parsed
    });
    let recent = select_recent(fresh, since);

    let (rows, added) = match existing {
        None => {
            let added = recent.len();
            (recent, added)
        }
        Some(text) => combine(recent, format::parse(text, format)?),
    };

    let rows = apply_limit(rows, limit);
    info!("Merged {} new papers, {} total", added, rows.len());

    Ok(MergeOutcome {
        text: format::render(&rows, format)?,
        added,
        total: rows.len(),
    })
}

/// Newest first, dropping unknown or older dates when `since` is set.
pub fn select_recent(fresh: &[Record], since: Option<NaiveDate>) -> Vec<Record> {
    let mut rows = fresh.to_vec();
    record::sort_newest_first(&mut rows);
    if let Some(since) = since {
        rows.retain(|r| r.date_value().is_some_and(|d| d >= since));
    }
    rows
}

/// New linked records first, then everything already persisted.
///
/// Returns the combined rows and how many of them are new. Records without a
/// link are never treated as duplicates.
pub fn combine(recent: Vec<Record>, existing: Vec<Record>) -> (Vec<Record>, usize) {
    let new = {
        let known: HashSet<&str> = existing
            .iter()
            .map(Record::source_link)
            .filter(|l| !l.is_empty())
            .collect();
        recent
            .into_iter()
            .filter(|r| !r.source_link().is_empty() && !known.contains(r.source_link()))
            .collect()
    };
    let new = dedup_by_link(new);
    let added = new.len();

    let combined = new.into_iter().chain(existing).collect();
    (dedup_by_link(combined), added)
}

/// Keep the first record for every link.
pub fn dedup_by_link(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| r.source_link().is_empty() || seen.insert(r.source_link().to_string()))
        .collect()
}

fn apply_limit(mut rows: Vec<Record>, limit: Option<usize>) -> Vec<Record> {
    if let Some(n) = limit.filter(|&n| n > 0) {
        rows.truncate(n);
    }
    rows
}
