use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::parser::date;

/// Label used in the Source column when a paper has no link.
pub const NO_SOURCE: &str = "N/A";

/// One normalized paper entry.
///
/// Fields are private so a record cannot change after construction; merges and
/// projections build new records instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    paper: String,
    authors: String,
    description: String,
    source_display: String,
    source_link: String,
    date_text: String,
    date_value: Option<NaiveDate>,
}

impl Record {
    /// Build a record, deriving the sortable date from `date_text`.
    pub fn new(
        paper: impl Into<String>,
        authors: impl Into<String>,
        description: impl Into<String>,
        source_display: impl Into<String>,
        source_link: impl Into<String>,
        date_text: impl Into<String>,
    ) -> Self {
        let date_text = date_text.into();
        let date_value = date::parse(&date_text);
        Self {
            paper: paper.into(),
            authors: authors.into(),
            description: description.into(),
            source_display: source_display.into(),
            source_link: source_link.into(),
            date_text,
            date_value,
        }
    }

    pub fn paper(&self) -> &str {
        &self.paper
    }

    pub fn authors(&self) -> &str {
        &self.authors
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source_display(&self) -> &str {
        &self.source_display
    }

    pub fn source_link(&self) -> &str {
        &self.source_link
    }

    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    pub fn date_value(&self) -> Option<NaiveDate> {
        self.date_value
    }

    /// Copy of this record with a different date label.
    pub fn with_date_text(&self, date_text: impl Into<String>) -> Self {
        Self::new(
            self.paper.clone(),
            self.authors.clone(),
            self.description.clone(),
            self.source_display.clone(),
            self.source_link.clone(),
            date_text,
        )
    }
}

/// `[name](link)`, or `N/A` when there is no link.
pub fn source_display(name: &str, link: &str) -> String {
    if link.is_empty() {
        NO_SOURCE.to_string()
    } else {
        format!("[{}]({})", name, link)
    }
}

/// Newest first; unknown dates after every known date.
pub fn newest_first(a: &Record, b: &Record) -> Ordering {
    match (a.date_value, b.date_value) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort, so equal and unknown dates keep their relative order.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(newest_first);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(link: &str, date: &str) -> Record {
        Record::new("P", "A", "", source_display("x", link), link, date)
    }

    fn links(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.source_link()).collect()
    }

    #[test]
    fn unknown_dates_sort_last() {
        let mut rs = vec![
            dated("u1", "soon"),
            dated("a", "2024-01-01"),
            dated("u2", ""),
            dated("b", "2024-06-01"),
        ];
        sort_newest_first(&mut rs);
        assert_eq!(links(&rs), vec!["b", "a", "u1", "u2"]);
    }

    #[test]
    fn sort_is_idempotent_and_stable() {
        let mut rs = vec![
            dated("a", "2024-01-01"),
            dated("b", "2024-01-01"),
            dated("c", "2025-03-03"),
            dated("d", "n/a"),
        ];
        sort_newest_first(&mut rs);
        let once = rs.clone();
        sort_newest_first(&mut rs);
        assert_eq!(rs, once);
        assert_eq!(links(&rs), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn display_falls_back_to_marker() {
        assert_eq!(source_display("123", "https://src"), "[123](https://src)");
        assert_eq!(source_display("123", ""), "N/A");
    }

    #[test]
    fn date_value_is_derived() {
        let r = dated("a", "02/01/2025");
        assert_eq!(r.date_value(), NaiveDate::from_ymd_opt(2025, 1, 2));
        let moved = r.with_date_text("2025-01-02");
        assert_eq!(moved.date_value(), r.date_value());
        assert_eq!(moved.source_link(), "a");
    }
}
