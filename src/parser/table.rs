use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::PaperError;

static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static ITALIC_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("i").unwrap());

/// An anchor inside a cell. `href` is `None` when the attribute is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    pub text: String,
    pub links: Vec<Link>,
    pub italic: Option<String>,
}

/// One data row of the source table, detached from the DOM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

/// Locate the first `<table>` and return its data rows (header row dropped).
pub fn find_rows(html: &str) -> Result<Vec<RawRow>, PaperError> {
    let doc = Html::parse_document(html);
    let table = doc.select(&TABLE_SEL).next().ok_or(PaperError::NoTableFound)?;

    Ok(table
        .select(&ROW_SEL)
        .skip(1)
        .map(|tr| RawRow {
            cells: tr
                .child_elements()
                .filter(|el| el.value().name() == "td")
                .map(read_cell)
                .collect(),
        })
        .collect())
}

fn read_cell(td: ElementRef<'_>) -> RawCell {
    RawCell {
        text: element_text(td),
        links: td
            .select(&LINK_SEL)
            .map(|a| Link {
                text: element_text(a),
                href: a.value().attr("href").map(str::to_string),
            })
            .collect(),
        italic: td.select(&ITALIC_SEL).next().map(element_text),
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Collapse runs of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_is_fatal() {
        let err = find_rows("<html><body><p>nothing</p></body></html>").unwrap_err();
        assert!(matches!(err, PaperError::NoTableFound));
    }

    #[test]
    fn header_only_table_has_no_rows() {
        let rows = find_rows("<table><tr><th>a</th></tr></table>").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn cells_keep_links_and_italics() {
        let html = r#"<table>
            <tr><th>#</th><th>Paper</th></tr>
            <tr><td>1</td><td><a href="https://x/?paper_id=9">  Deep
                <b>Title</b></a> <i>Highlight: text</i><a>View</a></td></tr>
        </table>"#;
        let rows = find_rows(html).unwrap();
        assert_eq!(rows.len(), 1);
        let cell = &rows[0].cells[1];
        assert_eq!(cell.links.len(), 2);
        assert_eq!(cell.links[0].text, "Deep Title");
        assert_eq!(cell.links[0].href.as_deref(), Some("https://x/?paper_id=9"));
        assert_eq!(cell.links[1].href, None);
        assert_eq!(cell.italic.as_deref(), Some("Highlight: text"));
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(normalize_ws("  a \n\t b  "), "a b");
        assert_eq!(normalize_ws(""), "");
    }
}
