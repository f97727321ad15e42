//! Plain-text output for terminals.

use crate::catalog::{CatalogRender, EMPTY_MESSAGE};
use crate::models::{SortDirection, SortKey, SortOrder, Study};
use crate::studies::StudiesRender;

const YEAR_WIDTH: usize = 6;
const JOURNAL_WIDTH: usize = 24;
const TITLE_WIDTH: usize = 48;
const AUTHORS_WIDTH: usize = 30;

/// Term panel as text: numbered entries then the pager footer.
#[must_use]
pub fn format_terms(render: &CatalogRender) -> String {
    match render {
        CatalogRender::Loading => "Loading terms...".to_string(),
        CatalogRender::Failed(message) => message.clone(),
        CatalogRender::Empty => EMPTY_MESSAGE.to_string(),
        CatalogRender::Listing(page) => {
            let mut output = String::new();
            for (i, term) in page.items.iter().enumerate() {
                output.push_str(&format!("{:>3}. {term}\n", i + 1));
            }
            output.push('\n');
            output.push_str(&page.summary("terms"));
            output
        }
    }
}

/// Study panel as text: a fixed-width table then the pager footer.
///
/// Nothing is rendered for an empty query.
#[must_use]
pub fn format_studies(render: &StudiesRender, order: SortOrder) -> String {
    match render {
        StudiesRender::Idle => String::new(),
        StudiesRender::Loading => "Loading studies...".to_string(),
        StudiesRender::Failed(message) => message.clone(),
        StudiesRender::Ready(page) => {
            let mut output = header(order);
            output.push('\n');
            if page.items.is_empty() {
                output.push_str("No data\n");
            }
            for study in &page.items {
                output.push_str(&row(study));
                output.push('\n');
            }
            output.push('\n');
            output.push_str(&page.summary("studies"));
            output
        }
    }
}

fn header(order: SortOrder) -> String {
    let cells: Vec<String> = SortKey::ALL
        .iter()
        .map(|&key| {
            let marker = match (key == order.key, order.direction) {
                (false, _) => "",
                (true, SortDirection::Asc) => " ^",
                (true, SortDirection::Desc) => " v",
            };
            cell(&format!("{}{marker}", key.label()), width(key))
        })
        .collect();
    cells.join(" ").trim_end().to_string()
}

fn row(study: &Study) -> String {
    let year = study.year.map(|y| y.to_string()).unwrap_or_default();
    [
        cell(&year, YEAR_WIDTH),
        cell(study.journal_or_empty(), JOURNAL_WIDTH),
        cell(study.title_or_empty(), TITLE_WIDTH),
        cell(study.authors_or_empty(), AUTHORS_WIDTH),
    ]
    .join(" ")
    .trim_end()
    .to_string()
}

const fn width(key: SortKey) -> usize {
    match key {
        SortKey::Year => YEAR_WIDTH,
        SortKey::Journal => JOURNAL_WIDTH,
        SortKey::Title => TITLE_WIDTH,
        SortKey::Authors => AUTHORS_WIDTH,
    }
}

/// Pad or truncate `text` to exactly `width` characters.
fn cell(text: &str, width: usize) -> String {
    let text = text.replace(['\n', '\r', '\t'], " ");
    let len = text.chars().count();
    if len <= width {
        format!("{text:<width$}")
    } else {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
