//! JSON output formatting.

use serde_json::{Value, json};

use crate::catalog::CatalogRender;
use crate::models::{SortOrder, Study, Term};
use crate::pagination::Page;
use crate::studies::StudiesRender;

/// Compact study representation; absent fields are omitted.
#[must_use]
pub fn compact_study(study: &Study) -> Value {
    let mut obj = json!({});

    if let Some(year) = study.year {
        obj["year"] = json!(year);
    }

    if let Some(journal) = &study.journal {
        obj["journal"] = json!(journal);
    }

    if let Some(title) = &study.title {
        obj["title"] = json!(title);
    }

    if let Some(authors) = &study.authors {
        obj["authors"] = json!(authors);
    }

    obj
}

fn page_meta<T>(page: &Page<T>) -> Value {
    json!({
        "page": page.page,
        "totalPages": page.total_pages,
        "total": page.total,
        "first": page.first_shown(),
        "last": page.last_shown(),
    })
}

/// Study panel state as JSON.
#[must_use]
pub fn studies_json(render: &StudiesRender, order: SortOrder) -> Value {
    match render {
        StudiesRender::Idle => json!({"state": "idle"}),
        StudiesRender::Loading => json!({"state": "loading"}),
        StudiesRender::Failed(message) => json!({"state": "error", "error": message}),
        StudiesRender::Ready(page) => {
            let mut obj = page_meta(page);
            obj["state"] = json!("ready");
            obj["sort"] = json!(order);
            obj["studies"] = page.items.iter().map(compact_study).collect();
            obj
        }
    }
}

/// Term panel state as JSON.
#[must_use]
pub fn terms_json(render: &CatalogRender) -> Value {
    match render {
        CatalogRender::Loading => json!({"state": "loading"}),
        CatalogRender::Failed(message) => json!({"state": "error", "error": message}),
        CatalogRender::Empty => json!({"state": "empty", "terms": []}),
        CatalogRender::Listing(page) => {
            let mut obj = page_meta(page);
            obj["state"] = json!("listing");
            obj["terms"] = page.items.iter().map(Term::as_str).collect();
            obj
        }
    }
}
