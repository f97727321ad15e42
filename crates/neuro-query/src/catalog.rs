//! Term vocabulary: one-shot load, substring search, pagination, selection.
//!
//! The vocabulary is fetched once and is read-only afterwards. The filtered
//! list is re-derived whenever the search text or the vocabulary changes, and
//! either change puts the catalog back on page 1 before returning.

use std::sync::Arc;

use crate::client::StudyBackend;
use crate::config::api;
use crate::models::Term;
use crate::observe::{Listeners, SubscriptionId};
use crate::pagination::{Page, Pager};

/// Prefix of every user-visible vocabulary failure.
pub const ERROR_PREFIX: &str = "Failed to fetch terms";

/// Message shown when no term matches.
pub const EMPTY_MESSAGE: &str = "No terms found";

type PickCallback = Box<dyn Fn(&Term) + Send + Sync>;

/// Change notifications from a [`TermCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// Vocabulary fetch started.
    Loading,
    /// Vocabulary arrived.
    Loaded {
        /// Number of terms.
        count: usize,
    },
    /// Vocabulary fetch failed.
    Failed {
        /// User-visible message.
        message: String,
    },
    /// Search text changed; page is back to 1.
    SearchChanged {
        /// New search text.
        search: String,
        /// Number of matching terms.
        matches: usize,
    },
    /// Current page changed.
    PageChanged(usize),
    /// A term was picked.
    Picked(Term),
}

/// What the term panel should show. The variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRender {
    /// Vocabulary fetch outstanding.
    Loading,
    /// Vocabulary fetch failed.
    Failed(String),
    /// Nothing matches the search (or the vocabulary is empty).
    Empty,
    /// A page of matching terms.
    Listing(Page<Term>),
}

/// Searchable, paginated term vocabulary.
pub struct TermCatalog {
    terms: Arc<[Term]>,
    filtered: Vec<Term>,
    search: String,
    pager: Pager,
    loaded: bool,
    loading: bool,
    error: Option<String>,
    on_pick: Option<PickCallback>,
    listeners: Listeners<CatalogEvent>,
}

impl TermCatalog {
    /// Empty catalog awaiting [`TermCatalog::load`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_page_size(api::TERMS_PAGE_SIZE)
    }

    /// Empty catalog with a custom page size.
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            terms: Arc::from(Vec::new()),
            filtered: Vec::new(),
            search: String::new(),
            pager: Pager::new(page_size),
            loaded: false,
            loading: false,
            error: None,
            on_pick: None,
            listeners: Listeners::new(),
        }
    }

    /// Catalog over an already-known vocabulary.
    #[must_use]
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut catalog = Self::new();
        catalog.install(terms.into_iter().collect());
        catalog
    }

    /// Fetch the vocabulary once.
    ///
    /// Failures become a user-visible message; the list stays empty. Calls
    /// after a successful load do nothing.
    pub async fn load(&mut self, backend: &dyn StudyBackend) {
        if self.loaded {
            tracing::debug!("Term vocabulary already loaded");
            return;
        }

        self.loading = true;
        self.error = None;
        self.listeners.notify(&CatalogEvent::Loading);

        let outcome = backend.fetch_terms().await;
        self.loading = false;

        match outcome {
            Ok(terms) => {
                let count = terms.len();
                self.install(terms);
                tracing::info!(count, "Term vocabulary loaded");
                self.listeners.notify(&CatalogEvent::Loaded { count });
            }
            Err(err) => {
                let message = format!("{ERROR_PREFIX}: {err}");
                tracing::warn!(%message, "Term vocabulary unavailable");
                self.error = Some(message.clone());
                self.listeners.notify(&CatalogEvent::Failed { message });
            }
        }
    }

    fn install(&mut self, terms: Vec<Term>) {
        self.terms = Arc::from(terms);
        self.loaded = true;
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self.search.trim().to_lowercase();
        self.filtered =
            self.terms.iter().filter(|t| t.contains_lowercase(&needle)).cloned().collect();
        self.pager.reset();
    }

    /// Full vocabulary, shared and read-only.
    #[must_use]
    pub fn terms(&self) -> Arc<[Term]> {
        Arc::clone(&self.terms)
    }

    /// Terms matching the search text, in vocabulary order.
    #[must_use]
    pub fn filtered(&self) -> &[Term] {
        &self.filtered
    }

    /// Current search text.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search text. Matching is case-insensitive on the trimmed text.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.refilter();
        self.listeners.notify(&CatalogEvent::SearchChanged {
            search: self.search.clone(),
            matches: self.filtered.len(),
        });
    }

    /// Empty the search box.
    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// True while the vocabulary fetch is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Vocabulary failure message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current page of matching terms.
    #[must_use]
    pub fn page(&self) -> Page<Term> {
        self.pager.slice(&self.filtered)
    }

    /// Jump to page 1.
    pub fn first_page(&mut self) {
        self.pager.first();
        self.page_changed();
    }

    /// One page back.
    pub fn previous_page(&mut self) {
        self.pager.previous(self.filtered.len());
        self.page_changed();
    }

    /// One page forward.
    pub fn next_page(&mut self) {
        self.pager.next(self.filtered.len());
        self.page_changed();
    }

    /// Jump to the last page.
    pub fn last_page(&mut self) {
        self.pager.last(self.filtered.len());
        self.page_changed();
    }

    /// Jump to `page`, clamped.
    pub fn go_to_page(&mut self, page: usize) {
        self.pager.go_to(page, self.filtered.len());
        self.page_changed();
    }

    fn page_changed(&self) {
        let page = self.pager.current(self.filtered.len());
        self.listeners.notify(&CatalogEvent::PageChanged(page));
    }

    /// What to render right now.
    #[must_use]
    pub fn render_state(&self) -> CatalogRender {
        if self.loading {
            CatalogRender::Loading
        } else if let Some(message) = &self.error {
            CatalogRender::Failed(message.clone())
        } else if self.filtered.is_empty() {
            CatalogRender::Empty
        } else {
            CatalogRender::Listing(self.page())
        }
    }

    /// Register the callback receiving picked terms. The catalog never edits the query itself.
    pub fn on_pick(&mut self, callback: impl Fn(&Term) + Send + Sync + 'static) {
        self.on_pick = Some(Box::new(callback));
    }

    /// Pick the term at 0-based `position` on the current page.
    pub fn select(&self, position: usize) -> Option<Term> {
        let term = self.page().items.get(position).cloned()?;
        self.pick(&term);
        Some(term)
    }

    /// Hand `term` to the pick callback.
    pub fn pick(&self, term: &Term) {
        tracing::debug!(term = %term, "Term picked");
        if let Some(callback) = &self.on_pick {
            callback(term);
        }
        self.listeners.notify(&CatalogEvent::Picked(term.clone()));
    }

    /// Register a change callback.
    pub fn subscribe(
        &self,
        callback: impl Fn(&CatalogEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(callback)
    }

    /// Remove a change callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl Default for TermCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TermCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermCatalog")
            .field("terms", &self.terms.len())
            .field("search", &self.search)
            .field("matches", &self.filtered.len())
            .field("loading", &self.loading)
            .finish()
    }
}
