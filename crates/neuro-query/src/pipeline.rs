//! Wiring from the query string to the study result set.

use std::sync::Arc;

use crate::client::StudyBackend;
use crate::models::Term;
use crate::observe::SubscriptionId;
use crate::query::QueryState;
use crate::studies::StudyResultSet;
use crate::view::ResultView;

/// Owns the query and the result set, and keeps them in step.
///
/// Every committed query change is forwarded to
/// [`StudyResultSet::on_query_change`] before the mutating call returns, so
/// the previous fetch is cancelled and the new one issued synchronously.
/// Build it inside a Tokio runtime so that query edits from plain threads
/// still have somewhere to run their fetch.
pub struct QueryPipeline {
    query: Arc<QueryState>,
    studies: Arc<StudyResultSet>,
    view: Arc<ResultView>,
    subscription: SubscriptionId,
}

impl QueryPipeline {
    /// Pipeline with its own count view.
    #[must_use]
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self::with_view(backend, Arc::new(ResultView::new()))
    }

    /// Pipeline reporting counts into `view`.
    #[must_use]
    pub fn with_view(backend: Arc<dyn StudyBackend>, view: Arc<ResultView>) -> Self {
        let studies = Arc::new(StudyResultSet::new(backend, Arc::clone(&view)));
        let query = Arc::new(QueryState::new());

        let target = Arc::downgrade(&studies);
        let subscription = query.subscribe(move |text| {
            if let Some(studies) = target.upgrade() {
                studies.on_query_change(text);
            }
        });

        Self { query, studies, view, subscription }
    }

    /// The query string.
    #[must_use]
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// The result set.
    #[must_use]
    pub fn studies(&self) -> &StudyResultSet {
        &self.studies
    }

    /// The count bridge.
    #[must_use]
    pub fn view(&self) -> &ResultView {
        &self.view
    }

    /// Callback for [`crate::catalog::TermCatalog::on_pick`] appending picked terms.
    #[must_use]
    pub fn pick_handler(&self) -> impl Fn(&Term) + Send + Sync + 'static {
        let query = Arc::clone(&self.query);
        move |term| query.append(term.as_str())
    }

    /// Caption for the current query, e.g. `Found 2 studies for this query.`
    #[must_use]
    pub fn summary(&self) -> String {
        self.view.summary(&self.query.get())
    }
}

impl Drop for QueryPipeline {
    fn drop(&mut self) {
        self.query.unsubscribe(self.subscription);
        self.studies.shutdown();
    }
}

impl std::fmt::Debug for QueryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("query", &self.query.get())
            .field("studies", &self.studies)
            .finish()
    }
}
