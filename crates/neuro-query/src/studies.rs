//! Study result set: fetch, staleness guard, sorted and paginated view.
//!
//! Every query change starts a new *generation*. The fetch for a generation
//! runs on a spawned task holding a [`CancellationToken`]; starting another
//! generation or tearing the set down cancels that token. Cancellation is
//! best-effort, so the authoritative guard is the generation check performed
//! under the state lock before an outcome is applied: only the outcome of the
//! most recently issued request, for a set that is still alive, may change
//! visible state. Everything else is dropped silently.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::client::StudyBackend;
use crate::config::api;
use crate::error::{ClientError, ClientResult};
use crate::models::{SortKey, SortOrder, Study, sort_studies};
use crate::observe::{Listeners, SubscriptionId};
use crate::pagination::{Page, Pager};
use crate::view::ResultView;

/// Prefix of every user-visible study fetch failure.
pub const ERROR_PREFIX: &str = "Unable to fetch studies";

/// Change notifications from a [`StudyResultSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudiesEvent {
    /// A fetch for `query` was issued.
    QueryChanged {
        /// Generation of the new request.
        generation: u64,
        /// Query being fetched.
        query: String,
    },
    /// The query became empty; rows were cleared without a request.
    Cleared {
        /// Generation of the clear.
        generation: u64,
    },
    /// The active fetch succeeded.
    Loaded {
        /// Generation that produced the rows.
        generation: u64,
        /// Number of rows.
        count: usize,
    },
    /// The active fetch failed.
    Failed {
        /// Generation that failed.
        generation: u64,
        /// User-visible message.
        message: String,
    },
    /// Sort column or direction changed.
    SortChanged(SortOrder),
    /// Current page changed.
    PageChanged(usize),
}

/// What the study panel should show. The variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudiesRender {
    /// No query; nothing to show.
    Idle,
    /// Waiting on the fetch for the current query.
    Loading,
    /// The fetch for the current query failed.
    Failed(String),
    /// Rows for the current query (the page may be empty: "No data").
    Ready(Page<Study>),
}

#[derive(Debug)]
enum Begin {
    Unchanged,
    Cleared { generation: u64 },
    Fetch { generation: u64, token: CancellationToken },
}

#[derive(Debug, PartialEq, Eq)]
enum Applied {
    Loaded { count: usize },
    Failed { message: String },
}

#[derive(Debug)]
struct State {
    query: String,
    generation: u64,
    cancel: Option<CancellationToken>,
    rows: Vec<Study>,
    sorted: Vec<Study>,
    loading: bool,
    error: Option<String>,
    sort: SortOrder,
    pager: Pager,
    torn_down: bool,
}

impl State {
    fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            generation: 0,
            cancel: None,
            rows: Vec::new(),
            sorted: Vec::new(),
            loading: false,
            error: None,
            sort: SortOrder::default(),
            pager: Pager::new(page_size),
            torn_down: false,
        }
    }

    fn begin(&mut self, query: &str) -> Begin {
        if self.torn_down || (!query.is_empty() && query == self.query) {
            return Begin::Unchanged;
        }

        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.generation += 1;
        self.query = query.to_string();
        self.pager.reset();

        if query.is_empty() {
            self.replace_rows(Vec::new());
            self.loading = false;
            self.error = None;
            return Begin::Cleared { generation: self.generation };
        }

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        self.loading = true;
        self.error = None;
        Begin::Fetch { generation: self.generation, token }
    }

    fn complete(&mut self, generation: u64, outcome: ClientResult<Vec<Study>>) -> Option<Applied> {
        if self.torn_down || generation != self.generation {
            return None;
        }

        self.loading = false;
        self.cancel = None;

        Some(match outcome {
            Ok(rows) => {
                let count = rows.len();
                self.replace_rows(rows);
                self.error = None;
                Applied::Loaded { count }
            }
            Err(err) => {
                let message = format!("{ERROR_PREFIX}: {err}");
                self.replace_rows(Vec::new());
                self.error = Some(message.clone());
                Applied::Failed { message }
            }
        })
    }

    fn tear_down(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        self.generation += 1;
        self.loading = false;
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        true
    }

    fn replace_rows(&mut self, rows: Vec<Study>) {
        self.sorted = sort_studies(&rows, self.sort);
        self.rows = rows;
    }

    fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.sorted = sort_studies(&self.rows, sort);
    }

    fn render(&self) -> StudiesRender {
        if self.query.is_empty() {
            StudiesRender::Idle
        } else if self.loading {
            StudiesRender::Loading
        } else if let Some(message) = &self.error {
            StudiesRender::Failed(message.clone())
        } else {
            StudiesRender::Ready(self.pager.slice(&self.sorted))
        }
    }
}

struct Shared {
    state: Mutex<State>,
    backend: Arc<dyn StudyBackend>,
    view: Arc<ResultView>,
    listeners: Listeners<StudiesEvent>,
    settled: Notify,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_fetch(self: Arc<Self>, query: String, generation: u64, token: CancellationToken) {
        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::debug!(generation, %query, "Study fetch cancelled");
                return;
            }
            outcome = self.backend.fetch_studies(&query) => outcome,
        };
        self.complete(generation, outcome);
    }

    fn complete(&self, generation: u64, outcome: ClientResult<Vec<Study>>) {
        let (applied, current) = {
            let mut state = self.lock();
            (state.complete(generation, outcome), state.generation)
        };

        match applied {
            None => {
                tracing::debug!(generation, current, "Discarding stale study outcome");
                return;
            }
            Some(Applied::Loaded { count }) => {
                tracing::debug!(generation, count, "Studies loaded");
                self.view.report(generation, count);
                self.listeners.notify(&StudiesEvent::Loaded { generation, count });
            }
            Some(Applied::Failed { message }) => {
                tracing::warn!(generation, %message, "Study fetch failed");
                self.view.report(generation, 0);
                self.listeners.notify(&StudiesEvent::Failed { generation, message });
            }
        }
        self.settled.notify_waiters();
    }
}

/// Studies matching the current query.
///
/// Fetches run on spawned tasks: on the caller's Tokio runtime, else on the
/// runtime that was current when the set was built. With neither, the fetch
/// fails with a visible message. Dropping the set tears it down.
pub struct StudyResultSet {
    shared: Arc<Shared>,
    runtime: Option<Handle>,
}

impl StudyResultSet {
    /// Empty result set fetching through `backend` and reporting counts to `view`.
    #[must_use]
    pub fn new(backend: Arc<dyn StudyBackend>, view: Arc<ResultView>) -> Self {
        Self::with_page_size(backend, view, api::STUDIES_PAGE_SIZE)
    }

    /// Same as [`StudyResultSet::new`] with a custom page size.
    #[must_use]
    pub fn with_page_size(
        backend: Arc<dyn StudyBackend>,
        view: Arc<ResultView>,
        page_size: usize,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::new(page_size)),
                backend,
                view,
                listeners: Listeners::new(),
                settled: Notify::new(),
            }),
            runtime: Handle::try_current().ok(),
        }
    }

    /// React to a new query.
    ///
    /// An empty query clears the rows and reports 0 without any request.
    /// Otherwise the in-flight fetch is cancelled and a new one issued.
    /// Re-delivering the active non-empty query does nothing.
    pub fn on_query_change(&self, query: &str) {
        let begin = self.shared.lock().begin(query);

        match begin {
            Begin::Unchanged => {}
            Begin::Cleared { generation } => {
                tracing::debug!(generation, "Query cleared");
                self.shared.view.report(generation, 0);
                self.shared.listeners.notify(&StudiesEvent::Cleared { generation });
                self.shared.settled.notify_waiters();
            }
            Begin::Fetch { generation, token } => {
                tracing::debug!(generation, query, "Issuing study fetch");
                self.shared.listeners.notify(&StudiesEvent::QueryChanged {
                    generation,
                    query: query.to_string(),
                });
                let Some(runtime) = Handle::try_current().ok().or_else(|| self.runtime.clone())
                else {
                    tracing::error!(generation, "No Tokio runtime to run the study fetch");
                    self.shared.complete(generation, Err(ClientError::NoRuntime));
                    return;
                };
                let shared = Arc::clone(&self.shared);
                runtime.spawn(shared.run_fetch(query.to_string(), generation, token));
            }
        }
    }

    /// Select a sort column: the active column flips direction, others start ascending.
    ///
    /// Re-sorts the fetched rows; never fetches and never changes the page.
    pub fn sort_by(&self, key: SortKey) -> SortOrder {
        let order = {
            let mut state = self.shared.lock();
            let order = state.sort.select(key);
            state.set_sort(order);
            order
        };
        self.shared.listeners.notify(&StudiesEvent::SortChanged(order));
        order
    }

    /// Apply an explicit order.
    pub fn set_sort(&self, order: SortOrder) {
        self.shared.lock().set_sort(order);
        self.shared.listeners.notify(&StudiesEvent::SortChanged(order));
    }

    /// Active order.
    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        self.shared.lock().sort
    }

    /// Jump to page 1.
    pub fn first_page(&self) {
        self.navigate(|pager, _| pager.first());
    }

    /// One page back.
    pub fn previous_page(&self) {
        self.navigate(Pager::previous);
    }

    /// One page forward.
    pub fn next_page(&self) {
        self.navigate(Pager::next);
    }

    /// Jump to the last page.
    pub fn last_page(&self) {
        self.navigate(Pager::last);
    }

    /// Jump to `page`, clamped.
    pub fn go_to_page(&self, page: usize) {
        self.navigate(|pager, total| pager.go_to(page, total));
    }

    /// Page moves wait for the outstanding fetch: the new rows start on page 1.
    fn navigate(&self, step: impl FnOnce(&mut Pager, usize)) {
        let page = {
            let mut state = self.shared.lock();
            if state.loading {
                return;
            }
            let total = state.sorted.len();
            step(&mut state.pager, total);
            state.pager.current(total)
        };
        self.shared.listeners.notify(&StudiesEvent::PageChanged(page));
    }

    /// Current page of the sorted rows.
    #[must_use]
    pub fn page(&self) -> Page<Study> {
        let state = self.shared.lock();
        state.pager.slice(&state.sorted)
    }

    /// What to render right now.
    #[must_use]
    pub fn render_state(&self) -> StudiesRender {
        self.shared.lock().render()
    }

    /// Active query.
    #[must_use]
    pub fn query(&self) -> String {
        self.shared.lock().query.clone()
    }

    /// True while the fetch for the current query is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.shared.lock().loading
    }

    /// Wait until no fetch is outstanding for the current query.
    ///
    /// Returns immediately when idle or after teardown.
    pub async fn wait_settled(&self) {
        loop {
            let settled = self.shared.settled.notified();
            if !self.is_loading() {
                return;
            }
            settled.await;
        }
    }

    /// Message of the last failed fetch for the current query.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.shared.lock().error.clone()
    }

    /// Rows in fetched order.
    #[must_use]
    pub fn rows(&self) -> Vec<Study> {
        self.shared.lock().rows.clone()
    }

    /// Rows in the active sort order.
    #[must_use]
    pub fn sorted_rows(&self) -> Vec<Study> {
        self.shared.lock().sorted.clone()
    }

    /// Number of fetched rows.
    #[must_use]
    pub fn count(&self) -> usize {
        self.shared.lock().rows.len()
    }

    /// Generation of the most recent query change.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.shared.lock().generation
    }

    /// Register a change callback.
    pub fn subscribe(
        &self,
        callback: impl Fn(&StudiesEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.shared.listeners.subscribe(callback)
    }

    /// Remove a change callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.listeners.unsubscribe(id)
    }

    /// Tear down: cancel the in-flight fetch and ignore every later outcome.
    pub fn shutdown(&self) {
        if self.shared.lock().tear_down() {
            tracing::debug!("Study result set torn down");
            self.shared.settled.notify_waiters();
        }
    }
}

impl Drop for StudyResultSet {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for StudyResultSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("StudyResultSet")
            .field("query", &state.query)
            .field("generation", &state.generation)
            .field("rows", &state.rows.len())
            .field("loading", &state.loading)
            .finish()
    }
}
