//! The active query string.

use std::sync::{Mutex, PoisonError};

use crate::observe::{Listeners, SubscriptionId};

/// Single owner of the query text.
///
/// Any string is a legal query; duplicates and conflicting terms are left for
/// the backend to interpret. Listeners receive the new text after each change.
#[derive(Debug, Default)]
pub struct QueryState {
    text: Mutex<String>,
    listeners: Listeners<String>,
}

impl QueryState {
    /// Empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current query text.
    #[must_use]
    pub fn get(&self) -> String {
        self.text.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// True for the "no query" state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }

    /// Add a term: replaces an empty query, otherwise appends after one space.
    pub fn append(&self, term: &str) {
        let updated = {
            let mut text = self.text.lock().unwrap_or_else(PoisonError::into_inner);
            if text.is_empty() {
                *text = term.to_string();
            } else {
                text.push(' ');
                text.push_str(term);
            }
            text.clone()
        };
        tracing::debug!(query = %updated, term, "Query appended");
        self.listeners.notify(&updated);
    }

    /// Overwrite the query. Setting the current value again is not a change.
    pub fn set(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut current = self.text.lock().unwrap_or_else(PoisonError::into_inner);
            if *current == text {
                return;
            }
            current.clone_from(&text);
        }
        tracing::debug!(query = %text, "Query set");
        self.listeners.notify(&text);
    }

    /// Reset to the empty query.
    pub fn clear(&self) {
        self.set(String::new());
    }

    /// Register a callback receiving the query after every change.
    pub fn subscribe(&self, callback: impl Fn(&String) + Send + Sync + 'static) -> SubscriptionId {
        self.listeners.subscribe(callback)
    }

    /// Remove a callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}
