//! Bridge reporting the fetched study count to the query panel.
//!
//! Reports carry the result-set generation that produced them. A report older
//! than the last accepted one is ignored, so a late notification from a
//! superseded request can never overwrite a newer count.

use std::sync::{Mutex, PoisonError};

use crate::observe::{Listeners, SubscriptionId};

#[derive(Debug, Default, Clone, Copy)]
struct Reported {
    generation: u64,
    count: usize,
}

/// Last study count reported by a result set.
#[derive(Debug, Default)]
pub struct ResultView {
    last: Mutex<Reported>,
    listeners: Listeners<usize>,
}

impl ResultView {
    /// View with a count of 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` for `generation` and notify listeners.
    ///
    /// Returns false, without notifying, when a newer generation already reported.
    pub fn report(&self, generation: u64, count: usize) -> bool {
        {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            if generation < last.generation {
                return false;
            }
            *last = Reported { generation, count };
        }
        tracing::trace!(generation, count, "Study count reported");
        self.listeners.notify(&count);
        true
    }

    /// Last reported count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).count
    }

    /// Caption under the query builder, empty when there is no query.
    #[must_use]
    pub fn summary(&self, query: &str) -> String {
        if query.is_empty() {
            String::new()
        } else {
            format!("Found {} studies for this query.", self.count())
        }
    }

    /// Register a callback receiving every accepted count.
    pub fn subscribe(&self, callback: impl Fn(&usize) + Send + Sync + 'static) -> SubscriptionId {
        self.listeners.subscribe(callback)
    }

    /// Remove a callback.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_summary_follows_query() {
        let view = ResultView::new();
        view.report(1, 2);
        assert_eq!(view.summary("stroke"), "Found 2 studies for this query.");
        assert_eq!(view.summary(""), "");
    }

    #[test]
    fn test_reports_reach_listeners() {
        let view = ResultView::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        view.subscribe(move |n| sink.lock().unwrap().push(*n));

        view.report(1, 3);
        view.report(2, 0);

        assert_eq!(*seen.lock().unwrap(), vec![3, 0]);
        assert_eq!(view.count(), 0);
    }

    #[test]
    fn test_older_generation_is_ignored() {
        let view = ResultView::new();
        assert!(view.report(3, 0));
        assert!(!view.report(2, 40));
        assert_eq!(view.count(), 0);
    }
}
