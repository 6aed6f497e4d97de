//! Session-scoped query cache
//!
//! Memoizes generated commands per query for one process lifetime so a
//! repeated query never re-invokes the model. No eviction and no disk
//! persistence: queries are free-text and human-paced, unbounded growth is
//! accepted. `reset` is the only invalidation.

use std::collections::HashMap;
use std::future::Future;

use crate::llm::ERROR_PREFIX;

/// Maps a query string to the previously generated raw command
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, String>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored response for `query`, or invoke `compute`, store the
    /// result, and return it. Error replies (`Error:` prefix) are returned
    /// but not stored, so a transient model failure does not become permanent
    /// for that query.
    pub async fn get_or_compute<F, Fut>(&mut self, query: &str, compute: F) -> String
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = String>,
    {
        if let Some(hit) = self.entries.get(query) {
            tracing::debug!(query, "query cache hit");
            return hit.clone();
        }

        let response = compute(query.to_string()).await;
        if !response.starts_with(ERROR_PREFIX) {
            self.entries.insert(query.to_string(), response.clone());
        }
        response
    }

    /// Drop every entry atomically. Safe to call at any time; an in-flight
    /// computation is not cancelled and will be stored against the fresh map.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
