//! Observable client state.
//!
//! # State Transitions
//! ```text
//! call starts:   in_flight += 1, loading = true, error = None
//! call succeeds: last_result = result
//! call fails:    error = message
//! call settles:  in_flight -= 1, loading = (in_flight > 0)
//! ```
//!
//! The triple has no per-call identity. Concurrent calls on one client
//! interleave their `error` / `last_result` writes in settlement order.

use arc_swap::ArcSwap;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Snapshot of what the client exposes to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    /// True while at least one call is in flight.
    pub loading: bool,
    /// Text of the most recent failure, cleared when a call starts.
    pub error: Option<String>,
    /// Result of the most recent successful call.
    pub last_result: Option<Value>,
}

/// Shared cell behind every clone of an `RpcClient`.
pub(crate) struct SharedState {
    in_flight: AtomicUsize,
    snapshot: ArcSwap<ClientState>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            snapshot: ArcSwap::from_pointee(ClientState::default()),
        }
    }
}

impl SharedState {
    pub(crate) fn snapshot(&self) -> ClientState {
        (**self.snapshot.load()).clone()
    }

    /// Mark a call as started. Loading is released when the guard drops.
    pub(crate) fn begin(self: &Arc<Self>) -> LoadingGuard {
        let active = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_in_flight(active);
        self.snapshot.rcu(|cur| ClientState {
            loading: true,
            error: None,
            last_result: cur.last_result.clone(),
        });
        LoadingGuard {
            shared: Arc::clone(self),
        }
    }

    pub(crate) fn record_success(&self, result: &Value) {
        self.snapshot.rcu(|cur| ClientState {
            loading: cur.loading,
            error: cur.error.clone(),
            last_result: Some(result.clone()),
        });
    }

    pub(crate) fn record_error(&self, message: &str) {
        self.snapshot.rcu(|cur| ClientState {
            loading: cur.loading,
            error: Some(message.to_string()),
            last_result: cur.last_result.clone(),
        });
    }

    fn end(&self) {
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::record_in_flight(remaining);
        self.snapshot.rcu(|cur| ClientState {
            loading: self.in_flight.load(Ordering::SeqCst) > 0,
            error: cur.error.clone(),
            last_result: cur.last_result.clone(),
        });
    }
}

/// A RAII guard that keeps the client in the loading state.
pub(crate) struct LoadingGuard {
    shared: Arc<SharedState>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.shared.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state() {
        let shared = Arc::new(SharedState::default());
        assert_eq!(shared.snapshot(), ClientState::default());
    }

    #[test]
    fn test_guard_clears_loading() {
        let shared = Arc::new(SharedState::default());
        {
            let _guard = shared.begin();
            assert!(shared.snapshot().loading);
        }
        assert!(!shared.snapshot().loading);
    }

    #[test]
    fn test_loading_held_until_last_call_settles() {
        let shared = Arc::new(SharedState::default());
        let first = shared.begin();
        let second = shared.begin();
        drop(first);
        assert!(shared.snapshot().loading);
        drop(second);
        assert!(!shared.snapshot().loading);
    }

    #[test]
    fn test_begin_clears_error_keeps_result() {
        let shared = Arc::new(SharedState::default());
        shared.record_success(&json!(42));
        shared.record_error("boom");
        let _guard = shared.begin();
        let state = shared.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.last_result, Some(json!(42)));
    }

    #[test]
    fn test_guard_released_on_panic() {
        let shared = Arc::new(SharedState::default());
        let cloned = Arc::clone(&shared);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = cloned.begin();
            panic!("decode blew up");
        }));
        assert!(result.is_err());
        assert!(!shared.snapshot().loading);
    }
}
