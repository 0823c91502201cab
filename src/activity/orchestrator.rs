//! Balance + history fetch orchestration.
//!
//! # Responsibilities
//! - Validate the address before any network activity
//! - Reset visible data and raise the loading flag before dispatch
//! - Run `getBalance` and `getSignaturesForAddress` concurrently and join both
//! - Keep the visible snapshot owned by the most recently started cycle
//!
//! # Cycle
//! ```text
//! validate ──✗──▶ Validation error (no request, no loading change)
//!    │
//!    ▼
//! start: generation += 1, snapshot = { empty, loading, generation }
//!    │
//!    ▼
//! join(getBalance, getSignaturesForAddress)
//!    │
//!    ▼
//! commit if snapshot.generation == generation, else report superseded
//! ```

use arc_swap::ArcSwap;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::activity::task::FetchTask;
use crate::activity::types::{
    decode_history, ActivitySnapshot, BalanceResponse, FetchOutcome, GET_BALANCE,
    GET_SIGNATURES_FOR_ADDRESS,
};
use crate::config::ActivityConfig;
use crate::observability::metrics;
use crate::rpc::{RpcClient, RpcError, RpcRequest, RpcResult};

/// Reject empty (or whitespace-only) addresses.
pub fn validate_address(address: &str) -> RpcResult<&str> {
    let address = address.trim();
    if address.is_empty() {
        return Err(RpcError::Validation("Please enter a Sol address".to_string()));
    }
    Ok(address)
}

/// Coordinates the two calls behind one account refresh.
///
/// Clones share the same client, generation counter and snapshot.
#[derive(Clone)]
pub struct FetchOrchestrator {
    client: RpcClient,
    signature_limit: usize,
    latest: Arc<AtomicU64>,
    snapshot: Arc<ArcSwap<ActivitySnapshot>>,
}

impl FetchOrchestrator {
    pub fn new(client: RpcClient, config: &ActivityConfig) -> Self {
        Self {
            client,
            signature_limit: config.signature_limit,
            latest: Arc::new(AtomicU64::new(0)),
            snapshot: Arc::new(ArcSwap::from_pointee(ActivitySnapshot::default())),
        }
    }

    /// The client both calls go through.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    pub fn signature_limit(&self) -> usize {
        self.signature_limit
    }

    /// Current visible state.
    pub fn snapshot(&self) -> ActivitySnapshot {
        (**self.snapshot.load()).clone()
    }

    /// Run one full cycle for `address` and wait for it.
    ///
    /// Only an invalid address is returned as an error. Call failures are
    /// reported in the outcome and in the client state.
    pub async fn fetch_data(&self, address: &str) -> RpcResult<FetchOutcome> {
        let address = self.validate(address)?;
        let cycle = self.start_cycle();
        Ok(self.run_cycle(address, cycle).await)
    }

    /// Start a cycle on its own task.
    ///
    /// Validation and the reset happen before this returns; the calls run
    /// on the spawned task. Must be called within a Tokio runtime.
    pub fn spawn_fetch(&self, address: &str) -> RpcResult<FetchTask> {
        let address = self.validate(address)?.to_string();
        let cycle = self.start_cycle();
        let generation = cycle.generation;
        let orchestrator = self.clone();
        let handle = tokio::spawn(async move { orchestrator.run_cycle(&address, cycle).await });
        Ok(FetchTask::new(generation, handle))
    }

    fn validate<'a>(&self, address: &'a str) -> RpcResult<&'a str> {
        validate_address(address).map_err(|e| {
            self.client.report_error(&e);
            metrics::record_fetch_cycle("invalid");
            e
        })
    }

    fn start_cycle(&self) -> CycleGuard {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.snapshot.rcu(|cur| {
            if cur.generation < generation {
                Arc::new(ActivitySnapshot {
                    balance: None,
                    transactions: Vec::new(),
                    activity_loading: true,
                    error: None,
                    generation,
                })
            } else {
                Arc::clone(cur)
            }
        });
        CycleGuard {
            generation,
            snapshot: Arc::clone(&self.snapshot),
        }
    }

    async fn run_cycle(&self, address: &str, cycle: CycleGuard) -> FetchOutcome {
        let generation = cycle.generation;
        tracing::debug!(generation, address = %address, "Fetch cycle started");

        let balance_request = RpcRequest::fixed(GET_BALANCE, vec![Value::from(address)]);
        let history_request = RpcRequest::fixed(
            GET_SIGNATURES_FOR_ADDRESS,
            vec![Value::from(address), json!({ "limit": self.signature_limit })],
        );

        let (balance, history) = tokio::join!(
            self.client.try_call(&balance_request),
            self.client.try_call(&history_request),
        );

        let balance = balance.and_then(|result| {
            BalanceResponse::from_result(&result)
                .map(|b| b.lamports())
                .inspect_err(|e| self.client.report_decode_error(e))
        });
        let transactions = history.and_then(|result| {
            decode_history(result).inspect_err(|e| self.client.report_decode_error(e))
        });

        let errors: Vec<String> = [balance.as_ref().err(), transactions.as_ref().err()]
            .into_iter()
            .flatten()
            .map(ToString::to_string)
            .collect();
        let error = (!errors.is_empty()).then(|| errors.join("; "));
        let balance = balance.ok();
        let transactions = transactions.unwrap_or_default();

        let committed = cycle.commit(ActivitySnapshot {
            balance,
            transactions: transactions.clone(),
            activity_loading: false,
            error: error.clone(),
            generation,
        });

        if committed {
            metrics::record_fetch_cycle("committed");
            tracing::debug!(
                generation,
                balance = balance.map(|b| b.0),
                transactions = transactions.len(),
                failed = error.is_some(),
                "Fetch cycle committed"
            );
        } else {
            metrics::record_fetch_cycle("superseded");
            tracing::info!(generation, "Discarding results of superseded fetch cycle");
        }

        FetchOutcome {
            generation,
            balance,
            transactions,
            error,
            committed,
        }
    }
}

impl std::fmt::Debug for FetchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOrchestrator")
            .field("client", &self.client)
            .field("signature_limit", &self.signature_limit)
            .field("latest", &self.latest.load(Ordering::SeqCst))
            .finish()
    }
}

/// Owns the loading flag of one cycle.
///
/// Dropping it (completion, cancellation or panic) clears `activity_loading`
/// if the cycle is still the latest.
struct CycleGuard {
    generation: u64,
    snapshot: Arc<ArcSwap<ActivitySnapshot>>,
}

impl CycleGuard {
    /// Store `next` if no newer cycle has started. Returns whether it was stored.
    fn commit(&self, next: ActivitySnapshot) -> bool {
        let mut committed = false;
        self.snapshot.rcu(|cur| {
            committed = cur.generation == self.generation;
            if committed {
                Arc::new(next.clone())
            } else {
                Arc::clone(cur)
            }
        });
        committed
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.snapshot.rcu(|cur| {
            if cur.generation == self.generation && cur.activity_loading {
                Arc::new(ActivitySnapshot {
                    activity_loading: false,
                    ..(**cur).clone()
                })
            } else {
                Arc::clone(cur)
            }
        });
    }
}
