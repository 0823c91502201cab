//! Handle to a fetch cycle running on its own task.

use tokio::task::JoinHandle;

use crate::activity::types::FetchOutcome;
use crate::rpc::{RpcError, RpcResult};

/// A spawned fetch cycle.
///
/// Dropping the handle detaches the cycle; it keeps running to completion.
#[derive(Debug)]
pub struct FetchTask {
    generation: u64,
    handle: JoinHandle<FetchOutcome>,
}

impl FetchTask {
    pub(crate) fn new(generation: u64, handle: JoinHandle<FetchOutcome>) -> Self {
        Self { generation, handle }
    }

    /// Generation number assigned to this cycle.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort the cycle. Its in-flight requests are dropped and its loading
    /// flags are released; visible data is left as the reset state.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the cycle to settle.
    ///
    /// Returns [`RpcError::Cancelled`] if the cycle was aborted.
    pub async fn wait(self) -> RpcResult<FetchOutcome> {
        match self.handle.await {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_cancelled() => {
                tracing::debug!(generation = self.generation, "Fetch cycle cancelled");
                Err(RpcError::Cancelled)
            }
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}
