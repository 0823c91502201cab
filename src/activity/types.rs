//! Balance and transaction-history types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rpc::{RpcError, RpcResult};

/// Number of lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// `getBalance`
pub const GET_BALANCE: &str = "getBalance";

/// `getSignaturesForAddress`
pub const GET_SIGNATURES_FOR_ADDRESS: &str = "getSignaturesForAddress";

/// Balance in the base integer unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lamports(pub u64);

impl Lamports {
    /// Value in SOL. Meant for the presentation boundary only.
    pub fn as_sol(self) -> f64 {
        self.0 as f64 / LAMPORTS_PER_SOL as f64
    }
}

impl From<u64> for Lamports {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Lamports> for u64 {
    fn from(value: Lamports) -> Self {
        value.0
    }
}

/// Context attached to wrapped results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcContext {
    pub slot: u64,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// The two shapes a `getBalance` result arrives in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BalanceResponse {
    /// `{"context": {...}, "value": 5000000000}`
    Contextual {
        #[serde(default)]
        context: Option<RpcContext>,
        value: u64,
    },
    /// `2500000000`
    Bare(u64),
}

impl BalanceResponse {
    /// Decode a raw `getBalance` result.
    pub fn from_result(result: &Value) -> RpcResult<Self> {
        Self::deserialize(result).map_err(|_| RpcError::Decode {
            method: GET_BALANCE.to_string(),
            reason: format!(
                "expected an integer or an object with an integer `value`, got {}",
                result
            ),
        })
    }

    /// Both shapes normalize to the same lamport amount.
    pub fn lamports(&self) -> Lamports {
        match self {
            BalanceResponse::Contextual { value, .. } => Lamports(*value),
            BalanceResponse::Bare(value) => Lamports(*value),
        }
    }

    /// Slot the balance was read at, when the endpoint reported one.
    pub fn context_slot(&self) -> Option<u64> {
        match self {
            BalanceResponse::Contextual {
                context: Some(context),
                ..
            } => Some(context.slot),
            _ => None,
        }
    }
}

/// Commitment level reported for a signature.
///
/// Values outside the three known levels are kept as-is in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConfirmationStatus {
    Processed,
    Confirmed,
    Finalized,
    Other(String),
}

impl ConfirmationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ConfirmationStatus::Processed => "processed",
            ConfirmationStatus::Confirmed => "confirmed",
            ConfirmationStatus::Finalized => "finalized",
            ConfirmationStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for ConfirmationStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "processed" => ConfirmationStatus::Processed,
            "confirmed" => ConfirmationStatus::Confirmed,
            "finalized" => ConfirmationStatus::Finalized,
            _ => ConfirmationStatus::Other(raw),
        }
    }
}

impl From<ConfirmationStatus> for String {
    fn from(status: ConfirmationStatus) -> Self {
        match status {
            ConfirmationStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// One entry of `getSignaturesForAddress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub signature: String,
    pub slot: u64,
    /// Transaction error, `None` when the transaction succeeded.
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<ConfirmationStatus>,
}

/// How a transaction should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// `err` is set.
    Failed,
    /// No error and finalized.
    Finalized,
    /// No error, processed or confirmed but not yet finalized.
    Pending,
    /// No error and no recognised status reported.
    Unknown,
}

impl TransactionSummary {
    pub fn outcome(&self) -> TransactionOutcome {
        if self.err.is_some() {
            return TransactionOutcome::Failed;
        }
        match self.confirmation_status {
            Some(ConfirmationStatus::Finalized) => TransactionOutcome::Finalized,
            Some(ConfirmationStatus::Processed | ConfirmationStatus::Confirmed) => {
                TransactionOutcome::Pending
            }
            Some(ConfirmationStatus::Other(_)) | None => TransactionOutcome::Unknown,
        }
    }
}

/// Decode a `getSignaturesForAddress` result.
///
/// An array becomes the list in endpoint order. Any other value yields an
/// empty list.
pub fn decode_history(result: Value) -> RpcResult<Vec<TransactionSummary>> {
    match result {
        Value::Array(items) => {
            serde_json::from_value(Value::Array(items)).map_err(|e| RpcError::Decode {
                method: GET_SIGNATURES_FOR_ADDRESS.to_string(),
                reason: e.to_string(),
            })
        }
        other => {
            tracing::warn!(result = %other, "History result is not an array, ignoring");
            Ok(Vec::new())
        }
    }
}

/// Observable orchestrator state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivitySnapshot {
    pub balance: Option<Lamports>,
    pub transactions: Vec<TransactionSummary>,
    pub activity_loading: bool,
    /// Failure text of the cycle that produced this snapshot.
    pub error: Option<String>,
    /// Cycle that produced this snapshot, 0 before the first cycle.
    pub generation: u64,
}

/// What one fetch cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchOutcome {
    pub generation: u64,
    pub balance: Option<Lamports>,
    pub transactions: Vec<TransactionSummary>,
    pub error: Option<String>,
    /// False when a newer cycle started before this one settled.
    pub committed: bool,
}
