//! Metrics collection.
//!
//! # Metrics
//! - `solscope_rpc_requests_total` (counter): calls by method, outcome
//! - `solscope_rpc_request_duration_seconds` (histogram): latency by method
//! - `solscope_rpc_decode_failures_total` (counter): results with an unexpected shape
//! - `solscope_rpc_in_flight` (gauge): calls currently awaiting a response
//! - `solscope_fetch_cycles_total` (counter): orchestration cycles by result

use std::time::Instant;

/// Record one settled RPC call.
pub fn record_rpc_call(method: &str, outcome: &'static str, start: Instant) {
    ::metrics::counter!(
        "solscope_rpc_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!(
        "solscope_rpc_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a result that arrived but could not be decoded.
pub fn record_decode_failure(method: &str) {
    ::metrics::counter!(
        "solscope_rpc_decode_failures_total",
        "method" => method.to_string()
    )
    .increment(1);
}

/// Record the number of calls in flight.
pub fn record_in_flight(count: usize) {
    ::metrics::gauge!("solscope_rpc_in_flight").set(count as f64);
}

/// Record a finished orchestration cycle (`committed`, `superseded`, `invalid`).
pub fn record_fetch_cycle(result: &'static str) {
    ::metrics::counter!("solscope_fetch_cycles_total", "result" => result).increment(1);
}
