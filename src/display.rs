//! Text rendering for balances and transaction history.
//!
//! Lamports are converted to SOL here and nowhere else.

use chrono::DateTime;
use std::fmt::Write;

use crate::activity::{
    ConfirmationStatus, FetchOutcome, Lamports, TransactionOutcome, TransactionSummary,
};

/// Block explorer base for transaction links.
pub const EXPLORER_TX_URL: &str = "https://solscan.io/tx/";

/// `5.0000 SOL`
pub fn format_sol(balance: Lamports) -> String {
    format!("{:.4} SOL", balance.as_sol())
}

pub fn explorer_url(signature: &str) -> String {
    format!("{}{}", EXPLORER_TX_URL, signature)
}

/// Block time as `Nov 14, 22:13` (UTC), or `Unknown Date`.
pub fn format_block_time(block_time: Option<i64>) -> String {
    block_time
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%b %-d, %H:%M").to_string())
        .unwrap_or_else(|| "Unknown Date".to_string())
}

/// Status text for a row. Unrecognised levels are shown as reported.
pub fn status_label(tx: &TransactionSummary) -> &str {
    match tx.outcome() {
        TransactionOutcome::Failed => "failed",
        TransactionOutcome::Finalized => "finalized",
        TransactionOutcome::Pending | TransactionOutcome::Unknown => tx
            .confirmation_status
            .as_ref()
            .map(ConfirmationStatus::as_str)
            .unwrap_or("unknown"),
    }
}

/// Render a finished cycle for the terminal.
pub fn render_activity(outcome: &FetchOutcome) -> String {
    let mut out = String::new();

    match outcome.balance {
        Some(balance) => {
            let _ = writeln!(out, "Balance: {}", format_sol(balance));
        }
        None => {
            let _ = writeln!(out, "Balance: unavailable");
        }
    }
    if let Some(error) = &outcome.error {
        let _ = writeln!(out, "Error: {}", error);
    }

    out.push('\n');
    if outcome.transactions.is_empty() {
        out.push_str("No recent activity found\n");
        return out;
    }

    let _ = writeln!(out, "Recent activity:");
    for tx in &outcome.transactions {
        let _ = writeln!(
            out,
            "  {}  {}  {:<9}  {}",
            tx.signature,
            format_block_time(tx.block_time),
            status_label(tx),
            explorer_url(&tx.signature)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(signature: &str, status: Option<ConfirmationStatus>) -> TransactionSummary {
        TransactionSummary {
            signature: signature.to_string(),
            slot: 1,
            err: None,
            memo: None,
            block_time: Some(1_700_000_000),
            confirmation_status: status,
        }
    }

    #[test]
    fn test_format_sol() {
        assert_eq!(format_sol(Lamports(5_000_000_000)), "5.0000 SOL");
        assert_eq!(format_sol(Lamports(2_500_000_000)), "2.5000 SOL");
        assert_eq!(format_sol(Lamports(1)), "0.0000 SOL");
    }

    #[test]
    fn test_block_time() {
        assert_eq!(format_block_time(Some(1_700_000_000)), "Nov 14, 22:13");
        assert_eq!(format_block_time(None), "Unknown Date");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(&tx("a", None)), "unknown");
        assert_eq!(status_label(&tx("a", Some(ConfirmationStatus::Processed))), "processed");
        assert_eq!(status_label(&tx("a", Some(ConfirmationStatus::Finalized))), "finalized");
        assert_eq!(
            status_label(&tx("a", Some(ConfirmationStatus::Other("rooted".into())))),
            "rooted"
        );

        let mut failed = tx("a", Some(ConfirmationStatus::Finalized));
        failed.err = Some(json!({"InstructionError": [0, "Custom"]}));
        assert_eq!(status_label(&failed), "failed");
    }

    #[test]
    fn test_render_empty() {
        let outcome = FetchOutcome {
            generation: 1,
            balance: None,
            transactions: Vec::new(),
            error: Some("connection refused".into()),
            committed: true,
        };
        let text = render_activity(&outcome);
        assert!(text.contains("Balance: unavailable"));
        assert!(text.contains("Error: connection refused"));
        assert!(text.contains("No recent activity found"));
    }

    #[test]
    fn test_render_transactions() {
        let outcome = FetchOutcome {
            generation: 1,
            balance: Some(Lamports(2_500_000_000)),
            transactions: vec![tx("sig1", Some(ConfirmationStatus::Finalized)), tx("sig2", None)],
            error: None,
            committed: true,
        };
        let text = render_activity(&outcome);
        assert!(text.starts_with("Balance: 2.5000 SOL\n"));
        assert!(text.contains("https://solscan.io/tx/sig1"));
        assert!(text.contains("unknown"));
        assert!(!text.contains("Error"));
    }
}
