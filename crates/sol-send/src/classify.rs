//! User-facing error classification.
//!
//! Raw error text (transport, node, or local validation) is matched against
//! an ordered lowercase pattern table; the first hit decides the category.
//! Strings that match nothing fall through to [`Generic`], whose template
//! says nothing about the cause; the raw text stays in the logs.
//!
//! [`Generic`]: ErrorCategory::Generic

/// The categories a failed send can surface as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    InsufficientFunds,
    Encoding,
    AuthRequired,
    SimulationFailed,
    Generic,
}

/// Ordered substring patterns, all lowercase. Order matters: the first match
/// wins, so the more specific patterns sit above the broad ones.
const PATTERNS: &[(&str, ErrorCategory)] = &[
    ("failed to fetch", ErrorCategory::Network),
    ("fetch failed", ErrorCategory::Network),
    ("connection", ErrorCategory::Network),
    ("timed out", ErrorCategory::Network),
    ("timeout", ErrorCategory::Network),
    ("network", ErrorCategory::Network),
    ("insufficient lamports", ErrorCategory::InsufficientFunds),
    ("insufficient funds", ErrorCategory::InsufficientFunds),
    ("insufficient", ErrorCategory::InsufficientFunds),
    // "Attempt to debit an account but found no record of a prior credit"
    ("debit an account", ErrorCategory::InsufficientFunds),
    ("base58", ErrorCategory::Encoding),
    ("base64", ErrorCategory::Encoding),
    ("wrongsize", ErrorCategory::Encoding),
    ("encoding", ErrorCategory::Encoding),
    ("api key", ErrorCategory::AuthRequired),
    ("unauthorized", ErrorCategory::AuthRequired),
    ("401", ErrorCategory::AuthRequired),
    ("403", ErrorCategory::AuthRequired),
    ("simulation failed", ErrorCategory::SimulationFailed),
    ("custom program error", ErrorCategory::SimulationFailed),
    ("instructionerror", ErrorCategory::SimulationFailed),
];

/// Classify raw error text into a user-facing category.
pub fn classify(raw: &str) -> ErrorCategory {
    let text = raw.to_lowercase();
    for (pattern, category) in PATTERNS {
        if text.contains(pattern) {
            return *category;
        }
    }
    ErrorCategory::Generic
}

/// The fixed display template for a category.
pub fn user_message(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Network => "Network error. Check your connection and try again.",
        ErrorCategory::InsufficientFunds => {
            "Insufficient balance to cover the transfer and network fees."
        }
        ErrorCategory::Encoding => "The RPC endpoint rejected the transaction encoding.",
        ErrorCategory::AuthRequired => {
            "The RPC endpoint requires authentication. Check your endpoint configuration."
        }
        ErrorCategory::SimulationFailed => {
            "Transaction simulation failed. The transfer was not sent."
        }
        ErrorCategory::Generic => "Transaction failed.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_to_fetch_is_network_not_generic() {
        assert_eq!(
            classify("TypeError: Failed to fetch"),
            ErrorCategory::Network
        );
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("INSUFFICIENT FUNDS"), ErrorCategory::InsufficientFunds);
        assert_eq!(classify("Base58 decode error"), ErrorCategory::Encoding);
    }

    #[test]
    fn node_debit_message_is_insufficient_funds() {
        assert_eq!(
            classify("Attempt to debit an account but found no record of a prior credit."),
            ErrorCategory::InsufficientFunds
        );
    }

    #[test]
    fn encoding_rejections() {
        assert_eq!(
            classify("invalid base58 encoding: WrongSize"),
            ErrorCategory::Encoding
        );
        assert_eq!(classify("failed to decode base64"), ErrorCategory::Encoding);
    }

    #[test]
    fn auth_errors() {
        assert_eq!(classify("HTTP 401 Unauthorized"), ErrorCategory::AuthRequired);
        assert_eq!(classify("missing api key"), ErrorCategory::AuthRequired);
    }

    #[test]
    fn simulation_errors() {
        assert_eq!(
            classify("Transaction simulation failed: custom program error: 0x1"),
            ErrorCategory::SimulationFailed
        );
    }

    #[test]
    fn first_match_wins() {
        // Contains both "timeout" (network) and "simulation failed"; the
        // network patterns sit first in the table.
        assert_eq!(
            classify("timeout while simulation failed"),
            ErrorCategory::Network
        );
    }

    #[test]
    fn unknown_text_is_generic() {
        assert_eq!(classify("something novel happened"), ErrorCategory::Generic);
        assert_eq!(user_message(ErrorCategory::Generic), "Transaction failed.");
    }

    #[test]
    fn every_category_has_copy() {
        for cat in [
            ErrorCategory::Network,
            ErrorCategory::InsufficientFunds,
            ErrorCategory::Encoding,
            ErrorCategory::AuthRequired,
            ErrorCategory::SimulationFailed,
            ErrorCategory::Generic,
        ] {
            assert!(!user_message(cat).is_empty());
        }
    }
}
