//! Error types for the spin engine

use thiserror::Error;

use crate::settlement::SettlementState;

/// Engine error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// Stake exceeds the current credit. Nothing was charged.
    #[error("Insufficient funds: credit {credit} < stake {stake}")]
    InsufficientFunds { credit: u64, stake: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Snapshot fetch or commit failed. The spin did not happen.
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid grid: expected {expected} cells, got {actual}")]
    InvalidGrid { expected: usize, actual: usize },

    #[error("Invalid settlement transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: SettlementState,
        to: SettlementState,
    },

    /// Settling would push a balance or total past `u64::MAX`. Nothing was charged.
    #[error("Balance overflow: {0}")]
    BalanceOverflow(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl SlotError {
    /// Shorthand for configuration failures
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Whether the caller may retry the same spin later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LedgerUnavailable(_))
    }
}

impl From<std::io::Error> for SlotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SlotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yml::Error> for SlotError {
    fn from(err: serde_yml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
