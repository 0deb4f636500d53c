//! Ledger error types

use ds_slot::SlotError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Storage switched off; nothing was read or written
    #[error("Ledger offline")]
    Offline,

    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    #[error("Invalid player id: {0:?}")]
    InvalidPlayer(String),

    /// Stored account changed since the snapshot was taken
    #[error("Stale snapshot for {0}")]
    StaleSnapshot(String),

    #[error("Credit overflow for {0}")]
    CreditOverflow(String),
}

impl From<LedgerError> for SlotError {
    fn from(err: LedgerError) -> Self {
        SlotError::LedgerUnavailable(err.to_string())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
