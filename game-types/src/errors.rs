use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Everything here is locally recoverable: selection and wager errors are
/// reported to the caller with no state change, draw exhaustion ends the
/// drawing phase early, and persistence failures never reach gameplay state.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("invalid selection: {reason}")]
    InvalidSelection { reason: String },

    #[error("wager {amount} rejected: outside limits or exceeds balance")]
    InvalidWager { amount: u32 },

    #[error("balance {balance} cannot cover wager {wager}")]
    InsufficientBalance { wager: u32, balance: u32 },

    #[error("unknown pattern: {name}")]
    UnknownPattern { name: String },

    #[error("no undrawn numbers left in the drawing phase")]
    DrawExhausted,

    #[error("persistence failure: {message}")]
    PersistenceFailure { message: String },
}
