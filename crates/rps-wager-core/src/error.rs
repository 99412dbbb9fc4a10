//! Error types for wager operations.

use thiserror::Error;

/// Errors from ledger and game operations.
///
/// Every error aborts the whole operation with no partial state
/// change; retry is the caller's responsibility.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum WagerError {
    #[error("insufficient available funds")]
    InsufficientFunds,

    #[error("game identifier already in use by an active game")]
    IdentifierInUse,

    #[error("caller already committed to this game")]
    DoubleCommit,

    #[error("operation not permitted in the game's current state")]
    InvalidState,

    #[error("revealed move and key do not match the stored commitment")]
    InvalidCommitment,

    #[error("caller already revealed their move")]
    AlreadyRevealed,

    #[error("caller is not authorized for this operation")]
    Unauthorized,

    #[error("reveal period has not elapsed yet")]
    TimeoutNotReached,

    #[error("internal invariant violated: {0}")]
    InvariantViolation(&'static str),
}
