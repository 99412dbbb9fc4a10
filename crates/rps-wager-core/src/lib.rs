//! RPS Wager Core Library
//!
//! This crate provides the escrow ledger, commit-reveal primitives, and
//! game state machine for wagered two-player rock-paper-scissors.

pub mod clock;
pub mod crypto;
pub mod error;
pub mod game;
pub mod ledger;
pub mod types;

pub use clock::{Clock, ManualClock};
pub use crypto::{Commitment, Salt};
pub use error::WagerError;
pub use game::{GameEngine, GamePhase, Move, Outcome, RevealStatus};
pub use ledger::AccountLedger;
pub use types::{GameId, PlayerId};
