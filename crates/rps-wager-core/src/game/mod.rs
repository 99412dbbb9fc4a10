//! Game state machine, registry, and settlement.

mod engine;
mod moves;
mod registry;
mod settle;

pub use engine::{GameEngine, RevealStatus};
pub use moves::{Move, Outcome};
pub use registry::{Game, GamePhase, GameRegistry};
pub use settle::judge;
