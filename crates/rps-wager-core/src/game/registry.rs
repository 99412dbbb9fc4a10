//! Game records and the gameId registry.

use super::moves::Move;
use crate::crypto::Commitment;
use crate::types::{GameId, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle phase of a game record.
///
/// `TimedOut` is a derived read-only view: it is reported when the
/// first revealer's waiting period has elapsed, but the stored record
/// only changes through `claim_timeout`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    NoGame,
    FirstCommitted,
    BothCommitted,
    FirstRevealed,
    TimedOut,
}

/// A single active game.
///
/// Records exist only while a game is active; settlement, cancellation,
/// and timeout claims clear the record and free the identifier.
#[derive(Clone, Debug)]
pub struct Game {
    pub player1: PlayerId,
    pub player2: Option<PlayerId>,
    pub commitment1: Commitment,
    pub commitment2: Option<Commitment>,
    pub move1: Option<Move>,
    pub move2: Option<Move>,
    /// Stake each side locks; fixed by the first commitment.
    pub bet_amount: u64,
    /// Logical clock value at the first reveal.
    pub first_reveal_at: Option<u64>,
    pub first_revealer: Option<PlayerId>,
}

impl Game {
    /// Create a record from the first commitment
    pub fn new(player1: PlayerId, bet_amount: u64, commitment1: Commitment) -> Self {
        Self {
            player1,
            player2: None,
            commitment1,
            commitment2: None,
            move1: None,
            move2: None,
            bet_amount,
            first_reveal_at: None,
            first_revealer: None,
        }
    }

    /// Stored phase, ignoring the derived timeout view
    pub fn phase(&self) -> GamePhase {
        if self.player2.is_none() {
            GamePhase::FirstCommitted
        } else if self.first_revealer.is_none() {
            GamePhase::BothCommitted
        } else {
            GamePhase::FirstRevealed
        }
    }

    /// Is this identity one of the game's participants?
    pub fn is_participant(&self, id: PlayerId) -> bool {
        self.player1 == id || self.player2 == Some(id)
    }
}

/// Mapping from game identifier to active game record.
///
/// An identifier is free iff it has no entry; removing a record makes
/// the identifier immediately reusable with a fresh record.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: HashMap<GameId, Game>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: GameId) -> Option<&Game> {
        self.games.get(&id)
    }

    pub fn get_mut(&mut self, id: GameId) -> Option<&mut Game> {
        self.games.get_mut(&id)
    }

    /// Occupy a free identifier with a fresh record
    pub fn insert(&mut self, id: GameId, game: Game) {
        self.games.insert(id, game);
    }

    /// Clear a record, freeing the identifier
    pub fn remove(&mut self, id: GameId) -> Option<Game> {
        self.games.remove(&id)
    }
}
