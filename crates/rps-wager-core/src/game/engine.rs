//! The game state machine.
//!
//! Drives each game record through commit phase, reveal phase, and
//! settlement or timeout resolution. Every operation takes the caller
//! identity explicitly and validates all of its guards before the
//! first mutation, so a failed operation leaves no partial state.

use super::moves::{Move, Outcome};
use super::registry::{Game, GamePhase, GameRegistry};
use super::settle::judge;
use crate::clock::Clock;
use crate::crypto::{Commitment, Salt};
use crate::error::WagerError;
use crate::ledger::AccountLedger;
use crate::types::{GameId, PlayerId};
use serde::{Deserialize, Serialize};

/// Result of a successful reveal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealStatus {
    /// First reveal recorded; the counterparty still has to reveal
    WaitingForOpponent,
    /// Second reveal completed the game and funds were settled
    Settled(Outcome),
}

/// Escrowed rock-paper-scissors engine.
///
/// Owns the account ledger, the game registry, the injected logical
/// clock, and the immutable `period_length` fixed at construction.
/// The surrounding substrate serializes calls (one operation at a
/// time) and supplies the authenticated caller identity.
pub struct GameEngine<C: Clock> {
    ledger: AccountLedger,
    games: GameRegistry,
    clock: C,
    period_length: u64,
}

impl<C: Clock> GameEngine<C> {
    /// Create an engine with the given clock and timeout threshold.
    ///
    /// `period_length` is clamped to at least one tick.
    pub fn new(clock: C, period_length: u64) -> Self {
        Self {
            ledger: AccountLedger::new(),
            games: GameRegistry::new(),
            clock,
            period_length: period_length.max(1),
        }
    }

    /// Configured timeout threshold in clock ticks
    pub fn period_length(&self) -> u64 {
        self.period_length
    }

    // ---- ledger operations ----

    /// Credit the caller's available balance. Fails only when the
    /// credit would overflow the ledger.
    pub fn deposit(&mut self, caller: PlayerId, amount: u64) -> Result<(), WagerError> {
        self.ledger.deposit(caller, amount)
    }

    /// Debit the caller's available balance. Returns the amount to be
    /// moved out by the external transfer collaborator.
    pub fn withdraw(&mut self, caller: PlayerId, amount: u64) -> Result<u64, WagerError> {
        self.ledger.withdraw(caller, amount)
    }

    pub fn balance_of(&self, id: PlayerId) -> u64 {
        self.ledger.balance_of(id)
    }

    pub fn locked_amount(&self, id: PlayerId) -> u64 {
        self.ledger.locked_amount(id)
    }

    /// Sum of available + locked across all identities; changes only
    /// by the net of deposits minus withdrawals.
    pub fn total_funds(&self) -> u64 {
        self.ledger.total_funds()
    }

    // ---- game operations ----

    /// Commit a move hash, staking `bet_amount` from the caller's
    /// available balance.
    ///
    /// The supplied bet is authoritative only for the first
    /// commitment; the second committer matches the stored stake and
    /// the amount they pass is ignored.
    pub fn commit(
        &mut self,
        caller: PlayerId,
        game_id: GameId,
        bet_amount: u64,
        commitment: Commitment,
    ) -> Result<GamePhase, WagerError> {
        match self.games.get_mut(game_id) {
            None => {
                self.ledger.lock(caller, bet_amount)?;
                self.games
                    .insert(game_id, Game::new(caller, bet_amount, commitment));
                Ok(GamePhase::FirstCommitted)
            }
            Some(game) => {
                if game.player2.is_some() {
                    return Err(WagerError::IdentifierInUse);
                }
                if game.player1 == caller {
                    return Err(WagerError::DoubleCommit);
                }
                self.ledger.lock(caller, game.bet_amount)?;
                game.player2 = Some(caller);
                game.commitment2 = Some(commitment);
                Ok(GamePhase::BothCommitted)
            }
        }
    }

    /// Abort a game that has no second commitment yet, refunding the
    /// sole committer's stake. Returns the unlocked amount.
    pub fn cancel(&mut self, caller: PlayerId, game_id: GameId) -> Result<u64, WagerError> {
        let game = self.games.get(game_id).ok_or(WagerError::InvalidState)?;
        if game.player2.is_some() {
            return Err(WagerError::InvalidState);
        }
        if game.player1 != caller {
            return Err(WagerError::Unauthorized);
        }
        let bet_amount = game.bet_amount;

        self.ledger.unlock(caller, bet_amount)?;
        self.games.remove(game_id);
        Ok(bet_amount)
    }

    /// Disclose a move and its salt against the stored commitment.
    ///
    /// The first verified reveal records the reveal time and revealer;
    /// the second one settles the game and clears the record.
    pub fn reveal(
        &mut self,
        caller: PlayerId,
        game_id: GameId,
        mv: Move,
        salt: &Salt,
    ) -> Result<RevealStatus, WagerError> {
        let now = self.clock.now();
        let game = self.games.get_mut(game_id).ok_or(WagerError::InvalidState)?;
        let player2 = game.player2.ok_or(WagerError::InvalidState)?;
        if !game.is_participant(caller) {
            return Err(WagerError::Unauthorized);
        }
        let is_player1 = caller == game.player1;

        let (own_move, own_commitment) = if is_player1 {
            (game.move1, game.commitment1)
        } else {
            let commitment2 = game
                .commitment2
                .ok_or(WagerError::InvariantViolation("second commitment missing"))?;
            (game.move2, commitment2)
        };
        if own_move.is_some() {
            return Err(WagerError::AlreadyRevealed);
        }
        if !own_commitment.verify(mv, salt) {
            return Err(WagerError::InvalidCommitment);
        }

        let other_move = if is_player1 { game.move2 } else { game.move1 };
        match other_move {
            Some(other) => {
                let (move1, move2) = if is_player1 { (mv, other) } else { (other, mv) };
                let player1 = game.player1;
                let bet_amount = game.bet_amount;

                let outcome = judge(move1, move2);
                match outcome {
                    Outcome::Player1Wins => self.ledger.payout(player1, player2, bet_amount)?,
                    Outcome::Player2Wins => self.ledger.payout(player2, player1, bet_amount)?,
                    Outcome::Tie => self.ledger.tie(player1, player2, bet_amount)?,
                }
                self.games.remove(game_id);
                Ok(RevealStatus::Settled(outcome))
            }
            None => {
                if is_player1 {
                    game.move1 = Some(mv);
                } else {
                    game.move2 = Some(mv);
                }
                game.first_reveal_at = Some(now);
                game.first_revealer = Some(caller);
                Ok(RevealStatus::WaitingForOpponent)
            }
        }
    }

    /// Award the full pot to the first revealer after the counterparty
    /// stayed silent past the reveal period. Returns the pot.
    pub fn claim_timeout(&mut self, caller: PlayerId, game_id: GameId) -> Result<u64, WagerError> {
        let game = self.games.get(game_id).ok_or(WagerError::InvalidState)?;
        let (revealer, revealed_at) = match (game.first_revealer, game.first_reveal_at) {
            (Some(revealer), Some(at)) => (revealer, at),
            _ => return Err(WagerError::InvalidState),
        };
        if caller != revealer {
            return Err(WagerError::Unauthorized);
        }
        if self.clock.now().saturating_sub(revealed_at) <= self.period_length {
            return Err(WagerError::TimeoutNotReached);
        }
        let player2 = game
            .player2
            .ok_or(WagerError::InvariantViolation("reveal without second player"))?;
        let opponent = if revealer == game.player1 {
            player2
        } else {
            game.player1
        };
        let bet_amount = game.bet_amount;
        let pot = bet_amount
            .checked_mul(2)
            .ok_or(WagerError::InvariantViolation("ledger amount overflows"))?;

        self.ledger.payout(revealer, opponent, bet_amount)?;
        self.games.remove(game_id);
        Ok(pot)
    }

    // ---- queries ----

    /// Current phase of the game under `game_id`, reporting the
    /// derived `TimedOut` view once the reveal period has elapsed.
    pub fn game_state(&self, game_id: GameId) -> GamePhase {
        match self.games.get(game_id) {
            None => GamePhase::NoGame,
            Some(game) => match game.phase() {
                GamePhase::FirstRevealed if self.reveal_period_elapsed(game) => {
                    GamePhase::TimedOut
                }
                phase => phase,
            },
        }
    }

    /// Pure commitment self-check, also usable by client tooling
    /// before submitting a commit.
    pub fn verify_commitment(commitment: &Commitment, mv: Move, salt: &Salt) -> bool {
        commitment.verify(mv, salt)
    }

    fn reveal_period_elapsed(&self, game: &Game) -> bool {
        match game.first_reveal_at {
            Some(at) => self.clock.now().saturating_sub(at) > self.period_length,
            None => false,
        }
    }
}
