//! Payoff computation.

use super::moves::{Move, Outcome};

/// Determine the winner from two revealed moves.
///
/// The payoff table, including the forfeit and double-invalid rules,
/// is deliberate:
/// - both moves equal and valid: tie
/// - one beats the other: winner takes the pot
/// - exactly one move invalid: the valid side wins by forfeit
/// - both invalid: tie, nobody is rewarded for an invalid move
pub fn judge(move1: Move, move2: Move) -> Outcome {
    match (move1.is_valid(), move2.is_valid()) {
        (true, true) => {
            if move1 == move2 {
                Outcome::Tie
            } else if move1.beats(&move2) {
                Outcome::Player1Wins
            } else {
                Outcome::Player2Wins
            }
        }
        (true, false) => Outcome::Player1Wins,
        (false, true) => Outcome::Player2Wins,
        (false, false) => Outcome::Tie,
    }
}
