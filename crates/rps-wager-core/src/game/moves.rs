//! Move and outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rock-paper-scissors move.
///
/// `None` is the explicit illegal sentinel (numeric code 0). A party
/// can commit to it and later reveal it; settlement treats it as a
/// forfeit rather than rejecting the reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    None,
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Fixed numeric code of the move
    pub fn code(&self) -> u8 {
        match self {
            Move::None => 0,
            Move::Rock => 1,
            Move::Paper => 2,
            Move::Scissors => 3,
        }
    }

    /// Fixed-width encoding hashed into commitments
    pub fn to_bytes(&self) -> [u8; 8] {
        (self.code() as u64).to_be_bytes()
    }

    /// Is this one of the three legal moves?
    pub fn is_valid(&self) -> bool {
        !matches!(self, Move::None)
    }

    /// Check if this move beats the other under the standard relation
    pub fn beats(&self, other: &Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors)
                | (Move::Scissors, Move::Paper)
                | (Move::Paper, Move::Rock)
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::None => "None",
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        };
        write!(f, "{}", s)
    }
}

/// Settlement outcome of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Player1Wins,
    Player2Wins,
    Tie,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Player1Wins => "player1 wins",
            Outcome::Player2Wins => "player2 wins",
            Outcome::Tie => "tie",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_codes() {
        assert_eq!(Move::None.code(), 0);
        assert_eq!(Move::Rock.code(), 1);
        assert_eq!(Move::Paper.code(), 2);
        assert_eq!(Move::Scissors.code(), 3);
    }

    #[test]
    fn test_encoding_is_fixed_width() {
        for mv in [Move::None, Move::Rock, Move::Paper, Move::Scissors] {
            assert_eq!(mv.to_bytes().len(), 8);
        }
        assert_eq!(Move::Scissors.to_bytes(), [0, 0, 0, 0, 0, 0, 0, 3]);
    }

    #[test]
    fn test_beats_relation() {
        assert!(Move::Rock.beats(&Move::Scissors));
        assert!(Move::Scissors.beats(&Move::Paper));
        assert!(Move::Paper.beats(&Move::Rock));

        assert!(!Move::Scissors.beats(&Move::Rock));
        assert!(!Move::Rock.beats(&Move::Rock));
        assert!(!Move::None.beats(&Move::Rock));
    }

    #[test]
    fn test_only_sentinel_is_invalid() {
        assert!(!Move::None.is_valid());
        assert!(Move::Rock.is_valid());
        assert!(Move::Paper.is_valid());
        assert!(Move::Scissors.is_valid());
    }
}
