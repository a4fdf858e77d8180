//! Card codes and their fixed (rank, suit) bijection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Smallest plaintext card code.
pub const CARD_CODE_MIN: u64 = 2;

/// Largest plaintext card code.
pub const CARD_CODE_MAX: u64 = 53;

const RANKS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
];
const SUITS: [&str; 4] = ["♥", "♦", "♣", "♠"];

/// Card code in `[2, 53]`.
/// 2-14: Hearts (2-A)
/// 15-27: Diamonds (2-A)
/// 28-40: Clubs (2-A)
/// 41-53: Spades (2-A)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card(pub u8);

impl Card {
    /// Validate a decrypted value as a card code.
    pub fn from_code(code: u64) -> Result<Self, ProtocolError> {
        if !(CARD_CODE_MIN..=CARD_CODE_MAX).contains(&code) {
            return Err(ProtocolError::InvalidCardCode(code));
        }
        Ok(Card(code as u8))
    }

    pub fn code(&self) -> u64 {
        u64::from(self.0)
    }

    /// Rank index 0-12, where 0 is the deuce and 12 the ace.
    pub fn rank(&self) -> u8 {
        (self.0 - 2) % 13
    }

    /// Suit index 0-3: Hearts, Diamonds, Clubs, Spades.
    pub fn suit(&self) -> u8 {
        (self.0 - 2) / 13
    }

    pub fn label(&self) -> String {
        format!(
            "{}{}",
            RANKS[usize::from(self.rank())],
            SUITS[usize::from(self.suit())]
        )
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn code_bijection_covers_every_rank_suit_pair() {
        let mut seen = BTreeSet::new();
        for code in CARD_CODE_MIN..=CARD_CODE_MAX {
            let card = Card::from_code(code).expect("codes 2..=53 are valid");
            assert!(seen.insert((card.rank(), card.suit())));
            assert_eq!(
                u64::from(card.suit()) * 13 + u64::from(card.rank()) + 2,
                code
            );
        }
        assert_eq!(seen.len(), 52);
    }

    #[test]
    fn labels_follow_the_rank_and_suit_tables() {
        assert_eq!(Card(2).label(), "2♥");
        assert_eq!(Card(14).label(), "A♥");
        assert_eq!(Card(15).label(), "2♦");
        assert_eq!(Card(40).label(), "A♣");
        assert_eq!(Card(53).to_string(), "A♠");
    }

    #[test]
    fn rejects_values_outside_the_code_range() {
        for code in [0u64, 1, 54, 1_000, u64::MAX] {
            assert!(matches!(
                Card::from_code(code),
                Err(ProtocolError::InvalidCardCode(c)) if c == code
            ));
        }
    }

    #[test]
    fn card_serde_round_trip() {
        crate::test_utils::serde::assert_round_trip_eq(&Card(42));
    }
}
