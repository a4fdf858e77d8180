//! Protocol constants and per-session tunables.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

pub const DECK_SIZE: usize = 52;

pub const HOLE_CARDS_PER_PLAYER: usize = 2;

pub const COMMUNITY_CARDS: usize = 5;

pub const MIN_PLAYERS: usize = 2;

/// Most players a 52-card deck can seat with two hole cards each and
/// five community cards.
pub const MAX_PLAYERS: usize = 23;

/// Narrowest safe-prime width whose every candidate still exceeds the
/// largest card code.
pub const MIN_MODULUS_BITS: u32 = 7;

/// Widest safe-prime width that keeps `2q + 1` inside `u64`.
pub const MAX_MODULUS_BITS: u32 = 63;

pub const DEFAULT_PRIMALITY_ITERATIONS: u32 = 50;

/// Tunable parameters for one table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    pub players: usize,
    pub modulus_bits: u32,
    pub primality_iterations: u32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            players: 4,
            modulus_bits: 32,
            primality_iterations: DEFAULT_PRIMALITY_ITERATIONS,
        }
    }
}

impl ProtocolConfig {
    /// Reject out-of-range parameters before any cryptographic work starts.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ProtocolError::InvalidPlayerCount(self.players));
        }
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&self.modulus_bits) {
            return Err(ProtocolError::InvalidModulusBits(self.modulus_bits));
        }
        if self.primality_iterations == 0 {
            return Err(ProtocolError::InvalidPrimalityIterations);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ProtocolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.players, 4);
        assert_eq!(config.primality_iterations, DEFAULT_PRIMALITY_ITERATIONS);
    }

    #[test]
    fn max_player_count_fits_the_deck() {
        assert!(MAX_PLAYERS * HOLE_CARDS_PER_PLAYER + COMMUNITY_CARDS <= DECK_SIZE);
        assert!((MAX_PLAYERS + 1) * HOLE_CARDS_PER_PLAYER + COMMUNITY_CARDS > DECK_SIZE);
    }

    #[test]
    fn validation_rejects_out_of_range_parameters() {
        let ok = ProtocolConfig::default();
        assert!(matches!(
            ProtocolConfig { players: 1, ..ok }.validate(),
            Err(ProtocolError::InvalidPlayerCount(1))
        ));
        assert!(matches!(
            ProtocolConfig { players: 24, ..ok }.validate(),
            Err(ProtocolError::InvalidPlayerCount(24))
        ));
        assert!(matches!(
            ProtocolConfig { modulus_bits: 6, ..ok }.validate(),
            Err(ProtocolError::InvalidModulusBits(6))
        ));
        assert!(matches!(
            ProtocolConfig { modulus_bits: 64, ..ok }.validate(),
            Err(ProtocolError::InvalidModulusBits(64))
        ));
        assert!(matches!(
            ProtocolConfig {
                primality_iterations: 0,
                ..ok
            }
            .validate(),
            Err(ProtocolError::InvalidPrimalityIterations)
        ));
    }

    #[test]
    fn config_serde_round_trip() {
        crate::test_utils::serde::assert_round_trip_eq(&ProtocolConfig::default());
    }
}
