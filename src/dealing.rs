//! Slot assignment and the selective-decryption subprotocol.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arith::mod_pow;
use crate::cards::Card;
use crate::config::{COMMUNITY_CARDS, DECK_SIZE, HOLE_CARDS_PER_PLAYER, MAX_PLAYERS, MIN_PLAYERS};
use crate::error::ProtocolError;
use crate::keys::{KeyRing, SeatId};
use crate::primes::SafePrime;

const LOG_TARGET: &str = "mental_poker::dealing";

/// Where an assigned deck position ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardDestination {
    Hole { seat: SeatId, hole_index: u8 },
    Board { board_index: u8 },
}

/// Contiguous deck-position assignments for one hand: two hole positions
/// per seat from the top of the column, then the five community
/// positions. Positions past the community block stay encrypted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealPlan {
    players: usize,
    assignments: BTreeMap<u8, CardDestination>,
}

impl DealPlan {
    pub fn assign(deck_size: usize, players: usize) -> Result<Self, ProtocolError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ProtocolError::InvalidPlayerCount(players));
        }
        if deck_size != DECK_SIZE {
            return Err(ProtocolError::InvalidDeckSize(deck_size));
        }

        let mut assignments = BTreeMap::new();
        for seat in 0..players {
            for hole_index in 0..HOLE_CARDS_PER_PLAYER {
                let position = (seat * HOLE_CARDS_PER_PLAYER + hole_index) as u8;
                assignments.insert(
                    position,
                    CardDestination::Hole {
                        seat: seat as SeatId,
                        hole_index: hole_index as u8,
                    },
                );
            }
        }
        let board_base = players * HOLE_CARDS_PER_PLAYER;
        for board_index in 0..COMMUNITY_CARDS {
            assignments.insert(
                (board_base + board_index) as u8,
                CardDestination::Board {
                    board_index: board_index as u8,
                },
            );
        }

        debug!(target: LOG_TARGET, players, assigned = assignments.len(), "deal positions fixed");
        Ok(Self { players, assignments })
    }

    pub fn players(&self) -> usize {
        self.players
    }

    pub fn destination(&self, position: u8) -> Option<CardDestination> {
        self.assignments.get(&position).copied()
    }

    /// Deck positions holding `seat`'s hole cards.
    pub fn hole_positions(
        &self,
        seat: SeatId,
    ) -> Result<[u8; HOLE_CARDS_PER_PLAYER], ProtocolError> {
        if usize::from(seat) >= self.players {
            return Err(ProtocolError::UnknownSeat(seat));
        }
        let base = usize::from(seat) * HOLE_CARDS_PER_PLAYER;
        Ok(std::array::from_fn(|hole_index| (base + hole_index) as u8))
    }

    /// Deck positions holding the shared community cards.
    pub fn board_positions(&self) -> [u8; COMMUNITY_CARDS] {
        let base = self.players * HOLE_CARDS_PER_PLAYER;
        std::array::from_fn(|board_index| (base + board_index) as u8)
    }

    /// Assigned positions and their destinations in position order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, CardDestination)> + '_ {
        self.assignments
            .iter()
            .map(|(&position, &destination)| (position, destination))
    }
}

/// Peel one party's encryption layer off a deck value.
pub fn partial_unlayer(value: u64, decryption_exponent: u64, modulus: &SafePrime) -> u64 {
    mod_pow(value, decryption_exponent, modulus.p)
}

/// Decrypt a hole-card value for its owner. Every other party's layer
/// comes off first; the owner's layer comes off last.
#[tracing::instrument(target = LOG_TARGET, skip(keyring, modulus))]
pub fn reveal_to_owner(
    value: u64,
    owner: SeatId,
    keyring: &KeyRing,
    modulus: &SafePrime,
) -> Result<Card, ProtocolError> {
    let owner_key = keyring.key_pair(owner)?;
    let mut current = value;
    for seat in keyring.seats() {
        if seat == owner {
            continue;
        }
        current = partial_unlayer(current, keyring.key_pair(seat)?.d, modulus);
    }
    current = partial_unlayer(current, owner_key.d, modulus);
    Card::from_code(current)
}

/// Decrypt a community-card value; layer order does not matter.
#[tracing::instrument(target = LOG_TARGET, skip(keyring, modulus))]
pub fn reveal_community(
    value: u64,
    keyring: &KeyRing,
    modulus: &SafePrime,
) -> Result<Card, ProtocolError> {
    let mut current = value;
    for seat in keyring.seats() {
        current = partial_unlayer(current, keyring.key_pair(seat)?.d, modulus);
    }
    Card::from_code(current)
}
