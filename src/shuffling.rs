//! The encrypt-then-shuffle deck pipeline.

use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arith::mod_pow;
use crate::cards::{CARD_CODE_MAX, CARD_CODE_MIN};
use crate::config::DECK_SIZE;
use crate::error::ProtocolError;
use crate::keys::{KeyPair, KeyRing};
use crate::primes::SafePrime;

const LOG_TARGET: &str = "mental_poker::shuffling";

/// Ordered deck column. Values are plaintext card codes before the first
/// pipeline stage and ciphertexts in `[0, p - 1]` afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck(pub Vec<u64>);

impl Deck {
    /// The 52 canonical plaintext codes in fixed order.
    pub fn standard() -> Self {
        Deck((CARD_CODE_MIN..=CARD_CODE_MAX).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn value_at(&self, position: usize) -> Option<u64> {
        self.0.get(position).copied()
    }
}

/// One party's pipeline stage: encrypt every value under the party's
/// exponent, then apply a uniform permutation. The input column is left
/// untouched.
#[tracing::instrument(target = LOG_TARGET, skip_all)]
pub fn encrypt_and_shuffle(
    deck: &Deck,
    key: &KeyPair,
    modulus: &SafePrime,
    rng: &mut (impl Rng + CryptoRng),
) -> Result<Deck, ProtocolError> {
    if deck.len() != DECK_SIZE {
        return Err(ProtocolError::InvalidDeckSize(deck.len()));
    }
    let mut values: Vec<u64> = deck
        .0
        .iter()
        .map(|&value| mod_pow(value, key.c, modulus.p))
        .collect();
    values.shuffle(rng);
    Ok(Deck(values))
}

/// Run every seat's stage in order, starting from `deck`.
#[tracing::instrument(target = LOG_TARGET, skip_all, fields(parties = keyring.len()))]
pub fn run_pipeline(
    deck: &Deck,
    keyring: &KeyRing,
    modulus: &SafePrime,
    rng: &mut (impl Rng + CryptoRng),
) -> Result<Deck, ProtocolError> {
    let mut staged = deck.clone();
    for seat in keyring.seats() {
        staged = encrypt_and_shuffle(&staged, keyring.key_pair(seat)?, modulus, rng)?;
        debug!(target: LOG_TARGET, seat, deck_len = staged.len(), "pipeline stage applied");
    }
    Ok(staged)
}
