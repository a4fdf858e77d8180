//! Session and hand orchestration over the protocol pieces.

use std::collections::BTreeMap;

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cards::{Card, CARD_CODE_MAX};
use crate::config::{ProtocolConfig, COMMUNITY_CARDS, HOLE_CARDS_PER_PLAYER};
use crate::dealing::{reveal_community, reveal_to_owner, DealPlan};
use crate::error::ProtocolError;
use crate::keys::{KeyRing, SeatId};
use crate::primes::{generate_safe_prime, is_probable_prime, SafePrime};
use crate::shuffling::{run_pipeline, Deck};

const LOG_TARGET: &str = "mental_poker::session";

/// Hand progression. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandPhase {
    SlotsAssigned,
    HoleReveals,
    CommunityRevealed,
    Done,
}

/// Group parameters and keyring shared by every hand at one table.
#[derive(Debug)]
pub struct Session {
    config: ProtocolConfig,
    modulus: SafePrime,
    keyring: KeyRing,
}

impl Session {
    /// Generate fresh group parameters and one keypair per seat.
    #[tracing::instrument(target = LOG_TARGET, skip(rng))]
    pub fn establish(
        config: ProtocolConfig,
        rng: &mut (impl Rng + CryptoRng),
    ) -> Result<Self, ProtocolError> {
        config.validate()?;
        let modulus = generate_safe_prime(rng, config.modulus_bits, config.primality_iterations)?;
        Self::over_group(config, modulus, rng)
    }

    /// Establish a session over an externally agreed safe prime.
    pub fn with_modulus(
        config: ProtocolConfig,
        modulus: SafePrime,
        rng: &mut (impl Rng + CryptoRng),
    ) -> Result<Self, ProtocolError> {
        config.validate()?;
        let structure_holds = modulus
            .q
            .checked_mul(2)
            .and_then(|doubled| doubled.checked_add(1))
            == Some(modulus.p);
        if !structure_holds
            || !is_probable_prime(modulus.q, config.primality_iterations, rng)
            || !is_probable_prime(modulus.p, config.primality_iterations, rng)
        {
            return Err(ProtocolError::NotASafePrime(modulus.p));
        }
        Self::over_group(config, modulus, rng)
    }

    fn over_group(
        config: ProtocolConfig,
        modulus: SafePrime,
        rng: &mut (impl Rng + CryptoRng),
    ) -> Result<Self, ProtocolError> {
        if modulus.p <= CARD_CODE_MAX {
            return Err(ProtocolError::ModulusTooSmall(modulus.p));
        }
        let keyring = KeyRing::generate(&modulus, config.players, rng)?;
        info!(
            target: LOG_TARGET,
            p = modulus.p,
            q = modulus.q,
            players = config.players,
            "session established"
        );
        Ok(Self { config, modulus, keyring })
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn modulus(&self) -> &SafePrime {
        &self.modulus
    }

    pub fn keyring(&self) -> &KeyRing {
        &self.keyring
    }

    /// Pipe a fresh standard deck through every seat and assign slots.
    #[tracing::instrument(target = LOG_TARGET, skip(self, rng))]
    pub fn deal_hand(&self, rng: &mut (impl Rng + CryptoRng)) -> Result<Hand<'_>, ProtocolError> {
        let deck = run_pipeline(&Deck::standard(), &self.keyring, &self.modulus, rng)?;
        self.adopt_deck(deck)
    }

    /// Build a hand around a deck column piped elsewhere, e.g. one
    /// received from remote parties.
    pub fn adopt_deck(&self, deck: Deck) -> Result<Hand<'_>, ProtocolError> {
        let plan = DealPlan::assign(deck.len(), self.config.players)?;
        debug!(target: LOG_TARGET, players = self.config.players, "hand dealt");
        Ok(Hand {
            session: self,
            deck,
            plan,
            phase: HandPhase::SlotsAssigned,
            holes: BTreeMap::new(),
            board: None,
        })
    }
}

/// One dealt hand: an opaque deck column plus the reveal progress
/// around it. Borrows the session immutably, so hands may coexist.
#[derive(Debug)]
pub struct Hand<'a> {
    session: &'a Session,
    deck: Deck,
    plan: DealPlan,
    phase: HandPhase,
    holes: BTreeMap<SeatId, [Card; HOLE_CARDS_PER_PLAYER]>,
    board: Option<Vec<Card>>,
}

impl Hand<'_> {
    pub fn phase(&self) -> HandPhase {
        self.phase
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn plan(&self) -> &DealPlan {
        &self.plan
    }

    /// Ciphertext at an assigned deck position.
    pub fn ciphertext_at(&self, position: u8) -> Result<u64, ProtocolError> {
        if self.plan.destination(position).is_none() {
            return Err(ProtocolError::UnassignedPosition(usize::from(position)));
        }
        self.deck
            .value_at(usize::from(position))
            .ok_or(ProtocolError::UnassignedPosition(usize::from(position)))
    }

    /// Decrypt `seat`'s two hole cards. Each seat reveals exactly once.
    #[tracing::instrument(target = LOG_TARGET, skip(self))]
    pub fn reveal_hole(
        &mut self,
        seat: SeatId,
    ) -> Result<[Card; HOLE_CARDS_PER_PLAYER], ProtocolError> {
        if !matches!(self.phase, HandPhase::SlotsAssigned | HandPhase::HoleReveals) {
            return Err(ProtocolError::OutOfTurn(self.phase));
        }
        if self.holes.contains_key(&seat) {
            return Err(ProtocolError::OutOfTurn(self.phase));
        }
        let positions = self.plan.hole_positions(seat)?;
        let cards = [
            self.owner_card_at(positions[0], seat)?,
            self.owner_card_at(positions[1], seat)?,
        ];
        self.holes.insert(seat, cards);
        self.phase = HandPhase::HoleReveals;
        debug!(target: LOG_TARGET, seat, "hole cards revealed to owner");
        Ok(cards)
    }

    /// Decrypt the five community cards once every seat holds its hole
    /// cards.
    #[tracing::instrument(target = LOG_TARGET, skip(self))]
    pub fn reveal_community(&mut self) -> Result<Vec<Card>, ProtocolError> {
        if self.phase != HandPhase::HoleReveals || self.holes.len() != self.plan.players() {
            return Err(ProtocolError::OutOfTurn(self.phase));
        }
        let mut board = Vec::with_capacity(COMMUNITY_CARDS);
        for position in self.plan.board_positions() {
            let value = self.ciphertext_at(position)?;
            board.push(reveal_community(
                value,
                &self.session.keyring,
                &self.session.modulus,
            )?);
        }
        self.board = Some(board.clone());
        self.phase = HandPhase::CommunityRevealed;
        debug!(target: LOG_TARGET, cards = board.len(), "community cards revealed");
        Ok(board)
    }

    /// Close the hand and return everything revealed.
    pub fn finish(&mut self) -> Result<HandSummary, ProtocolError> {
        if self.phase != HandPhase::CommunityRevealed {
            return Err(ProtocolError::OutOfTurn(self.phase));
        }
        let board = self
            .board
            .clone()
            .ok_or(ProtocolError::OutOfTurn(self.phase))?;
        self.phase = HandPhase::Done;
        Ok(HandSummary {
            holes: self.holes.clone(),
            board,
        })
    }

    fn owner_card_at(&self, position: u8, seat: SeatId) -> Result<Card, ProtocolError> {
        let value = self.ciphertext_at(position)?;
        reveal_to_owner(value, seat, &self.session.keyring, &self.session.modulus)
    }
}

/// Fully revealed outcome of one hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSummary {
    pub holes: BTreeMap<SeatId, [Card; HOLE_CARDS_PER_PLAYER]>,
    pub board: Vec<Card>,
}
