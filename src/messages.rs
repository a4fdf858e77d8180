//! Wire-shape messages for the party-to-party exchanges. Transport is
//! out of scope; these types only pin the serialized contract. A stage
//! handoff blocks on its recipient, so a slow party stalls the pipeline.

use serde::{Deserialize, Serialize};

use crate::keys::SeatId;
use crate::shuffling::Deck;

/// Hand a deck column to the next party for its encrypt-and-shuffle
/// stage. `from_party` is the seat whose stage produced `deck`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleRequest {
    pub from_party: SeatId,
    pub deck: Deck,
}

/// Reply carrying the deck after the receiving party's stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleResponse {
    pub deck: Deck,
}

/// Audience for one deck position's decryption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealScope {
    Owner(SeatId),
    Community,
}

/// Ask the other parties for their decryption contributions at one
/// position. Each invoked party applies its exponent exactly once per
/// request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealRequest {
    pub position: u8,
    pub scope: RevealScope,
}

/// One party's partial decryption of one deck position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealShare {
    pub position: u8,
    pub party: SeatId,
    pub value: u64,
}
