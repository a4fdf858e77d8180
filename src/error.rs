use thiserror::Error;

use crate::keys::SeatId;
use crate::session::HandPhase;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid player count: expected 2..=23, got {0}")]
    InvalidPlayerCount(usize),

    #[error("Invalid modulus width: expected 7..=63 bits, got {0}")]
    InvalidModulusBits(u32),

    #[error("Miller-Rabin iteration count must be nonzero")]
    InvalidPrimalityIterations,

    #[error("Modulus {0} cannot embed card codes up to 53")]
    ModulusTooSmall(u64),

    #[error("{0} is not a safe prime")]
    NotASafePrime(u64),

    #[error("Group order {0} leaves no usable key exponents")]
    DegenerateModulus(u64),

    #[error("Invalid deck size: expected 52, got {0}")]
    InvalidDeckSize(usize),

    #[error("Position {0} is not assigned to any destination")]
    UnassignedPosition(usize),

    #[error("Value {0} is not a card code")]
    InvalidCardCode(u64),

    #[error("Unknown seat {0}")]
    UnknownSeat(SeatId),

    #[error("Operation not allowed in phase {0:?}")]
    OutOfTurn(HandPhase),
}
