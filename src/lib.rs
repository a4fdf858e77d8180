pub mod arith;
pub mod cards;
pub mod config;
pub mod dealing;
pub mod error;
pub mod keys;
pub mod messages;
pub mod primes;
pub mod session;
pub mod shuffling;

#[cfg(test)]
pub mod test_utils;

pub use error::ProtocolError;
pub use session::*;
