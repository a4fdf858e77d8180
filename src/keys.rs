//! Per-party commuting keypairs over the safe-prime group.

use rand::{CryptoRng, Rng};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::arith::extended_gcd;
use crate::config::{MAX_PLAYERS, MIN_PLAYERS};
use crate::error::ProtocolError;
use crate::primes::SafePrime;

const LOG_TARGET: &str = "mental_poker::keys";

pub type SeatId = u8; // 0..=22

/// One party's encryption exponent `c` and its inverse `d` modulo the
/// group order. Wiped on drop.
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    pub c: u64,
    pub d: u64,
}

impl KeyPair {
    /// Draw an exponent coprime to `order` and derive its inverse.
    ///
    /// Coprimality and the inverse both come out of a single
    /// extended-Euclid pass per candidate; non-coprime draws are
    /// resampled.
    pub fn generate(order: u64, rng: &mut (impl Rng + CryptoRng)) -> Result<Self, ProtocolError> {
        if order <= 2 {
            return Err(ProtocolError::DegenerateModulus(order));
        }
        loop {
            let c = rng.gen_range(2..order);
            let (gcd, bezout_x, _) = extended_gcd(c, order);
            if gcd != 1 {
                continue;
            }
            let wide_order = i128::from(order);
            let d = ((bezout_x % wide_order + wide_order) % wide_order) as u64;
            return Ok(Self { c, d });
        }
    }
}

/// Every seat's keypair for one table, in seat order.
#[derive(Debug)]
pub struct KeyRing {
    order: u64,
    keys: Vec<KeyPair>,
}

impl KeyRing {
    /// One keypair per seat over the group order `p - 1`.
    #[tracing::instrument(target = LOG_TARGET, skip(modulus, rng))]
    pub fn generate(
        modulus: &SafePrime,
        players: usize,
        rng: &mut (impl Rng + CryptoRng),
    ) -> Result<Self, ProtocolError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ProtocolError::InvalidPlayerCount(players));
        }
        let order = modulus.group_order();
        let keys = (0..players)
            .map(|_| KeyPair::generate(order, rng))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(target: LOG_TARGET, players, order, "commuting keyring ready");
        Ok(Self { order, keys })
    }

    pub fn order(&self) -> u64 {
        self.order
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Seats in pipeline order.
    pub fn seats(&self) -> impl Iterator<Item = SeatId> {
        0..self.keys.len() as SeatId
    }

    pub fn key_pair(&self, seat: SeatId) -> Result<&KeyPair, ProtocolError> {
        self.keys
            .get(usize::from(seat))
            .ok_or(ProtocolError::UnknownSeat(seat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MODULUS: SafePrime = SafePrime { p: 107, q: 53 };

    #[test]
    fn generated_pair_inverts_modulo_the_group_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let order = MODULUS.group_order();
        let pair = KeyPair::generate(order, &mut rng).expect("order 106 is usable");
        assert!(pair.c >= 2 && pair.c < order);
        assert_eq!(u128::from(pair.c) * u128::from(pair.d) % u128::from(order), 1);
    }

    #[test]
    fn rejects_degenerate_orders() {
        let mut rng = StdRng::seed_from_u64(3);
        for order in [0, 1, 2] {
            assert!(matches!(
                KeyPair::generate(order, &mut rng),
                Err(ProtocolError::DegenerateModulus(o)) if o == order
            ));
        }
    }

    #[test]
    fn keyring_indexes_by_seat() {
        let mut rng = StdRng::seed_from_u64(9);
        let ring = KeyRing::generate(&MODULUS, 4, &mut rng).expect("keyring over 4 seats");
        assert_eq!(ring.len(), 4);
        assert!(!ring.is_empty());
        assert_eq!(ring.order(), 106);
        assert_eq!(ring.seats().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(ring.key_pair(3).is_ok());
        assert!(matches!(
            ring.key_pair(4),
            Err(ProtocolError::UnknownSeat(4))
        ));
    }

    #[test]
    fn keyring_rejects_out_of_range_player_counts() {
        let mut rng = StdRng::seed_from_u64(9);
        assert!(matches!(
            KeyRing::generate(&MODULUS, 1, &mut rng),
            Err(ProtocolError::InvalidPlayerCount(1))
        ));
        assert!(matches!(
            KeyRing::generate(&MODULUS, 24, &mut rng),
            Err(ProtocolError::InvalidPlayerCount(24))
        ));
    }
}
