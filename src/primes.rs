//! Safe-prime search backed by Miller-Rabin primality testing.

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arith::mod_pow;
use crate::config::{MAX_MODULUS_BITS, MIN_MODULUS_BITS};
use crate::error::ProtocolError;

const LOG_TARGET: &str = "mental_poker::primes";

/// Safe-prime modulus `p = 2q + 1` with `q` prime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafePrime {
    pub p: u64,
    pub q: u64,
}

impl SafePrime {
    /// Order of the multiplicative group modulo `p`.
    pub fn group_order(&self) -> u64 {
        self.p - 1
    }
}

/// Miller-Rabin probabilistic primality test.
///
/// Each round draws a fresh base and accepts a composite with
/// probability at most 1/4, so the false-accept bound after
/// `iterations` rounds is `4^-iterations`.
pub fn is_probable_prime(n: u64, iterations: u32, rng: &mut (impl Rng + CryptoRng)) -> bool {
    if n < 2 || n == 4 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    // n - 1 = 2^squarings * odd_factor
    let mut odd_factor = n - 1;
    let mut squarings = 0u32;
    while odd_factor % 2 == 0 {
        odd_factor /= 2;
        squarings += 1;
    }

    (0..iterations).all(|_| witness_round(n, odd_factor, squarings, rng))
}

/// One Miller-Rabin round with a base drawn uniformly from `[2, n - 2]`.
fn witness_round(
    n: u64,
    odd_factor: u64,
    squarings: u32,
    rng: &mut (impl Rng + CryptoRng),
) -> bool {
    let base = rng.gen_range(2..=n - 2);
    let mut x = mod_pow(base, odd_factor, n);
    if x == 1 || x == n - 1 {
        return true;
    }
    for _ in 1..squarings {
        x = mod_pow(x, 2, n);
        if x == n - 1 {
            return true;
        }
    }
    false
}

/// Search for a safe prime `p = 2q + 1` where `p` has exactly `bits` bits.
///
/// Candidates for `q` are drawn odd from the given source; one survives
/// only if `q` is prime, `2q + 1` stays inside `u64`, and the resulting
/// `p` is prime as well. Rejected candidates are retried silently.
#[tracing::instrument(target = LOG_TARGET, skip(rng))]
pub fn generate_safe_prime(
    rng: &mut (impl Rng + CryptoRng),
    bits: u32,
    iterations: u32,
) -> Result<SafePrime, ProtocolError> {
    if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&bits) {
        return Err(ProtocolError::InvalidModulusBits(bits));
    }
    // zero rounds would accept every candidate
    if iterations == 0 {
        return Err(ProtocolError::InvalidPrimalityIterations);
    }

    let low = 1u64 << (bits - 2);
    let high = 1u64 << (bits - 1);
    let mut attempts = 0u64;
    loop {
        attempts += 1;
        let q = rng.gen_range(low..high) | 1;
        if !is_probable_prime(q, iterations, rng) {
            continue;
        }
        let p = match q.checked_mul(2).and_then(|doubled| doubled.checked_add(1)) {
            Some(p) => p,
            None => continue,
        };
        if !is_probable_prime(p, iterations, rng) {
            continue;
        }
        debug!(target: LOG_TARGET, p, q, attempts, "safe prime accepted");
        return Ok(SafePrime { p, q });
    }
}
