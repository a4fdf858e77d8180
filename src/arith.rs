//! Modular arithmetic on `u64` operands with `u128` intermediates.

/// Modular exponentiation by square-and-multiply.
///
/// Returns 0 whenever `base` or `modulus` is 0; otherwise an exponent of
/// 0 yields 1. Every product is carried in `u128`, so no operand width
/// can overflow.
pub fn mod_pow(base: u64, exponent: u64, modulus: u64) -> u64 {
    if base == 0 || modulus == 0 {
        return 0;
    }
    let wide_modulus = u128::from(modulus);
    let mut result: u128 = 1;
    let mut acc = u128::from(base) % wide_modulus;
    let mut exponent = exponent;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result * acc % wide_modulus;
        }
        exponent >>= 1;
        acc = acc * acc % wide_modulus;
    }
    result as u64
}

/// Iterative extended Euclid.
///
/// Returns `(g, x, y)` satisfying `a*x + b*y = g` where `g = gcd(a, b)`.
pub fn extended_gcd(a: u64, b: u64) -> (u64, i128, i128) {
    let (mut old_r, mut r) = (i128::from(a), i128::from(b));
    let (mut old_s, mut s) = (1i128, 0i128);
    let (mut old_t, mut t) = (0i128, 1i128);
    while r != 0 {
        let quotient = old_r / r;
        (old_r, r) = (r, old_r - quotient * r);
        (old_s, s) = (s, old_s - quotient * s);
        (old_t, t) = (t, old_t - quotient * t);
    }
    (old_r as u64, old_s, old_t)
}

/// Multiplicative inverse of `a` modulo `n`, normalized into `[0, n)`.
/// `None` when `gcd(a, n) != 1`.
pub fn mod_inverse(a: u64, n: u64) -> Option<u64> {
    if n == 0 {
        return None;
    }
    let (gcd, bezout_x, _) = extended_gcd(a, n);
    if gcd != 1 {
        return None;
    }
    let wide_n = i128::from(n);
    Some(((bezout_x % wide_n + wide_n) % wide_n) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_pow_matches_known_values() {
        assert_eq!(mod_pow(2, 10, 1000), 24);
        assert_eq!(mod_pow(3, 0, 7), 1);
        assert_eq!(mod_pow(10, 1, 7), 3);
        assert_eq!(mod_pow(2, 61, (1 << 61) - 1), 1);
    }

    #[test]
    fn mod_pow_zero_operand_conventions() {
        assert_eq!(mod_pow(0, 5, 7), 0);
        assert_eq!(mod_pow(5, 3, 0), 0);
        assert_eq!(mod_pow(0, 0, 7), 0);
    }

    #[test]
    fn exponent_cipher_round_trips_over_a_small_group() {
        // p = 23 has group order 22; c = 9 and d = 5 satisfy c*d = 45 = 2*22 + 1
        let (p, c, d) = (23, 9, 5);
        for x in 1..p {
            let hidden = mod_pow(x, c, p);
            assert_eq!(mod_pow(hidden, d, p), x);
        }
    }

    #[test]
    fn independent_exponents_commute() {
        let p = 23;
        for x in 1..p {
            let ab = mod_pow(mod_pow(x, 9, p), 7, p);
            let ba = mod_pow(mod_pow(x, 7, p), 9, p);
            assert_eq!(ab, ba);
        }
    }

    #[test]
    fn extended_gcd_produces_a_bezout_identity() {
        let cases = [(240u64, 46u64), (17, 3120), (101, 103), (0, 7)];
        for (a, b) in cases {
            let (gcd, x, y) = extended_gcd(a, b);
            assert_eq!(i128::from(a) * x + i128::from(b) * y, i128::from(gcd));
        }
        assert_eq!(extended_gcd(240, 46).0, 2);
    }

    #[test]
    fn mod_inverse_of_17_mod_3120() {
        let inverse = mod_inverse(17, 3120).expect("17 and 3120 are coprime");
        assert_eq!(inverse, 2753);
        assert_eq!(17 * inverse % 3120, 1);
    }

    #[test]
    fn mod_inverse_requires_coprimality() {
        assert_eq!(mod_inverse(6, 9), None);
        assert_eq!(mod_inverse(0, 7), None);
        assert_eq!(mod_inverse(4, 0), None);
    }
}
