//! Modular arithmetic and number-theoretic helpers.
//!
//! Everything here operates on `u64` moduli. CRT primes used elsewhere in
//! this crate are generated to fit comfortably under 62 bits, so all
//! products fit in `u128` and no big-integer type is needed at this layer.

use crate::error::{Error, Result};
use rand::Rng;

/// `v^e mod m` via square-and-multiply. `m` need not be prime.
pub fn mod_exp(v: u64, e: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let mut result: u128 = 1;
    let mut base = (v % m) as u128;
    let mut exp = e;
    let m = m as u128;
    while exp > 0 {
        if exp & 1 == 1 {
            result = (result * base) % m;
        }
        base = (base * base) % m;
        exp >>= 1;
    }
    result as u64
}

/// `v^-1 mod p` via Fermat's little theorem. Requires `p` prime.
pub fn mod_inv(v: u64, p: u64) -> u64 {
    mod_exp(v, p - 2, p)
}

/// Trial-division Miller-Rabin primality test.
///
/// Matches the reference's use of a probabilistic test: `trials` rounds of
/// random witnesses are checked (in addition to a fixed set of small prime
/// witnesses, which make the test deterministic for every modulus this crate
/// ever constructs).
pub fn is_prime(n: u64, trials: u32) -> bool {
    if n < 2 {
        return false;
    }
    for p in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
        if n == p {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }

    let mut d = n - 1;
    let mut r = 0u32;
    while d % 2 == 0 {
        d /= 2;
        r += 1;
    }

    let witness = |a: u64| -> bool {
        let mut x = mod_exp(a, d, n);
        if x == 1 || x == n - 1 {
            return true;
        }
        for _ in 0..r - 1 {
            x = mod_exp(x, 2, n);
            if x == n - 1 {
                return true;
            }
        }
        false
    };

    let fixed_witnesses = [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    for &a in fixed_witnesses.iter() {
        if a >= n {
            continue;
        }
        if !witness(a) {
            return false;
        }
    }

    let mut rng = rand::thread_rng();
    for _ in 0..trials {
        let a = rng.gen_range(2..n.max(3));
        if !witness(a) {
            return false;
        }
    }
    true
}

/// Distinct prime factors of `n`, found by trial division up to `sqrt(n)`.
fn distinct_prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut p = 2u64;
    while p * p <= n {
        if n % p == 0 {
            factors.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Finds a primitive root modulo the prime `p`.
///
/// Candidates are tried starting from a random offset so that, combined with
/// [`root_of_unity`]'s retry loop, a transient unlucky generator choice (one
/// that collapses to 1 when raised to `(p-1)/n`) is resolved by trying a
/// different primitive root rather than failing outright.
pub fn find_generator(p: u64) -> Result<u64> {
    if p < 2 {
        return Err(Error::InvalidParameter(format!(
            "find_generator requires p >= 2, got {p}"
        )));
    }
    if p == 2 {
        return Ok(1);
    }
    let factors = distinct_prime_factors(p - 1);
    let mut rng = rand::thread_rng();
    let start: u64 = rng.gen_range(2..p);
    for offset in 0..p - 2 {
        let g = 2 + (start - 2 + offset) % (p - 2);
        if factors
            .iter()
            .all(|&q| mod_exp(g, (p - 1) / q, p) != 1)
        {
            return Ok(g);
        }
    }
    Err(Error::InvalidParameter(format!(
        "no primitive root found modulo {p}"
    )))
}

/// Returns a primitive `n`-th root of unity modulo the prime `p`.
///
/// Fails with [`Error::NoRootOfUnity`] if `n` does not divide `p - 1`.
pub fn root_of_unity(n: u64, p: u64) -> Result<u64> {
    if (p - 1) % n != 0 {
        return Err(Error::NoRootOfUnity {
            order: n,
            modulus: p.to_string(),
        });
    }
    loop {
        let g = find_generator(p)?;
        let root = mod_exp(g, (p - 1) / n, p);
        if root != 1 {
            return Ok(root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_exp_matches_known_values() {
        assert_eq!(mod_exp(2, 10, 1000), 24);
        assert_eq!(mod_exp(5, 0, 7), 1);
    }

    #[test]
    fn mod_inv_round_trips() {
        let p = 73u64;
        for v in 1..p {
            let inv = mod_inv(v, p);
            assert_eq!((v * inv) % p, 1);
        }
    }

    #[test]
    fn is_prime_matches_small_primes() {
        let primes = [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 73];
        for &p in &primes {
            assert!(is_prime(p, 32), "{p} should be prime");
        }
        for n in [0u64, 1, 4, 6, 8, 9, 15, 21, 25, 49] {
            assert!(!is_prime(n, 32), "{n} should not be prime");
        }
    }

    #[test]
    fn root_of_unity_has_correct_order() {
        let p = 73u64;
        let n = 8u64;
        let root = root_of_unity(n, p).unwrap();
        assert_eq!(mod_exp(root, n, p), 1);
        assert_ne!(mod_exp(root, n / 2, p), 1);
    }

    #[test]
    fn root_of_unity_rejects_bad_order() {
        assert!(root_of_unity(5, 73).is_err());
    }
}
