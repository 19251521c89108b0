//! # Sieve — Segmented Prime Generation
//!
//! Builds the ordered list of primes below a bound. Two generators live here:
//!
//! 1. **`segmented_sieve`** — the production generator. A segmented sieve of
//!    Eratosthenes whose working set is O(√n) booleans regardless of the bound.
//! 2. **`trial_division_primes`** — an independent, deliberately naive
//!    generator used as an oracle by tests and benchmarks.
//!
//! ## Algorithm: Segmented Sieve of Eratosthenes
//!
//! Let `w = max(⌊√n⌋, 2)`. A classic sieve over `[0, w]` yields the base
//! primes; these are emitted first and are the only sieving primes ever needed,
//! since every composite `m ≤ n` has a prime factor `≤ √m ≤ w`.
//!
//! `[0, n]` is then walked in windows of width `w`. Each odd base prime `p`
//! becomes active once `p²` falls inside the current window and keeps a cursor
//! to its next odd multiple. Marking steps by `2p`, so even numbers are never
//! touched and never scanned; 2 comes exclusively from the base sieve.
//!
//! The first window is never scanned (its primes are the base primes), and
//! later windows only emit odd values strictly above `w`, so no prime is
//! reported twice.
//!
//! Complexity: O(n log log n) time, O(√n) working space plus the output.
//!
//! ## References
//!
//! - Eratosthenes of Cyrene, ~240 BCE (sieve algorithm).
//! - C. Bays, R. Hudson, "The segmented sieve of Eratosthenes and primes in
//!   arithmetic progressions to 10^12", BIT 17 (1977), 121–127.

/// Default upper bound for the prime table: `i16::MAX`.
pub const DEFAULT_BOUND: u64 = i16::MAX as u64;

/// Largest bound the sieve accepts. Beyond this the output list alone runs
/// to hundreds of megabytes, so the CLI rejects it up front.
pub const MAX_BOUND: u64 = 1_000_000_000;

/// Window width used by `segmented_sieve` for a given bound.
///
/// Equal to `⌊√limit⌋`, except that it never drops below 2 so the base sieve
/// always covers the only even prime.
pub fn segment_size(limit: u64) -> u64 {
    limit.isqrt().max(2)
}

/// A base prime together with the offset of its next odd multiple inside the
/// current window.
#[derive(Debug, Clone, Copy)]
struct SievingPrime {
    prime: usize,
    next: usize,
}

/// Classic sieve over `[0, limit]`. `true` means composite (or 0/1).
fn small_composites(limit: usize) -> Vec<bool> {
    let mut composite = vec![false; limit + 1];
    for flag in composite.iter_mut().take(2) {
        *flag = true;
    }

    let mut i = 2;
    while i * i <= limit {
        if !composite[i] {
            for j in (i * i..=limit).step_by(i) {
                composite[j] = true;
            }
        }
        i += 1;
    }
    composite
}

/// Generate all primes in `[2, limit]` in increasing order.
///
/// Returns an empty list when `limit < 2`. Bounds above [`MAX_BOUND`] are
/// clamped to it.
pub fn segmented_sieve(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }

    // MAX_BOUND fits in a 32-bit usize, so neither the cast nor `low + width` overflows.
    let limit = limit.min(MAX_BOUND) as usize;
    let width = segment_size(limit as u64) as usize;

    let composite = small_composites(width);
    let mut primes = Vec::with_capacity(estimate_prime_count(limit));
    primes.extend((2..=width).filter(|&i| !composite[i]).map(|i| i as u64));

    let mut segment = vec![true; width];
    let mut cursors: Vec<SievingPrime> = Vec::new();
    // Next odd candidate for activation as a sieving prime.
    let mut s = 3;
    // Next odd value to emit; everything at or below `width` came from the base sieve.
    let mut n = (width + 1) | 1;

    let mut low = 0;
    while low <= limit {
        segment.fill(true);
        let high = (low + width - 1).min(limit);

        while s * s <= high {
            if !composite[s] {
                cursors.push(SievingPrime {
                    prime: s,
                    next: s * s - low,
                });
            }
            s += 2;
        }

        for cursor in &mut cursors {
            let step = cursor.prime * 2;
            let mut j = cursor.next;
            while j < width {
                segment[j] = false;
                j += step;
            }
            cursor.next = j - width;
        }

        if low > 0 {
            while n <= high {
                if segment[n - low] {
                    primes.push(n as u64);
                }
                n += 2;
            }
        }

        low += width;
    }

    primes
}

/// Estimate prime count up to n using the prime counting function approximation.
fn estimate_prime_count(n: usize) -> usize {
    if n < 10 {
        return 4;
    }
    let nf = n as f64;
    (1.3 * nf / nf.ln()) as usize
}

/// Trial-division primality check: `n` is prime iff no `d` in `[2, √n]` divides it.
pub fn is_prime_trial(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// All primes in `[2, limit]` by trial division. Slow; used as an oracle.
pub fn trial_division_primes(limit: u64) -> Vec<u64> {
    (2..=limit).filter(|&n| is_prime_trial(n)).collect()
}
