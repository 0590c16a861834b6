//! # Trial Division
//!
//! Naive O(sqrt n) primality test and range scanning on top of it.
//!
//! The divisor bound is `floor(sqrt(n)) + 1`, computed through `f64`. For
//! `n` of 0 or 1 the divisor loop `2..limit` is empty, so both values are
//! reported prime. Callers rely on this exact classification.

use crate::data::Range;

/// Exclusive upper bound on trial divisors for `n`
#[inline]
pub fn divisor_limit(n: u64) -> u64 {
    (n as f64).sqrt() as u64 + 1
}

/// Trial-division primality test.
///
/// Returns `true` for 0 and 1.
#[inline]
pub fn is_prime(n: u64) -> bool {
    let limit = divisor_limit(n);
    for d in 2..limit {
        if n % d == 0 {
            return false;
        }
    }
    true
}

/// Test every value of `range` in ascending order, calling `emit` on hits.
///
/// Stops at the first error returned by `emit`. Returns the number of hits.
pub fn scan_range<E, F>(range: Range, mut emit: F) -> Result<u64, E>
where
    F: FnMut(u64) -> Result<(), E>,
{
    let mut hits = 0;
    for n in range {
        if is_prime(n) {
            emit(n)?;
            hits += 1;
        }
    }
    Ok(hits)
}

/// Count values of `range` that `is_prime` accepts
pub fn count_primes(range: Range) -> u64 {
    range.into_iter().filter(|&n| is_prime(n)).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_is_prime(n: u64) -> bool {
        n >= 2 && (2..n).all(|d| n % d != 0)
    }

    #[test]
    fn test_matches_reference_below_100() {
        for n in 2..100 {
            assert_eq!(is_prime(n), reference_is_prime(n), "n = {}", n);
        }
    }

    #[test]
    fn test_zero_and_one_classified_prime() {
        assert_eq!(divisor_limit(0), 1);
        assert_eq!(divisor_limit(1), 2);
        assert!(is_prime(0));
        assert!(is_prime(1));
    }

    #[test]
    fn test_small_primes_and_squares() {
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(!is_prime(9));
        assert!(!is_prime(25));
        assert!(!is_prime(49));
        assert!(is_prime(97));
    }

    #[test]
    fn test_large_values() {
        assert!(is_prime(99_999_989));
        assert!(!is_prime(99_999_999));
        // 9973 * 10007
        assert!(!is_prime(99_799_811));
        // 9973^2
        assert!(!is_prime(99_460_729));
    }

    #[test]
    fn test_scan_range_order_and_hits() {
        let mut seen = Vec::new();
        let hits = scan_range::<(), _>(Range::new(0, 10), |n| {
            seen.push(n);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![0, 1, 2, 3, 5, 7]);
        assert_eq!(hits, 6);
    }

    #[test]
    fn test_scan_range_stops_on_error() {
        let mut seen = Vec::new();
        let result = scan_range(Range::new(10, 20), |n| {
            seen.push(n);
            if n == 13 {
                Err("sink closed")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("sink closed"));
        assert_eq!(seen, vec![11, 13]);
    }

    #[test]
    fn test_count_primes() {
        assert_eq!(count_primes(Range::new(10, 20)), 4);
        assert_eq!(count_primes(Range::new(0, 100)), 27);
        assert_eq!(count_primes(Range::new(5, 5)), 0);
    }
}
