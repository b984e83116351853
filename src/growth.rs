//! Resize policy for the chained hash table.
//!
//! The bucket count walks a fixed ascending sequence of primes. Growth is
//! decided from `(node_count, bucket_count, prime_index)` alone; obtaining
//! the new bucket array is the table's business.

/// Bucket counts, in growth order. Each step roughly doubles the previous.
pub const PRIMES: [usize; 10] = [
    509, 1021, 2039, 4093, 8191, 16381, 32771, 65537, 131071, 262147,
];

/// Growth is attempted once `node_count / bucket_count` exceeds
/// `LOAD_FACTOR_NUM / LOAD_FACTOR_DEN`.
pub const LOAD_FACTOR_NUM: usize = 3;
pub const LOAD_FACTOR_DEN: usize = 4;

/// Outcome of consulting the policy before an insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Growth {
    /// The load factor is within bounds.
    Stay,
    /// The load factor is exceeded but the table is already at the last
    /// prime; it keeps operating at that size.
    Saturated,
    /// Grow to `bucket_count`, which is `PRIMES[prime_index]`.
    Grow {
        prime_index: usize,
        bucket_count: usize,
    },
}

/// `node_count / bucket_count > 3/4`, computed without floating point.
pub fn exceeds_load_factor(node_count: usize, bucket_count: usize) -> bool {
    (node_count as u128) * (LOAD_FACTOR_DEN as u128)
        > (bucket_count as u128) * (LOAD_FACTOR_NUM as u128)
}

pub fn plan(node_count: usize, bucket_count: usize, prime_index: usize) -> Growth {
    debug_assert_eq!(PRIMES.get(prime_index), Some(&bucket_count));
    if !exceeds_load_factor(node_count, bucket_count) {
        return Growth::Stay;
    }
    match PRIMES.get(prime_index + 1) {
        Some(&next) => Growth::Grow {
            prime_index: prime_index + 1,
            bucket_count: next,
        },
        None => Growth::Saturated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_ascend_and_roughly_double() {
        for w in PRIMES.windows(2) {
            assert!(w[1] > w[0]);
            // 2039 < 2 * 1021, so the ratio only approaches 2
            assert!(w[1] * 100 >= w[0] * 199, "{} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn threshold_is_strictly_greater_than_three_quarters() {
        // 509 * 0.75 = 381.75
        assert!(!exceeds_load_factor(381, 509));
        assert!(exceeds_load_factor(382, 509));
        // exactly 3/4 does not trigger
        assert!(!exceeds_load_factor(3, 4));
        assert!(exceeds_load_factor(4, 4));
    }

    #[test]
    fn plan_stays_below_threshold() {
        assert_eq!(plan(0, 509, 0), Growth::Stay);
        assert_eq!(plan(381, 509, 0), Growth::Stay);
    }

    #[test]
    fn plan_steps_to_next_prime() {
        assert_eq!(
            plan(382, 509, 0),
            Growth::Grow {
                prime_index: 1,
                bucket_count: 1021
            }
        );
        assert_eq!(
            plan(200_000, 131071, 8),
            Growth::Grow {
                prime_index: 9,
                bucket_count: 262147
            }
        );
    }

    #[test]
    fn plan_saturates_at_last_prime() {
        let last = PRIMES.len() - 1;
        assert_eq!(plan(usize::MAX, PRIMES[last], last), Growth::Saturated);
        assert_eq!(plan(1, PRIMES[last], last), Growth::Stay);
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        assert!(exceeds_load_factor(usize::MAX, 509));
        assert!(!exceeds_load_factor(0, usize::MAX));
    }
}
