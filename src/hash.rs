//! Key hashing for the chained hash table.

const SHIFT: u32 = 5;

/// Map `key` to a bucket in `[0, bucket_count)`.
///
/// The accumulator is a wrapping 32-bit unsigned integer updated as
/// `acc = (acc << 5) + byte` for every byte of the key. Bytes are read as
/// unsigned, so a byte `>= 0x80` adds `0x80..=0xff`. This deliberately
/// differs from C code that widens a signed `char`, where such bytes
/// sign-extend and non-ASCII keys land in other buckets. The result only
/// depends on `key` and `bucket_count`, so a binding can always be found
/// again after the bucket array is replaced.
///
/// # Panics
/// If `bucket_count` is zero.
pub fn bucket_index(key: &[u8], bucket_count: usize) -> usize {
    assert!(bucket_count > 0, "bucket_count must be positive");
    let acc = key
        .iter()
        .fold(0u32, |acc, &b| (acc << SHIFT).wrapping_add(u32::from(b)));
    acc as usize % bucket_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(bucket_index(b"a", 509), 97);
        // 97 * 32 + 98 = 3202; 3202 mod 509 = 148
        assert_eq!(bucket_index(b"ab", 509), 148);
        assert_eq!(bucket_index(b"", 509), 0);
    }

    #[test]
    fn deterministic_and_in_range() {
        for &count in &[1usize, 2, 509, 1021, 262147] {
            for key in ["x", "hello", "a much longer key that wraps the accumulator"] {
                let i = bucket_index(key.as_bytes(), count);
                assert!(i < count);
                assert_eq!(i, bucket_index(key.as_bytes(), count));
            }
        }
    }

    #[test]
    fn long_keys_wrap_instead_of_overflowing() {
        let key = vec![0xffu8; 4096];
        let i = bucket_index(&key, 509);
        assert!(i < 509);
    }

    #[test]
    fn high_bytes_are_unsigned() {
        // A byte >= 0x80 contributes its unsigned value.
        assert_eq!(bucket_index(&[0xff], 1021), 255);
    }

    #[test]
    #[should_panic(expected = "bucket_count must be positive")]
    fn zero_buckets_panics() {
        let _ = bucket_index(b"k", 0);
    }
}
