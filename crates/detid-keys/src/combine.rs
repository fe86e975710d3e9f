//! # 128-bit Key Combination
//!
//! Folds a sequence of 128-bit partial keys into one:
//!
//! ```text
//! combine(acc, k) = (acc.low ^ k.high) ‖ (acc.high ^ k.low)
//! fold(k1..kn)    = combine(..combine(combine(nil, k1), k2).., kn)
//! ```
//!
//! where `high`/`low` are the upper and lower 64 bits. The accumulator's
//! halves swap at every step while each incoming key keeps its
//! orientation, so the fold depends on key order. A single key folds to
//! itself.
//!
//! Each step is invertible given the incoming key ([`separate`]). The fold
//! is fast and deterministic but not collision resistant: use a
//! fingerprint when collision resistance matters.

use uuid::Uuid;

fn halves(id: Uuid) -> (u64, u64) {
    let v = id.as_u128();
    ((v >> 64) as u64, v as u64)
}

fn join(high: u64, low: u64) -> Uuid {
    Uuid::from_u128((u128::from(high) << 64) | u128::from(low))
}

/// One combination step.
pub fn combine(acc: Uuid, key: Uuid) -> Uuid {
    let (acc_high, acc_low) = halves(acc);
    let (key_high, key_low) = halves(key);
    join(acc_low ^ key_high, acc_high ^ key_low)
}

/// Recover the accumulator a [`combine`] step started from.
pub fn separate(combined: Uuid, key: Uuid) -> Uuid {
    let (high, low) = halves(combined);
    let (key_high, key_low) = halves(key);
    join(low ^ key_low, high ^ key_high)
}

/// Fold keys left to right, starting from the nil UUID.
pub fn fold<I: IntoIterator<Item = Uuid>>(keys: I) -> Uuid {
    keys.into_iter().fold(Uuid::nil(), combine)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Uuid = Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff);
    const B: Uuid = Uuid::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
    const C: Uuid = Uuid::from_u128(0xdead_beef_0000_0001_cafe_f00d_0000_0002);

    #[test]
    fn test_empty_fold_is_nil() {
        assert_eq!(fold(Vec::<Uuid>::new()), Uuid::nil());
    }

    #[test]
    fn test_single_key_folds_to_itself() {
        assert_eq!(fold([A]), A);
    }

    #[test]
    fn test_combine_layout() {
        let acc = Uuid::from_u128(0x1111_1111_1111_1111_2222_2222_2222_2222);
        let key = Uuid::from_u128(0x4444_4444_4444_4444_8888_8888_8888_8888);
        // high = acc.low ^ key.high, low = acc.high ^ key.low
        assert_eq!(
            combine(acc, key),
            Uuid::from_u128(0x6666_6666_6666_6666_9999_9999_9999_9999)
        );
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(fold([A, B]), fold([B, A]));
        assert_ne!(fold([A, B, C]), fold([A, C, B]));
    }

    #[test]
    fn test_separate_inverts_combine() {
        for (acc, key) in [(A, B), (B, C), (Uuid::nil(), A)] {
            assert_eq!(separate(combine(acc, key), key), acc);
        }
    }

    #[test]
    fn test_unwind_fold() {
        let folded = fold([A, B, C]);
        let after_ab = separate(folded, C);
        assert_eq!(after_ab, fold([A, B]));
        assert_eq!(separate(after_ab, B), A);
    }
}
