//! # Identifier Generators
//!
//! The generator contract and its two stateful implementations:
//!
//! - [`RandomGenerator`] draws version-4 UUIDs from a cryptographically
//!   strong source.
//! - [`SequentialGenerator`] issues integers from a monotonic counter and
//!   reissues released values from a FIFO reuse pool before advancing.
//!
//! Name-based derivation lives in [`crate::namespace`].
//!
//! ## Concurrency
//!
//! Generators take `&mut self`. A sequential generator shared between
//! threads must be wrapped in a `Mutex` (or owned by a single task); its
//! pool-check-then-increment sequence is a read-modify-write.

use std::collections::VecDeque;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use uuid::Uuid;

use crate::error::IdentifierError;

/// Produces one identifier per call.
pub trait IdentifierGenerator {
    /// The identifier type produced.
    type Id;

    /// Produce the next identifier.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::SequenceExhausted` when a bounded generator
    /// cannot produce another value.
    fn next_id(&mut self) -> Result<Self::Id, IdentifierError>;

    /// The sentinel identifier of this generator's kind.
    fn default_id(&self) -> Self::Id;
}

/// A generator whose issued identifiers can be released for reissue.
pub trait ReusableGenerator: IdentifierGenerator {
    /// Release `id` into the reuse pool.
    fn reuse(&mut self, id: Self::Id);

    /// Clear the reuse pool, and restore the counter to its seed if asked.
    fn reset(&mut self, restore_seed: bool);
}

// ---------------------------------------------------------------------------
// Random
// ---------------------------------------------------------------------------

/// Version-4 UUIDs from a cryptographically strong random source.
#[derive(Debug, Clone, Default)]
pub struct RandomGenerator<R = OsRng> {
    rng: R,
}

impl RandomGenerator<OsRng> {
    /// A generator backed by the operating system's random source.
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl<R: RngCore + CryptoRng> RandomGenerator<R> {
    /// A generator backed by the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore + CryptoRng> IdentifierGenerator for RandomGenerator<R> {
    type Id = Uuid;

    fn next_id(&mut self) -> Result<Uuid, IdentifierError> {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    fn default_id(&self) -> Uuid {
        Uuid::nil()
    }
}

// ---------------------------------------------------------------------------
// Sequential / reusable
// ---------------------------------------------------------------------------

/// Integer types a [`SequentialGenerator`] can count in.
pub trait SequenceValue: Copy + PartialEq + std::fmt::Debug + std::fmt::Display {
    /// The zero value, used as default seed and sentinel.
    const ZERO: Self;

    /// `self + 1`, or `None` on overflow.
    fn successor(self) -> Option<Self>;
}

macro_rules! impl_sequence_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SequenceValue for $ty {
                const ZERO: Self = 0;

                fn successor(self) -> Option<Self> {
                    self.checked_add(1)
                }
            }
        )*
    };
}

impl_sequence_value!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Monotonic counter with a FIFO pool of released values.
///
/// # Invariants
///
/// - A value appears in the pool at most once.
/// - The pool is drained before the counter advances.
/// - Counter overflow is an error, never a wrap.
#[derive(Debug, Clone)]
pub struct SequentialGenerator<T: SequenceValue = u64> {
    seed: T,
    current: T,
    pool: VecDeque<T>,
}

impl<T: SequenceValue> SequentialGenerator<T> {
    /// A generator seeded at zero; the first value issued is one.
    pub fn new() -> Self {
        Self::with_seed(T::ZERO)
    }

    /// A generator whose first issued value is `seed + 1`.
    pub fn with_seed(seed: T) -> Self {
        Self {
            seed,
            current: seed,
            pool: VecDeque::new(),
        }
    }

    /// The seed the counter restores to on `reset(true)`.
    pub fn seed(&self) -> T {
        self.seed
    }

    /// The last value produced by the counter (not by the pool).
    pub fn current(&self) -> T {
        self.current
    }

    /// Values waiting for reissue, head first.
    pub fn pooled(&self) -> impl Iterator<Item = &T> {
        self.pool.iter()
    }
}

impl<T: SequenceValue> Default for SequentialGenerator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SequenceValue> IdentifierGenerator for SequentialGenerator<T> {
    type Id = T;

    fn next_id(&mut self) -> Result<T, IdentifierError> {
        if let Some(reissued) = self.pool.pop_front() {
            tracing::trace!(value = %reissued, "reissuing pooled value");
            return Ok(reissued);
        }
        let next = self
            .current
            .successor()
            .ok_or_else(|| IdentifierError::SequenceExhausted(self.current.to_string()))?;
        self.current = next;
        Ok(next)
    }

    fn default_id(&self) -> T {
        T::ZERO
    }
}

impl<T: SequenceValue> ReusableGenerator for SequentialGenerator<T> {
    fn reuse(&mut self, id: T) {
        // Pools are expected to stay small; a scan keeps FIFO order without an index.
        if self.pool.contains(&id) {
            tracing::trace!(value = %id, "value already pooled");
            return;
        }
        self.pool.push_back(id);
    }

    fn reset(&mut self, restore_seed: bool) {
        self.pool.clear();
        if restore_seed {
            self.current = self.seed;
        }
    }
}
