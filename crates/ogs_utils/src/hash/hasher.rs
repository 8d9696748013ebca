//! `FixedHasher` and `NoOpHasher`.
//!
//! `FixedHasher` wraps `foldhash` with a constant seed, so two processes hash
//! the same key to the same value. `NoOpHasher` passes a `u64` through and is
//! meant for keys that are already well distributed, such as `TypeId`.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x5A0C_31E7_9D2B_46F1);

/// Hasher whose output only depends on its input.
///
/// Created through [`FixedHashState::build_hasher`].
pub type FixedHasher = FoldHasher<'static>;

/// [`BuildHasher`] for [`FixedHasher`].
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use ogs_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("descriptor");
/// let b = FixedHashState.hash_one("descriptor");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// A hasher that stores the last `u64` it was given.
///
/// Other widths are folded in byte by byte, so a key hashed through a single
/// `write_u32(n)` ends up equal to `write_u64(n)`.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// [`BuildHasher`] for [`NoOpHasher`].
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use ogs_utils::hash::NoOpHashState;
///
/// assert_eq!(NoOpHashState.hash_one(42_u64), 42);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedHashState, NoOpHashState};
    use core::hash::{BuildHasher, Hasher};

    #[test]
    fn fixed_state_is_stable() {
        assert_eq!(
            FixedHashState.hash_one(("ogs", 7_u32)),
            FixedHashState.hash_one(("ogs", 7_u32)),
        );
        assert_ne!(FixedHashState.hash_one(1_u8), FixedHashState.hash_one(2_u8));
    }

    #[test]
    fn noop_folds_narrow_writes() {
        let mut narrow = NoOpHashState.build_hasher();
        narrow.write_u32(1234);

        let mut wide = NoOpHashState.build_hasher();
        wide.write_u64(1234);

        assert_eq!(narrow.finish(), wide.finish());
    }
}
