//! Hash containers with run-independent iteration order.
//!
//! Codec names and injection fields are collected in these maps, so the
//! generated output must not depend on a per-process random seed.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// StableState

const SEED: FixedState = FixedState::with_seed(0x6A67_636F_6465_6373);

/// Builds `foldhash` hashers from one compile-time seed.
///
/// Two maps filled with the same keys in the same order iterate identically,
/// across runs and across processes.
///
/// ```
/// use core::hash::BuildHasher;
/// use jg_utils::hash::StableState;
///
/// assert_eq!(StableState.hash_one("tags"), StableState.hash_one("tags"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct StableState;

impl BuildHasher for StableState {
    type Hasher = FoldHasher<'static>;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        SEED.build_hasher()
    }
}

/// A [`hashbrown::HashMap`] hashed with [`StableState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, StableState>;

/// A [`hashbrown::HashSet`] hashed with [`StableState`].
pub type HashSet<T> = hashbrown::HashSet<T, StableState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{HashMap, HashSet};
    use alloc::string::String;
    use alloc::vec::Vec;

    #[test]
    fn iteration_is_reproducible() {
        let build = || {
            let mut map: HashMap<String, usize> = HashMap::default();
            for (index, name) in ["id", "uri", "tags", "value", "next"].iter().enumerate() {
                map.insert(String::from(*name), index);
            }
            map.into_iter().collect::<Vec<_>>()
        };

        assert_eq!(build(), build());
    }

    #[test]
    fn set_dedups() {
        let mut set: HashSet<&str> = HashSet::default();
        assert!(set.insert("object"));
        assert!(!set.insert("object"));
        assert_eq!(set.len(), 1);
    }
}
