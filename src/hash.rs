use std::{
    borrow::Borrow,
    collections::hash_map::DefaultHasher,
    hash::{BuildHasher, BuildHasherDefault, Hash},
};

/// Hash builder used by maps unless another one is given.
///
/// It is deterministic, so two maps built from the same entries agree on
/// their hashes across runs.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// Key equivalence predicate of a map.
///
/// It must be consistent with the map's hasher: equivalent keys must hash to
/// the same value.
///
/// `Q` is the type keys are looked up by. It is the key type itself unless
/// the predicate accepts borrowed forms of stored keys.
pub trait KeyEq<K: ?Sized, Q: ?Sized = K> {
    /// Returns true if a lookup key denotes the same entry as a stored key.
    fn equivalent(&self, stored: &K, key: &Q) -> bool;
}

/// Key equivalence by [`Eq`] on any borrowed form of keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultKeyEq;

impl<K: Borrow<Q> + ?Sized, Q: Eq + ?Sized> KeyEq<K, Q> for DefaultKeyEq {
    fn equivalent(&self, stored: &K, key: &Q) -> bool {
        stored.borrow() == key
    }
}

impl<K: ?Sized, F: Fn(&K, &K) -> bool> KeyEq<K> for F {
    fn equivalent(&self, left: &K, right: &K) -> bool {
        self(left, right)
    }
}

pub(crate) fn hash_key<K: Hash + ?Sized>(hasher: &impl BuildHasher, key: &K) -> u64 {
    hasher.hash_one(key)
}
