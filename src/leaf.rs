use crate::{
    branch::Branch,
    error::Error,
    hash::KeyEq,
    node::{fragment, Node, Removal, HASH_BITS},
};
use log::trace;
use std::sync::Arc;

/// Leaf node holding a key-value pair.
///
/// Keys whose full hashes are identical can never be told apart by any
/// fragment, so they share one leaf through its overflow list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Leaf<K, V> {
    hash: u64,
    key: K,
    value: V,
    overflow: Vec<(K, V)>,
}

impl<K, V> Leaf<K, V> {
    pub fn new(hash: u64, key: K, value: V) -> Self {
        Self {
            hash,
            key,
            value,
            overflow: vec![],
        }
    }

    #[cfg(test)]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        1 + self.overflow.len()
    }

    pub fn entry(&self, index: usize) -> Option<(&K, &V)> {
        if index == 0 {
            Some((&self.key, &self.value))
        } else {
            self.overflow
                .get(index - 1)
                .map(|(key, value)| (key, value))
        }
    }

    pub fn get<Q: ?Sized>(
        &self,
        hash: u64,
        key: &Q,
        key_eq: &impl KeyEq<K, Q>,
    ) -> Result<&V, Error> {
        if hash != self.hash {
            Err(Error::KeyNotFound)
        } else if key_eq.equivalent(&self.key, key) {
            Ok(&self.value)
        } else {
            self.overflow
                .iter()
                .find(|(other, _)| key_eq.equivalent(other, key))
                .map(|(_, value)| value)
                .ok_or(Error::KeyNotFound)
        }
    }

    fn overflow_index<Q: ?Sized>(&self, key: &Q, key_eq: &impl KeyEq<K, Q>) -> Option<usize> {
        self.overflow
            .iter()
            .position(|(other, _)| key_eq.equivalent(other, key))
    }
}

impl<K: Clone, V: Clone> Leaf<K, V> {
    fn with_overflow(&self, overflow: Vec<(K, V)>) -> Self {
        Self {
            hash: self.hash,
            key: self.key.clone(),
            value: self.value.clone(),
            overflow,
        }
    }

    pub fn insert(
        &self,
        this: &Arc<Node<K, V>>,
        hash: u64,
        shift: u32,
        key: K,
        value: V,
        key_eq: &impl KeyEq<K>,
    ) -> (Arc<Node<K, V>>, bool) {
        if key_eq.equivalent(&self.key, &key) {
            let leaf = Self {
                hash,
                key,
                value,
                overflow: self.overflow.clone(),
            };

            return (Node::Leaf(leaf).into(), false);
        }

        if hash == self.hash {
            let mut overflow = self.overflow.clone();
            let inserted = match self.overflow_index(&key, key_eq) {
                Some(index) => {
                    overflow[index] = (key, value);
                    false
                }
                None => {
                    overflow.push((key, value));
                    trace!(
                        "full hash collision on {:#018x} at shift {}: {} entries in leaf",
                        hash,
                        shift,
                        overflow.len() + 1
                    );
                    true
                }
            };

            return (Node::Leaf(self.with_overflow(overflow)).into(), inserted);
        }

        // Hashes differ somewhere at or above the shift because every fragment
        // below it led here.
        debug_assert!(shift < HASH_BITS);

        Branch::singleton(fragment(self.hash, shift), this.clone())
            .insert(hash, shift, key, value, key_eq)
    }

    pub fn remove<Q: ?Sized>(
        &self,
        hash: u64,
        key: &Q,
        key_eq: &impl KeyEq<K, Q>,
    ) -> Result<Removal<K, V>, Error> {
        if hash != self.hash {
            return Err(Error::KeyNotFound);
        }

        if key_eq.equivalent(&self.key, key) {
            let mut overflow = self.overflow.iter().cloned();

            return Ok(match overflow.next() {
                None => Removal::Removed,
                Some((key, value)) => Removal::Updated(
                    Node::Leaf(Self {
                        hash: self.hash,
                        key,
                        value,
                        overflow: overflow.collect(),
                    })
                    .into(),
                ),
            });
        }

        let index = self.overflow_index(key, key_eq).ok_or(Error::KeyNotFound)?;
        let mut overflow = self.overflow.clone();

        overflow.remove(index);

        Ok(Removal::Updated(Node::Leaf(self.with_overflow(overflow)).into()))
    }
}
