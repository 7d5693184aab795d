use crate::{
    error::Error,
    hash::{hash_key, DefaultHashBuilder, DefaultKeyEq, KeyEq},
    leaf::Leaf,
    node::{Node, Removal},
};
use log::debug;
use std::{
    fmt::{self, Debug, Formatter},
    hash::{BuildHasher, Hash},
    ops::Index,
    sync::Arc,
};

/// Map data structure of HAMT.
///
/// Note that every method does not modify the original map but creates a new
/// one if necessary. Sub-trees untouched by an update are shared between the
/// old and new maps, so clones and updates are cheap.
pub struct Map<K, V, S = DefaultHashBuilder, E = DefaultKeyEq> {
    size: usize,
    root: Arc<Node<K, V>>,
    hasher: S,
    key_eq: E,
}

impl<K: Hash + Eq, V> Map<K, V> {
    /// Creates a new map.
    pub fn new() -> Self {
        Self::with_hasher_and_key_eq(DefaultHashBuilder::default(), DefaultKeyEq)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Map<K, V, S> {
    /// Creates a new map which hashes keys with a given hash builder.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_hasher_and_key_eq(hasher, DefaultKeyEq)
    }
}

impl<K, V, S, E> Map<K, V, S, E> {
    /// Creates a new map with a given hash builder and key equivalence.
    ///
    /// Keys equivalent under `key_eq` must have the same hash under `hasher`.
    pub fn with_hasher_and_key_eq(hasher: S, key_eq: E) -> Self {
        Self {
            size: 0,
            root: Node::empty().into(),
            hasher,
            key_eq,
        }
    }

    /// Returns a hash builder of a map.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns a key equivalence of a map.
    pub fn key_eq(&self) -> &E {
        &self.key_eq
    }

    /// Returns a size of a map.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if a map is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Node<K, V> {
        &self.root
    }

    /// Returns key-value pairs in a map in no particular order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: vec![self.root.as_ref()],
            leaf: None,
            remaining: self.size,
        }
    }
}

impl<K, V, S: BuildHasher, E> Map<K, V, S, E> {
    /// Finds a value corresponding to a key.
    ///
    /// With [`DefaultKeyEq`], the key may be any borrowed form of the map's
    /// key type, as with [`std::collections::HashMap`].
    pub fn at<Q: Hash + ?Sized>(&self, key: &Q) -> Result<&V, Error>
    where
        E: KeyEq<K, Q>,
    {
        self.root.get(hash_key(&self.hasher, key), 0, key, &self.key_eq)
    }

    /// Finds a value corresponding to a key if any.
    pub fn get<Q: Hash + ?Sized>(&self, key: &Q) -> Option<&V>
    where
        E: KeyEq<K, Q>,
    {
        self.at(key).ok()
    }

    /// Checks if a key is contained in a map.
    pub fn contains_key<Q: Hash + ?Sized>(&self, key: &Q) -> bool
    where
        E: KeyEq<K, Q>,
    {
        self.get(key).is_some()
    }
}

impl<K: Clone + Hash, V: Clone, S: BuildHasher + Clone, E: KeyEq<K> + Clone> Map<K, V, S, E> {
    fn with_root(&self, root: Arc<Node<K, V>>, size: usize) -> Self {
        Self {
            size,
            root,
            hasher: self.hasher.clone(),
            key_eq: self.key_eq.clone(),
        }
    }

    /// Sets a key-value pair into a map, replacing the value of an equivalent
    /// key if present.
    ///
    /// The given key replaces the stored one as well, which matters only when
    /// the map's [`KeyEq`] holds distinguishable keys equivalent.
    #[must_use]
    pub fn set(&self, key: K, value: V) -> Self {
        let hash = hash_key(&self.hasher, &key);
        let (root, inserted) = Node::insert(&self.root, hash, 0, key, value, &self.key_eq);

        self.with_root(root, self.size + inserted as usize)
    }

    /// Removes a key from a map.
    ///
    /// It fails with [`Error::KeyNotFound`] if the key is absent.
    pub fn erase<Q: Hash + ?Sized>(&self, key: &Q) -> Result<Self, Error>
    where
        E: KeyEq<K, Q>,
    {
        let hash = hash_key(&self.hasher, key);

        Ok(match self.root.remove(hash, 0, key, &self.key_eq)? {
            Removal::Removed => {
                debug!("map emptied by erasing its last entry");
                self.with_root(Node::empty().into(), 0)
            }
            Removal::Updated(root) => self.with_root(root, self.size - 1),
        })
    }

    /// Removes a key from a map if any.
    #[must_use]
    pub fn remove<Q: Hash + ?Sized>(&self, key: &Q) -> Self
    where
        E: KeyEq<K, Q>,
    {
        self.erase(key).unwrap_or_else(|_| self.clone())
    }

    /// Extends a map with an iterator of key-value pairs.
    #[must_use]
    pub fn extend(&self, iterator: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut map = self.clone();

        for (key, value) in iterator {
            map = map.set(key, value);
        }

        map
    }
}

impl<K, V, S: Clone, E: Clone> Clone for Map<K, V, S, E> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            root: self.root.clone(),
            hasher: self.hasher.clone(),
            key_eq: self.key_eq.clone(),
        }
    }
}

impl<K: Hash + Eq, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug, V: Debug, S, E> Debug for Map<K, V, S, E> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash, V: PartialEq, S: BuildHasher, E: KeyEq<K>> PartialEq for Map<K, V, S, E> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash, V: Eq, S: BuildHasher, E: KeyEq<K>> Eq for Map<K, V, S, E> {}

impl<K, Q: Hash + ?Sized, V, S: BuildHasher, E: KeyEq<K, Q>> Index<&Q> for Map<K, V, S, E> {
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found in map")
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        Self::new().extend(iterator)
    }
}

/// Iterator over key-value pairs of a map.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    nodes: Vec<&'a Node<K, V>>,
    leaf: Option<(&'a Leaf<K, V>, usize)>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((leaf, index)) = self.leaf {
                if let Some(entry) = leaf.entry(index) {
                    self.leaf = Some((leaf, index + 1));
                    self.remaining -= 1;

                    return Some(entry);
                }

                self.leaf = None;
            }

            match self.nodes.pop()? {
                Node::Leaf(leaf) => self.leaf = Some((leaf, 0)),
                Node::Branch(branch) => self
                    .nodes
                    .extend(branch.children().iter().rev().map(|child| &**child)),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, S, E> IntoIterator for &'a Map<K, V, S, E> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
