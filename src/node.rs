use crate::{branch::Branch, error::Error, hash::KeyEq, leaf::Leaf};
use std::sync::Arc;

pub const HASH_BITS: u32 = u64::BITS;
pub const FRAGMENT_BITS: u32 = 5;
const FRAGMENT_MASK: u64 = 0b11111;

/// Returns the hash fragment selecting a child at a given shift.
pub fn fragment(hash: u64, shift: u32) -> u8 {
    debug_assert!(shift < HASH_BITS);

    ((hash >> shift) & FRAGMENT_MASK) as u8
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node<K, V> {
    Leaf(Leaf<K, V>),
    Branch(Branch<K, V>),
}

/// Outcome of removing a key from a sub-trie.
#[derive(Debug)]
pub enum Removal<K, V> {
    /// The sub-trie held nothing but the key and is gone entirely.
    Removed,
    Updated(Arc<Node<K, V>>),
}

impl<K, V> Node<K, V> {
    pub fn empty() -> Self {
        Self::Branch(Branch::new())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn get<Q: ?Sized>(
        &self,
        hash: u64,
        shift: u32,
        key: &Q,
        key_eq: &impl KeyEq<K, Q>,
    ) -> Result<&V, Error> {
        match self {
            Self::Leaf(leaf) => leaf.get(hash, key, key_eq),
            Self::Branch(branch) => branch.get(hash, shift, key, key_eq),
        }
    }

    #[cfg(test)]
    pub fn entry_count(&self) -> usize {
        match self {
            Self::Leaf(leaf) => leaf.len(),
            Self::Branch(branch) => branch
                .children()
                .iter()
                .map(|child| child.entry_count())
                .sum(),
        }
    }

    /// Checks that no branch below the root is a singleton of a leaf and that
    /// every leaf sits on its own hash path.
    #[cfg(test)]
    pub fn is_normal(&self) -> bool {
        self.is_normal_at(0, 0)
    }

    #[cfg(test)]
    fn is_normal_at(&self, prefix: u64, shift: u32) -> bool {
        match self {
            Self::Leaf(leaf) => {
                let mask = if shift >= HASH_BITS {
                    u64::MAX
                } else {
                    (1 << shift) - 1
                };

                leaf.hash() & mask == prefix
            }
            Self::Branch(branch) => {
                shift < HASH_BITS
                    && branch.children().len() == branch.bitmap().size()
                    && (0..32).filter(|&i| branch.bitmap().get(i)).all(|i| {
                        let child = branch.child(i).expect("child for set bit");

                        (shift == 0 || !(branch.children().len() == 1 && child.is_leaf()))
                            && child.is_normal_at(
                                prefix | ((i as u64) << shift),
                                shift + FRAGMENT_BITS,
                            )
                    })
            }
        }
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Inserts a pair below a node, returning the rebuilt node and whether the
    /// key was new.
    pub fn insert(
        this: &Arc<Self>,
        hash: u64,
        shift: u32,
        key: K,
        value: V,
        key_eq: &impl KeyEq<K>,
    ) -> (Arc<Self>, bool) {
        match this.as_ref() {
            Self::Leaf(leaf) => leaf.insert(this, hash, shift, key, value, key_eq),
            Self::Branch(branch) => branch.insert(hash, shift, key, value, key_eq),
        }
    }

    pub fn remove<Q: ?Sized>(
        &self,
        hash: u64,
        shift: u32,
        key: &Q,
        key_eq: &impl KeyEq<K, Q>,
    ) -> Result<Removal<K, V>, Error> {
        match self {
            Self::Leaf(leaf) => leaf.remove(hash, key, key_eq),
            Self::Branch(branch) => branch.remove(hash, shift, key, key_eq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::DefaultKeyEq;

    #[test]
    fn fragment_at_shift() {
        assert_eq!(fragment(0b11_00101, 0), 0b00101);
        assert_eq!(fragment(0b11_00101, 5), 0b11);
        assert_eq!(fragment(u64::MAX, 55), 0b11111);
        assert_eq!(fragment(u64::MAX, 60), 0b1111);
    }

    #[test]
    fn empty() {
        let node = Node::<u64, u64>::empty();

        assert!(!node.is_leaf());
        assert_eq!(node.entry_count(), 0);
        assert_eq!(node.get(0, 0, &0, &DefaultKeyEq), Err(Error::KeyNotFound));
        assert!(matches!(
            node.remove(0, 0, &0, &DefaultKeyEq),
            Err(Error::KeyNotFound)
        ));
    }

    #[test]
    fn insert_into_leaf_root() {
        let leaf = Arc::new(Node::Leaf(Leaf::new(1, 1u64, 10)));
        let (node, inserted) = Node::insert(&leaf, 2, 0, 2, 20, &DefaultKeyEq);

        assert!(inserted);
        assert!(!node.is_leaf());
        assert_eq!(node.get(1, 0, &1, &DefaultKeyEq), Ok(&10));
        assert_eq!(node.get(2, 0, &2, &DefaultKeyEq), Ok(&20));
        assert!(node.is_normal());
    }
}
