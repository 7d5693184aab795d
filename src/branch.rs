use crate::{
    bitmap::Bitmap,
    error::Error,
    hash::KeyEq,
    leaf::Leaf,
    node::{fragment, Node, Removal, FRAGMENT_BITS},
};
use std::sync::Arc;

/// Branch node with children packed densely in the order of their hash
/// fragments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Branch<K, V> {
    bitmap: Bitmap,
    children: Vec<Arc<Node<K, V>>>,
}

impl<K, V> Branch<K, V> {
    pub fn new() -> Self {
        Self {
            bitmap: Bitmap::new(),
            children: vec![],
        }
    }

    pub fn singleton(fragment: u8, child: Arc<Node<K, V>>) -> Self {
        Self {
            bitmap: Bitmap::new().set(fragment),
            children: vec![child],
        }
    }

    #[cfg(test)]
    pub fn bitmap(&self) -> Bitmap {
        self.bitmap
    }

    pub fn children(&self) -> &[Arc<Node<K, V>>] {
        &self.children
    }

    pub fn child(&self, fragment: u8) -> Option<&Arc<Node<K, V>>> {
        if self.bitmap.get(fragment) {
            Some(&self.children[self.bitmap.index(fragment)])
        } else {
            None
        }
    }

    pub fn get<Q: ?Sized>(
        &self,
        hash: u64,
        shift: u32,
        key: &Q,
        key_eq: &impl KeyEq<K, Q>,
    ) -> Result<&V, Error> {
        self.child(fragment(hash, shift))
            .ok_or(Error::KeyNotFound)?
            .get(hash, shift + FRAGMENT_BITS, key, key_eq)
    }

    // A branch left with a single leaf is replaced by the leaf itself, so
    // that paths never outgrow what distinguishes the keys below them.
    fn normalize(self) -> Removal<K, V> {
        debug_assert_eq!(self.children.len(), self.bitmap.size());

        match self.children.as_slice() {
            [] => Removal::Removed,
            [child] if child.is_leaf() => Removal::Updated(child.clone()),
            _ => Removal::Updated(Node::Branch(self).into()),
        }
    }
}

impl<K: Clone, V: Clone> Branch<K, V> {
    pub fn insert(
        &self,
        hash: u64,
        shift: u32,
        key: K,
        value: V,
        key_eq: &impl KeyEq<K>,
    ) -> (Arc<Node<K, V>>, bool) {
        let fragment = fragment(hash, shift);
        let index = self.bitmap.index(fragment);
        let mut children = self.children.clone();

        if self.bitmap.get(fragment) {
            let (child, inserted) = Node::insert(
                &self.children[index],
                hash,
                shift + FRAGMENT_BITS,
                key,
                value,
                key_eq,
            );

            children[index] = child;

            (
                Node::Branch(Self {
                    bitmap: self.bitmap,
                    children,
                })
                .into(),
                inserted,
            )
        } else {
            children.insert(index, Node::Leaf(Leaf::new(hash, key, value)).into());

            (
                Node::Branch(Self {
                    bitmap: self.bitmap.set(fragment),
                    children,
                })
                .into(),
                true,
            )
        }
    }

    pub fn remove<Q: ?Sized>(
        &self,
        hash: u64,
        shift: u32,
        key: &Q,
        key_eq: &impl KeyEq<K, Q>,
    ) -> Result<Removal<K, V>, Error> {
        let fragment = fragment(hash, shift);
        let child = self.child(fragment).ok_or(Error::KeyNotFound)?;
        let index = self.bitmap.index(fragment);
        let mut children = self.children.clone();

        let bitmap = match child.remove(hash, shift + FRAGMENT_BITS, key, key_eq)? {
            Removal::Removed => {
                children.remove(index);
                self.bitmap.unset(fragment)
            }
            Removal::Updated(child) => {
                children[index] = child;
                self.bitmap
            }
        };

        Ok(Self { bitmap, children }.normalize())
    }
}
