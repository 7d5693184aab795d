//! Persistent map of Hash-Array Mapped Trie (HAMT) whose sub-trees can be
//! shared over threads.
//!
//! Every update returns a new map and leaves the original intact. Nodes on the
//! path from the root to an updated entry are copied while every other sub-tree
//! is shared by reference between the old and new maps.
//!
//! ```
//! use immutable_map::{Error, Map};
//!
//! let map = Map::new().set(1, 10).set(2, 20);
//! let other = map.erase(&1).unwrap();
//!
//! assert_eq!(map.at(&1), Ok(&10));
//! assert_eq!(other.at(&1), Err(Error::KeyNotFound));
//! assert_eq!(other.at(&2), Ok(&20));
//! ```

mod bitmap;
mod branch;
mod error;
mod hash;
mod leaf;
mod map;
mod node;
#[cfg(test)]
mod proptests;

pub use error::Error;
pub use hash::{DefaultHashBuilder, DefaultKeyEq, KeyEq};
pub use map::{Iter, Map};
