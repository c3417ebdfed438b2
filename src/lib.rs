//! Persistent ordered maps based on AVL trees.
//!
//! A [`Map`] is immutable. Every transformation returns a new map that shares all untouched
//! subtrees with the old one, so old versions stay valid and cheap to keep around, and two
//! versions of a map can be diffed in time proportional to the edits between them.
//!
//! Maps are available at three levels:
//!
//! - [`Tree`] is the bare balanced tree; every ordering-dependent operation takes a comparator.
//! - [`Map`] bundles a tree with its comparator. The comparator type is part of the map type,
//!   so maps with different orderings cannot be merged or diffed against each other.
//! - [`ordered_map!`] emits a module with a dedicated comparator type and `Map`/`Tree`
//!   aliases for one key type and ordering.
//!
//! # Examples
//!
//! ```
//! use pavl::{DiffElement, Map};
//!
//! let v1: Map<_, _> = vec![(1, "a"), (3, "c"), (2, "b")].into_iter().collect();
//! let v2 = v1.remove(&2);
//!
//! assert_eq!(v1.nth(1), Some((&2, &"b")));
//! assert_eq!(v2.len(), 2);
//! assert_eq!(v1.symmetric_diff(&v2, |a, b| a == b).collect::<Vec<_>>(),
//!            [(&2, DiffElement::Left(&"b"))]);
//! ```

pub use compare;

mod error;
mod node;

pub mod map;
pub mod ordering;
pub mod tree;

#[cfg(feature = "ordered_iter")]
mod ordered_iter;

#[cfg(feature = "quickcheck")]
mod quickcheck;

#[cfg(feature = "serde")]
mod serde;

pub use crate::error::{Error, Result};
pub use crate::map::Map;
pub use crate::tree::{Closest, DiffElement, MergeElement, Order, Tree};
