//! The bare AVL tree.
//!
//! A `Tree` carries no comparator: every operation that depends on the key ordering takes one
//! explicitly. Callers are responsible for always passing the same comparator to operations on
//! a given tree; [`Map`](crate::Map) bundles a tree with its comparator to enforce this.

use compare::Compare;
use std::ops::Bound;
use tracing::{debug, trace};
use crate::error::{Error, Result};
use std::fmt::{self, Debug};
use crate::map::{IntoIter, Iter, Range};
use crate::node::{self, Link, SymmetricDiff};

/// An entry of a merge, telling which of the two merged maps contain the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MergeElement<L, R> {
    /// The key is only in the left map.
    Left(L),
    /// The key is only in the right map.
    Right(R),
    /// The key is in both maps.
    Both(L, R),
}

/// An entry of a symmetric difference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiffElement<V> {
    /// The key is only in the left map.
    Left(V),
    /// The key is only in the right map.
    Right(V),
    /// The key is in both maps, with values that are not equal.
    Unequal(V, V),
}

/// The relation a key found by [`Map::closest`](crate::Map::closest) must have to the given key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Closest {
    GreaterOrEqual,
    GreaterThan,
    LessOrEqual,
    LessThan,
}

/// The direction of an ordered traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    Ascending,
    Descending,
}

/// A persistent AVL tree whose operations take the comparator explicitly.
pub struct Tree<K, V> {
    root: Link<K, V>,
}

impl<K, V> Clone for Tree<K, V> {
    fn clone(&self) -> Self { Tree { root: self.root.clone() } }
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self { Tree::new() }
}

impl<K, V> Debug for Tree<K, V> where K: Debug, V: Debug {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.debug_map().entries(self.iter()).finish() }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

/// Consumes the tree, cloning the entries that are shared with other trees.
impl<K, V> IntoIterator for Tree<K, V> where K: Clone, V: Clone {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> { IntoIter(node::Iter::new(self.root)) }
}

impl<K, V> Tree<K, V> {
    /// Creates an empty tree.
    pub fn new() -> Self { Tree { root: None } }

    /// Creates a tree containing a single entry.
    pub fn singleton(key: K, value: V) -> Self { Tree { root: node::singleton(key, value) } }

    /// Returns the number of entries in the tree, in constant time.
    pub fn len(&self) -> usize { node::size(&self.root) }

    /// Checks if the tree is empty.
    pub fn is_empty(&self) -> bool { self.root.is_none() }

    /// Returns the height of the tree. An empty tree has height zero.
    pub fn height(&self) -> usize { node::height(&self.root) }

    /// Checks if the two trees share the same root node.
    ///
    /// This is an identity check, not a comparison of contents.
    pub fn ptr_eq(&self, other: &Self) -> bool { node::ptr_eq(&self.root, &other.root) }

    /// Returns the entry with the least key.
    pub fn first(&self) -> Option<(&K, &V)> { node::min(&self.root).map(|n| (&n.key, &n.value)) }

    /// Returns the entry with the greatest key.
    pub fn last(&self) -> Option<(&K, &V)> { node::max(&self.root).map(|n| (&n.key, &n.value)) }

    /// Returns the entry of the given zero-based rank in ascending order.
    pub fn nth(&self, rank: usize) -> Option<(&K, &V)> {
        node::nth(&self.root, rank).map(|n| (&n.key, &n.value))
    }

    /// Returns an iterator over the tree's entries in ascending order.
    pub fn iter(&self) -> Iter<K, V> { Iter(node::Iter::new(self.root.as_deref())) }

    /// Rebuilds the search tree ordering, the balance and the cached sizes from scratch and
    /// checks them against the tree.
    pub fn invariants<C>(&self, cmp: &C) -> bool where C: Compare<K> {
        node::invariants(&self.root, cmp)
    }

    pub fn get<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        node::get(&self.root, cmp, key).map(|n| &n.value)
    }

    pub fn get_key_value<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        node::get(&self.root, cmp, key).map(|n| (&n.key, &n.value))
    }

    pub fn contains_key<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> bool where C: Compare<Q, K> {
        node::get(&self.root, cmp, key).is_some()
    }

    pub fn closest<C, Q: ?Sized>(&self, cmp: &C, closest: Closest, key: &Q) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        let node = match closest {
            Closest::GreaterOrEqual => node::succ(&self.root, cmp, key, true),
            Closest::GreaterThan => node::succ(&self.root, cmp, key, false),
            Closest::LessOrEqual => node::pred(&self.root, cmp, key, true),
            Closest::LessThan => node::pred(&self.root, cmp, key, false),
        };

        node.map(|n| (&n.key, &n.value))
    }

    /// Returns the entry with the greatest key less than (or, if `inclusive`, equal to) `key`.
    pub fn pred<C, Q: ?Sized>(&self, cmp: &C, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        node::pred(&self.root, cmp, key, inclusive).map(|n| (&n.key, &n.value))
    }

    /// Returns the entry with the least key greater than (or, if `inclusive`, equal to) `key`.
    pub fn succ<C, Q: ?Sized>(&self, cmp: &C, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        node::succ(&self.root, cmp, key, inclusive).map(|n| (&n.key, &n.value))
    }

    pub fn rank<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> Option<usize> where C: Compare<Q, K> {
        node::rank(&self.root, cmp, key)
    }

    pub fn range<C, Min: ?Sized, Max: ?Sized>(&self, cmp: &C, min: Bound<&Min>, max: Bound<&Max>)
        -> Range<K, V> where C: Compare<Min, K> + Compare<Max, K> {

        Range(node::Iter::range(self.root.as_deref(), cmp, min, max))
    }

    /// Returns a lazy iterator over the entries whose keys differ between the two trees.
    pub fn symmetric_diff<'a, C, F>(&'a self, other: &'a Self, cmp: &'a C, equal: F)
        -> SymmetricDiff<'a, K, V, C, F> where C: Compare<K>, F: FnMut(&V, &V) -> bool {

        SymmetricDiff::new(&self.root, &other.root, cmp, equal)
    }

    /// Builds a tree in linear time from entries in strictly ascending key order.
    ///
    /// The order is not checked. Entries that are out of order or repeated produce a tree that
    /// fails [`invariants`](#method.invariants) and on which lookups give unspecified (but
    /// memory-safe) results.
    pub fn from_sorted_unchecked<I>(entries: I) -> Self where I: IntoIterator<Item = (K, V)> {
        let entries: Vec<_> = entries.into_iter().collect();
        let len = entries.len();
        Tree { root: node::from_sorted(&mut entries.into_iter(), len) }
    }

    /// Maps every value, keeping the keys and the shape of the tree.
    pub fn map<W, F>(&self, mut f: F) -> Tree<K, W> where K: Clone, F: FnMut(&K, &V) -> W {
        Tree { root: node::map(&self.root, &mut f) }
    }

    pub fn filter_map<W, F>(&self, mut f: F) -> Tree<K, W>
        where K: Clone, W: Clone, F: FnMut(&K, &V) -> Option<W> {

        Tree { root: node::filter_map(&self.root, &mut f) }
    }
}

impl<K, V> Tree<K, V> where K: Clone, V: Clone {
    /// Joins two trees around a middle entry.
    ///
    /// Every key of `left` must be less than `key`, which must be less than every key of
    /// `right`. This is not checked; violating it produces a tree that fails
    /// [`invariants`](#method.invariants).
    pub fn join(left: Self, key: K, value: V, right: Self) -> Self {
        Tree { root: node::join(left.root, key, value, right.root) }
    }

    /// Concatenates two trees whose key ranges do not overlap. The ranges are not checked.
    pub fn concat(left: Self, right: Self) -> Self {
        Tree { root: node::join2(left.root, right.root) }
    }

    /// Splits the tree into the entries less than `key`, the entry equal to `key` and the
    /// entries greater than `key`.
    pub fn split<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> (Self, Option<(K, V)>, Self)
        where C: Compare<Q, K> {

        let (lt, found, gt) = node::split(&self.root, cmp, key);
        (Tree { root: lt }, found, Tree { root: gt })
    }

    pub fn insert<C>(&self, cmp: &C, key: K, value: V) -> Self where C: Compare<K> {
        Tree { root: node::change(&self.root, cmp, key, |_| Some(value)) }
    }

    pub fn remove<C, Q: ?Sized>(&self, cmp: &C, key: &Q) -> Self where C: Compare<Q, K> {
        match node::remove(&self.root, cmp, key) {
            Some(root) => Tree { root },
            None => self.clone(),
        }
    }

    pub fn change<C, F>(&self, cmp: &C, key: K, f: F) -> Self
        where C: Compare<K>, F: FnOnce(Option<&V>) -> Option<V> {

        Tree { root: node::change(&self.root, cmp, key, f) }
    }

    pub fn partition<F>(&self, mut f: F) -> (Self, Self) where F: FnMut(&K, &V) -> bool {
        let (yes, no) = node::partition(&self.root, &mut f);
        (Tree { root: yes }, Tree { root: no })
    }

    pub fn merge<V2, V3, C, F>(&self, other: &Tree<K, V2>, cmp: &C, mut f: F) -> Tree<K, V3>
        where V2: Clone, V3: Clone, C: Compare<K>,
              F: FnMut(&K, MergeElement<&V, &V2>) -> Option<V3> {

        trace!(left = self.len(), right = other.len(), "merging trees");
        Tree { root: node::merge(&self.root, &other.root, cmp, &mut f) }
    }

    /// Builds a tree from unordered entries, failing on the first duplicate key.
    pub fn try_from_pairs<C, I>(cmp: &C, pairs: I) -> Result<Self, K>
        where C: Compare<K>, I: IntoIterator<Item = (K, V)> {

        let mut tree = Tree::new();

        for (key, value) in pairs {
            if tree.contains_key(cmp, &key) {
                debug!(len = tree.len(), "rejecting pairs with a duplicate key");
                return Err(Error::DuplicateKey(key));
            }
            tree = tree.insert(cmp, key, value);
        }

        Ok(tree)
    }

    /// Builds a tree from unordered entries.
    ///
    /// # Panics
    ///
    /// Panics if two entries have equal keys.
    pub fn from_pairs<C, I>(cmp: &C, pairs: I) -> Self
        where C: Compare<K>, I: IntoIterator<Item = (K, V)> {

        match Tree::try_from_pairs(cmp, pairs) {
            Ok(tree) => tree,
            Err(_) => panic!("duplicate key"),
        }
    }

    /// Builds a tree from unordered entries, reporting every duplicate key.
    pub fn try_from_pairs_all<C, I>(cmp: &C, pairs: I) -> Result<Self, K>
        where C: Compare<K>, I: IntoIterator<Item = (K, V)> {

        let mut tree = Tree::new();
        let mut duplicates = vec![];

        for (key, value) in pairs {
            if tree.contains_key(cmp, &key) {
                duplicates.push(key);
            } else {
                tree = tree.insert(cmp, key, value);
            }
        }

        if duplicates.is_empty() {
            Ok(tree)
        } else {
            debug!(duplicates = duplicates.len(), "rejecting pairs with duplicate keys");
            Err(Error::DuplicateKeys(duplicates))
        }
    }

    /// Builds a tree in linear time from entries in strictly ascending or strictly descending
    /// key order.
    pub fn try_from_sorted<C, I>(cmp: &C, pairs: I) -> Result<Self, K>
        where C: Compare<K>, I: IntoIterator<Item = (K, V)> {

        use std::cmp::Ordering::*;

        let mut pairs: Vec<_> = pairs.into_iter().collect();
        let mut descending = None;

        for index in 1..pairs.len() {
            match (cmp.compare(&pairs[index - 1].0, &pairs[index].0), descending) {
                (Equal, _) => {
                    debug!(index, "rejecting sorted input with a duplicate key");
                    return Err(Error::DuplicateKey(pairs.swap_remove(index).0));
                }
                (Less, Some(true)) | (Greater, Some(false)) => {
                    debug!(index, "rejecting unsorted input");
                    return Err(Error::UnsortedInput { index });
                }
                (Less, _) => descending = Some(false),
                (Greater, _) => descending = Some(true),
            }
        }

        if descending == Some(true) { pairs.reverse(); }
        trace!(len = pairs.len(), "building tree from sorted input");
        Ok(Tree::from_sorted_unchecked(pairs))
    }

    /// Builds a tree from entries pushed by `f`, failing on the first duplicate key. Entries
    /// pushed after a duplicate are ignored.
    pub fn try_from_push<C, F>(cmp: &C, f: F) -> Result<Self, K>
        where C: Compare<K>, F: FnOnce(&mut dyn FnMut(K, V)) {

        let mut root = None;
        let mut duplicate = None;

        f(&mut |key, value| {
            if duplicate.is_some() { return; }

            if node::get(&root, cmp, &key).is_some() {
                duplicate = Some(key);
            } else {
                root = node::change(&root, cmp, key, |_| Some(value));
            }
        });

        match duplicate {
            Some(key) => {
                debug!(len = node::size(&root), "rejecting pushed entries with a duplicate key");
                Err(Error::DuplicateKey(key))
            }
            None => Ok(Tree { root }),
        }
    }
}
