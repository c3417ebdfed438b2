//! A persistent ordered map based on an AVL tree.

use compare::{Compare, Natural};
use std::cmp::Ordering::{self, *};
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::ops::{self, Bound};
use std::sync::Arc;
use tracing::trace;
use crate::error::{Error, Result};
use crate::node::{self, Node};
use crate::tree::{Closest, MergeElement, Order, Tree};

pub use crate::node::SymmetricDiff;

/// A persistent ordered map based on an AVL tree.
///
/// Maps are immutable: every transformation returns a new map and leaves the receiver
/// untouched. The new map shares every subtree the transformation did not need to rebuild with
/// the old one, so a single-key edit allocates `O(log n)` nodes and cloning a map is `O(1)`.
///
/// The comparator type `C` identifies the ordering. Operations that combine two maps
/// (`merge`, `symmetric_diff`, `append`) require both maps to have the same comparator type, so
/// maps built with different orderings cannot be combined by mistake.
///
/// The behavior of this map is unspecified if a key's ordering relative to any other key changes
/// while the key is in the map. This is normally only possible through `Cell`, `RefCell`, or
/// unsafe code.
pub struct Map<K, V, C = Natural<K>> where C: Compare<K> {
    tree: Tree<K, V>,
    cmp: C,
}

impl<K, V> Map<K, V> where K: Ord {
    /// Creates an empty map ordered according to the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new().insert(2, "b").insert(1, "a").insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { Map::with_cmp(compare::natural()) }
}

impl<K, V, C> Map<K, V, C> where C: Compare<K> {
    /// Creates an empty map ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::compare::{Compare, natural};
    ///
    /// let map = pavl::Map::with_cmp(natural().rev()).insert(2, "b").insert(1, "a").insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self { Map { tree: Tree::new(), cmp } }

    /// Wraps a tree that was built with the given comparator.
    ///
    /// Passing a tree built with a different ordering is a logic error: the resulting map
    /// fails [`invariants`](#method.invariants) and lookups give unspecified results.
    pub fn from_tree(cmp: C, tree: Tree<K, V>) -> Self { Map { tree, cmp } }

    /// Checks if the map is empty.
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }

    /// Returns the number of entries in the map, in constant time.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new().insert(2, "b").insert(1, "a");
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.remove(&1).len(), 1);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the map's comparator.
    pub fn cmp(&self) -> &C { &self.cmp }

    /// Returns a reference to the map's tree.
    pub fn tree(&self) -> &Tree<K, V> { &self.tree }

    /// Returns the map's comparator and tree.
    pub fn into_parts(self) -> (C, Tree<K, V>) { (self.cmp, self.tree) }

    /// Checks if the map contains the given key.
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        self.tree.contains_key(&self.cmp, key)
    }

    /// Returns a reference to the value associated with the given key, or `None` if the
    /// map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new();
    /// assert_eq!(map.get(&1), None);
    /// let map = map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        self.tree.get(&self.cmp, key)
    }

    /// Returns the entry whose key is equal to the given key.
    pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Option<(&K, &V)> where C: Compare<Q, K> {
        self.tree.get_key_value(&self.cmp, key)
    }

    /// Returns a reference to the value associated with the given key, or
    /// `Error::KeyNotFound` if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::Error;
    ///
    /// let map = pavl::Map::new().insert(1, "a");
    /// assert_eq!(map.try_get(&1), Ok(&"a"));
    /// assert_eq!(map.try_get(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn try_get<Q: ?Sized>(&self, key: &Q) -> Result<&V, K> where C: Compare<Q, K> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the entry with the least key.
    pub fn first(&self) -> Option<(&K, &V)> { self.tree.first() }

    /// Returns the entry with the greatest key.
    pub fn last(&self) -> Option<(&K, &V)> { self.tree.last() }

    /// Returns the entry of the given zero-based rank in ascending order, or `None` if the rank
    /// is out of bounds. Takes `O(log n)` time.
    ///
    /// # Examples
    ///
    /// ```
    /// let map: pavl::Map<_, _> = vec![(1, "a"), (3, "c"), (2, "b")].into_iter().collect();
    ///
    /// assert_eq!(map.nth(0), Some((&1, &"a")));
    /// assert_eq!(map.nth(1), Some((&2, &"b")));
    /// assert_eq!(map.nth(3), None);
    /// ```
    pub fn nth(&self, rank: usize) -> Option<(&K, &V)> { self.tree.nth(rank) }

    /// Returns the number of keys less than the given key, or `None` if the map does not
    /// contain the key. Takes `O(log n)` time.
    ///
    /// # Examples
    ///
    /// ```
    /// let map: pavl::Map<_, _> = vec![(1, "a"), (3, "c"), (2, "b")].into_iter().collect();
    ///
    /// assert_eq!(map.rank(&1), Some(0));
    /// assert_eq!(map.rank(&3), Some(2));
    /// assert_eq!(map.rank(&4), None);
    /// ```
    pub fn rank<Q: ?Sized>(&self, key: &Q) -> Option<usize> where C: Compare<Q, K> {
        self.tree.rank(&self.cmp, key)
    }

    /// Returns the entry whose key is closest to the given key in the given direction.
    ///
    /// The given key need not itself be present in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::Closest::*;
    ///
    /// let map: pavl::Map<_, _> = vec![(1, "a"), (3, "c")].into_iter().collect();
    ///
    /// assert_eq!(map.closest(LessThan, &3), Some((&1, &"a")));
    /// assert_eq!(map.closest(LessOrEqual, &3), Some((&3, &"c")));
    /// assert_eq!(map.closest(GreaterThan, &1), Some((&3, &"c")));
    /// assert_eq!(map.closest(GreaterOrEqual, &2), Some((&3, &"c")));
    /// assert_eq!(map.closest(GreaterThan, &3), None);
    /// ```
    pub fn closest<Q: ?Sized>(&self, closest: Closest, key: &Q) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.tree.closest(&self.cmp, closest, key)
    }

    /// Returns the predecessor of the given key.
    ///
    /// If `inclusive` is `false`, this method finds the greatest key that is strictly less than
    /// the given key. If `inclusive` is `true`, this method finds the greatest key that is less
    /// than or equal to the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new().insert(2, "b").insert(1, "a").insert(3, "c");
    ///
    /// assert_eq!(map.pred(&1, false), None);
    /// assert_eq!(map.pred(&2, false), Some((&1, &"a")));
    /// assert_eq!(map.pred(&4, false), Some((&3, &"c")));
    ///
    /// assert_eq!(map.pred(&0, true), None);
    /// assert_eq!(map.pred(&2, true), Some((&2, &"b")));
    /// ```
    pub fn pred<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.closest(if inclusive { Closest::LessOrEqual } else { Closest::LessThan }, key)
    }

    /// Returns the successor of the given key.
    ///
    /// If `inclusive` is `false`, this method finds the least key that is strictly greater than
    /// the given key. If `inclusive` is `true`, this method finds the least key that is greater
    /// than or equal to the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new().insert(2, "b").insert(1, "a").insert(3, "c");
    ///
    /// assert_eq!(map.succ(&0, false), Some((&1, &"a")));
    /// assert_eq!(map.succ(&2, false), Some((&3, &"c")));
    /// assert_eq!(map.succ(&3, false), None);
    ///
    /// assert_eq!(map.succ(&2, true), Some((&2, &"b")));
    /// assert_eq!(map.succ(&4, true), None);
    /// ```
    pub fn succ<Q: ?Sized>(&self, key: &Q, inclusive: bool) -> Option<(&K, &V)>
        where C: Compare<Q, K> {

        self.closest(if inclusive { Closest::GreaterOrEqual } else { Closest::GreaterThan }, key)
    }

    /// Returns an iterator over the map's entries.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new().insert(2, "b").insert(1, "a").insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next_back(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<K, V> { self.tree.iter() }

    /// Returns an iterator over the map's keys in ascending order.
    pub fn keys(&self) -> Keys<K, V> { Keys(self.iter()) }

    /// Returns an iterator over the map's values in ascending order of their keys.
    pub fn values(&self) -> Values<K, V> { Values(self.iter()) }

    /// Returns an iterator over the map's entries whose keys lie in the given range.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    /// Creating it takes `O(log n)` time; each step takes amortized constant time.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::Bound::{Included, Excluded, Unbounded};
    ///
    /// let map = pavl::Map::new().insert("b", 2).insert("a", 1).insert("c", 3);
    ///
    /// assert_eq!(map.range::<&str, &str>(Unbounded, Unbounded).collect::<Vec<_>>(),
    ///     [(&"a", &1), (&"b", &2), (&"c", &3)]);
    /// assert_eq!(map.range(Excluded(&"a"), Included(&"f")).collect::<Vec<_>>(),
    ///     [(&"b", &2), (&"c", &3)]);
    /// assert_eq!(map.range(Included(&"a"), Excluded(&"b")).collect::<Vec<_>>(),
    ///     [(&"a", &1)]);
    /// ```
    pub fn range<Min: ?Sized, Max: ?Sized>(&self, min: Bound<&Min>, max: Bound<&Max>)
        -> Range<K, V> where C: Compare<Min, K> + Compare<Max, K> {

        self.tree.range(&self.cmp, min, max)
    }

    /// Returns a lazy ordered sequence of the entries whose keys lie between the given bounds.
    ///
    /// Every call returns an independent cursor.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::Order;
    /// use std::ops::Bound::{Included, Unbounded};
    ///
    /// let map = pavl::Map::new().insert(2, "b").insert(1, "a").insert(3, "c");
    ///
    /// let down = map.to_sequence::<i32, i32>(Order::Descending, Unbounded, Included(&2));
    /// assert_eq!(down.collect::<Vec<_>>(), [(&2, &"b"), (&1, &"a")]);
    /// ```
    pub fn to_sequence<Min: ?Sized, Max: ?Sized>(&self, order: Order, min: Bound<&Min>,
                                                 max: Bound<&Max>) -> Sequence<K, V>
        where C: Compare<Min, K> + Compare<Max, K> {

        Sequence { range: self.range(min, max), order }
    }

    /// Returns a lazy iterator over the keys whose entries differ between the two maps, in
    /// ascending order.
    ///
    /// Subtrees the two maps share (because one was derived from the other) are skipped
    /// without being visited, so comparing a map with an edited copy of itself costs time
    /// proportional to the number of edits. Subtrees that are equal but not shared are compared
    /// entry by entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::DiffElement;
    ///
    /// let old = pavl::Map::new().insert(1, "a").insert(2, "b").insert(3, "c");
    /// let new = old.remove(&2).insert(3, "C").insert(4, "d");
    ///
    /// assert_eq!(old.symmetric_diff(&new, |a, b| a == b).collect::<Vec<_>>(), [
    ///     (&2, DiffElement::Left(&"b")),
    ///     (&3, DiffElement::Unequal(&"c", &"C")),
    ///     (&4, DiffElement::Right(&"d")),
    /// ]);
    /// ```
    pub fn symmetric_diff<'a, F>(&'a self, other: &'a Self, equal: F)
        -> SymmetricDiff<'a, K, V, C, F> where F: FnMut(&V, &V) -> bool {

        self.tree.symmetric_diff(&other.tree, &self.cmp, equal)
    }

    /// Counts the entries that satisfy the predicate.
    pub fn count<F>(&self, mut f: F) -> usize where F: FnMut(&K, &V) -> bool {
        self.iter().filter(|&(k, v)| f(k, v)).count()
    }

    /// Checks if any entry satisfies the predicate.
    pub fn exists<F>(&self, mut f: F) -> bool where F: FnMut(&K, &V) -> bool {
        self.iter().any(|(k, v)| f(k, v))
    }

    /// Checks if every entry satisfies the predicate.
    pub fn for_all<F>(&self, mut f: F) -> bool where F: FnMut(&K, &V) -> bool {
        self.iter().all(|(k, v)| f(k, v))
    }

    /// Checks the map's search tree ordering, height balance and cached sizes, recomputing
    /// them from scratch.
    pub fn invariants(&self) -> bool { self.tree.invariants(&self.cmp) }
}

impl<K, V, C> Map<K, V, C> where K: Clone, C: Compare<K> + Clone {
    fn with_tree<W>(&self, tree: Tree<K, W>) -> Map<K, W, C> {
        Map { tree, cmp: self.cmp.clone() }
    }

    /// Returns a map with the same keys whose values are `f` of this map's values. The new map
    /// has the same shape as this one and is built in linear time.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new().insert(1, "a").insert(2, "bb");
    /// let lens = map.map(|v| v.len());
    /// assert_eq!(lens.iter().collect::<Vec<_>>(), [(&1, &1), (&2, &2)]);
    /// ```
    pub fn map<W, F>(&self, mut f: F) -> Map<K, W, C> where F: FnMut(&V) -> W {
        self.with_tree(self.tree.map(|_, v| f(v)))
    }

    pub fn map_with_key<W, F>(&self, f: F) -> Map<K, W, C> where F: FnMut(&K, &V) -> W {
        self.with_tree(self.tree.map(f))
    }

    /// Returns a map of the entries for which `f` returns a value.
    pub fn filter_map<W, F>(&self, f: F) -> Map<K, W, C>
        where W: Clone, F: FnMut(&K, &V) -> Option<W> {

        self.with_tree(self.tree.filter_map(f))
    }
}

impl<K, V, C> Map<K, V, C> where K: Clone, V: Clone, C: Compare<K> + Clone {
    /// Returns a map with the given entry added, replacing the entry with an equal key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// let a = pavl::Map::new().insert(1, "a");
    /// let b = a.insert(1, "b");
    /// assert_eq!(a.get(&1), Some(&"a"));
    /// assert_eq!(b.get(&1), Some(&"b"));
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        self.with_tree(self.tree.insert(&self.cmp, key, value))
    }

    /// Returns a map with the given entry added, or `Error::DuplicateKey` if the map already
    /// contains the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::Error;
    ///
    /// let map = pavl::Map::new().insert(1, "a");
    /// assert!(map.try_insert(2, "b").is_ok());
    /// assert_eq!(map.try_insert(1, "b").err(), Some(Error::DuplicateKey(1)));
    /// ```
    pub fn try_insert(&self, key: K, value: V) -> Result<Self, K> {
        if self.contains_key(&key) {
            Err(Error::DuplicateKey(key))
        } else {
            Ok(self.insert(key, value))
        }
    }

    /// Returns a map without the entry whose key is equal to the given key.
    ///
    /// If the map does not contain the key, the returned map shares this map's tree.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new().insert(2, "b").insert(1, "a").insert(3, "c");
    /// let removed = map.remove(&1);
    ///
    /// assert_eq!(removed.get(&1), None);
    /// assert_eq!(removed.len(), 2);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    #[must_use]
    pub fn remove<Q: ?Sized>(&self, key: &Q) -> Self where C: Compare<Q, K> {
        self.with_tree(self.tree.remove(&self.cmp, key))
    }

    /// Returns a map in which the value associated with `key` is replaced by `f` of the current
    /// value, if any. If `f` returns `None`, the entry is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new().insert("a", 1);
    ///
    /// let incr = |v: Option<&i32>| Some(v.map_or(1, |v| v + 1));
    /// assert_eq!(map.change("a", incr).get(&"a"), Some(&2));
    /// assert_eq!(map.change("b", incr).get(&"b"), Some(&1));
    /// assert_eq!(map.change("a", |_| None).get(&"a"), None);
    /// ```
    #[must_use]
    pub fn change<F>(&self, key: K, f: F) -> Self where F: FnOnce(Option<&V>) -> Option<V> {
        self.with_tree(self.tree.change(&self.cmp, key, f))
    }

    /// Returns a map in which the value associated with `key` is `f` of the current value, if
    /// any. Unlike `change`, this always leaves an entry for the key.
    #[must_use]
    pub fn update<F>(&self, key: K, f: F) -> Self where F: FnOnce(Option<&V>) -> V {
        self.change(key, |value| Some(f(value)))
    }

    /// Returns a map of the entries that satisfy the predicate.
    #[must_use]
    pub fn filter<F>(&self, mut f: F) -> Self where F: FnMut(&K, &V) -> bool {
        self.filter_map(|k, v| if f(k, v) { Some(v.clone()) } else { None })
    }

    /// Splits the map into the entries that satisfy the predicate and those that do not, in a
    /// single pass.
    ///
    /// # Examples
    ///
    /// ```
    /// let map: pavl::Map<_, _> = (0..6).map(|i| (i, i * 10)).collect();
    /// let (even, odd) = map.partition(|k, _| k % 2 == 0);
    ///
    /// assert_eq!(even.keys().collect::<Vec<_>>(), [&0, &2, &4]);
    /// assert_eq!(odd.keys().collect::<Vec<_>>(), [&1, &3, &5]);
    /// ```
    pub fn partition<F>(&self, f: F) -> (Self, Self) where F: FnMut(&K, &V) -> bool {
        let (yes, no) = self.tree.partition(f);
        (self.with_tree(yes), self.with_tree(no))
    }

    /// Splits the map into the entries less than `key`, the entry equal to `key`, if any, and
    /// the entries greater than `key`. Takes `O(log n)` time.
    ///
    /// # Examples
    ///
    /// ```
    /// let map: pavl::Map<_, _> = (0..5).map(|i| (i, i)).collect();
    /// let (lt, found, gt) = map.split(&2);
    ///
    /// assert_eq!(lt.keys().collect::<Vec<_>>(), [&0, &1]);
    /// assert_eq!(found, Some((2, 2)));
    /// assert_eq!(gt.keys().collect::<Vec<_>>(), [&3, &4]);
    /// ```
    pub fn split<Q: ?Sized>(&self, key: &Q) -> (Self, Option<(K, V)>, Self)
        where C: Compare<Q, K> {

        let (lt, found, gt) = self.tree.split(&self.cmp, key);
        (self.with_tree(lt), found, self.with_tree(gt))
    }

    /// Merges two maps with the same ordering.
    ///
    /// `f` is called once for every key present in either map, in ascending key order, and the
    /// key is kept in the result if `f` returns a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::MergeElement::*;
    ///
    /// let a = pavl::Map::new().insert(1, 1).insert(2, 2);
    /// let b = pavl::Map::new().insert(2, "two").insert(3, "three");
    ///
    /// let merged = a.merge(&b, |_, e| match e {
    ///     Left(n) => Some(n.to_string()),
    ///     Right(s) => Some(s.to_string()),
    ///     Both(n, s) => Some(format!("{}={}", n, s)),
    /// });
    ///
    /// assert_eq!(merged.values().collect::<Vec<_>>(), ["1", "2=two", "three"]);
    /// ```
    pub fn merge<V2, V3, F>(&self, other: &Map<K, V2, C>, f: F) -> Map<K, V3, C>
        where V2: Clone, V3: Clone, F: FnMut(&K, MergeElement<&V, &V2>) -> Option<V3> {

        self.with_tree(self.tree.merge(&other.tree, &self.cmp, f))
    }

    /// Concatenates two maps, every key of this map being less than every key of `upper`.
    /// Returns `Error::OverlappingKeyRanges` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::Error;
    ///
    /// let lower = pavl::Map::new().insert(1, "a").insert(2, "b");
    /// let upper = pavl::Map::new().insert(3, "c");
    ///
    /// assert_eq!(lower.append(&upper).map(|m| m.len()), Ok(3));
    /// assert_eq!(upper.append(&lower).err(), Some(Error::OverlappingKeyRanges));
    /// ```
    pub fn append(&self, upper: &Self) -> Result<Self, K> {
        if let (Some((max, _)), Some((min, _))) = (self.last(), upper.first()) {
            if self.cmp.compare(max, min) != Less { return Err(Error::OverlappingKeyRanges); }
        }

        trace!(lower = self.len(), upper = upper.len(), "appending maps");
        Ok(self.with_tree(Tree::concat(self.tree.clone(), upper.tree.clone())))
    }

    /// Returns the map's entries, in the given order.
    pub fn to_pairs(&self, order: Order) -> Vec<(K, V)> {
        let pairs = self.iter().map(|(k, v)| (k.clone(), v.clone()));

        match order {
            Order::Ascending => pairs.collect(),
            Order::Descending => pairs.rev().collect(),
        }
    }
}

impl<K, V, C> Map<K, V, C> where K: Clone, V: Clone, C: Compare<K> + Clone + Default {
    /// Creates a map containing a single entry.
    pub fn singleton(key: K, value: V) -> Self {
        Map::from_tree(C::default(), Tree::singleton(key, value))
    }

    /// Creates a map from unordered entries, or returns `Error::DuplicateKey` with the first
    /// repeated key.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::{Error, Map};
    ///
    /// let map: Map<_, _> = Map::try_from_pairs(vec![(2, "b"), (1, "a")]).unwrap();
    /// assert_eq!(map.len(), 2);
    ///
    /// let dup: Result<Map<_, _>, _> = Map::try_from_pairs(vec![(2, "b"), (2, "c"), (1, "a")]);
    /// assert_eq!(dup.err(), Some(Error::DuplicateKey(2)));
    /// ```
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, K> where I: IntoIterator<Item = (K, V)> {
        let cmp = C::default();
        let tree = Tree::try_from_pairs(&cmp, pairs)?;
        Ok(Map::from_tree(cmp, tree))
    }

    /// Creates a map from unordered entries, or returns `Error::DuplicateKeys` with every
    /// repeated key.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::{Error, Map};
    ///
    /// let dup: Result<Map<_, _>, _> =
    ///     Map::try_from_pairs_all(vec![(2, "b"), (2, "c"), (1, "a"), (1, "d")]);
    /// assert_eq!(dup.err(), Some(Error::DuplicateKeys(vec![2, 1])));
    /// ```
    pub fn try_from_pairs_all<I>(pairs: I) -> Result<Self, K>
        where I: IntoIterator<Item = (K, V)> {

        let cmp = C::default();
        let tree = Tree::try_from_pairs_all(&cmp, pairs)?;
        Ok(Map::from_tree(cmp, tree))
    }

    /// Creates a map from unordered entries.
    ///
    /// # Panics
    ///
    /// Panics if two entries have equal keys.
    pub fn from_pairs<I>(pairs: I) -> Self where I: IntoIterator<Item = (K, V)> {
        match Map::try_from_pairs(pairs) {
            Ok(map) => map,
            Err(_) => panic!("duplicate key"),
        }
    }

    /// Creates a map from entries in strictly ascending or strictly descending key order, in
    /// linear time.
    ///
    /// Returns `Error::DuplicateKey` if two neighbouring keys are equal and
    /// `Error::UnsortedInput` if the entries are otherwise out of order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::{Error, Map};
    ///
    /// let up: Map<_, _> = Map::try_from_sorted(vec![(1, "a"), (2, "b"), (3, "c")]).unwrap();
    /// let down: Map<_, _> = Map::try_from_sorted(vec![(3, "c"), (2, "b"), (1, "a")]).unwrap();
    /// assert_eq!(up, down);
    ///
    /// let bad: Result<Map<_, _>, _> = Map::try_from_sorted(vec![(1, "a"), (3, "c"), (2, "b")]);
    /// assert_eq!(bad.err(), Some(Error::UnsortedInput { index: 2 }));
    /// ```
    pub fn try_from_sorted<I>(pairs: I) -> Result<Self, K> where I: IntoIterator<Item = (K, V)> {
        let cmp = C::default();
        let tree = Tree::try_from_sorted(&cmp, pairs)?;
        Ok(Map::from_tree(cmp, tree))
    }

    /// Creates a map from entries in strictly ascending key order, in linear time, without
    /// checking the order.
    ///
    /// Entries that are out of order or repeated produce a map that fails
    /// [`invariants`](#method.invariants) and on which lookups give unspecified (but
    /// memory-safe) results.
    pub fn from_sorted_unchecked<I>(pairs: I) -> Self where I: IntoIterator<Item = (K, V)> {
        Map::from_tree(C::default(), Tree::from_sorted_unchecked(pairs))
    }

    /// Creates a map from the entries `f` pushes, or returns `Error::DuplicateKey` with the
    /// first repeated key. No intermediate collection is built.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::Map;
    ///
    /// let squares: Map<_, _> = Map::try_from_push(|push| {
    ///     for i in 0..4 { push(i, i * i); }
    /// }).unwrap();
    ///
    /// assert_eq!(squares.get(&3), Some(&9));
    /// ```
    pub fn try_from_push<F>(f: F) -> Result<Self, K> where F: FnOnce(&mut dyn FnMut(K, V)) {
        let cmp = C::default();
        let tree = Tree::try_from_push(&cmp, f)?;
        Ok(Map::from_tree(cmp, tree))
    }

    /// Creates a map from unordered entries, combining the values of equal keys with `f`, in
    /// input order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pavl::Map;
    ///
    /// let sums: Map<_, _> = Map::from_pairs_reduce(vec![("a", 1), ("b", 2), ("a", 3)], |x, y| x + y);
    /// assert_eq!(sums.get(&"a"), Some(&4));
    /// ```
    pub fn from_pairs_reduce<I, F>(pairs: I, mut f: F) -> Self
        where I: IntoIterator<Item = (K, V)>, F: FnMut(V, V) -> V {

        pairs.into_iter().fold(Map::default(), |map, (key, value)| {
            map.change(key, |old| Some(match old {
                Some(old) => f(old.clone(), value),
                None => value,
            }))
        })
    }
}

impl<K, T, C> Map<K, Vec<T>, C> where K: Clone, T: Clone, C: Compare<K> + Clone {
    /// Returns a multimap with `value` added to the values of `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// let map = pavl::Map::new().add_multi("a", 1).add_multi("a", 2);
    /// assert_eq!(map.find_multi(&"a"), [1, 2]);
    ///
    /// let map = map.remove_multi(&"a");
    /// assert_eq!(map.find_multi(&"a"), [1]);
    ///
    /// let map = map.remove_multi(&"a");
    /// assert!(!map.contains_key(&"a"));
    /// ```
    #[must_use]
    pub fn add_multi(&self, key: K, value: T) -> Self {
        self.change(key, |values| {
            let mut values = values.cloned().unwrap_or_default();
            values.push(value);
            Some(values)
        })
    }

    /// Returns a multimap without the most recently added value of `key`. The key is removed
    /// once it has no values left.
    #[must_use]
    pub fn remove_multi<Q: ?Sized>(&self, key: &Q) -> Self where C: Compare<Q, K> {
        match self.get_key_value(key) {
            Some((_, values)) if values.len() <= 1 => self.remove(key),
            Some((key, values)) => {
                let mut values = values.clone();
                values.pop();
                self.insert(key.clone(), values)
            }
            None => self.clone(),
        }
    }

    /// Returns the values of `key`, oldest first.
    pub fn find_multi<Q: ?Sized>(&self, key: &Q) -> &[T] where C: Compare<Q, K> {
        self.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<K, T, C> Map<K, Vec<T>, C> where K: Clone, T: Clone, C: Compare<K> + Clone + Default {
    /// Creates a multimap from unordered entries, collecting the values of equal keys in input
    /// order.
    pub fn from_pairs_multi<I>(pairs: I) -> Self where I: IntoIterator<Item = (K, T)> {
        pairs.into_iter().fold(Map::default(), |map, (key, value)| map.add_multi(key, value))
    }
}

impl<K, V, C> Clone for Map<K, V, C> where C: Compare<K> + Clone {
    fn clone(&self) -> Self { Map { tree: self.tree.clone(), cmp: self.cmp.clone() } }
}

impl<K, V, C> Debug for Map<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { self.tree.fmt(f) }
}

impl<K, V, C> Default for Map<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { Map::with_cmp(Default::default()) }
}

impl<K, V, C> Extend<(K, V)> for Map<K, V, C> where K: Clone, V: Clone, C: Compare<K> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, it: I) {
        for (k, v) in it { self.tree = self.tree.insert(&self.cmp, k, v); }
    }
}

/// Collects entries into a map. Later entries replace earlier ones with equal keys.
impl<K, V, C> FromIterator<(K, V)> for Map<K, V, C>
    where K: Clone, V: Clone, C: Compare<K> + Default {

    fn from_iter<I: IntoIterator<Item = (K, V)>>(it: I) -> Self {
        let mut map: Self = Default::default();
        map.extend(it);
        map
    }
}

impl<K, V, C> Hash for Map<K, V, C> where K: Hash, V: Hash, C: Compare<K> {
    fn hash<H: Hasher>(&self, h: &mut H) {
        self.len().hash(h);
        for e in self.iter() { e.hash(h); }
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::Index<&'a Q> for Map<K, V, C>
    where C: Compare<K> + Compare<Q, K> {

    type Output = V;
    fn index(&self, key: &Q) -> &V { self.get(key).expect("key not found") }
}

impl<'a, K, V, C> IntoIterator for &'a Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<K, V, C> IntoIterator for Map<K, V, C> where K: Clone, V: Clone, C: Compare<K> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> IntoIter<K, V> { self.tree.into_iter() }
}

/// Maps are equal if they contain equal keys associated with equal values, whatever their
/// shapes.
impl<K, V, C> PartialEq for Map<K, V, C> where V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.symmetric_diff(other, |a, b| a == b).next().is_none()
    }
}

impl<K, V, C> Eq for Map<K, V, C> where V: Eq, C: Compare<K> {}

impl<K, V, C> PartialOrd for Map<K, V, C> where V: PartialOrd, C: Compare<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Some(Equal),
                (None, Some(_)) => return Some(Less),
                (Some(_), None) => return Some(Greater),
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Equal => match l.1.partial_cmp(r.1) {
                        Some(Equal) => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return Some(non_eq),
                },
            }
        }
    }
}

impl<K, V, C> Ord for Map<K, V, C> where V: Ord, C: Compare<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Equal,
                (None, Some(_)) => return Less,
                (Some(_), None) => return Greater,
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Equal => match l.1.cmp(r.1) {
                        Equal => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return non_eq,
                },
            }
        }
    }
}

/// An iterator over a map's entries, in ascending order.
///
/// Acquire through [`Map::iter`](struct.Map.html#method.iter) or the `IntoIterator` trait.
pub struct Iter<'a, K: 'a, V: 'a>(pub(crate) node::Iter<&'a Node<K, V>>);

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Iter<'a, K, V> { Iter(self.0.clone()) }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<(&'a K, &'a V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> { self.0.next_back() }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// An iterator that consumes a map, in ascending order.
///
/// Entries still shared with other maps are cloned.
pub struct IntoIter<K, V>(pub(crate) node::Iter<Arc<Node<K, V>>>);

impl<K, V> Clone for IntoIter<K, V> {
    fn clone(&self) -> IntoIter<K, V> { IntoIter(self.0.clone()) }
}

impl<K, V> Iterator for IntoIter<K, V> where K: Clone, V: Clone {
    type Item = (K, V);
    fn next(&mut self) -> Option<(K, V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> where K: Clone, V: Clone {
    fn next_back(&mut self) -> Option<(K, V)> { self.0.next_back() }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> where K: Clone, V: Clone {}

/// An iterator over the entries of a map whose keys lie in a given range.
///
/// Acquire through [`Map::range`](struct.Map.html#method.range).
pub struct Range<'a, K: 'a, V: 'a>(pub(crate) node::Iter<&'a Node<K, V>>);

impl<'a, K, V> Clone for Range<'a, K, V> {
    fn clone(&self) -> Range<'a, K, V> { Range(self.0.clone()) }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<(&'a K, &'a V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Range<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> { self.0.next_back() }
}

impl<'a, K, V> ExactSizeIterator for Range<'a, K, V> {}

/// An ordered window of a map, ascending or descending.
///
/// Acquire through [`Map::to_sequence`](struct.Map.html#method.to_sequence).
pub struct Sequence<'a, K: 'a, V: 'a> {
    range: Range<'a, K, V>,
    order: Order,
}

impl<'a, K, V> Clone for Sequence<'a, K, V> {
    fn clone(&self) -> Sequence<'a, K, V> { Sequence { range: self.range.clone(), order: self.order } }
}

impl<'a, K, V> Iterator for Sequence<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        match self.order {
            Order::Ascending => self.range.next(),
            Order::Descending => self.range.next_back(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.range.size_hint() }
}

impl<'a, K, V> ExactSizeIterator for Sequence<'a, K, V> {}

/// An iterator over a map's keys, in ascending order.
pub struct Keys<'a, K: 'a, V: 'a>(Iter<'a, K, V>);

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Keys<'a, K, V> { Keys(self.0.clone()) }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<&'a K> { self.0.next().map(|e| e.0) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a K> { self.0.next_back().map(|e| e.0) }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

/// An iterator over a map's values, in ascending order of their keys.
pub struct Values<'a, K: 'a, V: 'a>(Iter<'a, K, V>);

impl<'a, K, V> Clone for Values<'a, K, V> {
    fn clone(&self) -> Values<'a, K, V> { Values(self.0.clone()) }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<&'a V> { self.0.next().map(|e| e.1) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    fn next_back(&mut self) -> Option<&'a V> { self.0.next_back().map(|e| e.1) }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}
