mod diff;
mod iter;
mod merge;

#[cfg(test)]
mod test;

use compare::Compare;
use std::cmp::{self, Ordering::*};
use std::ops::Bound;
use std::sync::Arc;

pub use self::diff::SymmetricDiff;
pub use self::iter::Iter;
pub use self::merge::merge;

pub type Link<K, V> = Option<Arc<Node<K, V>>>;

/// A tree node. Nodes are never mutated once they are reachable from a published root.
#[derive(Clone, Debug)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub left: Link<K, V>,
    pub right: Link<K, V>,
    size: usize,
    height: usize,
}

impl<K, V> Node<K, V> {
    pub fn size(&self) -> usize { self.size }

    pub fn height(&self) -> usize { self.height }
}

pub fn height<K, V>(link: &Link<K, V>) -> usize { link.as_ref().map_or(0, |node| node.height) }

pub fn size<K, V>(link: &Link<K, V>) -> usize { link.as_ref().map_or(0, |node| node.size) }

pub fn ptr_eq<K, V>(a: &Link<K, V>, b: &Link<K, V>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn create<K, V>(left: Link<K, V>, key: K, value: V, right: Link<K, V>) -> Link<K, V> {
    let height = cmp::max(height(&left), height(&right)) + 1;
    let size = size(&left) + size(&right) + 1;
    Some(Arc::new(Node { key, value, left, right, size, height }))
}

pub fn singleton<K, V>(key: K, value: V) -> Link<K, V> { create(None, key, value, None) }

// Takes the node apart, cloning the key and value only if the node is shared.
fn into_parts<K, V>(node: Arc<Node<K, V>>) -> (Link<K, V>, K, V, Link<K, V>)
    where K: Clone, V: Clone {

    match Arc::try_unwrap(node) {
        Ok(node) => (node.left, node.key, node.value, node.right),
        Err(node) => (node.left.clone(), node.key.clone(), node.value.clone(), node.right.clone()),
    }
}

// Restores the height invariant for subtrees whose heights differ by at most two.
fn bal<K, V>(left: Link<K, V>, key: K, value: V, right: Link<K, V>) -> Link<K, V>
    where K: Clone, V: Clone {

    let (hl, hr) = (height(&left), height(&right));

    if hl > hr + 1 {
        match left {
            Some(l) => rotate_right(l, key, value, right),
            None => create(left, key, value, right),
        }
    } else if hr > hl + 1 {
        match right {
            Some(r) => rotate_left(left, key, value, r),
            None => create(left, key, value, right),
        }
    } else {
        create(left, key, value, right)
    }
}

fn rotate_right<K, V>(left: Arc<Node<K, V>>, key: K, value: V, right: Link<K, V>) -> Link<K, V>
    where K: Clone, V: Clone {

    let (ll, lk, lv, lr) = into_parts(left);

    match lr {
        Some(lr) if lr.height > height(&ll) => {
            let (lrl, lrk, lrv, lrr) = into_parts(lr);
            create(create(ll, lk, lv, lrl), lrk, lrv, create(lrr, key, value, right))
        }
        lr => create(ll, lk, lv, create(lr, key, value, right)),
    }
}

fn rotate_left<K, V>(left: Link<K, V>, key: K, value: V, right: Arc<Node<K, V>>) -> Link<K, V>
    where K: Clone, V: Clone {

    let (rl, rk, rv, rr) = into_parts(right);

    match rl {
        Some(rl) if rl.height > height(&rr) => {
            let (rll, rlk, rlv, rlr) = into_parts(rl);
            create(create(left, key, value, rll), rlk, rlv, create(rlr, rk, rv, rr))
        }
        rl => create(create(left, key, value, rl), rk, rv, rr),
    }
}

/// Joins two trees around a middle entry. Every key of `left` must be less than `key`, which
/// must be less than every key of `right`.
pub fn join<K, V>(left: Link<K, V>, key: K, value: V, right: Link<K, V>) -> Link<K, V>
    where K: Clone, V: Clone {

    let (hl, hr) = (height(&left), height(&right));

    if hl > hr + 1 {
        match left {
            Some(l) => {
                let (ll, lk, lv, lr) = into_parts(l);
                bal(ll, lk, lv, join(lr, key, value, right))
            }
            None => create(left, key, value, right),
        }
    } else if hr > hl + 1 {
        match right {
            Some(r) => {
                let (rl, rk, rv, rr) = into_parts(r);
                bal(join(left, key, value, rl), rk, rv, rr)
            }
            None => create(left, key, value, right),
        }
    } else {
        create(left, key, value, right)
    }
}

/// Concatenates two trees. Every key of `left` must be less than every key of `right`.
pub fn join2<K, V>(left: Link<K, V>, right: Link<K, V>) -> Link<K, V>
    where K: Clone, V: Clone {

    match (left, right) {
        (None, right) => right,
        (left, None) => left,
        (left, Some(right)) => {
            let (key, value, right) = remove_min(right);
            join(left, key, value, right)
        }
    }
}

fn remove_min<K, V>(node: Arc<Node<K, V>>) -> (K, V, Link<K, V>) where K: Clone, V: Clone {
    let (left, key, value, right) = into_parts(node);

    match left {
        None => (key, value, right),
        Some(left) => {
            let (min_key, min_value, left) = remove_min(left);
            (min_key, min_value, bal(left, key, value, right))
        }
    }
}

/// Splits the tree into the entries less than `key`, the entry equal to it and the entries
/// greater than it.
pub fn split<K, V, C, Q: ?Sized>(link: &Link<K, V>, cmp: &C, key: &Q)
    -> (Link<K, V>, Option<(K, V)>, Link<K, V>)
    where K: Clone, V: Clone, C: Compare<Q, K> {

    match *link {
        None => (None, None, None),
        Some(ref node) => match cmp.compare(key, &node.key) {
            Equal => (node.left.clone(), Some((node.key.clone(), node.value.clone())),
                      node.right.clone()),
            Less => {
                let (lt, found, gt) = split(&node.left, cmp, key);
                (lt, found, join(gt, node.key.clone(), node.value.clone(), node.right.clone()))
            }
            Greater => {
                let (lt, found, gt) = split(&node.right, cmp, key);
                (join(node.left.clone(), node.key.clone(), node.value.clone(), lt), found, gt)
            }
        },
    }
}

/// Replaces the value associated with `key` with `f(current)`, removing the entry if `f`
/// returns `None`. Returns the same root if nothing changed.
pub fn change<K, V, C, F>(link: &Link<K, V>, cmp: &C, key: K, f: F) -> Link<K, V>
    where K: Clone, V: Clone, C: Compare<K>, F: FnOnce(Option<&V>) -> Option<V> {

    match *link {
        None => match f(None) {
            None => None,
            Some(value) => singleton(key, value),
        },
        Some(ref node) => match cmp.compare(&key, &node.key) {
            Equal => match f(Some(&node.value)) {
                Some(value) => create(node.left.clone(), key, value, node.right.clone()),
                None => join2(node.left.clone(), node.right.clone()),
            },
            Less => {
                let left = change(&node.left, cmp, key, f);
                if ptr_eq(&left, &node.left) { return link.clone(); }
                bal(left, node.key.clone(), node.value.clone(), node.right.clone())
            }
            Greater => {
                let right = change(&node.right, cmp, key, f);
                if ptr_eq(&right, &node.right) { return link.clone(); }
                bal(node.left.clone(), node.key.clone(), node.value.clone(), right)
            }
        },
    }
}

/// Removes the entry equal to `key`, returning `None` if there is no such entry.
pub fn remove<K, V, C, Q: ?Sized>(link: &Link<K, V>, cmp: &C, key: &Q) -> Option<Link<K, V>>
    where K: Clone, V: Clone, C: Compare<Q, K> {

    let node = link.as_ref()?;

    match cmp.compare(key, &node.key) {
        Equal => Some(join2(node.left.clone(), node.right.clone())),
        Less => remove(&node.left, cmp, key)
            .map(|left| bal(left, node.key.clone(), node.value.clone(), node.right.clone())),
        Greater => remove(&node.right, cmp, key)
            .map(|right| bal(node.left.clone(), node.key.clone(), node.value.clone(), right)),
    }
}

pub fn get<'a, K, V, C, Q: ?Sized>(link: &'a Link<K, V>, cmp: &C, key: &Q)
    -> Option<&'a Node<K, V>> where C: Compare<Q, K> {

    let mut link = link;

    while let Some(ref node) = *link {
        match cmp.compare(key, &node.key) {
            Equal => return Some(&**node),
            Less => link = &node.left,
            Greater => link = &node.right,
        }
    }

    None
}

pub fn min<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let mut node = link.as_deref()?;
    while let Some(ref left) = node.left { node = &**left; }
    Some(node)
}

pub fn max<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let mut node = link.as_deref()?;
    while let Some(ref right) = node.right { node = &**right; }
    Some(node)
}

/// Finds the greatest key less than (or, if `inclusive`, equal to) the given key.
pub fn pred<'a, K, V, C, Q: ?Sized>(link: &'a Link<K, V>, cmp: &C, key: &Q, inclusive: bool)
    -> Option<&'a Node<K, V>> where C: Compare<Q, K> {

    let mut link = link;
    let mut closest = None;

    while let Some(ref node) = *link {
        match cmp.compare(key, &node.key) {
            Equal if inclusive => return Some(&**node),
            Less | Equal => link = &node.left,
            Greater => {
                closest = Some(&**node);
                link = &node.right;
            }
        }
    }

    closest
}

/// Finds the least key greater than (or, if `inclusive`, equal to) the given key.
pub fn succ<'a, K, V, C, Q: ?Sized>(link: &'a Link<K, V>, cmp: &C, key: &Q, inclusive: bool)
    -> Option<&'a Node<K, V>> where C: Compare<Q, K> {

    let mut link = link;
    let mut closest = None;

    while let Some(ref node) = *link {
        match cmp.compare(key, &node.key) {
            Equal if inclusive => return Some(&**node),
            Greater | Equal => link = &node.right,
            Less => {
                closest = Some(&**node);
                link = &node.left;
            }
        }
    }

    closest
}

pub fn nth<K, V>(link: &Link<K, V>, mut rank: usize) -> Option<&Node<K, V>> {
    let mut link = link;

    while let Some(ref node) = *link {
        let left = size(&node.left);

        match rank.cmp(&left) {
            Less => link = &node.left,
            Equal => return Some(&**node),
            Greater => {
                rank -= left + 1;
                link = &node.right;
            }
        }
    }

    None
}

pub fn rank<K, V, C, Q: ?Sized>(link: &Link<K, V>, cmp: &C, key: &Q) -> Option<usize>
    where C: Compare<Q, K> {

    let mut link = link;
    let mut rank = 0;

    while let Some(ref node) = *link {
        match cmp.compare(key, &node.key) {
            Equal => return Some(rank + size(&node.left)),
            Less => link = &node.left,
            Greater => {
                rank += size(&node.left) + 1;
                link = &node.right;
            }
        }
    }

    None
}

/// Counts the keys that lie below the given lower bound.
pub fn count_below<K, V, C, Q: ?Sized>(link: Option<&Node<K, V>>, cmp: &C, min: Bound<&Q>)
    -> usize where C: Compare<Q, K> {

    let mut link = link;
    let mut count = 0;

    while let Some(node) = link {
        if above_min(cmp, min, &node.key) {
            link = node.left.as_deref();
        } else {
            count += size(&node.left) + 1;
            link = node.right.as_deref();
        }
    }

    count
}

/// Counts the keys that lie above the given upper bound.
pub fn count_above<K, V, C, Q: ?Sized>(link: Option<&Node<K, V>>, cmp: &C, max: Bound<&Q>)
    -> usize where C: Compare<Q, K> {

    let mut link = link;
    let mut count = 0;

    while let Some(node) = link {
        if below_max(cmp, max, &node.key) {
            link = node.right.as_deref();
        } else {
            count += size(&node.right) + 1;
            link = node.left.as_deref();
        }
    }

    count
}

pub fn above_min<K, C, Q: ?Sized>(cmp: &C, min: Bound<&Q>, key: &K) -> bool
    where C: Compare<Q, K> {

    match min {
        Bound::Unbounded => true,
        Bound::Included(min) => cmp.compare(min, key) != Greater,
        Bound::Excluded(min) => cmp.compare(min, key) == Less,
    }
}

pub fn below_max<K, C, Q: ?Sized>(cmp: &C, max: Bound<&Q>, key: &K) -> bool
    where C: Compare<Q, K> {

    match max {
        Bound::Unbounded => true,
        Bound::Included(max) => cmp.compare(max, key) != Less,
        Bound::Excluded(max) => cmp.compare(max, key) == Greater,
    }
}

/// Builds a tree from entries in ascending order in linear time.
///
/// The entries are not checked: out-of-order input produces a tree that violates the search
/// tree ordering.
pub fn from_sorted<K, V, I>(entries: &mut I, len: usize) -> Link<K, V>
    where I: Iterator<Item = (K, V)> {

    if len == 0 { return None; }

    let left_len = (len - 1) / 2;
    let left = from_sorted(entries, left_len);

    match entries.next() {
        None => left,
        Some((key, value)) => {
            let right = from_sorted(entries, len - left_len - 1);
            create(left, key, value, right)
        }
    }
}

/// Maps every value, keeping the shape of the tree.
pub fn map<K, V, W, F>(link: &Link<K, V>, f: &mut F) -> Link<K, W>
    where K: Clone, F: FnMut(&K, &V) -> W {

    link.as_ref().map(|node| {
        let left = map(&node.left, f);
        let value = f(&node.key, &node.value);
        let right = map(&node.right, f);
        Arc::new(Node { key: node.key.clone(), value, left, right,
                        size: node.size, height: node.height })
    })
}

pub fn filter_map<K, V, W, F>(link: &Link<K, V>, f: &mut F) -> Link<K, W>
    where K: Clone, W: Clone, F: FnMut(&K, &V) -> Option<W> {

    match *link {
        None => None,
        Some(ref node) => {
            let left = filter_map(&node.left, f);
            let value = f(&node.key, &node.value);
            let right = filter_map(&node.right, f);

            match value {
                Some(value) => join(left, node.key.clone(), value, right),
                None => join2(left, right),
            }
        }
    }
}

/// Splits the tree into the entries for which `f` returns `true` and those for which it
/// returns `false`. Subtrees that end up entirely on one side are shared, not copied.
pub fn partition<K, V, F>(link: &Link<K, V>, f: &mut F) -> (Link<K, V>, Link<K, V>)
    where K: Clone, V: Clone, F: FnMut(&K, &V) -> bool {

    match *link {
        None => (None, None),
        Some(ref node) => {
            let (left_in, left_out) = partition(&node.left, f);
            let keep = f(&node.key, &node.value);
            let (right_in, right_out) = partition(&node.right, f);

            let all_in = ptr_eq(&left_in, &node.left) && ptr_eq(&right_in, &node.right);
            let all_out = ptr_eq(&left_out, &node.left) && ptr_eq(&right_out, &node.right);
            let (key, value) = (node.key.clone(), node.value.clone());

            if keep {
                let yes = if all_in { link.clone() } else { join(left_in, key, value, right_in) };
                (yes, join2(left_out, right_out))
            } else {
                let no = if all_out { link.clone() } else { join(left_out, key, value, right_out) };
                (join2(left_in, right_in), no)
            }
        }
    }
}

/// Checks the search tree ordering, the height balance and the cached sizes and heights.
pub fn invariants<K, V, C>(link: &Link<K, V>, cmp: &C) -> bool where C: Compare<K> {
    fn check<'a, K, V, C>(link: &'a Link<K, V>, cmp: &C, lower: Option<&'a K>,
                          upper: Option<&'a K>) -> Option<(usize, usize)>
        where C: Compare<K> {

        let node = match *link {
            None => return Some((0, 0)),
            Some(ref node) => node,
        };

        if lower.map_or(false, |lower| cmp.compare(lower, &node.key) != Less) { return None; }
        if upper.map_or(false, |upper| cmp.compare(upper, &node.key) != Greater) { return None; }

        let (left_height, left_size) = check(&node.left, cmp, lower, Some(&node.key))?;
        let (right_height, right_size) = check(&node.right, cmp, Some(&node.key), upper)?;

        let height = cmp::max(left_height, right_height) + 1;
        let size = left_size + right_size + 1;

        let balanced = left_height <= right_height + 1 && right_height <= left_height + 1;

        if balanced && height == node.height && size == node.size {
            Some((height, size))
        } else {
            None
        }
    }

    check(link, cmp, None, None).is_some()
}
