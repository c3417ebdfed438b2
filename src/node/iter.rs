use compare::Compare;
use std::ops::Bound;
use std::sync::Arc;
use super::{Node, above_min, below_max, count_above, count_below};

/// A handle to a node from which an iterator can reach the node's children.
pub trait NodeRef: Sized {
    type Key;
    type Value;
    type Item;
    fn node(&self) -> &Node<Self::Key, Self::Value>;
    fn left(&self) -> Option<Self>;
    fn right(&self) -> Option<Self>;
    fn item(self) -> Self::Item;
}

impl<'a, K, V> NodeRef for &'a Node<K, V> {
    type Key = K;
    type Value = V;
    type Item = (&'a K, &'a V);
    fn node(&self) -> &Node<K, V> { self }
    fn left(&self) -> Option<&'a Node<K, V>> { let node: &'a Node<K, V> = *self; node.left.as_deref() }
    fn right(&self) -> Option<&'a Node<K, V>> { let node: &'a Node<K, V> = *self; node.right.as_deref() }
    fn item(self) -> (&'a K, &'a V) { (&self.key, &self.value) }
}

impl<K, V> NodeRef for Arc<Node<K, V>> where K: Clone, V: Clone {
    type Key = K;
    type Value = V;
    type Item = (K, V);
    fn node(&self) -> &Node<K, V> { self }
    fn left(&self) -> Option<Arc<Node<K, V>>> { self.left.clone() }
    fn right(&self) -> Option<Arc<Node<K, V>>> { self.right.clone() }

    fn item(self) -> (K, V) {
        match Arc::try_unwrap(self) {
            Ok(node) => (node.key, node.value),
            Err(node) => (node.key.clone(), node.value.clone()),
        }
    }
}

/// An in-order iterator over a window of a tree.
///
/// `front` holds the nodes still to be visited from the low end, deepest last, and `back` the
/// ones from the high end. `len` is the exact number of entries left in the window, so the two
/// ends never cross.
#[derive(Clone)]
pub struct Iter<N> {
    front: Vec<N>,
    back: Vec<N>,
    len: usize,
}

impl<N> Iter<N> where N: NodeRef + Clone {
    pub fn new(root: Option<N>) -> Iter<N> {
        let len = root.as_ref().map_or(0, |root| root.node().size());
        let mut it = Iter { front: vec![], back: vec![], len };
        if let Some(root) = root {
            it.push_front_spine(Some(root.clone()));
            it.push_back_spine(Some(root));
        }
        it
    }

    pub fn range<C, Min: ?Sized, Max: ?Sized>(root: Option<N>, cmp: &C, min: Bound<&Min>,
                                              max: Bound<&Max>) -> Iter<N>
        where C: Compare<Min, N::Key> + Compare<Max, N::Key> {

        let (size, below, above) = match root {
            None => (0, 0, 0),
            Some(ref root) => {
                let node = Some(root.node());
                (root.node().size(), count_below(node, cmp, min), count_above(node, cmp, max))
            }
        };

        let mut it = Iter { front: vec![], back: vec![], len: size.saturating_sub(below + above) };

        let mut link = root.clone();
        while let Some(node) = link {
            if above_min(cmp, min, &node.node().key) {
                link = node.left();
                it.front.push(node);
            } else {
                link = node.right();
            }
        }

        let mut link = root;
        while let Some(node) = link {
            if below_max(cmp, max, &node.node().key) {
                link = node.right();
                it.back.push(node);
            } else {
                link = node.left();
            }
        }

        it
    }

    fn push_front_spine(&mut self, mut link: Option<N>) {
        while let Some(node) = link {
            link = node.left();
            self.front.push(node);
        }
    }

    fn push_back_spine(&mut self, mut link: Option<N>) {
        while let Some(node) = link {
            link = node.right();
            self.back.push(node);
        }
    }
}

impl<N> Iterator for Iter<N> where N: NodeRef + Clone {
    type Item = N::Item;

    fn next(&mut self) -> Option<N::Item> {
        if self.len == 0 { return None; }
        let node = self.front.pop()?;
        self.len -= 1;
        self.push_front_spine(node.right());
        Some(node.item())
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<N> DoubleEndedIterator for Iter<N> where N: NodeRef + Clone {
    fn next_back(&mut self) -> Option<N::Item> {
        if self.len == 0 { return None; }
        let node = self.back.pop()?;
        self.len -= 1;
        self.push_back_spine(node.left());
        Some(node.item())
    }
}

impl<N> ExactSizeIterator for Iter<N> where N: NodeRef + Clone {}
