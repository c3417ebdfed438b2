use compare::Compare;
use std::cmp::Ordering::*;
use std::sync::Arc;
use super::{Link, Node};
use crate::DiffElement;

enum Frame<'a, K, V> {
    /// A subtree none of whose entries has been visited yet.
    Tree(&'a Arc<Node<K, V>>),
    /// A single entry whose left subtree has already been visited.
    Entry(&'a Node<K, V>),
}

impl<'a, K, V> Clone for Frame<'a, K, V> {
    fn clone(&self) -> Self { *self }
}

impl<'a, K, V> Copy for Frame<'a, K, V> {}

fn expand<'a, K, V>(stack: &mut Vec<Frame<'a, K, V>>) {
    if let Some(Frame::Tree(node)) = stack.pop() {
        let node: &'a Node<K, V> = node;
        if let Some(ref right) = node.right { stack.push(Frame::Tree(right)); }
        stack.push(Frame::Entry(node));
        if let Some(ref left) = node.left { stack.push(Frame::Tree(left)); }
    }
}

/// A lazy iterator over the differences between two trees, in ascending key order.
///
/// Subtrees that are physically shared by both trees are skipped without being visited, so
/// diffing a tree against an edited copy of itself costs time proportional to the size of the
/// edit, not of the tree.
pub struct SymmetricDiff<'a, K, V, C, F> {
    left: Vec<Frame<'a, K, V>>,
    right: Vec<Frame<'a, K, V>>,
    cmp: &'a C,
    equal: F,
}

impl<'a, K, V, C, F> SymmetricDiff<'a, K, V, C, F>
    where C: Compare<K>, F: FnMut(&V, &V) -> bool {

    pub fn new(left: &'a Link<K, V>, right: &'a Link<K, V>, cmp: &'a C, equal: F) -> Self {
        SymmetricDiff {
            left: left.iter().map(Frame::Tree).collect(),
            right: right.iter().map(Frame::Tree).collect(),
            cmp,
            equal,
        }
    }
}

impl<'a, K, V, C, F> Iterator for SymmetricDiff<'a, K, V, C, F>
    where C: Compare<K>, F: FnMut(&V, &V) -> bool {

    type Item = (&'a K, DiffElement<&'a V>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match (self.left.last().copied(), self.right.last().copied()) {
                (None, None) => return None,
                (Some(Frame::Tree(l)), Some(Frame::Tree(r))) => {
                    if Arc::ptr_eq(l, r) {
                        self.left.pop();
                        self.right.pop();
                    } else if l.height() > r.height() {
                        expand(&mut self.left);
                    } else if r.height() > l.height() {
                        expand(&mut self.right);
                    } else {
                        expand(&mut self.left);
                        expand(&mut self.right);
                    }
                }
                (Some(Frame::Tree(_)), _) => expand(&mut self.left),
                (_, Some(Frame::Tree(_))) => expand(&mut self.right),
                (Some(Frame::Entry(l)), None) => {
                    self.left.pop();
                    return Some((&l.key, DiffElement::Left(&l.value)));
                }
                (None, Some(Frame::Entry(r))) => {
                    self.right.pop();
                    return Some((&r.key, DiffElement::Right(&r.value)));
                }
                (Some(Frame::Entry(l)), Some(Frame::Entry(r))) => {
                    match self.cmp.compare(&l.key, &r.key) {
                        Less => {
                            self.left.pop();
                            return Some((&l.key, DiffElement::Left(&l.value)));
                        }
                        Greater => {
                            self.right.pop();
                            return Some((&r.key, DiffElement::Right(&r.value)));
                        }
                        Equal => {
                            self.left.pop();
                            self.right.pop();
                            if !(self.equal)(&l.value, &r.value) {
                                return Some((&l.key, DiffElement::Unequal(&l.value, &r.value)));
                            }
                        }
                    }
                }
            }
        }
    }
}
