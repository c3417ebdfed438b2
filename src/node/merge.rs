use compare::Compare;
use super::{Link, filter_map, join, join2, split};
use crate::MergeElement;

/// Merges two trees, calling `f` once for every key present in either tree, in ascending key
/// order.
///
/// The root of the smaller tree is used to split the larger one, so that a small tree is merged
/// into a large one with `O(m log(n / m))` splits.
pub fn merge<K, V1, V2, V3, C, F>(a: &Link<K, V1>, b: &Link<K, V2>, cmp: &C, f: &mut F)
    -> Link<K, V3>
    where K: Clone, V1: Clone, V2: Clone, V3: Clone, C: Compare<K>,
          F: FnMut(&K, MergeElement<&V1, &V2>) -> Option<V3> {

    match (a, b) {
        (None, None) => None,
        (_, None) => filter_map(a, &mut |key, value| f(key, MergeElement::Left(value))),
        (None, _) => filter_map(b, &mut |key, value| f(key, MergeElement::Right(value))),
        (Some(x), Some(y)) => {
            if x.size() <= y.size() {
                let (lt, found, gt) = split(b, cmp, &x.key);
                let left = merge(&x.left, &lt, cmp, f);
                let value = match found {
                    Some((_, ref other)) => f(&x.key, MergeElement::Both(&x.value, other)),
                    None => f(&x.key, MergeElement::Left(&x.value)),
                };
                let right = merge(&x.right, &gt, cmp, f);

                match value {
                    Some(value) => join(left, x.key.clone(), value, right),
                    None => join2(left, right),
                }
            } else {
                let (lt, found, gt) = split(a, cmp, &y.key);
                let left = merge(&lt, &y.left, cmp, f);
                let value = match found {
                    Some((_, ref other)) => f(&y.key, MergeElement::Both(other, &y.value)),
                    None => f(&y.key, MergeElement::Right(&y.value)),
                };
                let right = merge(&gt, &y.right, cmp, f);

                match value {
                    Some(value) => join(left, y.key.clone(), value, right),
                    None => join2(left, right),
                }
            }
        }
    }
}
