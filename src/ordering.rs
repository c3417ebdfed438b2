//! Ready-made map types.
//!
//! [`poly`] works for every `Ord` key type through its natural order. [`ordered_map!`] bakes a
//! custom ordering into a module of its own, whose comparator type no other ordering shares.

pub use compare::{Compare, Natural, natural};

/// Maps ordered by the natural order of their keys.
///
/// Every map of a given key type has the same comparator type, so any two of them can be
/// merged or diffed.
pub mod poly {
    use compare::Natural;

    pub type Map<K, V> = crate::Map<K, V, Natural<K>>;

    pub type Tree<K, V> = crate::Tree<K, V>;
}

/// Emits a module containing a comparator type for a key type and `Map` and `Tree` aliases that
/// use it.
///
/// The comparator is a unit struct named `Cmp`, defined once by the macro invocation. Maps from
/// two different invocations have different types even if their key types and orderings
/// coincide, so they cannot be merged or diffed against each other.
///
/// # Examples
///
/// ```
/// pavl::ordered_map! {
///     /// Strings ordered by length, then lexically.
///     pub mod by_len for String = |a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b));
/// }
///
/// let map = by_len::Map::default()
///     .insert("ccc".to_string(), 3)
///     .insert("a".to_string(), 1)
///     .insert("bb".to_string(), 2);
///
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "bb", "ccc"]);
/// ```
#[macro_export]
macro_rules! ordered_map {
    ($(#[$attr:meta])* $vis:vis mod $name:ident for $key:ty = |$l:ident, $r:ident| $body:expr;) => {
        $(#[$attr])*
        $vis mod $name {
            #[allow(unused_imports)]
            use super::*;

            /// The comparator of this module's maps.
            #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
            pub struct Cmp;

            impl $crate::compare::Compare<$key> for Cmp {
                fn compare(&self, $l: &$key, $r: &$key) -> ::std::cmp::Ordering { $body }
            }

            pub type Map<V> = $crate::Map<$key, V, Cmp>;

            pub type Tree<V> = $crate::Tree<$key, V>;
        }
    };
}
