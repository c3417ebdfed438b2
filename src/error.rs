//! Errors reported by the checked constructors and lookups.

use thiserror::Error;

/// An error produced by a map operation that refuses its input.
///
/// Every variant is a recoverable value: only the explicitly panicking entry points
/// ([`Map::from_pairs`](crate::Map::from_pairs) and indexing) turn these into panics.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error<K> {
    /// An exact-match lookup found no entry for the key.
    #[error("key not found")]
    KeyNotFound,

    /// A duplicate-rejecting constructor or insertion met a key that is already present.
    #[error("duplicate key: {0:?}")]
    DuplicateKey(K),

    /// Every duplicate met by an error-collecting constructor, in input order.
    #[error("duplicate keys: {0:?}")]
    DuplicateKeys(Vec<K>),

    /// The input of a checked sorted constructor is neither strictly ascending nor strictly
    /// descending. `index` is the position of the first out-of-order entry.
    #[error("input is not sorted at index {index}")]
    UnsortedInput { index: usize },

    /// The lower part of an append contains a key that is not less than every key of the upper
    /// part.
    #[error("key ranges overlap")]
    OverlappingKeyRanges,
}

pub type Result<T, K> = ::std::result::Result<T, Error<K>>;
