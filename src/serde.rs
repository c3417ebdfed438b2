use compare::Compare;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::cmp::Ordering::Less;
use std::fmt::Debug;
use crate::{Map, Tree};

/// Serializes a map as a sequence of `(key, value)` pairs in ascending key order.
impl<K, V, C> Serialize for Map<K, V, C> where K: Serialize, V: Serialize, C: Compare<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Deserializes a sequence of `(key, value)` pairs. Sorted input is built in linear time;
/// unsorted input is inserted pair by pair. Duplicate keys are an error either way.
impl<'de, K, V, C> Deserialize<'de> for Map<K, V, C>
    where K: Deserialize<'de> + Clone + Debug, V: Deserialize<'de> + Clone,
          C: Compare<K> + Clone + Default {

    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(K, V)>::deserialize(deserializer)?;
        let cmp = C::default();
        let sorted = pairs.windows(2).all(|w| cmp.compare(&w[0].0, &w[1].0) == Less);

        let map = if sorted { Map::try_from_sorted(pairs) } else { Map::try_from_pairs(pairs) };
        map.map_err(de::Error::custom)
    }
}

impl<K, V> Serialize for Tree<K, V> where K: Serialize, V: Serialize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
