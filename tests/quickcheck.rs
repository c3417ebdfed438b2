use compare::Compare;
use pavl::Map;
use quickcheck::{Arbitrary, Gen};

/// A transformation that removes at most one entry from a map.
pub trait Remove<K, C> where C: Compare<K> {
    fn remove<V: Clone>(&self, map: &Map<K, V, C>) -> (Map<K, V, C>, Option<K>);
}

macro_rules! remove {
    ($K:ty, $V:ty, $R:ty) => {
        mod remove {
            use crate::Remove;
            use quickcheck::{TestResult, quickcheck};
            use pavl::Map;

            #[test]
            fn removes_key() {
                fn test(map: Map<$K, $V>, removal: $R) -> TestResult {
                    match removal.remove(&map) {
                        (_, None) => TestResult::discard(),
                        (new, Some(ref key)) => TestResult::from_bool(
                            !new.contains_key(key) &&
                            new.get(key).is_none() &&
                            new.iter().find(|e| e.0 == key).is_none()
                        ),
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> TestResult);
            }

            #[test]
            fn affects_no_others() {
                fn test(map: Map<$K, $V>, removal: $R) -> bool {
                    match removal.remove(&map) {
                        (new, None) => new == map,
                        (new, Some(ref key)) =>
                            new.iter().collect::<Vec<_>>() ==
                                map.iter().filter(|e| e.0 != key).collect::<Vec<_>>()
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> bool);
            }

            #[test]
            fn sets_len() {
                fn test(map: Map<$K, $V>, removal: $R) -> bool {
                    match removal.remove(&map) {
                        (new, None) => new.len() == map.len(),
                        (new, Some(_)) => new.len() == map.len() - 1,
                    }
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> bool);
            }

            #[test]
            fn keeps_invariants() {
                fn test(map: Map<$K, $V>, removal: $R) -> bool {
                    removal.remove(&map).0.invariants()
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> bool);
            }

            #[test]
            fn diff_reports_removal() {
                fn test(map: Map<$K, $V>, removal: $R) -> bool {
                    let (new, key) = removal.remove(&map);
                    let diff: Vec<_> = map.symmetric_diff(&new, |a, b| a == b).map(|e| *e.0).collect();
                    diff == key.into_iter().collect::<Vec<_>>()
                }

                quickcheck(test as fn(Map<$K, $V>, $R) -> bool);
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Find<Q>(Q);

impl<Q> Arbitrary for Find<Q> where Q: Arbitrary {
    fn arbitrary(gen: &mut Gen) -> Self { Find(Q::arbitrary(gen)) }
    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> { Box::new(self.0.shrink().map(Find)) }
}

impl<K, C> Remove<K, C> for Find<K> where K: Clone, C: Compare<K> + Clone {
    fn remove<V: Clone>(&self, map: &Map<K, V, C>) -> (Map<K, V, C>, Option<K>) {
        let key = map.get_key_value(&self.0).map(|e| e.0.clone());
        (map.remove(&self.0), key)
    }
}

mod find {
    use quickcheck::quickcheck;
    use pavl::Map;

    #[test]
    fn agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.get(&key) == map.iter().find(|e| *e.0 == key).map(|e| e.1)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    #[test]
    fn try_get_agrees_with_get() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.try_get(&key).ok() == map.get(&key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    remove!{u32, u16, crate::Find<u32>}
}

#[derive(Clone, Debug)]
struct Nth(usize);

impl Arbitrary for Nth {
    fn arbitrary(gen: &mut Gen) -> Self { Nth(usize::arbitrary(gen)) }
    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> { Box::new(self.0.shrink().map(Nth)) }
}

impl<K, C> Remove<K, C> for Nth where K: Clone, C: Compare<K> + Clone {
    fn remove<V: Clone>(&self, map: &Map<K, V, C>) -> (Map<K, V, C>, Option<K>) {
        match map.nth(self.0) {
            None => (map.clone(), None),
            Some((key, _)) => (map.remove(key), Some(key.clone())),
        }
    }
}

mod nth {
    use quickcheck::quickcheck;
    use pavl::Map;

    #[test]
    fn agrees_with_iter() {
        fn test(map: Map<u32, u16>, rank: usize) -> bool {
            map.nth(rank) == map.iter().nth(rank)
        }

        quickcheck(test as fn(Map<u32, u16>, usize) -> bool);
    }

    #[test]
    fn inverts_rank() {
        fn test(map: Map<u32, u16>) -> bool {
            map.keys().enumerate().all(|(i, k)| map.rank(k) == Some(i) && map.nth(i).map(|e| e.0) == Some(k))
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn rank_of_absent_key_is_none() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.contains_key(&key) || map.rank(&key).is_none()
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    remove!{u32, u16, crate::Nth}
}

mod insert {
    use quickcheck::quickcheck;
    use pavl::Map;

    #[test]
    fn sets_len() {
        fn test(map: Map<u32, u16>, key: u32, value: u16) -> bool {
            let new = map.insert(key, value);
            new.len() == map.len() + if map.contains_key(&key) { 0 } else { 1 }
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn inserts_key() {
        fn test(map: Map<u32, u16>, key: u32, value: u16) -> bool {
            let new = map.insert(key, value);

            new.contains_key(&key) &&
            new.get(&key) == Some(&value) &&
            new.iter().filter(|e| *e.0 == key).collect::<Vec<_>>() == [(&key, &value)]
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn leaves_receiver_unchanged() {
        fn test(map: Map<u32, u16>, key: u32, value: u16) -> bool {
            let before: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
            let _new = map.insert(key, value);
            map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>() == before
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn affects_no_others() {
        fn test(map: Map<u32, u16>, key: u32, value: u16) -> bool {
            let new = map.insert(key, value);

            new.iter().filter(|e| *e.0 != key).collect::<Vec<_>>() ==
                map.iter().filter(|e| *e.0 != key).collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn keeps_invariants() {
        fn test(map: Map<u32, u16>, key: u32, value: u16) -> bool {
            map.insert(key, value).invariants()
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn is_idempotent() {
        fn test(map: Map<u32, u16>, key: u32, value: u16) -> bool {
            let once = map.insert(key, value);
            once.insert(key, value) == once
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }

    #[test]
    fn try_insert_rejects_present_keys() {
        fn test(map: Map<u32, u16>, key: u32, value: u16) -> bool {
            map.try_insert(key, value).is_ok() != map.contains_key(&key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32, u16) -> bool);
    }
}

mod change {
    use quickcheck::quickcheck;
    use pavl::Map;

    #[test]
    fn agrees_with_insert_and_remove() {
        fn test(map: Map<u32, u16>, key: u32, value: Option<u16>) -> bool {
            let changed = map.change(key, |_| value);

            match value {
                Some(value) => changed == map.insert(key, value),
                None => changed == map.remove(&key),
            }
        }

        quickcheck(test as fn(Map<u32, u16>, u32, Option<u16>) -> bool);
    }

    #[test]
    fn sees_current_value() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            let mut seen = None;
            let _ = map.change(key, |v| { seen = Some(v.cloned()); None });
            seen == Some(map.get(&key).cloned())
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    #[test]
    fn update_always_inserts() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            let new = map.update(key, |v| v.map_or(0, |v| v.wrapping_add(1)));
            new.get(&key) == Some(&map.get(&key).map_or(0, |v| v.wrapping_add(1)))
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }
}

mod closest {
    use quickcheck::quickcheck;
    use pavl::Closest::*;
    use pavl::Map;

    #[test]
    fn agrees_with_iter() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            map.closest(GreaterOrEqual, &key) == map.iter().find(|e| *e.0 >= key) &&
            map.closest(GreaterThan, &key) == map.iter().find(|e| *e.0 > key) &&
            map.closest(LessOrEqual, &key) == map.iter().rev().find(|e| *e.0 <= key) &&
            map.closest(LessThan, &key) == map.iter().rev().find(|e| *e.0 < key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    #[test]
    fn pred_and_succ_agree_with_closest() {
        fn test(map: Map<u32, u16>, key: u32, inclusive: bool) -> bool {
            let (lower, upper) = if inclusive {
                (LessOrEqual, GreaterOrEqual)
            } else {
                (LessThan, GreaterThan)
            };

            map.pred(&key, inclusive) == map.closest(lower, &key) &&
            map.succ(&key, inclusive) == map.closest(upper, &key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32, bool) -> bool);
    }
}

mod first {
    use quickcheck::quickcheck;
    use pavl::Map;

    #[test]
    fn agrees_with_iter() {
        fn test(map: Map<u32, u16>) -> bool {
            map.first() == map.iter().next() && map.last() == map.iter().next_back()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }
}

mod iter {
    use pavl::Order;
    use quickcheck::quickcheck;
    use pavl::Map;
    use std::ops::Bound::Unbounded;

    #[test]
    fn ascends() {
        fn test(map: Map<u32, u16>) -> bool {
            map.iter().zip(map.iter().skip(1)).all(|(e1, e2)| e1.0 < e2.0)
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn descends_when_reversed() {
        fn test(map: Map<u32, u16>) -> bool {
            map.iter().rev().zip(map.iter().rev().skip(1)).all(|(e2, e1)| e2.0 > e1.0)
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn size_hint_is_exact() {
        fn test(map: Map<u32, u16>) -> bool {
            let mut len = map.len();
            let mut it = map.iter();

            loop {
                if it.size_hint() != (len, Some(len)) { return false; }
                if it.next().is_none() { break; }
                len -= 1;
            }

            len == 0 && it.size_hint() == (0, Some(0))
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn meets_in_the_middle() {
        fn test(map: Map<u32, u16>, fronts: usize) -> bool {
            let mut it = map.iter();
            let mut seen = vec![];

            for i in 0usize.. {
                let e = if i % (fronts % 4 + 2) == 0 { it.next_back() } else { it.next() };
                match e {
                    Some(e) => seen.push(*e.0),
                    None => break,
                }
            }

            seen.sort();
            seen == map.keys().cloned().collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>, usize) -> bool);
    }

    #[test]
    fn into_iter_agrees_with_iter() {
        fn test(map: Map<u32, u16>) -> bool {
            let owned: Vec<_> = map.clone().into_iter().collect();
            owned == map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn sequences_agree_with_pairs() {
        fn test(map: Map<u32, u16>) -> bool {
            let up: Vec<_> = map.to_sequence::<u32, u32>(Order::Ascending, Unbounded, Unbounded)
                .map(|(k, v)| (*k, *v)).collect();
            let down: Vec<_> = map.to_sequence::<u32, u32>(Order::Descending, Unbounded, Unbounded)
                .map(|(k, v)| (*k, *v)).collect();

            up == map.to_pairs(Order::Ascending) && down == map.to_pairs(Order::Descending)
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }
}

mod range {
    use quickcheck::{Arbitrary, Gen, quickcheck};
    use std::ops::Bound::*;
    use pavl::Map;

    #[derive(Clone, Debug)]
    struct Bound<T>(std::ops::Bound<T>);

    impl<T> Bound<T> {
        fn as_ref(&self) -> std::ops::Bound<&T> {
            match self.0 {
                Included(ref t) => Included(t),
                Excluded(ref t) => Excluded(t),
                Unbounded => Unbounded,
            }
        }
    }

    impl<T> Arbitrary for Bound<T> where T: Arbitrary {
        fn arbitrary(gen: &mut Gen) -> Self {
            Bound(match u8::arbitrary(gen) % 3 {
                0 => Included(T::arbitrary(gen)),
                1 => Excluded(T::arbitrary(gen)),
                _ => Unbounded,
            })
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            match self.0 {
                Included(ref t) => Box::new(t.shrink().map(|t| Bound(Included(t)))),
                Excluded(ref t) => Box::new(t.shrink().map(|t| Bound(Excluded(t)))),
                Unbounded => Box::new(None.into_iter()),
            }
        }
    }

    fn filtered<'a>(map: &'a Map<u32, u16>, min: &Bound<u32>, max: &Bound<u32>)
        -> Vec<(&'a u32, &'a u16)> {

        map.iter()
            .skip_while(|e| match min.0 {
                Included(ref t) => e.0 < t,
                Excluded(ref t) => e.0 <= t,
                Unbounded => false,
            })
            .take_while(|e| match max.0 {
                Included(ref t) => e.0 <= t,
                Excluded(ref t) => e.0 < t,
                Unbounded => true,
            })
            .collect()
    }

    #[test]
    fn range() {
        fn test(map: Map<u32, u16>, min: Bound<u32>, max: Bound<u32>) -> bool {
            map.range(min.as_ref(), max.as_ref()).collect::<Vec<_>>() == filtered(&map, &min, &max)
        }

        quickcheck(test as fn(Map<u32, u16>, Bound<u32>, Bound<u32>) -> bool);
    }

    #[test]
    fn range_rev() {
        fn test(map: Map<u32, u16>, min: Bound<u32>, max: Bound<u32>) -> bool {
            let mut expected = filtered(&map, &min, &max);
            expected.reverse();
            map.range(min.as_ref(), max.as_ref()).rev().collect::<Vec<_>>() == expected
        }

        quickcheck(test as fn(Map<u32, u16>, Bound<u32>, Bound<u32>) -> bool);
    }

    #[test]
    fn len_is_exact() {
        fn test(map: Map<u32, u16>, min: Bound<u32>, max: Bound<u32>) -> bool {
            map.range(min.as_ref(), max.as_ref()).len() == filtered(&map, &min, &max).len()
        }

        quickcheck(test as fn(Map<u32, u16>, Bound<u32>, Bound<u32>) -> bool);
    }
}

mod split {
    use quickcheck::quickcheck;
    use pavl::Map;

    #[test]
    fn partitions_around_key() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            let (lt, found, gt) = map.split(&key);

            lt.invariants() && gt.invariants() &&
            lt.keys().all(|k| *k < key) && gt.keys().all(|k| *k > key) &&
            found == map.get(&key).map(|v| (key, *v)) &&
            lt.len() + gt.len() + found.iter().count() == map.len()
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }

    #[test]
    fn append_rejoins() {
        fn test(map: Map<u32, u16>, key: u32) -> bool {
            let (lt, _, gt) = map.split(&key);
            let joined = lt.append(&gt).unwrap();
            joined.invariants() && joined == map.remove(&key)
        }

        quickcheck(test as fn(Map<u32, u16>, u32) -> bool);
    }
}

mod merge {
    use pavl::{DiffElement, Map, MergeElement};
    use quickcheck::quickcheck;

    #[test]
    fn union_contains_both() {
        fn test(a: Map<u16, u8>, b: Map<u16, u8>) -> bool {
            let union = a.merge(&b, |_, e| match e {
                MergeElement::Left(v) | MergeElement::Right(v) | MergeElement::Both(v, _) => Some(*v),
            });

            union.invariants() &&
            union.keys().all(|k| a.contains_key(k) || b.contains_key(k)) &&
            a.keys().all(|k| union.get(k) == a.get(k)) &&
            b.keys().all(|k| union.contains_key(k))
        }

        quickcheck(test as fn(Map<u16, u8>, Map<u16, u8>) -> bool);
    }

    #[test]
    fn calls_in_ascending_order() {
        fn test(a: Map<u16, u8>, b: Map<u16, u8>) -> bool {
            let mut calls = vec![];
            let _: Map<u16, ()> = a.merge(&b, |k, _| { calls.push(*k); None });

            let mut expected: Vec<_> = a.keys().chain(b.keys()).cloned().collect();
            expected.sort();
            expected.dedup();
            calls == expected
        }

        quickcheck(test as fn(Map<u16, u8>, Map<u16, u8>) -> bool);
    }

    #[test]
    fn agrees_with_symmetric_diff() {
        fn test(a: Map<u16, u8>, b: Map<u16, u8>) -> bool {
            let diff: Map<u16, DiffElement<u8>> = a.merge(&b, |_, e| match e {
                MergeElement::Left(v) => Some(DiffElement::Left(*v)),
                MergeElement::Right(v) => Some(DiffElement::Right(*v)),
                MergeElement::Both(l, r) if l != r => Some(DiffElement::Unequal(*l, *r)),
                MergeElement::Both(..) => None,
            });

            let lazy: Vec<_> = a.symmetric_diff(&b, |l, r| l == r).map(|(k, e)| (*k, match e {
                DiffElement::Left(v) => DiffElement::Left(*v),
                DiffElement::Right(v) => DiffElement::Right(*v),
                DiffElement::Unequal(l, r) => DiffElement::Unequal(*l, *r),
            })).collect();

            diff.to_pairs(pavl::Order::Ascending) == lazy
        }

        quickcheck(test as fn(Map<u16, u8>, Map<u16, u8>) -> bool);
    }

    #[test]
    fn diff_against_self_is_empty() {
        fn test(a: Map<u16, u8>) -> bool {
            a.symmetric_diff(&a, |_, _| false).next().is_none()
        }

        quickcheck(test as fn(Map<u16, u8>) -> bool);
    }

    #[test]
    fn diff_after_edit_is_the_edit() {
        fn test(a: Map<u16, u8>, key: u16, value: u8) -> bool {
            let b = a.insert(key, value);
            let diff: Vec<_> = a.symmetric_diff(&b, |l, r| l == r).collect();

            match a.get(&key) {
                None => diff == [(&key, DiffElement::Right(&value))],
                Some(old) if *old == value => diff.is_empty(),
                Some(old) => diff == [(&key, DiffElement::Unequal(old, &value))],
            }
        }

        quickcheck(test as fn(Map<u16, u8>, u16, u8) -> bool);
    }
}

mod transform {
    use quickcheck::quickcheck;
    use pavl::Map;

    #[test]
    fn filter_agrees_with_iter() {
        fn test(map: Map<u32, u16>) -> bool {
            let even = map.filter(|_, v| v % 2 == 0);

            even.invariants() &&
            even.iter().collect::<Vec<_>>() == map.iter().filter(|e| e.1 % 2 == 0).collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn partition_agrees_with_filter() {
        fn test(map: Map<u32, u16>) -> bool {
            let (yes, no) = map.partition(|k, _| k % 3 == 0);

            yes.invariants() && no.invariants() &&
            yes == map.filter(|k, _| k % 3 == 0) &&
            no == map.filter(|k, _| k % 3 != 0)
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn map_keeps_keys() {
        fn test(map: Map<u32, u16>) -> bool {
            let doubled = map.map(|v| u32::from(*v) * 2);

            doubled.invariants() &&
            doubled.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>() ==
                map.iter().map(|(k, v)| (*k, u32::from(*v) * 2)).collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn filter_map_agrees_with_iter() {
        fn test(map: Map<u32, u16>) -> bool {
            let f = |k: &u32, v: &u16| if k % 2 == 0 { Some(k.wrapping_add(u32::from(*v))) } else { None };
            let filtered = map.filter_map(f);

            filtered.invariants() &&
            filtered.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>() ==
                map.iter().filter_map(|(k, v)| f(k, v).map(|w| (*k, w))).collect::<Vec<_>>()
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }
}

mod create {
    use pavl::{Error, Map, Order};
    use quickcheck::quickcheck;

    #[test]
    fn sorted_round_trip() {
        fn test(map: Map<u32, u16>) -> bool {
            let up: Map<u32, u16> = Map::try_from_sorted(map.to_pairs(Order::Ascending)).unwrap();
            let down: Map<u32, u16> = Map::try_from_sorted(map.to_pairs(Order::Descending)).unwrap();
            up.invariants() && down.invariants() && up == map && down == map
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn unchecked_sorted_round_trip() {
        fn test(map: Map<u32, u16>) -> bool {
            let copy: Map<u32, u16> = Map::from_sorted_unchecked(map.to_pairs(Order::Ascending));
            copy.invariants() && copy == map
        }

        quickcheck(test as fn(Map<u32, u16>) -> bool);
    }

    #[test]
    fn from_pairs_reports_duplicates() {
        fn test(pairs: Vec<(u8, u8)>) -> bool {
            let mut keys: Vec<_> = pairs.iter().map(|p| p.0).collect();
            keys.sort();
            let unique = keys.windows(2).all(|w| w[0] != w[1]);

            let first: Result<Map<u8, u8>, _> = Map::try_from_pairs(pairs.clone());
            let all: Result<Map<u8, u8>, _> = Map::try_from_pairs_all(pairs.clone());

            match (first, all) {
                (Ok(a), Ok(b)) => unique && a == b && a.len() == pairs.len() && a.invariants(),
                (Err(Error::DuplicateKey(_)), Err(Error::DuplicateKeys(dups))) =>
                    !unique && dups.len() == pairs.len() - keys.windows(2).filter(|w| w[0] != w[1]).count() - 1,
                _ => false,
            }
        }

        quickcheck(test as fn(Vec<(u8, u8)>) -> bool);
    }

    #[test]
    fn push_agrees_with_pairs() {
        fn test(pairs: Vec<(u8, u8)>) -> bool {
            let pushed: Result<Map<u8, u8>, _> = Map::try_from_push(|push| {
                for (k, v) in pairs.iter().cloned() { push(k, v); }
            });

            pushed == Map::try_from_pairs(pairs.clone())
        }

        quickcheck(test as fn(Vec<(u8, u8)>) -> bool);
    }

    #[test]
    fn collect_keeps_last() {
        fn test(pairs: Vec<(u8, u8)>) -> bool {
            let map: Map<u8, u8> = pairs.iter().cloned().collect();
            map.invariants() && map.iter().all(|(k, v)| pairs.iter().rev().find(|p| p.0 == *k).map(|p| &p.1) == Some(v))
        }

        quickcheck(test as fn(Vec<(u8, u8)>) -> bool);
    }
}
