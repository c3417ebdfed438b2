use compare::{Natural, natural};
use quickcheck::{Arbitrary, Gen, TestResult, quickcheck};
use super::*;

/// An operation on a tree.
#[derive(Clone, Debug)]
enum Op<K> {
    /// Insert a key into the tree.
    Insert(K),
    /// Remove the key at index `n % len` from the tree.
    Remove(usize),
    /// Remove a key that may be absent.
    RemoveKey(K),
    /// Split the tree at a key and join the halves back together.
    Split(K),
}

impl<K> Arbitrary for Op<K> where K: Arbitrary {
    fn arbitrary(gen: &mut Gen) -> Op<K> {
        match u8::arbitrary(gen) % 4 {
            0 | 1 => Op::Insert(K::arbitrary(gen)),
            2 => Op::Remove(usize::arbitrary(gen)),
            _ if bool::arbitrary(gen) => Op::RemoveKey(K::arbitrary(gen)),
            _ => Op::Split(K::arbitrary(gen)),
        }
    }
}

impl<K> Op<K> where K: Clone + Ord {
    /// Performs the operation on the given tree.
    fn exec(self, link: &Link<K, ()>) -> Link<K, ()> {
        let cmp: Natural<K> = natural();

        match self {
            Op::Insert(key) => change(link, &cmp, key, |_| Some(())),
            Op::Remove(index) => match nth(link, index % size(link).max(1)) {
                None => link.clone(),
                Some(node) => match remove(link, &cmp, &node.key) {
                    Some(link) => link,
                    None => panic!("nth returned a key that is not in the tree"),
                },
            },
            Op::RemoveKey(key) => remove(link, &cmp, &key).unwrap_or_else(|| link.clone()),
            Op::Split(key) => match split(link, &cmp, &key) {
                (lt, Some((key, value)), gt) => join(lt, key, value, gt),
                (lt, None, gt) => join2(lt, gt),
            },
        }
    }
}

fn keys<K: Clone, V>(link: &Link<K, V>) -> Vec<K> {
    Iter::new(link.as_deref()).map(|(k, _)| k.clone()).collect()
}

fn valid<K: Ord, V>(link: &Link<K, V>) -> bool { invariants(link, &natural::<K>()) }

fn from_keys(keys: impl IntoIterator<Item = u32>) -> Link<u32, ()> {
    let keys: Vec<_> = keys.into_iter().map(|k| (k, ())).collect();
    let len = keys.len();
    from_sorted(&mut keys.into_iter(), len)
}

#[test]
fn test_avl() {
    fn check(ops: Vec<Op<u8>>) -> TestResult {
        let mut link = None;
        for op in ops { link = op.exec(&link); }
        TestResult::from_bool(valid(&link))
    }

    quickcheck(check as fn(_) -> _);
}

#[test]
fn test_ops_preserve_contents() {
    fn check(ops: Vec<Op<u8>>) -> bool {
        let mut link = None;
        let mut model = std::collections::BTreeSet::new();

        for op in ops {
            match op.clone() {
                Op::Insert(key) => { model.insert(key); }
                Op::RemoveKey(key) => { model.remove(&key); }
                Op::Remove(index) => if !model.is_empty() {
                    let key = *model.iter().nth(index % model.len()).unwrap();
                    model.remove(&key);
                },
                Op::Split(_) => {}
            }
            link = op.exec(&link);
        }

        keys(&link) == model.into_iter().collect::<Vec<_>>()
    }

    quickcheck(check as fn(_) -> _);
}

#[test]
fn test_join_uneven() {
    let left = from_keys(0..100);
    let right = from_keys(101..103);
    let link = join(left.clone(), 100, (), right.clone());

    assert!(valid(&link));
    assert_eq!(keys(&link), (0..103).collect::<Vec<_>>());

    let link = join(right, 200, (), from_keys(300..1000));
    assert!(valid(&link));
    assert_eq!(size(&link), 703);
}

#[test]
fn test_join2_empty() {
    let link = from_keys(0..10);
    assert!(ptr_eq(&join2(link.clone(), None), &link));
    assert!(ptr_eq(&join2(None, link.clone()), &link));
}

#[test]
fn test_split() {
    let link = from_keys((0..50).map(|k| k * 2));
    let cmp: Natural<u32> = natural();

    let (lt, found, gt) = split(&link, &cmp, &20);
    assert_eq!(found, Some((20, ())));
    assert_eq!(keys(&lt), (0..10).map(|k| k * 2).collect::<Vec<_>>());
    assert_eq!(keys(&gt), (11..50).map(|k| k * 2).collect::<Vec<_>>());
    assert!(invariants(&lt, &cmp) && invariants(&gt, &cmp));

    let (lt, found, gt) = split(&link, &cmp, &21);
    assert_eq!(found, None);
    assert_eq!(size(&lt), 11);
    assert_eq!(size(&gt), 39);
}

#[test]
fn test_change_unchanged_shares_root() {
    let link = from_keys(0..10);
    let cmp: Natural<u32> = natural();

    assert!(ptr_eq(&change(&link, &cmp, 20, |_| None), &link));
    assert!(remove(&link, &cmp, &20).is_none());
    assert!(!ptr_eq(&change(&link, &cmp, 5, |_| Some(())), &link));
}

#[test]
fn test_single_edit_shares_siblings() {
    let link = from_keys(0..1000);
    let edited = change(&link, &natural::<u32>(), 500, |_| None);

    let old = link.as_ref().unwrap();
    let new = edited.as_ref().unwrap();
    assert!(ptr_eq(&old.left, &new.left) || ptr_eq(&old.right, &new.right));
}

#[test]
fn test_from_sorted_balanced() {
    for len in 0..70 {
        let link = from_keys(0..len);
        assert!(valid(&link));
        assert_eq!(size(&link), len as usize);
    }
}

#[test]
fn test_invariants_detects_disorder() {
    let link = from_keys(vec![3, 2, 1]);
    assert!(!valid(&link));
}

#[test]
fn test_order_statistics() {
    let link = from_keys((0..30).map(|k| k * 3));
    let cmp: Natural<u32> = natural();

    for (i, k) in (0..30).map(|k| k * 3).enumerate() {
        assert_eq!(nth(&link, i).map(|n| n.key), Some(k));
        assert_eq!(rank(&link, &cmp, &k), Some(i));
    }

    assert!(nth(&link, 30).is_none());
    assert_eq!(rank(&link, &cmp, &1), None);
    assert_eq!(count_below(link.as_deref(), &cmp, Bound::Included(&9)), 3);
    assert_eq!(count_below(link.as_deref(), &cmp, Bound::Excluded(&9)), 4);
    assert_eq!(count_above(link.as_deref(), &cmp, Bound::Included(&84)), 1);
    assert_eq!(count_above(link.as_deref(), &cmp, Bound::<&u32>::Unbounded), 0);
}

#[test]
fn test_partition_shares_untouched() {
    let link = from_keys(0..64);
    let (yes, no) = partition(&link, &mut |_: &u32, _: &()| true);
    assert!(ptr_eq(&yes, &link));
    assert!(no.is_none());

    let (yes, no) = partition(&link, &mut |k: &u32, _: &()| k % 3 == 0);
    assert!(valid(&yes) && valid(&no));
    assert_eq!(size(&yes) + size(&no), 64);
}
