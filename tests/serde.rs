#![cfg(feature = "serde")]

use pavl::{Map, Order};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn json_round_trip(map: Map<u16, String>) -> bool {
    let json = serde_json::to_string(&map).unwrap();
    serde_json::from_str::<Map<u16, String>>(&json).unwrap() == map
}

#[quickcheck]
fn tree_serializes_like_map(map: Map<u16, u8>) -> bool {
    serde_json::to_value(map.tree()).unwrap() == serde_json::to_value(&map).unwrap()
}

#[test]
fn serializes_ascending_pairs() {
    let map: Map<_, _> = vec![(2, "b"), (1, "a")].into_iter().collect();
    assert_eq!(serde_json::to_string(&map).unwrap(), r#"[[1,"a"],[2,"b"]]"#);
    assert_eq!(map.to_pairs(Order::Ascending), [(1, "a"), (2, "b")]);
}

#[test]
fn deserializes_unsorted_pairs() {
    let map: Map<u8, u8> = serde_json::from_str("[[3,30],[1,10],[2,20]]").unwrap();
    assert!(map.invariants());
    assert_eq!(map.keys().cloned().collect::<Vec<_>>(), [1, 2, 3]);
}

#[test]
fn rejects_duplicate_keys() {
    let err = serde_json::from_str::<Map<u8, u8>>("[[1,10],[1,11]]").unwrap_err();
    assert!(err.to_string().contains("duplicate key: 1"));

    let err = serde_json::from_str::<Map<u8, u8>>("[[1,10],[2,20],[2,21]]").unwrap_err();
    assert!(err.to_string().contains("duplicate key: 2"));
}
