//! Integration tests for persistent collections
//!
//! Tests AstVec and AstMap: structural sharing, immutability, and the
//! index- and key-based editing operations the typed containers build on.

use astkit_foundation::{AstMap, AstVec};

// =============================================================================
// AstVec
// =============================================================================

#[test]
fn vector_empty() {
    let v: AstVec<i64> = AstVec::new();
    assert!(v.is_empty());
    assert_eq!(v.len(), 0);
}

#[test]
fn vector_push_back() {
    let v = AstVec::new();
    let v = v.push_back(1);
    let v = v.push_back(2);

    assert_eq!(v.len(), 2);
    assert_eq!(v.get(0), Some(&1));
    assert_eq!(v.get(1), Some(&2));
}

#[test]
fn vector_immutability() {
    let v1 = AstVec::new().push_back(1);
    let v2 = v1.push_back(2);

    // v1 is unchanged
    assert_eq!(v1.len(), 1);
    assert_eq!(v2.len(), 2);
}

#[test]
fn vector_first_last() {
    let v: AstVec<i64> = [1, 2, 3].into_iter().collect();
    assert_eq!(v.first(), Some(&1));
    assert_eq!(v.last(), Some(&3));
}

#[test]
fn vector_update() {
    let v: AstVec<i64> = [1, 2].into_iter().collect();

    let v2 = v.update(0, 10).unwrap();
    assert_eq!(v.get(0), Some(&1)); // original unchanged
    assert_eq!(v2.get(0), Some(&10));
}

#[test]
fn vector_update_out_of_bounds() {
    let v: AstVec<i64> = [1].into_iter().collect();
    assert!(v.update(5, 10).is_none());
}

#[test]
fn vector_insert_at() {
    let v: AstVec<i64> = [1, 3].into_iter().collect();

    let v2 = v.insert_at(1, 2).unwrap();
    assert_eq!(v2.get(1), Some(&2));
    assert_eq!(v2.len(), 3);
    assert_eq!(v.len(), 2); // original unchanged

    // Inserting at the length appends; past it fails.
    assert!(v.insert_at(2, 4).is_some());
    assert!(v.insert_at(3, 4).is_none());
}

#[test]
fn vector_remove_at() {
    let v: AstVec<i64> = [1, 2, 3].into_iter().collect();

    let (v2, removed) = v.remove_at(1).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(v2.len(), 2);
    assert_eq!(v.len(), 3); // original unchanged

    assert!(v.remove_at(9).is_none());
}

#[test]
fn vector_pop_back() {
    let v: AstVec<i64> = [1, 2].into_iter().collect();

    let (v2, popped) = v.pop_back().unwrap();
    assert_eq!(popped, 2);
    assert_eq!(v2.len(), 1);

    let empty: AstVec<i64> = AstVec::new();
    assert!(empty.pop_back().is_none());
}

#[test]
fn vector_split_and_concat() {
    let v: AstVec<i64> = [1, 2, 3, 4].into_iter().collect();

    let (left, right) = v.split_at(2);
    assert_eq!(left.len(), 2);
    assert_eq!(right.get(0), Some(&3));

    let joined = left.concat(&right);
    assert_eq!(joined, v);

    // A split past the end leaves the right half empty.
    let (all, rest) = v.split_at(99);
    assert_eq!(all, v);
    assert!(rest.is_empty());
}

#[test]
fn vector_iteration() {
    let v: AstVec<i64> = [1, 2, 3].into_iter().collect();
    let collected: Vec<_> = v.iter().copied().collect();
    assert_eq!(collected, vec![1, 2, 3]);
}

#[test]
fn vector_equality() {
    let v1: AstVec<i64> = [1, 2].into_iter().collect();
    let v2: AstVec<i64> = [1, 2].into_iter().collect();
    let v3: AstVec<i64> = [1, 3].into_iter().collect();

    assert_eq!(v1, v2);
    assert_ne!(v1, v3);
}

// =============================================================================
// AstMap
// =============================================================================

#[test]
fn map_empty() {
    let m: AstMap<&str, i64> = AstMap::new();
    assert!(m.is_empty());
    assert_eq!(m.len(), 0);
}

#[test]
fn map_insert_get() {
    let m = AstMap::new();
    let m = m.insert("a", 1);
    let m = m.insert("b", 2);

    assert_eq!(m.len(), 2);
    assert_eq!(m.get("a"), Some(&1));
    assert_eq!(m.get("b"), Some(&2));
    assert_eq!(m.get("c"), None);
}

#[test]
fn map_overwrite() {
    let m = AstMap::new();
    let m = m.insert("a", 1);
    let m = m.insert("a", 10);

    assert_eq!(m.len(), 1);
    assert_eq!(m.get("a"), Some(&10));
}

#[test]
fn map_immutability() {
    let m1 = AstMap::new().insert("a", 1);
    let m2 = m1.insert("b", 2);

    assert_eq!(m1.len(), 1);
    assert_eq!(m2.len(), 2);
    assert_eq!(m1.get("b"), None);
}

#[test]
fn map_remove() {
    let m = AstMap::new().insert("a", 1).insert("b", 2);

    let (m2, removed) = m.remove("a").unwrap();
    assert_eq!(removed, 1);
    assert!(m.get("a").is_some()); // original unchanged
    assert!(m2.get("a").is_none());
    assert_eq!(m2.len(), 1);

    assert!(m.remove("missing").is_none());
}

#[test]
fn map_contains_key() {
    let m = AstMap::new().insert("a", 1);

    assert!(m.contains_key("a"));
    assert!(!m.contains_key("b"));
}

#[test]
fn map_iterates_in_key_order() {
    let m = AstMap::new().insert("c", 3).insert("a", 1).insert("b", 2);

    let keys: Vec<_> = m.keys().copied().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);

    let values: Vec<_> = m.values().copied().collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn map_equality() {
    let m1 = AstMap::new().insert("a", 1).insert("b", 2);
    let m2 = AstMap::new().insert("b", 2).insert("a", 1); // different order
    let m3 = AstMap::new().insert("a", 1).insert("b", 3); // different value

    assert_eq!(m1, m2);
    assert_ne!(m1, m3);
}

// =============================================================================
// Structural Sharing at Scale
// =============================================================================

#[test]
fn large_vector_clone_is_cheap() {
    let mut v = AstVec::new();
    for i in 0..10_000 {
        v = v.push_back(i);
    }

    // This should be essentially instant due to structural sharing
    let v2 = v.clone();
    assert_eq!(v.len(), v2.len());

    // Modifications create new nodes, don't affect original
    let v3 = v2.push_back(10_000);
    assert_eq!(v.len(), 10_000);
    assert_eq!(v3.len(), 10_001);
}

#[test]
fn large_map_clone_is_cheap() {
    let mut m = AstMap::new();
    for i in 0..10_000 {
        m = m.insert(i, i * 2);
    }

    let m2 = m.clone();
    assert_eq!(m.len(), m2.len());

    // Verify data integrity
    assert_eq!(m2.get(&5_000), Some(&10_000));
}
