use fast_steiner::data_structures::IndexedHeap;

#[test]
fn empty_heap_has_no_min() {
    let mut heap = IndexedHeap::with_capacity(8);
    assert!(heap.is_empty());
    assert_eq!(heap.min(), None);
    assert_eq!(heap.delete_min(), None);
}

#[test]
fn delete_min_drains_in_key_order() {
    let mut heap = IndexedHeap::with_capacity(16);
    let keys = [42, 7, 19, 3, 25, 11, 0, 38];
    for (item, &key) in keys.iter().enumerate() {
        heap.insert(item, key);
    }
    assert_eq!(heap.len(), keys.len());

    let mut drained = Vec::new();
    while let Some((_, key)) = heap.delete_min() {
        drained.push(key);
    }
    let mut sorted = keys.to_vec();
    sorted.sort();
    assert_eq!(drained, sorted);
    assert!(heap.is_empty());
}

#[test]
fn min_peeks_without_removing() {
    let mut heap = IndexedHeap::with_capacity(4);
    heap.insert(0, 10);
    heap.insert(1, 5);
    assert_eq!(heap.min(), Some((1, 5)));
    assert_eq!(heap.len(), 2);
    assert_eq!(heap.delete_min(), Some((1, 5)));
    assert_eq!(heap.min(), Some((0, 10)));
}

#[test]
fn decrease_key_reorders_items() {
    let mut heap = IndexedHeap::with_capacity(8);
    for item in 0..8 {
        heap.insert(item, 100 + item as i64);
    }
    heap.decrease_key(7, 1);
    heap.decrease_key(4, 2);
    assert_eq!(heap.delete_min(), Some((7, 1)));
    assert_eq!(heap.delete_min(), Some((4, 2)));
    assert_eq!(heap.delete_min(), Some((0, 100)));
}

#[test]
fn decrease_key_to_equal_key_is_a_no_op() {
    let mut heap = IndexedHeap::with_capacity(4);
    heap.insert(2, 9);
    heap.insert(3, 4);
    heap.decrease_key(2, 9);
    assert_eq!(heap.delete_min(), Some((3, 4)));
    assert_eq!(heap.delete_min(), Some((2, 9)));
}

#[test]
fn contains_tracks_membership() {
    let mut heap = IndexedHeap::with_capacity(4);
    heap.insert(1, 3);
    assert!(heap.contains(1));
    assert!(!heap.contains(0));
    heap.delete_min();
    assert!(!heap.contains(1));
}

#[test]
fn clear_allows_reuse() {
    let mut heap = IndexedHeap::with_capacity(4);
    for item in 0..4 {
        heap.insert(item, item as i64);
    }
    heap.clear();
    assert!(heap.is_empty());
    assert!(!heap.contains(2));
    heap.insert(2, 1);
    assert_eq!(heap.delete_min(), Some((2, 1)));
}

#[test]
fn interleaved_operations_stay_consistent() {
    let mut heap = IndexedHeap::with_capacity(32);
    for item in 0..32 {
        heap.insert(item, 1000 - (item as i64 * 13) % 97);
    }
    for item in (0..32).step_by(3) {
        heap.decrease_key(item, item as i64);
    }
    let mut last = i64::MIN;
    while let Some((_, key)) = heap.delete_min() {
        assert!(key >= last, "heap yielded keys out of order");
        last = key;
    }
}
