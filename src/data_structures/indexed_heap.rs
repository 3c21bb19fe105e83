use crate::Weight;

/// Marker for an item that is not currently on the heap.
const ABSENT: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Entry {
    item: usize,
    key: Weight,
}

/// An indexed binary min-heap over dense item ids in `[0, max_items)`.
///
/// In addition to the usual insert and delete-min operations, the heap keeps
/// a side array mapping each item to its current heap position, which makes
/// `decrease_key` an O(log n) operation. This is the priority queue driving
/// every Dijkstra call in the solver; the heap is allocated once per worker
/// and reused across calls.
#[derive(Debug)]
pub struct IndexedHeap {
    entries: Vec<Entry>,
    /// Position of each item in `entries`, or `ABSENT`.
    pos: Vec<usize>,
}

impl IndexedHeap {
    /// Creates an empty heap able to hold items `0..max_items`.
    pub fn with_capacity(max_items: usize) -> Self {
        IndexedHeap {
            entries: Vec::with_capacity(max_items),
            pos: vec![ABSENT; max_items],
        }
    }

    /// Returns the number of items on the heap.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the heap holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `item` is currently on the heap.
    pub fn contains(&self, item: usize) -> bool {
        self.pos[item] != ABSENT
    }

    /// Inserts an item that must not already be present.
    pub fn insert(&mut self, item: usize, key: Weight) {
        debug_assert!(!self.contains(item), "item {item} already on the heap");
        let i = self.entries.len();
        self.entries.push(Entry { item, key });
        self.pos[item] = i;
        self.sift_up(i);
    }

    /// Returns the item with the smallest key without removing it.
    pub fn min(&self) -> Option<(usize, Weight)> {
        self.entries.first().map(|e| (e.item, e.key))
    }

    /// Removes and returns the item with the smallest key.
    ///
    /// Ties are broken arbitrarily but deterministically within a run.
    pub fn delete_min(&mut self) -> Option<(usize, Weight)> {
        let min = *self.entries.first()?;
        self.pos[min.item] = ABSENT;
        let last = self.entries.pop().expect("heap is non-empty");
        if !self.entries.is_empty() {
            self.entries[0] = last;
            self.pos[last.item] = 0;
            self.sift_down(0);
        }
        Some((min.item, min.key))
    }

    /// Lowers the key of an item already on the heap.
    ///
    /// `new_key` must not exceed the item's current key; an equal key is a
    /// permitted no-op.
    pub fn decrease_key(&mut self, item: usize, new_key: Weight) {
        let i = self.pos[item];
        debug_assert!(i != ABSENT, "item {item} not on the heap");
        debug_assert!(new_key <= self.entries[i].key, "key increase on item {item}");
        if new_key == self.entries[i].key {
            return;
        }
        self.entries[i].key = new_key;
        self.sift_up(i);
    }

    /// Removes all items.
    pub fn clear(&mut self) {
        for e in self.entries.drain(..) {
            self.pos[e.item] = ABSENT;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        let e = self.entries[i];
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[parent].key <= e.key {
                break;
            }
            self.entries[i] = self.entries[parent];
            self.pos[self.entries[i].item] = i;
            i = parent;
        }
        self.entries[i] = e;
        self.pos[e.item] = i;
    }

    fn sift_down(&mut self, mut i: usize) {
        let e = self.entries[i];
        let n = self.entries.len();
        loop {
            let mut child = 2 * i + 1;
            if child >= n {
                break;
            }
            if child + 1 < n && self.entries[child + 1].key < self.entries[child].key {
                child += 1;
            }
            if e.key <= self.entries[child].key {
                break;
            }
            self.entries[i] = self.entries[child];
            self.pos[self.entries[i].item] = i;
            i = child;
        }
        self.entries[i] = e;
        self.pos[e.item] = i;
    }
}
