//! A helper struct for maintaining the `k` smallest keys seen so far.

use crate::FloatNumber;

/// A fixed-capacity set of the `k` smallest keys inserted so far, each paired
/// with the index of a point.
///
/// The entries are kept sorted in ascending order of key, so the worst key and
/// the entry of any rank can be read directly. Finding the insertion position
/// takes `O(log k)` comparisons.
///
/// The relative order of entries with equal keys is unspecified.
#[derive(Debug, Clone)]
pub struct MinK<T> {
    /// The entries, sorted by increasing key.
    items: Vec<(T, usize)>,
    /// The maximum number of entries.
    k: usize,
}

impl<T: FloatNumber> MinK<T> {
    /// Creates a new, empty `MinK` with capacity `k`.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            items: Vec::with_capacity(k),
            k,
        }
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Inserts a key with its point index.
    ///
    /// If the structure is full, the entry with the largest key is evicted to
    /// make room. If the structure is full and `key` is not smaller than the
    /// current worst key, nothing happens.
    pub fn insert(&mut self, key: T, index: usize) {
        if self.is_full() {
            match self.items.last() {
                Some(&(worst, _)) if key < worst => {
                    self.items.pop();
                }
                _ => return,
            }
        }
        let pos = self.items.partition_point(|&(d, _)| d <= key);
        self.items.insert(pos, (key, index));
    }

    /// Returns the largest key held, to be used as the pruning bound.
    ///
    /// This is `+∞` while fewer than `k` entries are held, so nothing is pruned
    /// until the structure is full. With `k == 0` no key can ever be accepted,
    /// and this is `-∞`.
    #[must_use]
    pub fn worst_key(&self) -> T {
        if self.k == 0 {
            T::neg_infinity()
        } else if self.is_full() {
            self.items.last().map_or_else(T::infinity, |&(d, _)| d)
        } else {
            T::infinity()
        }
    }

    /// Returns the entry of ascending rank `i`, if there is one.
    #[must_use]
    pub fn kth_smallest(&self, i: usize) -> Option<(T, usize)> {
        self.items.get(i).copied()
    }

    /// Returns the number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns whether `k` entries are held.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() == self.k
    }

    /// Consumes the `MinK` and returns the entries in ascending order of key.
    pub fn items(self) -> impl Iterator<Item = (T, usize)> {
        self.items.into_iter()
    }

    /// Inserts every entry of `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        for (d, i) in other.items() {
            self.insert(d, i);
        }
    }
}
