//! Ordered set of distinct indices
//!
//! A sorted, duplicate-free vector with binary-search membership. Used by the
//! chained hash map to remember which digests have buckets so that iteration
//! can walk them in ascending order.

use std::fmt;

/// Sorted set of distinct values backed by a contiguous vector
///
/// # Performance Characteristics
///
/// - **Lookup**: O(log n) binary search
/// - **Insert/Remove**: O(n) worst case for the element shift
/// - **Iteration**: contiguous, ascending
///
/// # Example
///
/// ```rust
/// use chainmap::containers::OrderedIndexSet;
///
/// let mut set = OrderedIndexSet::new();
/// set.add(30u32);
/// set.add(10);
/// set.add(20);
/// set.add(10);
///
/// assert!(set.includes(&20));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![10, 20, 30]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OrderedIndexSet<T> {
    items: Vec<T>,
}

impl<T: Ord> OrderedIndexSet<T> {
    /// Create an empty set
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty set with room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity) }
    }

    /// Insert `value`, keeping ascending order
    ///
    /// Returns `false` and leaves the set untouched if the value is already present.
    pub fn add(&mut self, value: T) -> bool {
        match self.items.binary_search(&value) {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, value);
                true
            }
        }
    }

    /// Check whether `value` is in the set
    pub fn includes(&self, value: &T) -> bool {
        self.items.binary_search(value).is_ok()
    }

    /// Remove `value`, returning whether it was present
    pub fn remove(&mut self, value: &T) -> bool {
        match self.items.binary_search(value) {
            Ok(pos) => {
                self.items.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Smallest value
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Largest value
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

impl<T> OrderedIndexSet<T> {
    /// Number of values
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Ascending iterator over the values
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The values as an ascending slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Ord> Default for OrderedIndexSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedIndexSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a OrderedIndexSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Ord> FromIterator<T> for OrderedIndexSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut items: Vec<T> = iter.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self { items }
    }
}

impl<T: Ord> Extend<T> for OrderedIndexSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        let set: OrderedIndexSet<u32> = OrderedIndexSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.includes(&0));
        assert_eq!(set.first(), None);
        assert_eq!(set.iter().next(), None);
    }

    #[test]
    fn test_add_keeps_ascending_order() {
        let mut set = OrderedIndexSet::with_capacity(8);
        for value in [50u32, 3, 17, 99, 0, 42] {
            assert!(set.add(value));
        }
        assert_eq!(set.as_slice(), &[0, 3, 17, 42, 50, 99]);
        assert_eq!(set.first(), Some(&0));
        assert_eq!(set.last(), Some(&99));
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut set = OrderedIndexSet::new();
        assert!(set.add(7u32));
        assert!(!set.add(7));
        assert!(!set.add(7));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_includes_and_remove() {
        let mut set: OrderedIndexSet<u32> = [5, 1, 9].into_iter().collect();
        assert!(set.includes(&1));
        assert!(!set.includes(&2));

        assert!(set.remove(&5));
        assert!(!set.remove(&5));
        assert_eq!(set.as_slice(), &[1, 9]);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_iter_and_extend_dedup() {
        let mut set: OrderedIndexSet<u32> = vec![4, 4, 2, 8, 2].into_iter().collect();
        assert_eq!(set.as_slice(), &[2, 4, 8]);

        set.extend([8, 6, 0]);
        let collected: Vec<u32> = (&set).into_iter().copied().collect();
        assert_eq!(collected, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_extreme_values() {
        let mut set = OrderedIndexSet::new();
        set.add(u32::MAX);
        set.add(0);
        set.add(u32::MAX / 2);
        assert_eq!(set.as_slice(), &[0, u32::MAX / 2, u32::MAX]);
    }

    #[test]
    fn test_debug_format() {
        let set: OrderedIndexSet<u32> = [3, 1].into_iter().collect();
        assert_eq!(format!("{:?}", set), "{1, 3}");
    }
}
