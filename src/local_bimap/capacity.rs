use std::collections::HashMap;

use super::LocalBiMap;
use crate::raw::RawRankTree;

impl<K, V, E> LocalBiMap<K, V, E> {
    /// Creates an empty map with room for at least `capacity` entries in each
    /// of its indexes.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_bimap::LocalBiMap;
    ///
    /// let map: LocalBiMap<u32, u32> = LocalBiMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            forward: HashMap::with_capacity(capacity),
            reverse: HashMap::with_capacity(capacity),
            keys: RawRankTree::with_capacity(capacity),
        }
    }

    /// Returns how many entries the map can hold before any index reallocates.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.forward.capacity().min(self.reverse.capacity()).min(self.keys.capacity())
    }
}
