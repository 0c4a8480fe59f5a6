use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;

use parking_lot::RwLock;

use crate::error::Result;
use crate::local_bimap::{Entry, Extra, LocalBiMap};

/// A thread-safe bidirectional map with ordered pagination.
///
/// `BiMap` guards one [`LocalBiMap`] with a single reader/writer lock, so its
/// forward index, reverse index and key order always change together. Lookups
/// and range queries take the lock shared; writes take it exclusively. Every
/// call is linearizable, but separate calls do not compose: a caller that
/// checks and then sets must synchronize externally.
///
/// Because the lock is released before a call returns, results are returned
/// as owned clones.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use wabi_bimap::BiMap;
///
/// let numbers: Arc<BiMap<String, String>> = Arc::new(BiMap::new());
///
/// let writers: Vec<_> = (0..4)
///     .map(|t| {
///         let numbers = Arc::clone(&numbers);
///         thread::spawn(move || {
///             for i in 0..25 {
///                 numbers.set(format!("short-{t}-{i}"), format!("+1-555-{t}{i:03}"));
///             }
///         })
///     })
///     .collect();
/// for writer in writers {
///     writer.join().unwrap();
/// }
///
/// assert_eq!(numbers.len(), 100);
/// assert_eq!(numbers.get_by_value("+1-555-2007").as_deref(), Some("short-2-7"));
/// ```
pub struct BiMap<K, V, E = Extra> {
    inner: RwLock<LocalBiMap<K, V, E>>,
}

impl<K, V, E> BiMap<K, V, E> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::from(LocalBiMap::new())
    }

    /// Creates an empty map with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(LocalBiMap::with_capacity(capacity))
    }

    /// Consumes the lock, returning the unsynchronized map.
    #[must_use]
    pub fn into_inner(self) -> LocalBiMap<K, V, E> {
        self.inner.into_inner()
    }

    /// Returns a mutable reference to the underlying map. No locking is needed
    /// since the borrow is exclusive.
    pub fn get_mut(&mut self) -> &mut LocalBiMap<K, V, E> {
        self.inner.get_mut()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the map holds no entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns how many entries the map can hold before any index reallocates.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<K, V, E> BiMap<K, V, E>
where
    K: Clone + Ord + Hash,
    V: Clone + Eq + Hash,
{
    /// Maps `key` to `value` and back, with no payload.
    ///
    /// See [`LocalBiMap::set`] for how key and value collisions are resolved.
    /// Returns the entry evicted because it held `value`, if any.
    pub fn set(&self, key: K, value: V) -> Option<Entry<K, V, E>> {
        self.inner.write().set(key, value)
    }

    /// Maps `key` to `value` and back, storing `extra` with the mapping.
    pub fn set_with_extra(&self, key: K, value: V, extra: E) -> Option<Entry<K, V, E>> {
        self.inner.write().set_with_extra(key, value, extra)
    }

    /// Returns a clone of the value mapped to `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.read().get(key).cloned()
    }

    /// Returns a clone of the key mapped to `value`.
    #[must_use]
    pub fn get_by_value<Q>(&self, value: &Q) -> Option<K>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.read().get_by_value(value).cloned()
    }

    /// Returns `true` if `key` is mapped to a value.
    ///
    /// # Complexity
    ///
    /// Expected O(1)
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.read().contains_key(key)
    }

    /// Returns `true` if some key is mapped to `value`.
    ///
    /// # Complexity
    ///
    /// Expected O(1)
    #[must_use]
    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.read().contains_value(value)
    }

    /// Returns the position of `key` in ascending key order.
    #[must_use]
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.inner.read().position(key)
    }

    /// Removes `key` and its value. Deleting an absent key is a no-op.
    pub fn delete<Q>(&self, key: &Q) -> Option<Entry<K, V, E>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        self.inner.write().delete(key)
    }

    /// Removes `value` and the key mapped to it.
    pub fn delete_by_value<Q>(&self, value: &Q) -> Option<Entry<K, V, E>>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.write().delete_by_value(value)
    }
}

impl<K, V, E> BiMap<K, V, E>
where
    K: Clone + Ord + Hash,
    V: Clone + Eq + Hash,
    E: Clone,
{
    /// Returns clones of the value and payload mapped to `key`.
    #[must_use]
    pub fn get_extra<Q>(&self, key: &Q) -> Option<(V, Option<E>)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.read().get_extra(key).map(|(value, extra)| (value.clone(), extra.cloned()))
    }

    /// Returns a clone of the entry at `position` in ascending key order.
    #[must_use]
    pub fn get_by_position(&self, position: usize) -> Option<Entry<K, V, E>> {
        self.inner.read().get_by_position(position).map(|(key, value, extra)| Entry {
            key: key.clone(),
            value: value.clone(),
            extra: extra.cloned(),
        })
    }

    /// Returns one page of entries in ascending key order.
    ///
    /// See [`LocalBiMap::get_range`] for the window rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeStart`](crate::Error::NegativeStart) if `start` is negative.
    pub fn get_range(&self, start: i64, limit: i64) -> Result<Vec<Entry<K, V, E>>> {
        self.inner.read().get_range(start, limit)
    }
}

impl<K, V, E> Default for BiMap<K, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> From<LocalBiMap<K, V, E>> for BiMap<K, V, E> {
    fn from(map: LocalBiMap<K, V, E>) -> Self {
        Self {
            inner: RwLock::new(map),
        }
    }
}

impl<K, V, E> FromIterator<(K, V)> for BiMap<K, V, E>
where
    K: Clone + Ord + Hash,
    V: Clone + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<LocalBiMap<K, V, E>>())
    }
}

impl<K, V, E, const N: usize> From<[(K, V); N]> for BiMap<K, V, E>
where
    K: Clone + Ord + Hash,
    V: Clone + Eq + Hash,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from(LocalBiMap::from(pairs))
    }
}

impl<K, V, E> fmt::Debug for BiMap<K, V, E>
where
    K: fmt::Debug + Hash + Eq,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BiMap").field(&*self.inner.read()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::String;
    use static_assertions::assert_impl_all;

    assert_impl_all!(BiMap<String, String>: Send, Sync, Default);
    assert_impl_all!(BiMap<u64, String, Vec<u8>>: Send, Sync);

    #[test]
    fn into_inner_keeps_entries() {
        let map: BiMap<u8, u8, ()> = BiMap::from([(1, 2), (3, 4)]);
        map.set(5, 6);
        let local = map.into_inner();
        assert_eq!(local.len(), 3);
        assert_eq!(local.get_by_value(&6), Some(&5));
    }

    #[test]
    fn get_mut_bypasses_the_lock() {
        let mut map: BiMap<u8, u8, ()> = BiMap::new();
        map.get_mut().set(1, 1);
        assert_eq!(map.get(&1), Some(1));
    }

    #[test]
    fn debug_shows_the_guarded_map() {
        let map: BiMap<u8, u8, ()> = BiMap::from([(2, 3)]);
        assert_eq!(alloc::format!("{map:?}"), "BiMap({2: 3})");
    }
}
