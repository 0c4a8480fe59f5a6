use alloc::sync::Arc;
use core::any::Any;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use std::collections::HashMap;

use tracing::trace;

use crate::raw::RawRankTree;

mod capacity;
mod range;

pub use range::Range;

/// The default payload type: an opaque, shareable value the map never inspects.
pub type Extra = Arc<dyn Any + Send + Sync>;

/// A key, its value and its optional payload, as returned by range queries
/// and removals.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Entry<K, V, E = Extra> {
    /// The unique key.
    pub key: K,
    /// The unique value mapped to `key`.
    pub value: V,
    /// The payload stored by [`set_with_extra`](LocalBiMap::set_with_extra), if any.
    pub extra: Option<E>,
}

impl<K, V, E> Entry<K, V, E> {
    /// Drops the payload, returning the mapping alone.
    #[must_use]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

struct Slot<V, E> {
    value: V,
    extra: Option<E>,
}

/// A bidirectional map without internal synchronization.
///
/// Keys map to values and values map back to keys, both in O(1) expected time.
/// Keys are additionally kept in a weight-balanced order-statistic tree so that
/// [`get_range`](LocalBiMap::get_range) can page through entries in ascending
/// key order, and [`position`](LocalBiMap::position) can report where a key sits.
///
/// Both keys and values are unique. Writing a pair whose value is already held
/// by another key evicts that other key:
///
/// ```
/// use wabi_bimap::LocalBiMap;
///
/// let mut routes: LocalBiMap<&str, &str> = LocalBiMap::new();
/// routes.set("alice", "+1-555-0100");
/// routes.set("alice", "+1-555-0199"); // key update: "alice" keeps its slot
/// assert_eq!(routes.get("alice"), Some(&"+1-555-0199"));
/// assert_eq!(routes.get_by_value("+1-555-0100"), None);
///
/// let evicted = routes.set("bob", "+1-555-0199"); // value collision: "alice" is evicted
/// assert_eq!(evicted.map(|entry| entry.key), Some("alice"));
/// assert_eq!(routes.get("alice"), None);
/// assert_eq!(routes.get_by_value("+1-555-0199"), Some(&"bob"));
/// assert_eq!(routes.len(), 1);
/// ```
///
/// Use [`BiMap`](crate::BiMap) to share one map between threads.
pub struct LocalBiMap<K, V, E = Extra> {
    forward: HashMap<K, Slot<V, E>>,
    reverse: HashMap<V, K>,
    keys: RawRankTree<K>,
}

impl<K, V, E> LocalBiMap<K, V, E> {
    /// Creates an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_bimap::LocalBiMap;
    ///
    /// let map: LocalBiMap<String, u64> = LocalBiMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
            keys: RawRankTree::new(),
        }
    }

    /// Returns the number of entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.forward.len(), self.keys.len());
        self.forward.len()
    }

    /// Returns `true` if the map holds no entries.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Removes every entry, keeping allocated capacity in the hash indexes.
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
        self.keys.clear();
        trace!("cleared bimap");
    }
}

impl<K, V, E> LocalBiMap<K, V, E>
where
    K: Clone + Ord + Hash,
    V: Clone + Eq + Hash,
{
    /// Maps `key` to `value` and `value` to `key`, with no payload.
    ///
    /// If `key` was already mapped, its old value is released and the key keeps
    /// its position. If `value` was held by a different key, that key's entry is
    /// removed entirely and returned.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn set(&mut self, key: K, value: V) -> Option<Entry<K, V, E>> {
        self.insert(key, value, None)
    }

    /// Like [`set`](Self::set), but stores `extra` alongside the mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_bimap::LocalBiMap;
    ///
    /// let mut sessions: LocalBiMap<u64, &str, &str> = LocalBiMap::new();
    /// sessions.set_with_extra(7, "user-42", "eu-west");
    /// assert_eq!(sessions.get_extra(&7), Some((&"user-42", Some(&"eu-west"))));
    /// ```
    pub fn set_with_extra(&mut self, key: K, value: V, extra: E) -> Option<Entry<K, V, E>> {
        self.insert(key, value, Some(extra))
    }

    fn insert(&mut self, key: K, value: V, extra: Option<E>) -> Option<Entry<K, V, E>> {
        match self.forward.get(&key) {
            Some(slot) => {
                self.reverse.remove(&slot.value);
            }
            None => {
                self.keys.insert(key.clone());
            }
        }

        // The value's previous holder, if any, is necessarily another key: the
        // key's own old value was released above.
        let evicted = self.reverse.remove(&value).map(|old_key| {
            debug_assert!(old_key != key);
            self.keys.remove(&old_key);
            let slot = self.forward.remove(&old_key).expect("reverse index points at a missing key");
            Entry {
                key: old_key,
                value: slot.value,
                extra: slot.extra,
            }
        });

        self.reverse.insert(value.clone(), key.clone());
        self.forward.insert(key, Slot { value, extra });

        if evicted.is_some() {
            trace!(len = self.forward.len(), "value collision evicted the previous key");
        }
        evicted
    }

    /// Returns the value mapped to `key`.
    ///
    /// # Complexity
    ///
    /// O(1) expected
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.forward.get(key).map(|slot| &slot.value)
    }

    /// Returns the value and payload mapped to `key`.
    #[must_use]
    pub fn get_extra<Q>(&self, key: &Q) -> Option<(&V, Option<&E>)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.forward.get(key).map(|slot| (&slot.value, slot.extra.as_ref()))
    }

    /// Returns the key mapped to `value`.
    ///
    /// # Complexity
    ///
    /// O(1) expected
    #[must_use]
    pub fn get_by_value<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.reverse.get(value)
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
        self.forward.contains_key(key)
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
        self.reverse.contains_key(value)
    }

    /// Returns the zero-based position of `key` in ascending key order, which is
    /// the `start` that makes [`get_range`](Self::get_range) begin at `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_bimap::LocalBiMap;
    ///
    /// let map: LocalBiMap<&str, i32> = LocalBiMap::from([("c", 3), ("a", 1), ("b", 2)]);
    /// assert_eq!(map.position("b"), Some(1));
    /// assert_eq!(map.position("z"), None);
    /// ```
    #[must_use]
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.keys.rank_of(key)
    }

    /// Removes `key` and its value, returning the removed entry.
    ///
    /// Deleting an absent key is a no-op.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn delete<Q>(&mut self, key: &Q) -> Option<Entry<K, V, E>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Ord,
    {
        let (key, slot) = self.forward.remove_entry(key)?;
        self.reverse.remove(&slot.value);
        self.keys.remove::<K>(&key);
        trace!(len = self.forward.len(), "deleted entry by key");
        Some(Entry {
            key,
            value: slot.value,
            extra: slot.extra,
        })
    }

    /// Removes `value` and the key mapped to it, returning the removed entry.
    pub fn delete_by_value<Q>(&mut self, value: &Q) -> Option<Entry<K, V, E>>
    where
        V: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let key = self.reverse.remove(value)?;
        self.keys.remove(&key);
        let slot = self.forward.remove(&key).expect("reverse index points at a missing key");
        trace!(len = self.forward.len(), "deleted entry by value");
        Some(Entry {
            key,
            value: slot.value,
            extra: slot.extra,
        })
    }
}

impl<K, V, E> Default for LocalBiMap<K, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> fmt::Debug for LocalBiMap<K, V, E>
where
    K: fmt::Debug + Hash + Eq,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(key, value, _)| (key, value))).finish()
    }
}

impl<K, V, E> Extend<(K, V)> for LocalBiMap<K, V, E>
where
    K: Clone + Ord + Hash,
    V: Clone + Eq + Hash,
{
    /// Applies [`set`](LocalBiMap::set) to each pair in order.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V, E> FromIterator<(K, V)> for LocalBiMap<K, V, E>
where
    K: Clone + Ord + Hash,
    V: Clone + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, E, const N: usize> From<[(K, V); N]> for LocalBiMap<K, V, E>
where
    K: Clone + Ord + Hash,
    V: Clone + Eq + Hash,
{
    /// Builds a map by applying [`set`](LocalBiMap::set) to each pair in order,
    /// so later pairs win collisions.
    ///
    /// ```
    /// use wabi_bimap::LocalBiMap;
    ///
    /// let map: LocalBiMap<i32, char> = LocalBiMap::from([(1, 'a'), (2, 'b'), (3, 'a')]);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get_by_value(&'a'), Some(&3));
    /// ```
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
