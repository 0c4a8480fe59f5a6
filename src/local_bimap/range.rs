use alloc::vec::Vec;
use core::hash::Hash;
use core::iter::FusedIterator;
use std::collections::HashMap;

use super::{Entry, LocalBiMap, Slot};
use crate::error::{Error, Result};
use crate::raw;

/// Converts a signed page request into a rank window of `(start, limit)`.
///
/// Positions beyond `usize::MAX` saturate, which clips them to the end of any map.
fn window(start: i64, limit: i64) -> Result<(usize, usize)> {
    if start < 0 {
        return Err(Error::NegativeStart { start });
    }
    let start = usize::try_from(start).unwrap_or(usize::MAX);
    let limit = if limit <= 0 {
        0
    } else {
        usize::try_from(limit).unwrap_or(usize::MAX)
    };
    Ok((start, limit))
}

/// An iterator over a window of entries in ascending key order.
///
/// This `struct` is created by the [`range`] and [`iter`] methods on
/// [`LocalBiMap`]. See their documentation for more.
///
/// [`range`]: LocalBiMap::range
/// [`iter`]: LocalBiMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K, V, E> {
    keys: raw::Iter<'a, K>,
    forward: &'a HashMap<K, Slot<V, E>>,
}

impl<'a, K: Hash + Eq, V, E> Range<'a, K, V, E> {
    fn resolve(&self, key: &'a K) -> (&'a K, &'a V, Option<&'a E>) {
        let forward: &'a HashMap<K, Slot<V, E>> = self.forward;
        let slot = forward.get(key).expect("ordered key missing from the forward index");
        (key, &slot.value, slot.extra.as_ref())
    }
}

impl<'a, K: Hash + Eq, V, E> Iterator for Range<'a, K, V, E> {
    type Item = (&'a K, &'a V, Option<&'a E>);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.keys.next()?;
        Some(self.resolve(key))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K: Hash + Eq, V, E> DoubleEndedIterator for Range<'_, K, V, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let key = self.keys.next_back()?;
        Some(self.resolve(key))
    }
}

impl<K: Hash + Eq, V, E> ExactSizeIterator for Range<'_, K, V, E> {}

impl<K: Hash + Eq, V, E> FusedIterator for Range<'_, K, V, E> {}

impl<K: Hash + Eq, V, E> LocalBiMap<K, V, E> {
    /// Iterates at most `limit` entries in ascending key order, starting at
    /// the entry in position `start`. The window is clipped to the map.
    ///
    /// # Complexity
    ///
    /// O(log n) to position, then amortized O(1) per entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_bimap::LocalBiMap;
    ///
    /// let map: LocalBiMap<i32, i32> = (0..10).map(|i| (i, i * 10)).collect();
    /// let page: Vec<_> = map.range(8, 5).map(|(k, v, _)| (*k, *v)).collect();
    /// assert_eq!(page, [(8, 80), (9, 90)]);
    /// ```
    pub fn range(&self, start: usize, limit: usize) -> Range<'_, K, V, E> {
        Range {
            keys: self.keys.range(start, start.saturating_add(limit)),
            forward: &self.forward,
        }
    }

    /// Iterates every entry in ascending key order.
    pub fn iter(&self) -> Range<'_, K, V, E> {
        self.range(0, usize::MAX)
    }

    /// Returns the entry at zero-based `position` in ascending key order, or
    /// `None` if `position` is out of bounds.
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
    /// let map: LocalBiMap<char, u8, ()> = LocalBiMap::from([('z', 1), ('m', 2), ('a', 3)]);
    /// assert_eq!(map.get_by_position(1), Some((&'m', &2, None)));
    /// assert_eq!(map.get_by_position(3), None);
    /// ```
    #[must_use]
    pub fn get_by_position(&self, position: usize) -> Option<(&K, &V, Option<&E>)> {
        let key = self.keys.get_by_rank(position)?;
        let slot = self.forward.get(key).expect("ordered key missing from the forward index");
        Some((key, &slot.value, slot.extra.as_ref()))
    }
}

impl<K, V, E> LocalBiMap<K, V, E>
where
    K: Clone + Hash + Eq,
    V: Clone,
    E: Clone,
{
    /// Returns clones of the entries whose positions in ascending key order
    /// fall in `[start, start + limit)`.
    ///
    /// A `start` at or past the end, or a `limit` of zero or less, yields an
    /// empty page. A window running past the end is clipped. Repeating a query
    /// with no writes in between returns the same page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeStart`] if `start` is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use wabi_bimap::{Error, LocalBiMap};
    ///
    /// let map: LocalBiMap<&str, &str, ()> = LocalBiMap::from([("b", "2"), ("a", "1"), ("c", "3")]);
    ///
    /// let page = map.get_range(1, 10)?;
    /// let keys: Vec<_> = page.iter().map(|entry| entry.key).collect();
    /// assert_eq!(keys, ["b", "c"]);
    ///
    /// assert!(map.get_range(3, 1)?.is_empty());
    /// assert_eq!(map.get_range(-1, 1), Err(Error::NegativeStart { start: -1 }));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn get_range(&self, start: i64, limit: i64) -> Result<Vec<Entry<K, V, E>>> {
        let (start, limit) = window(start, limit)?;
        Ok(self
            .range(start, limit)
            .map(|(key, value, extra)| Entry {
                key: key.clone(),
                value: value.clone(),
                extra: extra.cloned(),
            })
            .collect())
    }
}

impl<'a, K: Hash + Eq, V, E> IntoIterator for &'a LocalBiMap<K, V, E> {
    type Item = (&'a K, &'a V, Option<&'a E>);
    type IntoIter = Range<'a, K, V, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn window_rejects_negative_start_before_checking_limit() {
        assert_eq!(window(-3, 0), Err(Error::NegativeStart { start: -3 }));
        assert_eq!(window(-1, 5), Err(Error::NegativeStart { start: -1 }));
    }

    #[test]
    fn window_clamps_limit() {
        assert_eq!(window(0, -7), Ok((0, 0)));
        assert_eq!(window(4, 0), Ok((4, 0)));
        assert_eq!(window(2, 9), Ok((2, 9)));
    }

    #[test]
    fn range_is_double_ended() {
        let map: LocalBiMap<u8, u8, ()> = (0..6).map(|i| (i, 100 + i)).collect();
        let tail: alloc::vec::Vec<u8> = map.range(1, 4).rev().map(|(k, _, _)| *k).collect();
        assert_eq!(tail, [4, 3, 2, 1]);
        assert_eq!(map.range(1, 4).len(), 4);
        assert_eq!(map.range(10, 4).len(), 0);
    }

    #[test]
    fn huge_windows_saturate() {
        let map: LocalBiMap<u8, u8, ()> = (0..3).map(|i| (i, i)).collect();
        assert_eq!(map.get_range(1, i64::MAX).map(|page| page.len()), Ok(2));
        assert_eq!(map.get_range(i64::MAX, i64::MAX).map(|page| page.len()), Ok(0));
        assert_eq!(map.range(usize::MAX, usize::MAX).count(), 0);
    }
}
