//! Thread-safe bidirectional maps with deterministic, paginated enumeration.
//!
//! This crate provides [`BiMap`] and its unsynchronized core [`LocalBiMap`]. Both map
//! keys to values and values back to keys in O(1) expected time, keep keys and values
//! unique, and can page through their entries in ascending key order:
//!
//! - [`get`](BiMap::get) / [`get_by_value`](BiMap::get_by_value) - Forward and reverse lookup
//! - [`get_range`](BiMap::get_range) - A `[start, start + limit)` window in key order
//! - [`position`](BiMap::position) - The sorted position of a key, for resuming a page walk
//!
//! # Example
//!
//! ```
//! use wabi_bimap::BiMap;
//!
//! let translations: BiMap<&str, &str> = BiMap::new();
//! translations.set("800-FLOWERS", "+1-800-356-9377");
//! translations.set("800-GOFEDEX", "+1-800-463-3339");
//!
//! assert_eq!(translations.get(&"800-FLOWERS"), Some("+1-800-356-9377"));
//! assert_eq!(translations.get_by_value(&"+1-800-463-3339"), Some("800-GOFEDEX"));
//!
//! // Reusing a value evicts the key that held it.
//! translations.set("800-DAISIES", "+1-800-356-9377");
//! assert_eq!(translations.get(&"800-FLOWERS"), None);
//! assert_eq!(translations.len(), 2);
//!
//! // Pages are ordered by key, not by insertion.
//! let page = translations.get_range(0, 1)?;
//! assert_eq!(page[0].key, "800-DAISIES");
//! # Ok::<(), wabi_bimap::Error>(())
//! ```
//!
//! # Collisions
//!
//! Writing `(key, value)` first releases `key`'s old value, so a key update keeps the
//! key in place. If `value` is then found under a different key, that key's entry is
//! removed entirely and handed back to the caller. A single write can therefore remove
//! at most one other entry.
//!
//! # Implementation
//!
//! A [`LocalBiMap`] owns two hash indexes (key to value, value to key) and a
//! weight-balanced order-statistic tree of its keys. Each tree node tracks the size of
//! its subtree, so selecting the first key of a page, finding a key's position and
//! removing a key are all O(log n). [`BiMap`] guards the three indexes as one unit
//! behind a single [`parking_lot::RwLock`].

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod bimap;
pub mod error;
pub mod local_bimap;

pub use bimap::BiMap;
pub use error::{Error, Result};
pub use local_bimap::{Entry, Extra, LocalBiMap};
