/// Errors returned by [`BiMap`](crate::BiMap) and [`LocalBiMap`](crate::LocalBiMap).
///
/// Lookups never fail; a missing key or value is reported as `None`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A range query was given a negative start position.
    #[error("range start must not be negative (got {start})")]
    NegativeStart {
        /// The rejected start position.
        start: i64,
    },
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
