//! Result type alias for m3-office operations.

use super::M3Error;

/// Type alias for Results using [`M3Error`].
///
/// # Example
///
/// ```ignore
/// use m3_office::error::M3Result;
///
/// fn load() -> M3Result<Snapshot> {
///     Ok(Snapshot::default())
/// }
/// ```
pub type M3Result<T> = Result<T, M3Error>;
