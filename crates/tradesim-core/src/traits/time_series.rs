//! Price series lookup trait.

use chrono::{DateTime, Utc};

use crate::error::DataError;
use crate::types::{Pair, TimeSeriesEntry};

/// Read-only access to a pair's bars by time.
///
/// Implementations are shared between concurrently running simulations, so
/// lookups take `&self` and must not mutate.
pub trait TimeSeries: Send + Sync {
    /// The pair whose bars this series holds.
    fn pair(&self) -> Pair;

    /// Get the bar for `time`.
    ///
    /// # Errors
    /// [`DataError::NoEntryForTime`] when the series has no bar for `time`.
    fn entry_for_time(&self, time: DateTime<Utc>) -> Result<&TimeSeriesEntry, DataError>;
}
