//! Advisor-record port.
//!
//! Advisors are defined outside the engine (one CSV file per advisor in the
//! default deployment). This port hides where the records come from.

use crate::{Result, advice::AdviceRecord};

/// Supplies the raw record set of each advisor.
///
/// # Examples
///
/// ```
/// use multi_advice::advice::{AdviceRecord, InMemoryAdvisorSource};
/// use multi_advice::ports::AdvisorSource;
///
/// let source = InMemoryAdvisorSource::new(vec![vec![AdviceRecord::new(
///     "feature", "Facing-ghost", "value", "1",
/// )]]);
/// assert_eq!(source.records(0)?.len(), 1);
/// # Ok::<(), multi_advice::Error>(())
/// ```
pub trait AdvisorSource: Send + Sync {
    /// Records of advisor `advisor` (0-based), read fresh on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read or do not decode into
    /// four-field rows.
    fn records(&self, advisor: usize) -> Result<Vec<AdviceRecord>>;
}
