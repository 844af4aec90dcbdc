//! Time-based termination.

use std::time::Duration;

use signweight_config::WeightConfig;

/// Wall-clock limit on a single solve.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use signweight_solver::TimeLimit;
///
/// let limit = TimeLimit::seconds(30);
/// assert_eq!(limit.duration(), Duration::from_secs(30));
///
/// let limit = TimeLimit::millis(500);
/// assert_eq!(limit.duration(), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLimit {
    limit: Duration,
}

impl TimeLimit {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// The limit from the `termination` section, if any.
    pub fn from_config(config: &WeightConfig) -> Option<Self> {
        config.time_limit().map(Self::new)
    }

    pub fn duration(&self) -> Duration {
        self.limit
    }
}
