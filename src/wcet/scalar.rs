use super::JobCostModel;
use crate::time::Duration;

/// The classic and most simple characterization of the worst-case
/// processor demand of a single job: the scalar WCET bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    wcet: Duration,
}

impl Scalar {
    /// Construct a new `Scalar` cost model by wrapping a given WCET bound.
    pub fn new(wcet: Duration) -> Self {
        Scalar { wcet }
    }

    pub fn wcet(&self) -> Duration {
        self.wcet
    }
}

impl From<Duration> for Scalar {
    fn from(val: Duration) -> Self {
        Self::new(val)
    }
}

impl JobCostModel for Scalar {
    fn cost_of_jobs(&self, n: usize) -> Duration {
        self.wcet.saturating_mul(n as u64)
    }
}
