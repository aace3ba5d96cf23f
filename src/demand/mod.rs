use auto_impl::auto_impl;

use crate::time::Duration;

/// The general interface for processor demand. This can represent
/// the demand of a single task, or the cumulative demand of multiple
/// tasks (e.g., all tasks that may preempt the task under analysis).
#[auto_impl(&, Box, Rc)]
pub trait RequestBound {
    /// Bound the total amount of service needed in an interval of length `delta`.
    fn service_needed(&self, delta: Duration) -> Duration;
}

mod rbf;
mod slice;

pub use rbf::RBF;
pub use slice::Slice;
