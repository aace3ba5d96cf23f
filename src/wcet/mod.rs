/*! Execution-cost models and their extraction from traces

[JobCostModel] is the interface the response-time analyses consume;
[observed_wcets] derives the per-task WCET from the `Finish` events of
a measured trace.
*/

use auto_impl::auto_impl;

use crate::time::Duration;

/// The interface for models of per-job *maximum* execution costs.
#[auto_impl(&, Box, Rc)]
pub trait JobCostModel {
    /// Model: yield the maximum cumulative processor demand of any
    /// `n` consecutive jobs.
    fn cost_of_jobs(&self, n: usize) -> Duration;
}

mod observed;
mod scalar;

pub use observed::{observed_wcets, WcetPolicy};
pub use scalar::Scalar;
