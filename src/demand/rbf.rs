use crate::arrival::ArrivalBound;
use crate::time::Duration;
use crate::wcet::JobCostModel;

use super::RequestBound;

/// The canonical request-bound function (RBF), which connects
/// arrival bounds and job-cost models.
///
/// Given an arrival model and a job-cost model, the RBF bounds
/// demand over an interval of length `delta` simply as the total
/// cumulative cost of the maximum number of jobs that can arrive in
/// an interval of length `delta`. For a periodic task with a scalar
/// WCET this is the familiar `⌈delta / T⌉ · C`.
#[derive(Clone, Debug)]
pub struct RBF<B: ArrivalBound, C: JobCostModel> {
    pub wcet: C,
    pub arrival_bound: B,
}

impl<B: ArrivalBound, C: JobCostModel> RBF<B, C> {
    pub fn new(arrival_bound: B, wcet: C) -> Self {
        RBF {
            wcet,
            arrival_bound,
        }
    }
}

impl<B: ArrivalBound, C: JobCostModel> RequestBound for RBF<B, C> {
    fn service_needed(&self, delta: Duration) -> Duration {
        self.wcet
            .cost_of_jobs(self.arrival_bound.number_arrivals(delta))
    }
}
