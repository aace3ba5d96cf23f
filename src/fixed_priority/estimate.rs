//! One-shot response-time estimate

use crate::demand::{self, RequestBound};
use crate::task::ConfigError;
use crate::time::Duration;

use super::{by_decreasing_priority, TaskParams};

/// The breakdown `Ri = Ci + Bi + Ii` of a one-shot estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseTimeEstimate {
    pub wcet: Duration,
    pub blocking: Duration,
    pub interference: Duration,
    pub response_time: Duration,
}

/// Estimate the response time of every task in `tasks` (results are
/// returned in the same order) as
///
/// ```text
/// Ii = Σ_{j : prio(j) > prio(i)} ⌈Ti / Tj⌉ · Cj
/// Ri = Ci + Bi + Ii
/// ```
///
/// The interference term assumes that task `i` completes within its
/// own period. The estimate is not iterated and can be either
/// pessimistic or optimistic with respect to the exact bound computed
/// by [recursive][super::recursive]; no deadline verdict is derived
/// from it.
pub fn estimate_response_times(
    tasks: &[TaskParams],
) -> Result<Vec<ResponseTimeEstimate>, ConfigError> {
    let (order, rbfs) = by_decreasing_priority(tasks)?;

    let mut estimates = vec![None; tasks.len()];
    for (k, i) in order.into_iter().enumerate() {
        let tua = &tasks[i];
        let interference = demand::Slice::of(&rbfs[..k]).service_needed(tua.task.period());
        estimates[i] = Some(ResponseTimeEstimate {
            wcet: tua.wcet,
            blocking: tua.blocking,
            interference,
            response_time: tua.wcet.saturating_add(tua.blocking).saturating_add(interference),
        });
    }
    Ok(estimates.into_iter().flatten().collect())
}
