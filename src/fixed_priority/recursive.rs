//! Exact response-time analysis by busy-period fixed-point iteration

use log::{info, warn};

use crate::analysis::AnalysisError;
use crate::demand::{self, RequestBound};
use crate::fixed_point::{self, SearchFailure, Verdict};
use crate::time::Duration;

use super::{by_decreasing_priority, TaskParams};

/// The result of the exact analysis for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTime {
    pub wcet: Duration,
    pub blocking: Duration,
    /// The interference accounted for in the final iterate.
    pub interference: Duration,
    /// The fixed point if the deadline is met, otherwise the first
    /// iterate that exceeded the deadline.
    pub response_time: Duration,
    pub verdict: Verdict,
    /// The iterates `R(0), R(1), ...` of the search.
    pub iterates: Vec<Duration>,
}

impl ResponseTime {
    pub fn deadline_missed(&self) -> bool {
        self.verdict == Verdict::Missed
    }
}

/// Bound the response time of every task in `tasks` (results are
/// returned in the same order) by solving
///
/// ```text
/// R(0) = Ci + Bi
/// R(s) = Ci + Bi + Σ_{j : prio(j) > prio(i)} ⌈R(s-1) / Tj⌉ · Cj
/// ```
///
/// Tasks are analyzed in order of decreasing priority. The iteration
/// for a task stops at the least fixed point, which is its
/// worst-case response time, or as soon as an iterate exceeds the
/// task's period, in which case the deadline is missed.
///
/// At most `limit` iterations are performed per task; exceeding the
/// limit is reported as [AnalysisError::NonConvergence]. Demand that
/// exceeds `u64` cycles saturates, so an overflowing busy period is
/// reported as a deadline miss unless the period itself is `u64::MAX`.
#[allow(non_snake_case)]
pub fn solve_response_times(
    tasks: &[TaskParams],
    limit: usize,
) -> Result<Vec<ResponseTime>, AnalysisError> {
    let (order, rbfs) = by_decreasing_priority(tasks)?;

    let mut solutions = vec![None; tasks.len()];
    for (k, i) in order.into_iter().enumerate() {
        let tua = &tasks[i];
        let interference = demand::Slice::of(&rbfs[..k]);

        // Blocking and own demand are fixed; only the interference
        // grows with the length of the busy period.
        let own = tua.wcet.saturating_add(tua.blocking);
        let rhs = |R: Duration| own.saturating_add(interference.service_needed(R));

        let solution = fixed_point::search_with_deadline(own, tua.task.period(), limit, rhs)
            .map_err(|SearchFailure::IterationLimitExceeded { limit, last }| {
                AnalysisError::NonConvergence {
                    task: tua.task.name().to_string(),
                    limit,
                    last,
                }
            })?;

        match solution.verdict {
            Verdict::Fixed => info!(
                "R_{} = {} after {} iterations",
                tua.task.name(),
                solution.response_time,
                solution.iterates.len() - 1
            ),
            Verdict::Missed => warn!(
                "{} misses its deadline: R >= {} > T = {}",
                tua.task.name(),
                solution.response_time,
                tua.task.period()
            ),
        }

        solutions[i] = Some(ResponseTime {
            wcet: tua.wcet,
            blocking: tua.blocking,
            interference: solution.response_time - own,
            response_time: solution.response_time,
            verdict: solution.verdict,
            iterates: solution.iterates,
        });
    }
    Ok(solutions.into_iter().flatten().collect())
}
