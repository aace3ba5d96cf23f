/*! Blocking bounds under the Stack Resource Policy (SRP)

Under SRP, a job is blocked at most once per activation, by at most one
resource claim of a lower-priority task whose ceiling is at least the
job's own priority. The blocking bound of a task is therefore the
longest such claim observed anywhere in the trace.

Claims are recovered from each run with an explicit stack of open
`Enter` events, which supports arbitrary nesting depth.
*/

use log::debug;

use crate::analysis::AnalysisError;
use crate::priority::Priority;
use crate::task::TaskTable;
use crate::time::Duration;
use crate::trace::{EventKind, Run, TraceError};

/// One matched `Enter`/`Exit` pair: a critical section of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub run: String,
    pub task: String,
    pub ceiling: Priority,
    /// Cycle at which the resource was claimed.
    pub entered: Duration,
    /// Cycle at which the resource was released.
    pub exited: Duration,
}

impl Claim {
    /// The length of the critical section.
    pub fn duration(&self) -> Duration {
        self.exited - self.entered
    }
}

/// Match the `Enter` and `Exit` events of a single run.
///
/// Claims are returned in the order in which they are released, i.e.,
/// inner claims precede the claims enclosing them.
pub fn claims_of(run: &Run<'_>) -> Result<Vec<Claim>, TraceError> {
    let mut open = Vec::new();
    let mut claims = Vec::new();

    for e in run.claim_events() {
        match e.kind {
            EventKind::Enter => open.push(e),
            EventKind::Exit => {
                let enter = open.pop().ok_or_else(|| TraceError::UnmatchedExit {
                    run: run.id().to_string(),
                    task: run.task().to_string(),
                    cycles: e.cycles,
                })?;
                if enter.level != e.level {
                    return Err(TraceError::MismatchedExit {
                        run: run.id().to_string(),
                        entered: enter.level,
                        exited: e.level,
                    });
                }
                let claim = Claim {
                    run: run.id().to_string(),
                    task: run.task().to_string(),
                    ceiling: e.level,
                    entered: enter.cycles,
                    exited: e.cycles,
                };
                debug!(
                    "{} claims ceiling {} for {} cycles",
                    claim.task,
                    claim.ceiling,
                    claim.duration()
                );
                claims.push(claim);
            }
            // excluded by the run framing
            EventKind::Start | EventKind::Finish => {}
        }
    }

    if !open.is_empty() {
        return Err(TraceError::UnclosedClaims {
            run: run.id().to_string(),
            task: run.task().to_string(),
            open: open.len(),
        });
    }
    Ok(claims)
}

/// Collect the claims of all runs.
pub fn claims(runs: &[Run<'_>]) -> Result<Vec<Claim>, TraceError> {
    let mut all = Vec::new();
    for run in runs {
        all.extend(claims_of(run)?);
    }
    Ok(all)
}

/// Bound the SRP blocking of each task in `table` (indexed by
/// [TaskId][crate::task::TaskId]).
///
/// Task `i` can be blocked by a claim of task `j` if `j` has lower
/// priority than `i` and the claim's ceiling is at least the
/// priority of `i`. The bound is the longest such claim, or zero.
pub fn blocking_bounds(
    claims: &[Claim],
    table: &TaskTable,
) -> Result<Vec<Duration>, AnalysisError> {
    let mut bounds = vec![Duration::zero(); table.len()];

    for claim in claims {
        let owner = table.descriptor(&claim.task)?;
        // priorities are distinct, so this also excludes the owner itself
        let blocked = table.iter().map(|task| {
            task.priority().is_higher_than(owner.priority())
                && claim.ceiling.can_block(task.priority())
        });
        for (bound, blocks) in bounds.iter_mut().zip(blocked) {
            if blocks {
                *bound = (*bound).max(claim.duration());
            }
        }
    }

    Ok(bounds)
}
