/*! RTAs for *fixed-priority* (**FP**) preemptive scheduling with SRP blocking

This module provides two analyses of the same task model, in which each
task is characterized by

- a static priority (see [Priority][crate::priority::Priority]),
- a period, which is also its implicit deadline,
- a WCET, and
- a blocking bound (see [blocking][crate::blocking]).

The [estimate] module provides a one-shot, closed-form estimate that
bounds interference over the task's own period; the [recursive] module
provides the exact busy-period fixed-point iteration with deadline-miss
detection.

Both analyses require pairwise distinct priorities.
*/

use itertools::Itertools;

use crate::arrival::Periodic;
use crate::demand;
use crate::task::{check_distinct_priorities, ConfigError, TaskDescriptor};
use crate::time::Duration;
use crate::wcet;

pub mod estimate;
pub mod recursive;

/// The per-task input of both analyses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskParams {
    pub task: TaskDescriptor,
    /// `Ci`: the worst-case execution time.
    pub wcet: Duration,
    /// `Bi`: the maximum blocking by lower-priority tasks.
    pub blocking: Duration,
}

impl TaskParams {
    pub fn new(task: TaskDescriptor, wcet: Duration, blocking: Duration) -> Self {
        TaskParams {
            task,
            wcet,
            blocking,
        }
    }

    fn request_bound(&self) -> TaskRBF {
        demand::RBF::new(Periodic::new(self.task.period()), wcet::Scalar::new(self.wcet))
    }
}

type TaskRBF = demand::RBF<Periodic, wcet::Scalar>;

/// The tasks in order of decreasing priority, as indices into
/// `tasks`, together with their request-bound functions in the same
/// order. The interference on the task at position `k` is thus
/// given by `demand::Slice::of(&rbfs[..k])`.
fn by_decreasing_priority(tasks: &[TaskParams]) -> Result<(Vec<usize>, Vec<TaskRBF>), ConfigError> {
    check_distinct_priorities(tasks.iter().map(|t| &t.task))?;
    let order: Vec<usize> = (0..tasks.len())
        .sorted_by_key(|i| std::cmp::Reverse(tasks[*i].task.priority()))
        .collect();
    let rbfs = order.iter().map(|i| tasks[*i].request_bound()).collect();
    Ok((order, rbfs))
}
