//! Task descriptors and the validated task table.

use itertools::Itertools;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::priority::Priority;
use crate::time::Duration;

/// Error type for malformed task sets or scenario files.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Periods double as implicit deadlines and divisors, so they must be positive.
    #[error("task `{task}` has non-positive period {period}")]
    NonPositivePeriod { task: String, period: i64 },

    /// Equal static priorities are not supported.
    #[error("tasks `{first}` and `{second}` share static priority {priority}")]
    DuplicatePriority {
        first: String,
        second: String,
        priority: Priority,
    },

    #[error("task `{name}` is declared more than once")]
    DuplicateTask { name: String },

    #[error("failed to parse scenario: {0}")]
    Parse(String),

    #[error("failed to read scenario: {0}")]
    Io(String),
}

/// Index of a task within its [TaskTable].
pub type TaskId = usize;

/// The static parameters of one task: its name, its priority, and its
/// minimum inter-arrival time, which also serves as the task's
/// implicit deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    name: String,
    priority: Priority,
    period: Duration,
}

impl TaskDescriptor {
    /// Describe a task, rejecting a zero period.
    pub fn new(
        name: impl Into<String>,
        priority: Priority,
        period: Duration,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if period.is_zero() {
            return Err(ConfigError::NonPositivePeriod {
                task: name,
                period: 0,
            });
        }
        Ok(TaskDescriptor {
            name,
            priority,
            period,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The interarrival period, which is also the task's deadline.
    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Reject any two descriptors with the same static priority.
pub(crate) fn check_distinct_priorities<'a>(
    tasks: impl Iterator<Item = &'a TaskDescriptor>,
) -> Result<(), ConfigError> {
    let clash = tasks
        .sorted_by_key(|t| t.priority())
        .tuple_windows()
        .find(|(a, b)| a.priority() == b.priority());
    match clash {
        Some((a, b)) => Err(ConfigError::DuplicatePriority {
            first: a.name().to_string(),
            second: b.name().to_string(),
            priority: a.priority(),
        }),
        None => Ok(()),
    }
}

/// The immutable set of tasks under analysis.
///
/// Task names are unique and static priorities are pairwise distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTable {
    tasks: Vec<TaskDescriptor>,
}

impl TaskTable {
    pub fn new(tasks: Vec<TaskDescriptor>) -> Result<Self, ConfigError> {
        if let Some(name) = tasks.iter().map(|t| t.name()).duplicates().next() {
            return Err(ConfigError::DuplicateTask {
                name: name.to_string(),
            });
        }
        check_distinct_priorities(tasks.iter())?;
        Ok(TaskTable { tasks })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskDescriptor> {
        self.tasks.iter()
    }

    /// Resolve a task name as it appears in a trace.
    pub fn id_of(&self, name: &str) -> Result<TaskId, AnalysisError> {
        self.tasks
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| AnalysisError::UnknownTask {
                name: name.to_string(),
            })
    }

    /// Look up the descriptor of a task named in a trace.
    pub fn descriptor(&self, name: &str) -> Result<&TaskDescriptor, AnalysisError> {
        self.id_of(name).map(|id| &self.tasks[id])
    }

    /// Are priorities assigned rate-monotonically, i.e., does a
    /// shorter period always come with a higher priority?
    pub fn is_rate_monotonic(&self) -> bool {
        self.tasks
            .iter()
            .sorted_by_key(|t| std::cmp::Reverse(t.priority()))
            .tuple_windows()
            .all(|(higher, lower)| higher.period() <= lower.period())
    }
}

impl<'a> IntoIterator for &'a TaskTable {
    type Item = &'a TaskDescriptor;
    type IntoIter = std::slice::Iter<'a, TaskDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{d, exti_table, p};

    #[test]
    fn rejects_zero_period() {
        assert_eq!(
            TaskDescriptor::new("EXTI1", p(1), d(0)),
            Err(ConfigError::NonPositivePeriod {
                task: "EXTI1".to_string(),
                period: 0
            })
        );
    }

    #[test]
    fn rejects_shared_priority() {
        let tasks = vec![
            TaskDescriptor::new("EXTI1", p(2), d(100)).unwrap(),
            TaskDescriptor::new("EXTI2", p(3), d(30)).unwrap(),
            TaskDescriptor::new("EXTI3", p(2), d(40)).unwrap(),
        ];
        match TaskTable::new(tasks) {
            Err(ConfigError::DuplicatePriority { priority, .. }) => assert_eq!(priority, p(2)),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let tasks = vec![
            TaskDescriptor::new("EXTI1", p(1), d(100)).unwrap(),
            TaskDescriptor::new("EXTI1", p(2), d(30)).unwrap(),
        ];
        assert_eq!(
            TaskTable::new(tasks),
            Err(ConfigError::DuplicateTask {
                name: "EXTI1".to_string()
            })
        );
    }

    #[test]
    fn lookup() {
        let table = exti_table([100, 30, 40]);
        assert_eq!(table.id_of("EXTI3"), Ok(2));
        assert_eq!(
            table.id_of("EXTI4"),
            Err(AnalysisError::UnknownTask {
                name: "EXTI4".to_string()
            })
        );
    }

    #[test]
    fn rate_monotonic_assignment() {
        assert!(exti_table([100, 30, 40]).is_rate_monotonic());
        assert!(!exti_table([100, 50, 40]).is_rate_monotonic());
    }
}
