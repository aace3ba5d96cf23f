//! The complete trace-to-schedulability pipeline.

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::blocking::{self, Claim};
use crate::fixed_point::Verdict;
use crate::fixed_priority::estimate::{estimate_response_times, ResponseTimeEstimate};
use crate::fixed_priority::recursive::{solve_response_times, ResponseTime};
use crate::fixed_priority::TaskParams;
use crate::priority::Priority;
use crate::task::{ConfigError, TaskTable};
use crate::time::Duration;
use crate::trace::{Run, TraceError, TraceLog};
use crate::utilization::{DemandSummary, Utilization, UtilizationOverflow};
use crate::wcet::{observed_wcets, WcetPolicy};

/// Default cap on the number of fixed-point iterations per task.
pub const DEFAULT_ITERATION_LIMIT: usize = 10_000;

/// Error type returned when a trace cannot be analyzed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("inconsistent trace: {0}")]
    TraceConsistency(#[from] TraceError),

    #[error("trace references unknown task `{name}`")]
    UnknownTask { name: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    UtilizationOverflow(#[from] UtilizationOverflow),

    #[error("response time of `{task}` did not converge within {limit} iterations (last iterate {last})")]
    NonConvergence {
        task: String,
        limit: usize,
        last: Duration,
    },
}

/// Tunable knobs of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How repeated WCET observations of a task are combined.
    pub wcet_policy: WcetPolicy,
    /// Maximum number of fixed-point iterations per task.
    pub iteration_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            wcet_policy: WcetPolicy::default(),
            iteration_limit: DEFAULT_ITERATION_LIMIT,
        }
    }
}

/// Everything known about one task after the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskProfile {
    pub params: TaskParams,
    /// `Ci / Ti`
    pub utilization: Utilization,
    /// The one-shot estimate.
    pub estimate: ResponseTimeEstimate,
    /// The exact fixed-point solution.
    pub exact: ResponseTime,
}

impl TaskProfile {
    pub fn name(&self) -> &str {
        self.params.task.name()
    }

    pub fn priority(&self) -> Priority {
        self.params.task.priority()
    }

    pub fn period(&self) -> Duration {
        self.params.task.period()
    }

    pub fn wcet(&self) -> Duration {
        self.params.wcet
    }

    pub fn blocking(&self) -> Duration {
        self.params.blocking
    }

    /// Interference according to the exact analysis.
    pub fn interference(&self) -> Duration {
        self.exact.interference
    }

    /// Response time according to the exact analysis.
    pub fn response_time(&self) -> Duration {
        self.exact.response_time
    }

    pub fn deadline_missed(&self) -> bool {
        self.exact.verdict == Verdict::Missed
    }
}

/// The result of analyzing a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// All critical sections found in the trace.
    pub claims: Vec<Claim>,
    pub utilization: Utilization,
    /// One profile per task, in task-table order.
    pub profiles: Vec<TaskProfile>,
}

impl Analysis {
    /// Does every task meet its deadline?
    pub fn is_schedulable(&self) -> bool {
        self.profiles.iter().all(|p| !p.deadline_missed())
    }

    pub fn profile(&self, name: &str) -> Option<&TaskProfile> {
        self.profiles.iter().find(|p| p.name() == name)
    }

    /// The tasks that miss their deadline.
    pub fn missed(&self) -> impl Iterator<Item = &TaskProfile> {
        self.profiles.iter().filter(|p| p.deadline_missed())
    }
}

/// Check that every run belongs to a task of `table` and records
/// that task's configured priority.
fn check_runs(runs: &[Run<'_>], table: &TaskTable) -> Result<(), AnalysisError> {
    for run in runs {
        let task = table.descriptor(run.task())?;
        if run.priority() != task.priority() {
            return Err(TraceError::PriorityMismatch {
                run: run.id().to_string(),
                task: task.name().to_string(),
                recorded: run.priority(),
                configured: task.priority(),
            }
            .into());
        }
    }
    Ok(())
}

/// Derive the analysis input of each task (WCET and blocking bound)
/// from a trace, together with the claims found in it.
pub fn task_params(
    log: &TraceLog,
    table: &TaskTable,
    config: &AnalysisConfig,
) -> Result<(Vec<TaskParams>, Vec<Claim>), AnalysisError> {
    let runs = log.runs()?;
    check_runs(&runs, table)?;
    let wcets = observed_wcets(log, table, config.wcet_policy)?;
    let claims = blocking::claims(&runs)?;
    let blocking = blocking::blocking_bounds(&claims, table)?;

    let params = table
        .iter()
        .zip(wcets)
        .zip(blocking)
        .map(|((task, wcet), blocking)| TaskParams::new(task.clone(), wcet, blocking))
        .collect();
    Ok((params, claims))
}

/// Run both response-time analyses on the given task parameters.
/// Profiles are returned in the order of `params`.
pub fn profile_tasks(
    params: Vec<TaskParams>,
    config: &AnalysisConfig,
) -> Result<Vec<TaskProfile>, AnalysisError> {
    let estimates = estimate_response_times(&params)?;
    let solutions = solve_response_times(&params, config.iteration_limit)?;

    Ok(params
        .into_iter()
        .zip(estimates)
        .zip(solutions)
        .map(|((params, estimate), exact)| TaskProfile {
            utilization: Utilization::of(params.wcet, params.task.period()),
            params,
            estimate,
            exact,
        })
        .collect())
}

/// Analyze the schedulability of the task set `table` based on the
/// execution trace `log`.
pub fn analyze(
    log: &TraceLog,
    table: &TaskTable,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    let (params, claims) = task_params(log, table, config)?;
    let wcets: Vec<Duration> = params.iter().map(|p| p.wcet).collect();
    let demand = DemandSummary::new(table, &wcets)?;
    let profiles = profile_tasks(params, config)?;

    let analysis = Analysis {
        claims,
        utilization: demand.total,
        profiles,
    };
    info!(
        "{} of {} tasks meet their deadline",
        analysis.profiles.len() - analysis.missed().count(),
        analysis.profiles.len()
    );
    Ok(analysis)
}
