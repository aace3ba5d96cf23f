/*! Loading analysis scenarios from TOML

A scenario bundles the task table, a recorded trace, and the analysis
settings:

```toml
[analysis]
wcet_policy = "last-observed"   # or "max-observed"
iteration_limit = 10000

[[task]]
name = "EXTI1"
priority = 1
period = 100

[[event]]
run = "test000001.ktest"
task = "EXTI1"
cycles = 0
level = 1
kind = "start"
```
*/

use std::path::Path;

use serde::Deserialize;

use crate::analysis::{analyze, Analysis, AnalysisConfig, AnalysisError};
use crate::priority::Priority;
use crate::task::{ConfigError, TaskDescriptor, TaskTable};
use crate::time::Duration;
use crate::trace::{Event, TraceLog};

/// A task as written in a scenario file. The period is read as a
/// signed integer so that negative values are reported as such.
#[derive(Debug, Deserialize)]
struct RawTask {
    name: String,
    priority: Priority,
    period: i64,
}

impl TryFrom<RawTask> for TaskDescriptor {
    type Error = ConfigError;

    fn try_from(raw: RawTask) -> Result<Self, ConfigError> {
        let period = u64::try_from(raw.period).map_err(|_| ConfigError::NonPositivePeriod {
            task: raw.name.clone(),
            period: raw.period,
        })?;
        TaskDescriptor::new(raw.name, raw.priority, Duration::from(period))
    }
}

#[derive(Debug, Deserialize)]
struct RawScenario {
    #[serde(default)]
    analysis: AnalysisConfig,
    #[serde(default, rename = "task")]
    tasks: Vec<RawTask>,
    #[serde(default, rename = "event")]
    events: Vec<Event>,
}

/// A task table, a trace, and the settings to analyze them with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub config: AnalysisConfig,
    pub table: TaskTable,
    pub log: TraceLog,
}

impl Scenario {
    /// Load a scenario from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse a scenario from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawScenario =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let tasks = raw
            .tasks
            .into_iter()
            .map(TaskDescriptor::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Scenario {
            config: raw.analysis,
            table: TaskTable::new(tasks)?,
            log: TraceLog::new(raw.events),
        })
    }

    pub fn analyze(&self) -> Result<Analysis, AnalysisError> {
        analyze(&self.log, &self.table, &self.config)
    }
}
