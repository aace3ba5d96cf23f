/*! The in-memory model of a measured execution trace.

A trace is an ordered log of [Event]s gathered by timing each task in
isolation on the target. Each timed execution of a task forms one
[Run]:

```text
Start  (priority)      cycles = 0
Enter  (ceiling c1)
  Enter (ceiling c2)   claims nest in strict LIFO order
  Exit  (ceiling c2)
Exit   (ceiling c1)
Finish (priority)      cycles = execution time of the run
```

[TraceLog::runs] splits the log into runs and checks the framing of
each run. The pairing of claims is checked later by the blocking
analysis, which consumes the claims.
*/

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::priority::Priority;
use crate::time::Duration;

/// What a trace event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The task was released; the cycle counter has just been reset.
    Start,
    /// A resource was claimed.
    Enter,
    /// A resource claim was released.
    Exit,
    /// The task ran to completion.
    Finish,
}

/// One observed occurrence during a task's timed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identifies the run (e.g., the test vector that drove it).
    pub run: String,
    pub task: String,
    /// Cycles elapsed since the start of the run.
    pub cycles: Duration,
    /// The claimed resource's ceiling for `Enter`/`Exit`, the task's
    /// priority for `Start`/`Finish`.
    pub level: Priority,
    pub kind: EventKind,
}

impl Event {
    pub fn new(
        run: impl Into<String>,
        task: impl Into<String>,
        cycles: Duration,
        level: Priority,
        kind: EventKind,
    ) -> Self {
        Event {
            run: run.into(),
            task: task.into(),
            cycles,
            level,
            kind,
        }
    }
}

/// Error type for traces that violate the run framing or the SRP
/// stack discipline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("{kind:?} event of run `{run}` at cycle {cycles} lies outside of any run")]
    OrphanEvent {
        run: String,
        kind: EventKind,
        cycles: Duration,
    },

    #[error("run `{run}` of task `{task}` never finishes")]
    UnfinishedRun { run: String, task: String },

    #[error("run `{run}` of task `{task}` contains an event of run `{found_run}`, task `{found_task}`")]
    RunMismatch {
        run: String,
        task: String,
        found_run: String,
        found_task: String,
    },

    #[error("time went backwards in run `{run}`: cycle {found} follows cycle {previous}")]
    TimeWentBackwards {
        run: String,
        previous: Duration,
        found: Duration,
    },

    #[error("exit at cycle {cycles} in run `{run}` of task `{task}` has no open claim")]
    UnmatchedExit {
        run: String,
        task: String,
        cycles: Duration,
    },

    #[error("exit with ceiling {exited} in run `{run}` closes a claim with ceiling {entered}")]
    MismatchedExit {
        run: String,
        entered: Priority,
        exited: Priority,
    },

    #[error("run `{run}` of task `{task}` finishes with {open} unclosed claim(s)")]
    UnclosedClaims {
        run: String,
        task: String,
        open: usize,
    },

    #[error("run `{run}` records priority {recorded} for task `{task}`, configured is {configured}")]
    PriorityMismatch {
        run: String,
        task: String,
        recorded: Priority,
        configured: Priority,
    },
}

/// One timed execution of a single task: a `Start` event, any number
/// of `Enter`/`Exit` events, and a `Finish` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    events: &'a [Event],
}

impl<'a> Run<'a> {
    /// Check the framing of a candidate run and wrap it.
    fn new(events: &'a [Event]) -> Result<Self, TraceError> {
        // callers guarantee a Start at the front and a Finish at the back
        let first = &events[0];
        let body = &events[1..events.len() - 1];

        if let Some(e) = events[1..].iter().find(|e| e.run != first.run || e.task != first.task) {
            return Err(TraceError::RunMismatch {
                run: first.run.clone(),
                task: first.task.clone(),
                found_run: e.run.clone(),
                found_task: e.task.clone(),
            });
        }
        if body.iter().any(|e| e.kind == EventKind::Start) {
            // a new run began before this one finished
            return Err(TraceError::UnfinishedRun {
                run: first.run.clone(),
                task: first.task.clone(),
            });
        }
        if let Some((a, b)) = events.iter().tuple_windows().find(|(a, b)| b.cycles < a.cycles) {
            return Err(TraceError::TimeWentBackwards {
                run: first.run.clone(),
                previous: a.cycles,
                found: b.cycles,
            });
        }
        Ok(Run { events })
    }

    pub fn id(&self) -> &'a str {
        &self.events[0].run
    }

    pub fn task(&self) -> &'a str {
        &self.events[0].task
    }

    /// The priority recorded at the start of the run.
    pub fn priority(&self) -> Priority {
        self.events[0].level
    }

    /// The cycle count at `Finish`, i.e., the execution time of the run.
    pub fn execution_time(&self) -> Duration {
        self.events[self.events.len() - 1].cycles
    }

    /// A run that finishes at cycle zero is a skipped (dummy) run.
    pub fn is_skipped(&self) -> bool {
        self.execution_time().is_zero()
    }

    /// The `Enter`/`Exit` events between `Start` and `Finish`.
    pub fn claim_events(&self) -> &'a [Event] {
        &self.events[1..self.events.len() - 1]
    }

    pub fn events(&self) -> &'a [Event] {
        self.events
    }
}

/// An immutable, ordered log of trace events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceLog {
    events: Vec<Event>,
}

impl TraceLog {
    pub fn new(events: Vec<Event>) -> Self {
        TraceLog { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Split the log into its runs, in order of appearance.
    pub fn runs(&self) -> Result<Vec<Run<'_>>, TraceError> {
        let mut runs = Vec::new();
        let mut rest = &self.events[..];
        while let Some(first) = rest.first() {
            if first.kind != EventKind::Start {
                return Err(TraceError::OrphanEvent {
                    run: first.run.clone(),
                    kind: first.kind,
                    cycles: first.cycles,
                });
            }
            let end = rest
                .iter()
                .position(|e| e.kind == EventKind::Finish)
                .ok_or_else(|| TraceError::UnfinishedRun {
                    run: first.run.clone(),
                    task: first.task.clone(),
                })?;
            let (events, tail) = rest.split_at(end + 1);
            runs.push(Run::new(events)?);
            rest = tail;
        }
        Ok(runs)
    }
}

impl From<Vec<Event>> for TraceLog {
    fn from(events: Vec<Event>) -> Self {
        TraceLog::new(events)
    }
}

impl FromIterator<Event> for TraceLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        TraceLog::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests;
