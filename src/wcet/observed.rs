use log::{debug, warn};
use serde::Deserialize;

use crate::analysis::AnalysisError;
use crate::task::TaskTable;
use crate::time::Duration;
use crate::trace::{EventKind, TraceLog};

/// How repeated WCET observations of the same task are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WcetPolicy {
    /// A later observation replaces an earlier one.
    #[default]
    LastObserved,
    /// Keep the longest observed execution time.
    MaxObserved,
}

/// Extract the WCET of each task in `table` from the `Finish` events
/// of `log`. The result is indexed by [TaskId][crate::task::TaskId].
///
/// A `Finish` at cycle zero marks a skipped run and is ignored. Tasks
/// without any observation are assigned a WCET of zero.
pub fn observed_wcets(
    log: &TraceLog,
    table: &TaskTable,
    policy: WcetPolicy,
) -> Result<Vec<Duration>, AnalysisError> {
    let mut wcets: Vec<Option<Duration>> = vec![None; table.len()];

    let finished = log
        .events()
        .iter()
        .filter(|e| e.kind == EventKind::Finish && e.cycles.is_non_zero());
    for e in finished {
        let id = table.id_of(&e.task)?;
        debug!("run `{}`: {} finished after {} cycles", e.run, e.task, e.cycles);
        let slot = &mut wcets[id];
        *slot = match (policy, *slot) {
            (WcetPolicy::MaxObserved, Some(seen)) => Some(seen.max(e.cycles)),
            _ => Some(e.cycles),
        };
    }

    Ok(table
        .iter()
        .zip(wcets)
        .map(|(task, wcet)| {
            wcet.unwrap_or_else(|| {
                warn!("no completed run of task {} in trace; assuming zero WCET", task.name());
                Duration::zero()
            })
        })
        .collect())
}
