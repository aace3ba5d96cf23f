/*! Trace-driven response-time analysis of fixed-priority, preemptive,
interrupt-driven task sets that share resources under the *Stack Resource
Policy* (SRP).

Starting from a measured execution trace of each task (a [TraceLog][trace::TraceLog])
and a [TaskTable][task::TaskTable] of static priorities and periods, the crate
derives

- each task's WCET and the task set's processor utilization
  ([wcet], [utilization]),
- each task's worst-case SRP blocking ([blocking]),
- a one-shot response-time estimate ([fixed_priority::estimate]), and
- the exact response time by busy-period fixed-point iteration, with
  deadline-miss detection ([fixed_priority::recursive]).

[analysis::analyze] runs the whole pipeline; [report::Report] renders its
result, and [config::Scenario] loads task tables and traces from TOML.

All quantities are integer cycle counts ([time::Duration]); priorities follow
the convention that a larger value is a higher priority ([priority::Priority]).
*/

pub mod analysis;
pub mod arrival;
pub mod blocking;
pub mod config;
pub mod demand;
pub mod fixed_point;
pub mod fixed_priority;
pub mod priority;
pub mod report;
pub mod task;
pub mod time;
pub mod trace;
pub mod utilization;
pub mod wcet;

#[cfg(test)]
mod tests {
    use crate::priority::Priority;
    use crate::task::{TaskDescriptor, TaskTable};
    use crate::time::Duration;
    use crate::trace::{Event, EventKind, TraceLog};

    pub fn d(cycles: u64) -> Duration {
        Duration::from(cycles)
    }

    pub fn p(level: u8) -> Priority {
        Priority::from(level)
    }

    pub fn ev(run: &str, task: &str, cycles: u64, level: u8, kind: EventKind) -> Event {
        Event::new(run, task, d(cycles), p(level), kind)
    }

    /// A task table from `(name, priority, period)` triples.
    pub fn table(tasks: &[(&str, u8, u64)]) -> TaskTable {
        TaskTable::new(
            tasks
                .iter()
                .map(|(name, prio, period)| {
                    TaskDescriptor::new(*name, p(*prio), d(*period)).unwrap()
                })
                .collect(),
        )
        .unwrap()
    }

    /// Three interrupt handlers: EXTI2 has the highest priority,
    /// EXTI1 the lowest. `periods` are given in the order EXTI1,
    /// EXTI2, EXTI3.
    pub fn exti_table(periods: [u64; 3]) -> TaskTable {
        table(&[
            ("EXTI1", 1, periods[0]),
            ("EXTI2", 3, periods[1]),
            ("EXTI3", 2, periods[2]),
        ])
    }

    /// One skipped run followed by one measured run per task.
    ///
    /// EXTI1 holds a resource with ceiling 2 for 15 cycles and, nested
    /// inside it, a resource with ceiling 3 for 10 cycles. EXTI2 and
    /// EXTI3 each hold the ceiling-3 resource for 4 cycles.
    pub fn exti_trace() -> TraceLog {
        use EventKind::*;
        TraceLog::from(vec![
            ev("test000001.ktest", "EXTI1", 0, 1, Start),
            ev("test000001.ktest", "EXTI1", 0, 1, Finish),
            ev("test000002.ktest", "EXTI1", 0, 1, Start),
            ev("test000002.ktest", "EXTI1", 5, 2, Enter),
            ev("test000002.ktest", "EXTI1", 8, 3, Enter),
            ev("test000002.ktest", "EXTI1", 18, 3, Exit),
            ev("test000002.ktest", "EXTI1", 20, 2, Exit),
            ev("test000002.ktest", "EXTI1", 37, 1, Finish),
            ev("test000003.ktest", "EXTI2", 0, 3, Start),
            ev("test000003.ktest", "EXTI2", 2, 3, Enter),
            ev("test000003.ktest", "EXTI2", 6, 3, Exit),
            ev("test000003.ktest", "EXTI2", 11, 3, Finish),
            ev("test000004.ktest", "EXTI3", 0, 2, Start),
            ev("test000004.ktest", "EXTI3", 1, 3, Enter),
            ev("test000004.ktest", "EXTI3", 5, 3, Exit),
            ev("test000004.ktest", "EXTI3", 8, 2, Finish),
        ])
    }

    mod end_to_end {
        use super::{d, ev, exti_table, exti_trace, p};
        use crate::analysis::{analyze, AnalysisConfig, AnalysisError};
        use crate::trace::{EventKind, TraceError};
        use crate::utilization::Utilization;

        #[test]
        fn exti_scenario() {
            let analysis = analyze(
                &exti_trace(),
                &exti_table([100, 30, 40]),
                &AnalysisConfig::default(),
            )
            .unwrap();
            assert_eq!(analysis.utilization, Utilization::new(281, 300));
            assert_eq!(analysis.claims.len(), 4);
            assert!(!analysis.is_schedulable());

            let missed: Vec<_> = analysis.missed().map(|p| p.name()).collect();
            assert_eq!(missed, vec!["EXTI3"]);

            let exti1 = analysis.profile("EXTI1").unwrap();
            assert_eq!(exti1.estimate.response_time, d(105));
            assert_eq!(exti1.response_time(), d(94));
            assert_eq!(exti1.utilization, Utilization::new(37, 100));

            let exti2 = analysis.profile("EXTI2").unwrap();
            assert_eq!(
                (exti2.wcet(), exti2.blocking(), exti2.response_time()),
                (d(11), d(10), d(21))
            );
        }

        #[test]
        fn required_period_vectors() {
            let config = AnalysisConfig::default();
            let missed = |periods| {
                let analysis = analyze(&exti_trace(), &exti_table(periods), &config).unwrap();
                analysis.missed().map(|p| p.name().to_string()).collect::<Vec<_>>()
            };
            assert_eq!(missed([100, 30, 40]), vec!["EXTI3"]);
            assert!(missed([100, 40, 50]).is_empty());
            assert_eq!(missed([80, 30, 40]), vec!["EXTI1", "EXTI3"]);
        }

        #[test]
        fn inconsistent_trace_aborts() {
            let mut events = exti_trace().events().to_vec();
            // drop EXTI1's outer Exit
            events.remove(6);
            let result = analyze(
                &events.into(),
                &exti_table([100, 30, 40]),
                &AnalysisConfig::default(),
            );
            assert!(matches!(
                result,
                Err(AnalysisError::TraceConsistency(TraceError::UnclosedClaims { open: 1, .. }))
            ));
        }

        #[test]
        fn unknown_task_aborts() {
            let table = crate::tests::table(&[("EXTI1", 1, 100), ("EXTI2", 3, 30)]);
            assert_eq!(
                analyze(&exti_trace(), &table, &AnalysisConfig::default()),
                Err(AnalysisError::UnknownTask {
                    name: "EXTI3".to_string()
                })
            );
        }

        #[test]
        fn unknown_task_in_skipped_run_aborts() {
            // a zero-cycle run without claims contributes neither a WCET
            // nor a claim, but its task must still be known
            let mut events = exti_trace().events().to_vec();
            events.push(ev("test000005.ktest", "EXTI9", 0, 4, EventKind::Start));
            events.push(ev("test000005.ktest", "EXTI9", 0, 4, EventKind::Finish));
            assert_eq!(
                analyze(
                    &events.into(),
                    &exti_table([100, 30, 40]),
                    &AnalysisConfig::default()
                ),
                Err(AnalysisError::UnknownTask {
                    name: "EXTI9".to_string()
                })
            );
        }

        #[test]
        fn recorded_priority_must_match_table() {
            let mut events = exti_trace().events().to_vec();
            // EXTI3 is configured with priority 2
            events[12].level = p(4);
            events[15].level = p(4);
            assert_eq!(
                analyze(
                    &events.into(),
                    &exti_table([100, 30, 40]),
                    &AnalysisConfig::default()
                ),
                Err(AnalysisError::TraceConsistency(TraceError::PriorityMismatch {
                    run: "test000004.ktest".to_string(),
                    task: "EXTI3".to_string(),
                    recorded: p(4),
                    configured: p(2),
                }))
            );
        }
    }
}
