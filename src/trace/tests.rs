use super::{Event, EventKind, TraceError, TraceLog};
use crate::tests::{d, ev, exti_trace};

#[test]
fn splits_exti_trace_into_runs() {
    let log = exti_trace();
    let runs = log.runs().unwrap();
    let summary: Vec<_> = runs
        .iter()
        .map(|r| (r.task(), r.execution_time(), r.is_skipped()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("EXTI1", d(0), true),
            ("EXTI1", d(37), false),
            ("EXTI2", d(11), false),
            ("EXTI3", d(8), false),
        ]
    );
    assert_eq!(runs[1].claim_events().len(), 4);
    assert_eq!(runs[1].id(), "test000002.ktest");
}

#[test]
fn empty_log_has_no_runs() {
    assert_eq!(TraceLog::default().runs(), Ok(vec![]));
}

#[test]
fn event_before_start_is_orphaned() {
    let log: TraceLog = vec![
        ev("a", "T", 3, 1, EventKind::Enter),
        ev("a", "T", 0, 1, EventKind::Start),
        ev("a", "T", 9, 1, EventKind::Finish),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        log.runs(),
        Err(TraceError::OrphanEvent {
            run: "a".to_string(),
            kind: EventKind::Enter,
            cycles: d(3),
        })
    );
}

#[test]
fn missing_finish() {
    let log = TraceLog::from(vec![
        ev("a", "T", 0, 1, EventKind::Start),
        ev("a", "T", 4, 2, EventKind::Enter),
    ]);
    assert_eq!(
        log.runs(),
        Err(TraceError::UnfinishedRun {
            run: "a".to_string(),
            task: "T".to_string(),
        })
    );
}

#[test]
fn start_before_previous_run_finished() {
    let log = TraceLog::from(vec![
        ev("a", "T", 0, 1, EventKind::Start),
        ev("a", "T", 0, 1, EventKind::Start),
        ev("a", "T", 5, 1, EventKind::Finish),
    ]);
    assert!(matches!(log.runs(), Err(TraceError::UnfinishedRun { .. })));
}

#[test]
fn runs_do_not_interleave() {
    let log = TraceLog::from(vec![
        ev("a", "T", 0, 1, EventKind::Start),
        ev("b", "U", 2, 2, EventKind::Enter),
        ev("a", "T", 5, 1, EventKind::Finish),
    ]);
    assert_eq!(
        log.runs(),
        Err(TraceError::RunMismatch {
            run: "a".to_string(),
            task: "T".to_string(),
            found_run: "b".to_string(),
            found_task: "U".to_string(),
        })
    );
}

#[test]
fn timestamps_never_decrease() {
    let log = TraceLog::from(vec![
        ev("a", "T", 0, 1, EventKind::Start),
        ev("a", "T", 6, 2, EventKind::Enter),
        ev("a", "T", 4, 2, EventKind::Exit),
        ev("a", "T", 9, 1, EventKind::Finish),
    ]);
    assert_eq!(
        log.runs(),
        Err(TraceError::TimeWentBackwards {
            run: "a".to_string(),
            previous: d(6),
            found: d(4),
        })
    );
}

#[test]
fn event_constructor() {
    let e = Event::new("r", "T", d(5), crate::tests::p(2), EventKind::Exit);
    assert_eq!(e, ev("r", "T", 5, 2, EventKind::Exit));
}
