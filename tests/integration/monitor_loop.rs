//! End-to-end cycles of a single monitor: fetch → diff → persist → report.

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use vigil::models::Change;
use vigil::monitor::scheduler::IntervalScheduler;
use vigil::monitor::{FetchError, Monitor};
use vigil::shutdown::ShutdownSignal;
use vigil::store::{SnapshotStore, StoreError, MARKER_FILE};

use crate::helpers::{job, snapshot, CollectingExecutor, CollectingHandler, ScriptedFetcher};

fn monitor(
    dir: &std::path::Path,
    fetcher: ScriptedFetcher,
) -> (
    Monitor<vigil::models::JsonRecord, ScriptedFetcher, CollectingHandler, CollectingExecutor>,
    CollectingHandler,
    CollectingExecutor,
) {
    let handler = CollectingHandler::default();
    let executor = CollectingExecutor::default();
    let m = Monitor::new(
        "jobs",
        SnapshotStore::open(dir).unwrap(),
        fetcher,
        handler.clone(),
        executor.clone(),
        IntervalScheduler::new(Duration::from_millis(1)).unwrap(),
    );
    (m, handler, executor)
}

#[test]
fn test_six_cycle_scenario() {
    let tmp = TempDir::new().unwrap();
    let (a, b, c) = (
        job("1", "analyst", "open"),
        job("2", "builder", "open"),
        job("3", "cook", "open"),
    );
    let d = job("4", "driver", "open");
    let (x, y) = (job("1", "analyst", "closed"), job("3", "cook", "closed"));
    let f = job("6", "farmer", "open");

    // Seed the store with {1:a, 2:b, 3:c} as the persisted before-state.
    {
        let (mut seed, _, _) = monitor(
            tmp.path(),
            ScriptedFetcher::new(vec![Ok(snapshot(&[a.clone(), b.clone(), c.clone()]))]),
        );
        seed.run_once().unwrap();
    }

    let script = vec![
        Ok(snapshot(&[a.clone(), c.clone(), d.clone()])),
        Ok(snapshot(&[x.clone(), y.clone(), d.clone()])),
        Ok(snapshot(&[x.clone(), y.clone(), d.clone()])),
        Ok(snapshot(&[x.clone()])),
        Err(FetchError::new("gateway timeout")),
        Ok(snapshot(&[x.clone(), f.clone()])),
    ];
    let (mut m, handler, executor) = monitor(tmp.path(), ScriptedFetcher::new(script));

    for _ in 0..6 {
        m.run_once().unwrap();
    }

    let batches = executor.batches();
    assert_eq!(batches.len(), 4, "the identical and failed cycles report nothing");

    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[0]["2"], Change::Deleted(b));
    assert_eq!(batches[0]["4"], Change::Created(d.clone()));

    assert_eq!(batches[1].len(), 2);
    assert_eq!(
        batches[1]["1"],
        Change::Updated {
            before: a,
            after: x,
        }
    );
    assert_eq!(
        batches[1]["3"],
        Change::Updated {
            before: c,
            after: y.clone(),
        }
    );

    assert_eq!(batches[2].len(), 2);
    assert_eq!(batches[2]["3"], Change::Deleted(y));
    assert_eq!(batches[2]["4"], Change::Deleted(d));

    assert_eq!(batches[3].len(), 1);
    assert_eq!(batches[3]["6"], Change::Created(f));

    assert_eq!(handler.errors(), ["gateway timeout"]);
}

#[test]
fn test_state_survives_monitor_restart() {
    let tmp = TempDir::new().unwrap();
    let first = snapshot(&[job("1", "analyst", "open")]);

    {
        let (mut m, _, _) = monitor(tmp.path(), ScriptedFetcher::new(vec![Ok(first)]));
        m.run_once().unwrap();
    }

    // A fresh monitor over the same directory diffs against persisted
    // state, not an empty baseline.
    let second = snapshot(&[job("1", "analyst", "closed")]);
    let (mut m, _, executor) = monitor(tmp.path(), ScriptedFetcher::new(vec![Ok(second)]));
    m.run_once().unwrap();

    let batches = executor.batches();
    assert_eq!(batches.len(), 1);
    assert!(matches!(batches[0]["1"], Change::Updated { .. }));
}

#[test]
fn test_fetch_error_leaves_persisted_state_untouched() {
    let tmp = TempDir::new().unwrap();
    let baseline = snapshot(&[job("1", "analyst", "open")]);
    let script = vec![Ok(baseline), Err(FetchError::new("down"))];
    let (mut m, handler, _) = monitor(tmp.path(), ScriptedFetcher::new(script));

    m.run_once().unwrap();
    let before = fs::read_to_string(tmp.path().join("1.json")).unwrap();
    m.run_once().unwrap();

    assert_eq!(handler.errors(), ["down"]);
    let after = fs::read_to_string(tmp.path().join("1.json")).unwrap();
    assert_eq!(after, before);
}

#[test]
fn test_run_drives_cycles_until_script_ends() {
    let tmp = TempDir::new().unwrap();
    let signal = ShutdownSignal::new();
    let script = vec![
        Ok(snapshot(&[job("1", "analyst", "open")])),
        Ok(snapshot(&[])),
    ];
    let handler = CollectingHandler::default();
    let executor = CollectingExecutor::default();
    let mut m = Monitor::new(
        "jobs",
        SnapshotStore::open(tmp.path()).unwrap(),
        ScriptedFetcher::until_exhausted(script, signal.clone()),
        handler.clone(),
        executor.clone(),
        IntervalScheduler::new(Duration::from_millis(1)).unwrap(),
    );

    m.run(&signal).unwrap();

    let batches = executor.batches();
    assert_eq!(batches.len(), 2);
    assert!(matches!(batches[1]["1"], Change::Deleted(_)));
    assert!(handler.errors().is_empty());
}

#[test]
fn test_vanished_marker_surfaces_as_loop_failure() {
    let tmp = TempDir::new().unwrap();
    let signal = ShutdownSignal::new();
    let script = vec![
        Ok(snapshot(&[job("1", "analyst", "open")])),
        Ok(snapshot(&[job("1", "analyst", "closed")])),
    ];
    let (mut m, _, _) = monitor(tmp.path(), ScriptedFetcher::new(script));
    m.run_once().unwrap();

    fs::remove_file(tmp.path().join(MARKER_FILE)).unwrap();
    let result = m.run(&signal);

    assert!(matches!(result, Err(StoreError::Unavailable { .. })));
}
