//! Several monitors under one shutdown signal, thread per watch.

use std::fs;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use vigil::monitor::scheduler::IntervalScheduler;
use vigil::monitor::Monitor;
use vigil::shutdown::ShutdownSignal;
use vigil::store::{SnapshotStore, StoreError, MARKER_FILE};

use crate::helpers::{job, snapshot, CollectingExecutor, CollectingHandler, ScriptedFetcher};

fn spawn_watch(
    dir: &std::path::Path,
    name: &str,
    script: Vec<Result<vigil::models::Snapshot<vigil::models::JsonRecord>, vigil::monitor::FetchError>>,
    signal: &ShutdownSignal,
) -> (thread::JoinHandle<Result<(), StoreError>>, CollectingExecutor) {
    let executor = CollectingExecutor::default();
    let mut monitor = Monitor::new(
        name,
        SnapshotStore::open(dir).unwrap(),
        ScriptedFetcher::new(script),
        CollectingHandler::default(),
        executor.clone(),
        IntervalScheduler::new(Duration::from_millis(5)).unwrap(),
    );
    let thread_signal = signal.clone();
    let handle = thread::spawn(move || monitor.run(&thread_signal));
    (handle, executor)
}

#[test]
fn test_one_signal_stops_every_monitor() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let signal = ShutdownSignal::new();

    // Endless steady-state scripts: the same snapshot forever.
    let steady_a: Vec<_> = (0..10_000)
        .map(|_| Ok(snapshot(&[job("1", "analyst", "open")])))
        .collect();
    let steady_b: Vec<_> = (0..10_000)
        .map(|_| Ok(snapshot(&[job("9", "cook", "open")])))
        .collect();

    let (handle_a, exec_a) = spawn_watch(dir_a.path(), "a", steady_a, &signal);
    let (handle_b, exec_b) = spawn_watch(dir_b.path(), "b", steady_b, &signal);

    thread::sleep(Duration::from_millis(30));
    signal.trigger();

    handle_a.join().unwrap().unwrap();
    handle_b.join().unwrap().unwrap();

    // Each watch saw its own creation batch and nothing from the other.
    assert_eq!(exec_a.batches().len(), 1);
    assert!(exec_a.batches()[0].contains_key("1"));
    assert_eq!(exec_b.batches().len(), 1);
    assert!(exec_b.batches()[0].contains_key("9"));
}

#[test]
fn test_store_failure_terminates_only_its_own_loop() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let signal = ShutdownSignal::new();

    // Watch A alternates snapshots so every cycle writes, making it hit
    // the vanished marker quickly.
    let churning: Vec<_> = (0..10_000)
        .map(|i| {
            let status = if i % 2 == 0 { "open" } else { "closed" };
            Ok(snapshot(&[job("1", "analyst", status)]))
        })
        .collect();
    let steady: Vec<_> = (0..10_000)
        .map(|_| Ok(snapshot(&[job("9", "cook", "open")])))
        .collect();

    let (handle_a, _) = spawn_watch(dir_a.path(), "a", churning, &signal);
    let (handle_b, _) = spawn_watch(dir_b.path(), "b", steady, &signal);

    thread::sleep(Duration::from_millis(30));
    fs::remove_file(dir_a.path().join(MARKER_FILE)).unwrap();

    let result_a = handle_a.join().unwrap();
    assert!(matches!(result_a, Err(StoreError::Unavailable { .. })));

    // Watch B is still alive and only stops on the shared signal.
    assert!(!handle_b.is_finished());
    signal.trigger();
    handle_b.join().unwrap().unwrap();
}
