//! `vigil run` - monitor every configured watch until shutdown.

use std::path::PathBuf;
use std::thread;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::{debug, error};

use crate::config::{Config, WatchConfig};
use crate::fetch::HttpJsonFetcher;
use crate::keys;
use crate::models::JsonRecord;
use crate::monitor::scheduler::IntervalScheduler;
use crate::monitor::Monitor;
use crate::report::ConsoleReporter;
use crate::shutdown::ShutdownSignal;
use crate::store::SnapshotStore;
use crate::utils::{cleanup_terminal, emit, install_terminal_panic_hook};

type WatchMonitor = Monitor<JsonRecord, HttpJsonFetcher, ConsoleReporter, ConsoleReporter>;

pub fn execute(config_path: PathBuf, once: bool) -> Result<()> {
    let config = Config::load(&config_path)?;

    if once {
        run_once(&config)
    } else {
        run_until_shutdown(&config)
    }
}

/// One cycle per watch, sequentially, then exit.
///
/// A failing watch does not stop the others; the command fails afterwards
/// if any watch failed.
fn run_once(config: &Config) -> Result<()> {
    let mut failures = 0;
    for watch in &config.watches {
        let result = build_monitor(config, watch).and_then(|mut monitor| {
            monitor
                .run_once()
                .with_context(|| format!("watch '{}' failed", watch.name))
        });
        if let Err(e) = result {
            failures += 1;
            emit(format!("{} {e:#}", "error:".red().bold()));
        }
    }
    if failures > 0 {
        bail!("{failures} of {} watches failed", config.watches.len());
    }
    Ok(())
}

fn run_until_shutdown(config: &Config) -> Result<()> {
    install_terminal_panic_hook();

    let signal = ShutdownSignal::new();

    let ctrlc_signal = signal.clone();
    ctrlc::set_handler(move || {
        ctrlc_signal.trigger();
    })
    .context("Failed to set Ctrl+C handler")?;

    // No key channel when stdin is not a terminal; the signal handler
    // still stops the process.
    let listener = match keys::spawn_listener(signal.clone()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            debug!(error = %e, "key channel unavailable, running headless");
            None
        }
    };

    emit(format!(
        "{} watching {} source{} (Ctrl+D stops, Ctrl+L clears)",
        "vigil".bold(),
        config.watches.len(),
        if config.watches.len() == 1 { "" } else { "s" },
    ));

    let mut workers = Vec::new();
    for watch in &config.watches {
        // Built inside the owning thread so a corrupt store directory
        // takes down this watch only.
        let monitor = build_monitor(config, watch);
        let name = watch.name.clone();
        let thread_signal = signal.clone();

        let handle = thread::Builder::new()
            .name(format!("watch-{name}"))
            .spawn(move || match monitor {
                Ok(mut monitor) => {
                    if let Err(e) = monitor.run(&thread_signal) {
                        error!(watch = %name, error = %e, "monitor terminated");
                        emit(format!("{} watch '{name}' stopped: {e}", "error:".red().bold()));
                    }
                }
                Err(e) => {
                    error!(watch = %name, error = format!("{e:#}"), "monitor failed to start");
                    emit(format!(
                        "{} watch '{name}' failed to start: {e:#}",
                        "error:".red().bold()
                    ));
                }
            })
            .with_context(|| format!("Failed to spawn thread for watch '{}'", watch.name))?;
        workers.push(handle);
    }

    for handle in workers {
        let _ = handle.join();
    }

    // Every monitor is done, either by shutdown or by failure. Release the
    // key listener if it is still blocked on the terminal.
    signal.trigger();
    if let Some(handle) = listener {
        let _ = handle.join();
    }

    cleanup_terminal();
    emit("vigil stopped".dimmed());
    Ok(())
}

fn build_monitor(config: &Config, watch: &WatchConfig) -> Result<WatchMonitor> {
    let dir = config.snapshot_dir(watch)?;
    let store = SnapshotStore::open(&dir)
        .with_context(|| format!("Failed to open snapshot store for watch '{}'", watch.name))?;
    let fetcher = HttpJsonFetcher::new(&watch.url, &watch.id_field)?;
    let handler = ConsoleReporter::new(&watch.name, &watch.highlight)?;
    let executor = ConsoleReporter::new(&watch.name, &watch.highlight)?;
    let scheduler = IntervalScheduler::new(watch.interval())?;

    Ok(Monitor::new(
        &watch.name,
        store,
        fetcher,
        handler,
        executor,
        scheduler,
    ))
}
