//! Watch mode: rebuild whenever a source stylesheet changes.
//!
//! ```text
//! notify → mpsc → Debouncer (timing + dedup) → filter by extension → build
//! ```
//!
//! The loop runs on the calling thread and builds synchronously, so two
//! builds never overlap. Events that arrive during a build queue up in the
//! channel and are coalesced into the next one.

mod debouncer;
mod roots;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;

use crate::config::{Config, SourceConfig};
use crate::core::{is_shutdown, request_shutdown};
use crate::logger::{status_error, status_success, status_warning};
use crate::pipeline::{self, BuildReport};
use crate::{debug, log};
use debouncer::{ChangeKind, Debouncer};
use roots::WatchRoots;

/// Upper bound on one wait, so Ctrl+C is noticed promptly.
const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

/// Build once, then rebuild on every relevant change until shutdown.
pub fn watch(config: &Config) -> Result<()> {
    let (notify_tx, notify_rx) = mpsc::channel();

    // Watcher first: changes made during the initial build are buffered.
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })
    .context("failed to create file watcher")?;

    let mut roots = WatchRoots::new(config.watch_roots());
    roots
        .attach_existing(&mut watcher)
        .context("failed to watch source directory")?;

    rebuild(config, &[]);
    log!("watch"; "watching {} for changes", config.root_relative(&config.source.dir).display());

    let mut debouncer = Debouncer::new(config.watch.debounce(), config.watch.cooldown());

    while !is_shutdown() {
        match notify_rx.recv_timeout(debouncer.sleep_duration().min(SHUTDOWN_POLL)) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            Ok(Err(e)) => log!("watch"; "notify error: {}", e),
            Err(RecvTimeoutError::Timeout) => {
                let reattached = roots.maintain(&mut watcher);
                if !reattached.is_empty() {
                    rebuild(config, &reattached);
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                log!("watch"; "watcher stopped");
                request_shutdown();
            }
        }

        let Some(changes) = debouncer.take_if_ready() else {
            continue;
        };
        let changed = relevant_changes(changes, &config.source);
        if changed.is_empty() {
            debug!("watch"; "ignoring changes outside watched extensions");
            continue;
        }
        rebuild(config, &changed);
    }

    Ok(())
}

/// Paths that should trigger a rebuild, sorted.
fn relevant_changes(changes: FxHashMap<PathBuf, ChangeKind>, source: &SourceConfig) -> Vec<PathBuf> {
    let mut paths: Vec<_> = changes
        .into_keys()
        .filter(|path| source.is_source_file(path))
        .collect();
    paths.sort();
    paths
}

/// Run one build and report it on the status line. Errors never escape.
fn rebuild(config: &Config, changed: &[PathBuf]) {
    for path in changed {
        debug!("watch"; "changed: {}", config.root_relative(path).display());
    }

    match pipeline::build(config) {
        Ok(report) => {
            let summary = summarize(config, &report);
            if report.written().next().is_some() {
                status_success(&summary);
            } else {
                status_warning(&summary);
            }
        }
        Err(e) => {
            status_error("build failed, keeping previous output", &e.to_string());
        }
    }
}

fn summarize(config: &Config, report: &BuildReport) -> String {
    let written: Vec<String> = report
        .written()
        .map(|path| {
            let relative = path.strip_prefix(&config.output.dir).unwrap_or(path);
            relative.display().to_string()
        })
        .collect();

    if written.is_empty() {
        format!("unchanged output ({} ms)", report.elapsed.as_millis())
    } else {
        format!("rebuilt {} ({} ms)", written.join(", "), report.elapsed.as_millis())
    }
}
