//! Progress handler trait and events

use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while a solution is bundled
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { solution_path: PathBuf },

    /// A layer was left out; `reason` says why
    LayerSkipped { label: String, reason: String },

    /// A bundle was written
    BundleWritten { label: String, path: PathBuf },

    /// A unit of work failed; the run continues
    Failed { label: String, error: String },

    /// Run finished
    Completed {
        processed: usize,
        errors: usize,
        total_time: Duration,
    },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Prints a `Created <path>` line to stdout for every written bundle and the
/// error line of every failed unit as it happens
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleHandler;

impl ConsoleHandler {
    pub fn render(event: &ProgressEvent) -> Option<String> {
        match event {
            ProgressEvent::BundleWritten { path, .. } => {
                Some(format!("Created {}", path.display()))
            }
            ProgressEvent::Failed { error, .. } => Some(error.clone()),
            _ => None,
        }
    }
}

impl ProgressHandler for ConsoleHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        if let Some(line) = Self::render(event) {
            println!("{}", line);
        }
    }
}
