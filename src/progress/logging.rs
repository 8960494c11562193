//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { solution_path } => {
                info!(solution = %solution_path.display(), "Starting analysis");
            }
            ProgressEvent::LayerSkipped { label, reason } => {
                debug!(layer = %label, reason = %reason, "Layer skipped");
            }
            ProgressEvent::BundleWritten { label, path } => {
                info!(layer = %label, path = %path.display(), "Bundle written");
            }
            ProgressEvent::Failed { label, error } => {
                warn!(layer = %label, error = %error, "Layer failed");
            }
            ProgressEvent::Completed {
                processed,
                errors,
                total_time,
            } => {
                info!(
                    processed,
                    errors,
                    total_time_ms = total_time.as_millis(),
                    "Analysis complete"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::Started {
                solution_path: PathBuf::from("/test"),
            },
            ProgressEvent::LayerSkipped {
                label: "src/Domain.Core".to_string(),
                reason: "no selectors".to_string(),
            },
            ProgressEvent::BundleWritten {
                label: "src/Infrastructure".to_string(),
                path: PathBuf::from("/out/demo_src_Infrastructure.cs"),
            },
            ProgressEvent::Failed {
                label: "test/Infrastructure".to_string(),
                error: "Test error".to_string(),
            },
            ProgressEvent::Completed {
                processed: 2,
                errors: 1,
                total_time: Duration::from_secs(1),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
