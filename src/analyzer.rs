//! Solution-wide bundling run.
//!
//! The run is a fixed sequence: source layers, then test layers, then
//! kustomize manifests. Every failure is recorded in the [`AnalysisReport`]
//! and the run moves on to the next unit of work; nothing aborts it.

use crate::content::{write_content, FileContent};
use crate::definition::{Definition, LayerSelection};
use crate::fs::FileSystem;
use crate::layer::LayerProcessor;
use crate::manifest::ManifestCombiner;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use anyhow::Context;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub const DEFAULT_RESULTS_ROOT: &str = "analysis_results";

/// Test directory candidates as `(parent, suffix)`, tried in order; the
/// directory is `<solution>/<parent>/<layer><suffix>`.
pub const TEST_DIR_CANDIDATES: [(&str, &str); 4] = [
    ("test", ".Test"),
    ("test", ".Tests"),
    ("tests", ".Test"),
    ("tests", ".Tests"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Src,
    Test,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Src => "src",
            LayerKind::Test => "test",
        }
    }

    pub fn label(&self, layer: &str) -> String {
        format!("{}/{}", self.as_str(), layer)
    }
}

/// What a run produced and what went wrong along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub results_dir: PathBuf,
    pub name: String,
    pub processed: Vec<String>,
    pub errors: Vec<String>,
}

impl AnalysisReport {
    pub fn new(results_dir: PathBuf, name: &str) -> Self {
        Self {
            results_dir,
            name: name.to_string(),
            processed: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn record_unreadable(&mut self, unreadable: Vec<FileContent>) {
        for content in unreadable {
            if let FileContent::Unreadable { path, reason } = content {
                self.errors
                    .push(format!("Unreadable file {}: {}", path.display(), reason));
            }
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processing Summary:")?;
        writeln!(f, "Results saved in: {}", self.results_dir.display())?;
        writeln!(f, "Analysis name: {}", self.name)?;
        writeln!(
            f,
            "Successfully processed projects: {}",
            self.processed.join(", ")
        )?;
        if self.errors.is_empty() {
            write!(f, "No errors encountered during processing.")
        } else {
            write!(f, "\nErrors encountered:")?;
            for error in &self.errors {
                write!(f, "\n- {}", error)?;
            }
            Ok(())
        }
    }
}

pub struct SolutionAnalyzer<'a> {
    fs: &'a dyn FileSystem,
    definition: &'a Definition,
    results_root: PathBuf,
    progress: Arc<dyn ProgressHandler>,
}

impl<'a> SolutionAnalyzer<'a> {
    pub fn new(fs: &'a dyn FileSystem, definition: &'a Definition) -> Self {
        Self {
            fs,
            definition,
            results_root: PathBuf::from(DEFAULT_RESULTS_ROOT),
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_results_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.results_root = root.into();
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    /// `<results_root>/<name>`
    pub fn results_dir(&self) -> PathBuf {
        self.results_root.join(&self.definition.name)
    }

    fn solution_path(&self) -> &Path {
        &self.definition.solution_path
    }

    pub fn output_path(&self, kind: LayerKind, layer: &str) -> PathBuf {
        self.results_dir().join(kind.as_str()).join(format!(
            "{}_{}_{}.cs",
            self.definition.name,
            kind.as_str(),
            layer
        ))
    }

    /// First existing test directory for `layer`.
    pub fn resolve_test_dir(&self, layer: &str) -> Option<PathBuf> {
        TEST_DIR_CANDIDATES
            .iter()
            .map(|(parent, suffix)| {
                self.solution_path()
                    .join(parent)
                    .join(format!("{}{}", layer, suffix))
            })
            .find(|candidate| self.fs.exists(candidate))
    }

    pub fn analyze(&self) -> AnalysisReport {
        let start = Instant::now();
        let mut report = AnalysisReport::new(self.results_dir(), &self.definition.name);
        self.progress.on_progress(&ProgressEvent::Started {
            solution_path: self.solution_path().to_path_buf(),
        });

        for layer in &self.definition.layers {
            let layer_dir = self.solution_path().join("src").join(layer);
            if self.fs.exists(&layer_dir) {
                self.bundle_layer(LayerKind::Src, layer, &layer_dir, &mut report);
            } else {
                let label = LayerKind::Src.label(layer);
                self.progress.on_progress(&ProgressEvent::LayerSkipped {
                    label: label.clone(),
                    reason: "project folder not found".to_string(),
                });
                report
                    .errors
                    .push(format!("Project folder not found: {}", label));
            }
        }

        for layer in &self.definition.layers {
            match self.resolve_test_dir(layer) {
                Some(test_dir) => self.bundle_layer(LayerKind::Test, layer, &test_dir, &mut report),
                None => self.progress.on_progress(&ProgressEvent::LayerSkipped {
                    label: LayerKind::Test.label(layer),
                    reason: "no test project".to_string(),
                }),
            }
        }

        let outcome = ManifestCombiner::new(self.fs).bundle_solution(
            self.solution_path(),
            &report.results_dir,
            &self.definition.name,
        );
        for label in &outcome.processed {
            self.progress.on_progress(&ProgressEvent::BundleWritten {
                label: label.clone(),
                path: report.results_dir.join(label),
            });
        }
        report.processed.extend(outcome.processed);
        report.errors.extend(outcome.errors);
        report.record_unreadable(outcome.unreadable);

        self.progress.on_progress(&ProgressEvent::Completed {
            processed: report.processed.len(),
            errors: report.errors.len(),
            total_time: start.elapsed(),
        });
        report
    }

    fn bundle_layer(&self, kind: LayerKind, layer: &str, dir: &Path, report: &mut AnalysisReport) {
        let label = kind.label(layer);
        let bundle = match self.definition.selection_for(layer) {
            Ok(LayerSelection::Skip) => {
                debug!(layer = %label, "No selectors for layer, skipping");
                self.progress.on_progress(&ProgressEvent::LayerSkipped {
                    label,
                    reason: "no files selected".to_string(),
                });
                return;
            }
            Ok(selection) => {
                let selectors = match selection {
                    LayerSelection::Selected(selectors) => Some(selectors),
                    _ => None,
                };
                LayerProcessor::new(self.fs)
                    .process(dir, selectors.as_deref())
                    .map_err(anyhow::Error::from)
            }
            Err(e) => Err(anyhow::Error::from(e)),
        };

        let bundle = match bundle.with_context(|| format!("Error processing {}", label)) {
            Ok(bundle) => bundle,
            Err(e) => {
                let message = format!("{:?}", e);
                self.progress.on_progress(&ProgressEvent::Failed {
                    label: label.clone(),
                    error: format!("{:#}", e),
                });
                report.errors.push(message);
                return;
            }
        };

        let output = self.output_path(kind, layer);
        match write_content(self.fs, &bundle.content, &output) {
            Ok(()) => {
                self.progress.on_progress(&ProgressEvent::BundleWritten {
                    label: label.clone(),
                    path: output,
                });
                report.processed.push(label);
            }
            Err(_) => {
                let message = format!("Error writing combined file for {}", label);
                self.progress.on_progress(&ProgressEvent::Failed {
                    label,
                    error: message.clone(),
                });
                report.errors.push(message);
            }
        }
        report.record_unreadable(bundle.unreadable);
    }
}
