//! Kustomize manifest bundling.
//!
//! Every `.yaml`/`.yml` file under `deploy/kustomize/base` becomes one
//! document of the base bundle; `overlays/<env>` for each known environment
//! is combined the same way into a single overlays bundle, each environment
//! introduced by an `# Environment: <env>` line.

use crate::content::{read_file_content, write_content, FileContent};
use crate::error::BundleError;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const KUSTOMIZE_DIR: &str = "deploy/kustomize";
pub const OVERLAY_ENVIRONMENTS: [&str; 2] = ["production", "staging"];
const MANIFEST_SUFFIXES: [&str; 2] = [".yaml", ".yml"];
const DOCUMENT_SEPARATOR: &str = "---";

/// Combined manifests for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestBundle {
    pub content: String,
    pub errors: Vec<String>,
    pub unreadable: Vec<FileContent>,
}

/// Outcome of bundling a solution's kustomize tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KustomizeOutcome {
    pub processed: Vec<String>,
    pub errors: Vec<String>,
    pub unreadable: Vec<FileContent>,
}

pub struct ManifestCombiner<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> ManifestCombiner<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Combines the manifests under `directory`.
    ///
    /// `label` is the directory's path below `deploy/kustomize` and prefixes
    /// every `# Source:` line. Files are visited in name order within each
    /// directory; directories follow walk order.
    pub fn combine(&self, directory: &Path, label: &str) -> ManifestBundle {
        let mut bundle = ManifestBundle::default();
        if !self.fs.exists(directory) {
            bundle
                .errors
                .push(BundleError::DirectoryNotFound(directory.to_path_buf()).to_string());
            return bundle;
        }

        let mut lines = Vec::new();
        for step in self.fs.walk(directory) {
            let mut files = step.files.clone();
            files.sort();

            for name in files
                .iter()
                .filter(|n| MANIFEST_SUFFIXES.iter().any(|s| n.ends_with(s)))
            {
                let path = step.dir.join(name);
                let content = read_file_content(self.fs, &path);
                let text = content.as_text();
                if text.is_empty() {
                    debug!(path = %path.display(), "Skipping empty manifest");
                    continue;
                }

                let relative = path.strip_prefix(directory).unwrap_or(&path);
                lines.push(format!(
                    "# Source: {}/{}/{}",
                    KUSTOMIZE_DIR,
                    label,
                    relative.display()
                ));
                lines.push(text.trim().to_string());
                lines.push(DOCUMENT_SEPARATOR.to_string());

                if content.is_unreadable() {
                    bundle.unreadable.push(content);
                }
            }
        }

        bundle.content = lines.join("\n");
        bundle
    }

    /// Writes `<name>_base.yaml` and `<name>_overlays.yaml` below
    /// `<results_dir>/deploy/kustomize` for the solution at `solution_path`.
    ///
    /// A bundle is only written when it has content.
    pub fn bundle_solution(
        &self,
        solution_path: &Path,
        results_dir: &Path,
        name: &str,
    ) -> KustomizeOutcome {
        let source = solution_path.join(KUSTOMIZE_DIR);
        let mut outcome = KustomizeOutcome::default();

        let base = self.combine(&source.join("base"), "base");
        if !base.content.is_empty() {
            let output = base_output_path(results_dir, name);
            match write_content(self.fs, &base.content, &output) {
                Ok(()) => {
                    info!(path = %output.display(), "Wrote base manifests");
                    outcome.processed.push(format!("{}/base", KUSTOMIZE_DIR));
                }
                Err(_) => outcome.errors.push("Error writing base yaml file".to_string()),
            }
        }
        outcome.errors.extend(base.errors);
        outcome.unreadable.extend(base.unreadable);

        let mut sections = Vec::new();
        for env in OVERLAY_ENVIRONMENTS {
            let label = format!("overlays/{}", env);
            let overlay = self.combine(&source.join(&label), &label);
            if !overlay.content.is_empty() {
                sections.push(format!("# Environment: {}", env));
                sections.push(overlay.content);
            }
            outcome.errors.extend(overlay.errors);
            outcome.unreadable.extend(overlay.unreadable);
        }

        if !sections.is_empty() {
            let output = overlays_output_path(results_dir, name);
            match write_content(self.fs, &sections.join("\n"), &output) {
                Ok(()) => {
                    info!(path = %output.display(), "Wrote overlay manifests");
                    outcome.processed.push(format!("{}/overlays", KUSTOMIZE_DIR));
                }
                Err(_) => outcome
                    .errors
                    .push("Error writing overlays yaml file".to_string()),
            }
        }

        outcome
    }
}

/// Location of the base bundle for `name` below `results_dir`.
pub fn base_output_path(results_dir: &Path, name: &str) -> PathBuf {
    results_dir
        .join(KUSTOMIZE_DIR)
        .join(format!("{}_base.yaml", name))
}

/// Location of the overlays bundle for `name` below `results_dir`.
pub fn overlays_output_path(results_dir: &Path, name: &str) -> PathBuf {
    results_dir
        .join(KUSTOMIZE_DIR)
        .join(format!("{}_overlays.yaml", name))
}
