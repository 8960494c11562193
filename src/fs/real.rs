use super::{FileSystem, WalkStep};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory {:?}", parent))?;
        }
        fs::write(path, contents).context(format!("Failed to write file {:?}", path))
    }

    /// Top-down walk. Each directory's files sort ahead of its
    /// subdirectories, so a directory is complete before its first child
    /// directory is entered. Linked directories are listed but not entered.
    fn walk(&self, root: &Path) -> Vec<WalkStep> {
        let mut steps: Vec<WalkStep> = Vec::new();
        if !root.is_dir() {
            return steps;
        }

        let mut index: HashMap<PathBuf, usize> = HashMap::new();
        let walker = WalkDir::new(root).follow_links(false).sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        });

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(root = %root.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let is_dir = entry.file_type().is_dir();
            if entry.depth() > 0 {
                let parent = entry.path().parent().and_then(|p| index.get(p).copied());
                if let Some(step) = parent.map(|i| &mut steps[i]) {
                    let name = entry.file_name().to_string_lossy().to_string();
                    if is_dir || (entry.path_is_symlink() && entry.path().is_dir()) {
                        step.subdirs.push(name);
                    } else {
                        step.files.push(name);
                    }
                }
            }

            if is_dir {
                index.insert(entry.path().to_path_buf(), steps.len());
                steps.push(WalkStep {
                    dir: entry.path().to_path_buf(),
                    subdirs: Vec::new(),
                    files: Vec::new(),
                });
            }
        }
        steps
    }
}
