//! FileSystem trait definition

use anyhow::Result;
use std::path::{Path, PathBuf};

/// One directory visited by [`FileSystem::walk`].
///
/// `subdirs` and `files` hold bare entry names in the order the directory
/// listing produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkStep {
    pub dir: PathBuf,
    pub subdirs: Vec<String>,
    pub files: Vec<String>,
}

impl WalkStep {
    pub fn new(dir: impl Into<PathBuf>, subdirs: &[&str], files: &[&str]) -> Self {
        Self {
            dir: dir.into(),
            subdirs: subdirs.iter().map(|s| s.to_string()).collect(),
            files: files.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Full paths of this directory's files, in listing order.
    pub fn file_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.files.iter().map(move |name| self.dir.join(name))
    }
}

/// Abstraction over file system operations for testability
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Read file contents as UTF-8
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write UTF-8 contents, creating missing parent directories
    fn write_string(&self, path: &Path, contents: &str) -> Result<()>;

    /// Walk a tree top-down.
    ///
    /// Every directory is reported before its subdirectories, so a
    /// directory's own files always precede the files of its descendants.
    /// A missing root produces no steps.
    fn walk(&self, root: &Path) -> Vec<WalkStep>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_step_file_paths() {
        let step = WalkStep::new("/repo/src", &["nested"], &["a.cs", "b.cs"]);
        let paths: Vec<PathBuf> = step.file_paths().collect();

        assert_eq!(
            paths,
            vec![PathBuf::from("/repo/src/a.cs"), PathBuf::from("/repo/src/b.cs")]
        );
    }

    #[test]
    fn test_walk_step_empty() {
        let step = WalkStep::new("/repo", &[], &[]);
        assert_eq!(step.file_paths().count(), 0);
        assert!(step.subdirs.is_empty());
    }
}
