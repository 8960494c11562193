//! Reading source files into bundles and persisting bundles to disk.

use crate::error::BundleError;
use crate::fs::FileSystem;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Result of reading one input file.
///
/// A failed read is kept apart from real content so callers can report it,
/// while [`FileContent::as_text`] still yields the inline error line that
/// ends up in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Unreadable { path: PathBuf, reason: String },
}

impl FileContent {
    pub fn as_text(&self) -> String {
        match self {
            FileContent::Text(text) => text.clone(),
            FileContent::Unreadable { .. } => format!("{}\n", self),
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, FileContent::Unreadable { .. })
    }
}

impl fmt::Display for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileContent::Text(text) => f.write_str(text),
            FileContent::Unreadable { path, reason } => {
                write!(f, "Error reading file {}: {}", path.display(), reason)
            }
        }
    }
}

/// Reads `path` as UTF-8. Never fails; see [`FileContent`].
pub fn read_file_content(fs: &dyn FileSystem, path: &Path) -> FileContent {
    match fs.read_to_string(path) {
        Ok(text) => FileContent::Text(text),
        Err(e) => {
            let reason = e.root_cause().to_string();
            warn!(path = %path.display(), error = %reason, "Could not read file");
            FileContent::Unreadable {
                path: path.to_path_buf(),
                reason,
            }
        }
    }
}

/// Writes `content` to `output`, creating parent directories.
pub fn write_content(fs: &dyn FileSystem, content: &str, output: &Path) -> Result<(), BundleError> {
    fs.write_string(output, content).map_err(|e| {
        let err = BundleError::Write {
            path: output.to_path_buf(),
            reason: e.root_cause().to_string(),
        };
        error!("{}", err);
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MockFileSystem, RealFileSystem};
    use tempfile::TempDir;

    #[test]
    fn test_read_existing_file() {
        let fs = MockFileSystem::new();
        fs.add_file("a.cs", "class A {}");

        let content = read_file_content(&fs, Path::new("/mock/a.cs"));

        assert_eq!(content, FileContent::Text("class A {}".to_string()));
        assert_eq!(content.as_text(), "class A {}");
        assert!(!content.is_unreadable());
    }

    #[test]
    fn test_read_missing_file_is_tagged() {
        let fs = MockFileSystem::new();

        let content = read_file_content(&fs, Path::new("/mock/missing.cs"));

        assert!(content.is_unreadable());
        assert!(content
            .as_text()
            .starts_with("Error reading file /mock/missing.cs: "));
        assert!(content.as_text().ends_with('\n'));
    }

    #[test]
    fn test_read_unreadable_reason_is_kept() {
        let fs = MockFileSystem::new();
        fs.add_unreadable("locked.cs", "Permission denied");

        let content = read_file_content(&fs, Path::new("/mock/locked.cs"));

        assert_eq!(
            content.as_text(),
            "Error reading file /mock/locked.cs: Permission denied\n"
        );
    }

    #[test]
    fn test_read_invalid_utf8_on_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("latin1.cs");
        std::fs::write(&path, [b'a', 0xe9, b'b']).unwrap();

        let content = read_file_content(&RealFileSystem::new(), &path);

        assert!(content.is_unreadable());
        assert!(content
            .to_string()
            .starts_with(&format!("Error reading file {}: ", path.display())));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("analysis_results/demo/src/demo_src_Core.cs");

        write_content(&RealFileSystem::new(), "bundle", &output).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "bundle");
    }

    #[test]
    fn test_write_failure_is_reported() {
        let fs = MockFileSystem::new();
        fs.deny_writes("out");

        let err = write_content(&fs, "bundle", Path::new("/mock/out/x.cs")).unwrap_err();

        match err {
            BundleError::Write { path, reason } => {
                assert_eq!(path, PathBuf::from("/mock/out/x.cs"));
                assert!(reason.contains("Permission denied"));
            }
            other => panic!("Expected Write error, got {:?}", other),
        }
    }
}
