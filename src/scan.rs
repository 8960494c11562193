//! Suffix-based file discovery.

use crate::fs::FileSystem;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Lists every file under `directory` whose name ends with `suffix`.
///
/// Matching is a plain string suffix test on the file name, so `.txt`
/// matches `xfile.txt` and `.hidden.txt` but not `file.txtx`. Paths are
/// returned in walk order (a directory's files before its subdirectories')
/// and are built by joining onto `directory` as given. A missing directory
/// yields an empty list.
pub fn files_with_suffix(fs: &dyn FileSystem, directory: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut matches = Vec::new();
    for step in fs.walk(directory) {
        for name in step.files.iter().filter(|name| name.ends_with(suffix)) {
            let path = step.dir.join(name);
            trace!(path = %path.display(), "Matched file");
            matches.push(path);
        }
    }
    matches
}
