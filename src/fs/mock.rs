use super::{FileSystem, WalkStep};
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEntry {
    Directory,
    File(String),
    /// A file whose reads fail with the given reason.
    Unreadable(String),
}

/// In-memory file system.
///
/// Entries keep their insertion order, which doubles as the directory
/// listing order reported by [`FileSystem::walk`].
pub struct MockFileSystem {
    entries: RwLock<Vec<(PathBuf, MockEntry)>>,
    denied_writes: RwLock<Vec<PathBuf>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            denied_writes: RwLock::new(Vec::new()),
            root,
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        self.insert(path.as_ref(), MockEntry::File(content.to_string()));
    }

    pub fn add_unreadable(&self, path: impl AsRef<Path>, reason: &str) {
        self.insert(path.as_ref(), MockEntry::Unreadable(reason.to_string()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Directory);
    }

    /// Make every write at or below `prefix` fail.
    pub fn deny_writes(&self, prefix: impl AsRef<Path>) {
        let prefix = self.normalize_path(prefix.as_ref());
        self.denied_writes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prefix);
    }

    /// Contents of a file previously written (or added) at `path`.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = self.normalize_path(path.as_ref());
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(p, _)| *p == path)
            .and_then(|(_, e)| match e {
                MockEntry::File(content) => Some(content.clone()),
                _ => None,
            })
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let path = self.normalize_path(path);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut entries, parent);
        }

        match entries.iter_mut().find(|(p, _)| *p == path) {
            Some(existing) => existing.1 = entry,
            None => entries.push((path, entry)),
        }
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(entries: &mut Vec<(PathBuf, MockEntry)>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if !entries.iter().any(|(p, _)| *p == current) {
                entries.push((current.clone(), MockEntry::Directory));
            }
        }
    }

    fn entry(&self, path: &Path) -> Option<MockEntry> {
        let path = self.normalize_path(path);
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, e)| e.clone())
    }

    fn walk_into(&self, dir: &Path, steps: &mut Vec<WalkStep>) {
        let mut subdirs = Vec::new();
        let mut descend = Vec::new();
        let mut files = Vec::new();

        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        for (path, entry) in entries.iter() {
            if path.parent() != Some(dir) {
                continue;
            }
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();
            match entry {
                MockEntry::Directory => {
                    subdirs.push(name);
                    descend.push(path.clone());
                }
                MockEntry::File(_) | MockEntry::Unreadable(_) => files.push(name),
            }
        }
        drop(entries);

        steps.push(WalkStep {
            dir: dir.to_path_buf(),
            subdirs,
            files,
        });

        for child in descend {
            self.walk_into(&child, steps);
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entry(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entry(path), Some(MockEntry::Directory))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(
            self.entry(path),
            Some(MockEntry::File(_)) | Some(MockEntry::Unreadable(_))
        )
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.entry(path) {
            Some(MockEntry::File(content)) => Ok(content),
            Some(MockEntry::Unreadable(reason)) => Err(anyhow!("{}", reason)),
            Some(MockEntry::Directory) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("No such file or directory: {:?}", path)),
        }
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        let normalized = self.normalize_path(path);
        let denied = self
            .denied_writes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|prefix| normalized.starts_with(prefix));
        if denied {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        if self.is_dir(path) {
            return Err(anyhow!("Is a directory: {:?}", path));
        }

        self.add_file(path, contents);
        Ok(())
    }

    fn walk(&self, root: &Path) -> Vec<WalkStep> {
        let root = self.normalize_path(root);
        let mut steps = Vec::new();
        if self.is_dir(&root) {
            self.walk_into(&root, &mut steps);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file() {
        let fs = MockFileSystem::new();
        fs.add_file("test.txt", "hello");

        assert!(fs.exists(Path::new("/mock/test.txt")));
        assert!(fs.is_file(Path::new("/mock/test.txt")));
    }

    #[test]
    fn test_add_dir() {
        let fs = MockFileSystem::new();
        fs.add_dir("subdir");

        assert!(fs.exists(Path::new("/mock/subdir")));
        assert!(fs.is_dir(Path::new("/mock/subdir")));
    }

    #[test]
    fn test_parent_directories_created() {
        let fs = MockFileSystem::new();
        fs.add_file("a/b/c/file.txt", "content");

        assert!(fs.is_dir(Path::new("/mock/a")));
        assert!(fs.is_dir(Path::new("/mock/a/b")));
        assert!(fs.is_dir(Path::new("/mock/a/b/c")));
        assert!(fs.is_file(Path::new("/mock/a/b/c/file.txt")));
    }

    #[test]
    fn test_unreadable_file() {
        let fs = MockFileSystem::new();
        fs.add_unreadable("locked.cs", "Permission denied");

        assert!(fs.is_file(Path::new("/mock/locked.cs")));
        let err = fs.read_to_string(Path::new("/mock/locked.cs")).unwrap_err();
        assert_eq!(err.to_string(), "Permission denied");
    }

    #[test]
    fn test_write_and_read_back() {
        let fs = MockFileSystem::new();
        fs.write_string(Path::new("out/result.cs"), "bundle").unwrap();

        assert!(fs.is_dir(Path::new("/mock/out")));
        assert_eq!(fs.contents("out/result.cs").as_deref(), Some("bundle"));
    }

    #[test]
    fn test_denied_writes() {
        let fs = MockFileSystem::new();
        fs.deny_writes("readonly");

        assert!(fs.write_string(Path::new("readonly/x.cs"), "x").is_err());
        assert!(fs.write_string(Path::new("writable/x.cs"), "x").is_ok());
    }

    #[test]
    fn test_walk_follows_insertion_order() {
        let fs = MockFileSystem::with_root(PathBuf::from("/repo"));
        fs.add_file("b.txt", "b");
        fs.add_file("sub/c.txt", "c");
        fs.add_file("a.txt", "a");

        let steps = fs.walk(Path::new("/repo"));

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].files, vec!["b.txt".to_string(), "a.txt".to_string()]);
        assert_eq!(steps[0].subdirs, vec!["sub".to_string()]);
        assert_eq!(steps[1].dir, PathBuf::from("/repo/sub"));
        assert_eq!(steps[1].files, vec!["c.txt".to_string()]);
    }

    #[test]
    fn test_walk_missing_root() {
        let fs = MockFileSystem::new();
        assert!(fs.walk(Path::new("/mock/absent")).is_empty());
    }
}
