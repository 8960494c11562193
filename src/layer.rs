//! Concatenation of one layer's files into a single bundle.

use crate::content::{read_file_content, FileContent};
use crate::error::BundleError;
use crate::fs::FileSystem;
use crate::scan::files_with_suffix;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_SUFFIX: &str = ".cs";

/// Concatenated output for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerBundle {
    pub content: String,
    pub files: Vec<PathBuf>,
    /// Files that could not be read; their error line is in `content`.
    pub unreadable: Vec<FileContent>,
}

impl LayerBundle {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

pub struct LayerProcessor<'a> {
    fs: &'a dyn FileSystem,
    suffix: String,
}

impl<'a> LayerProcessor<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    pub fn with_suffix(fs: &'a dyn FileSystem, suffix: &str) -> Self {
        Self {
            fs,
            suffix: suffix.to_string(),
        }
    }

    /// Comment header placed before each file: C-style for `.cs`, hash otherwise.
    pub fn header(&self, path: &Path) -> String {
        if self.suffix == ".cs" {
            format!("// File: {}", path.display())
        } else {
            format!("# File: {}", path.display())
        }
    }

    /// Bundles every matching file under `directory`.
    ///
    /// With `selectors`, only files whose path contains a match for at least
    /// one of the regexes are kept. `None` or an empty list keeps everything.
    pub fn process(
        &self,
        directory: &Path,
        selectors: Option<&[String]>,
    ) -> Result<LayerBundle, BundleError> {
        let filters = match selectors {
            Some(patterns) if !patterns.is_empty() => compile_selectors(patterns)?,
            _ => Vec::new(),
        };

        let mut bundle = LayerBundle::default();
        for path in files_with_suffix(self.fs, directory, &self.suffix) {
            let path_str = path.to_string_lossy();
            if !filters.is_empty() && !filters.iter().any(|re| re.is_match(&path_str)) {
                continue;
            }

            debug!(path = %path.display(), "Adding file to bundle");
            let content = read_file_content(self.fs, &path);
            bundle.content.push_str(&self.header(&path));
            bundle.content.push('\n');
            bundle.content.push_str(&content.as_text());
            bundle.content.push_str("\n\n");

            if content.is_unreadable() {
                bundle.unreadable.push(content);
            }
            bundle.files.push(path);
        }

        Ok(bundle)
    }
}

fn compile_selectors(patterns: &[String]) -> Result<Vec<Regex>, BundleError> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(|e| BundleError::invalid_selector(p, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MockFileSystem, RealFileSystem};
    use tempfile::TempDir;

    fn layer_fs() -> MockFileSystem {
        let fs = MockFileSystem::with_root(PathBuf::from("/sln/src/Domain.Core"));
        fs.add_file("Order.cs", "class Order {}");
        fs.add_file("Services/OrderService.cs", "class OrderService {}");
        fs.add_file("README.md", "docs");
        fs
    }

    #[test]
    fn test_process_all_files() {
        let fs = layer_fs();
        let processor = LayerProcessor::new(&fs);

        let bundle = processor
            .process(Path::new("/sln/src/Domain.Core"), None)
            .unwrap();

        assert_eq!(
            bundle.content,
            "// File: /sln/src/Domain.Core/Order.cs\nclass Order {}\n\n\
             // File: /sln/src/Domain.Core/Services/OrderService.cs\nclass OrderService {}\n\n"
        );
        assert_eq!(bundle.files.len(), 2);
        assert!(bundle.unreadable.is_empty());
    }

    #[test]
    fn test_process_with_selectors() {
        let fs = layer_fs();
        let processor = LayerProcessor::new(&fs);
        let selectors = vec!["Services/.*Service".to_string()];

        let bundle = processor
            .process(Path::new("/sln/src/Domain.Core"), Some(selectors.as_slice()))
            .unwrap();

        assert_eq!(
            bundle.content,
            "// File: /sln/src/Domain.Core/Services/OrderService.cs\nclass OrderService {}\n\n"
        );
    }

    #[test]
    fn test_selectors_search_anywhere_in_path() {
        let fs = layer_fs();
        let processor = LayerProcessor::new(&fs);
        let selectors = vec!["nomatch".to_string(), "Order\\.cs$".to_string()];

        let bundle = processor
            .process(Path::new("/sln/src/Domain.Core"), Some(selectors.as_slice()))
            .unwrap();

        assert_eq!(bundle.files, vec![PathBuf::from("/sln/src/Domain.Core/Order.cs")]);
    }

    #[test]
    fn test_empty_selector_list_keeps_everything() {
        let fs = layer_fs();
        let processor = LayerProcessor::new(&fs);

        let bundle = processor
            .process(Path::new("/sln/src/Domain.Core"), Some(Vec::new().as_slice()))
            .unwrap();

        assert_eq!(bundle.files.len(), 2);
    }

    #[test]
    fn test_invalid_selector() {
        let fs = layer_fs();
        let processor = LayerProcessor::new(&fs);
        let selectors = vec!["[unterminated".to_string()];

        let err = processor
            .process(Path::new("/sln/src/Domain.Core"), Some(selectors.as_slice()))
            .unwrap_err();

        assert!(matches!(err, BundleError::InvalidSelector { .. }));
    }

    #[test]
    fn test_non_cs_suffix_uses_hash_header() {
        let fs = MockFileSystem::with_root(PathBuf::from("/sln/scripts"));
        fs.add_file("build.py", "print('hi')");
        let processor = LayerProcessor::with_suffix(&fs, ".py");

        let bundle = processor.process(Path::new("/sln/scripts"), None).unwrap();

        assert_eq!(bundle.content, "# File: /sln/scripts/build.py\nprint('hi')\n\n");
    }

    #[test]
    fn test_empty_directory_yields_empty_bundle() {
        let fs = MockFileSystem::new();
        fs.add_dir("empty");
        let processor = LayerProcessor::new(&fs);

        let bundle = processor.process(Path::new("/mock/empty"), None).unwrap();

        assert!(bundle.is_empty());
        assert!(bundle.files.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_embedded_and_reported() {
        let fs = MockFileSystem::with_root(PathBuf::from("/sln/src/Infra"));
        fs.add_unreadable("Broken.cs", "invalid utf-8");
        let processor = LayerProcessor::new(&fs);

        let bundle = processor.process(Path::new("/sln/src/Infra"), None).unwrap();

        assert_eq!(
            bundle.content,
            "// File: /sln/src/Infra/Broken.cs\nError reading file /sln/src/Infra/Broken.cs: invalid utf-8\n\n\n"
        );
        assert_eq!(bundle.unreadable.len(), 1);
    }

    #[test]
    fn test_processing_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let layer = temp.path().join("Presentation.Api");
        std::fs::create_dir_all(layer.join("Controllers")).unwrap();
        std::fs::write(layer.join("Program.cs"), "var app = 1;").unwrap();
        std::fs::write(layer.join("Controllers/Home.cs"), "class Home {}").unwrap();

        let fs = RealFileSystem::new();
        let processor = LayerProcessor::new(&fs);
        let first = processor.process(&layer, None).unwrap();
        let second = processor.process(&layer, None).unwrap();

        assert_eq!(first.content, second.content);
        assert!(first.content.contains("class Home {}"));
    }
}
