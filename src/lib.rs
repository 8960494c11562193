//! layerpack - per-layer bundles of a layered solution
//!
//! Walks a solution organised into named layers (`src/Domain.Core`,
//! `src/Infrastructure`, ...) and writes one concatenated file per layer for
//! sources and tests, plus combined kustomize base and overlay manifests.
//! Every file in a bundle is preceded by a header naming its path.
//!
//! # Example
//!
//! ```no_run
//! use layerpack::{load_definition, RealFileSystem, SolutionAnalyzer};
//! use std::path::Path;
//!
//! let definition = load_definition(Some(Path::new("ordering.json")));
//! let fs = RealFileSystem::new();
//! let report = SolutionAnalyzer::new(&fs, &definition)
//!     .with_results_root("analysis_results")
//!     .analyze();
//! println!("{}", report);
//! ```
//!
//! # Project Structure
//!
//! - [`definition`]: JSON definition and default merging
//! - [`scan`], [`content`], [`layer`]: discovery, reading and concatenation
//! - [`manifest`]: kustomize base/overlay bundling
//! - [`analyzer`]: the solution-wide run and its report
//! - [`fs`]: file system abstraction with an in-memory mock

pub mod analyzer;
pub mod cli;
pub mod content;
pub mod definition;
pub mod error;
pub mod fs;
pub mod layer;
pub mod manifest;
pub mod progress;
pub mod scan;
pub mod util;

pub use analyzer::{AnalysisReport, LayerKind, SolutionAnalyzer};
pub use content::{read_file_content, write_content, FileContent};
pub use definition::{load_definition, Definition, LayerSelection, Selector};
pub use error::{BundleError, DefinitionError};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use layer::{LayerBundle, LayerProcessor};
pub use manifest::ManifestCombiner;
pub use progress::{ConsoleHandler, LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use scan::files_with_suffix;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
