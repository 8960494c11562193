//! Analysis definition: which solution to scan, which layers, which files.
//!
//! A definition is a JSON document layered over built-in defaults:
//!
//! ```json
//! {
//!   "name": "ordering",
//!   "solution_path": "../Ordering",
//!   "layers": ["Domain.Core", "Infrastructure"],
//!   "process_all_files": false,
//!   "files_to_process": {
//!     "Domain.Core": [{ "path": "Aggregates/.*\\.cs$" }]
//!   }
//! }
//! ```
//!
//! Top-level keys whose default is an object (`files_to_process`) are merged
//! key by key into the default; every other key replaces the default value.

use crate::error::DefinitionError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

pub const DEFAULT_NAME: &str = "unnamed";
pub const DEFAULT_SOLUTION_PATH: &str = "./";
pub const DEFAULT_LAYERS: [&str; 4] = [
    "Domain.Core",
    "Domain.Entities",
    "Infrastructure",
    "Presentation.Api",
];

/// One file selector; `path` is a regex searched for in each file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub path: String,
}

/// Effective definition after merging a user document over the defaults.
///
/// `files_to_process` keeps each layer's entry as supplied; entries are only
/// checked when that layer is bundled, see [`Definition::selection_for`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub name: String,
    pub solution_path: PathBuf,
    pub layers: Vec<String>,
    pub process_all_files: bool,
    pub files_to_process: BTreeMap<String, Value>,
    /// Keys this tool does not use, kept as supplied.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How a layer's files are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSelection {
    All,
    Selected(Vec<String>),
    Skip,
}

impl Definition {
    /// Builds a definition from a merged document.
    ///
    /// Each known key is decoded on its own. A value of an unexpected type is
    /// coerced where a reading exists (numbers as names, JSON truthiness for
    /// `process_all_files`) and otherwise replaced by its default with a
    /// warning; the rest of the document is kept.
    pub fn from_document(mut document: Map<String, Value>) -> Self {
        let defaults = Definition::default();

        let name = document
            .remove("name")
            .and_then(|v| scalar_text("name", v))
            .unwrap_or(defaults.name);

        let solution_path = document
            .remove("solution_path")
            .and_then(|v| scalar_text("solution_path", v))
            .map(PathBuf::from)
            .unwrap_or(defaults.solution_path);

        let layers = match document.remove("layers") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| scalar_text("layers", item))
                .collect(),
            Some(other) => {
                warn!(
                    "'layers' must be an array, found {}; using default layers",
                    type_name(&other)
                );
                defaults.layers
            }
            None => defaults.layers,
        };

        let process_all_files = match document.remove("process_all_files") {
            Some(Value::Bool(flag)) => flag,
            Some(other) => {
                let flag = truthy(&other);
                debug!(value = %other, flag, "Coerced process_all_files");
                flag
            }
            None => defaults.process_all_files,
        };

        let files_to_process = match document.remove("files_to_process") {
            Some(Value::Object(entries)) => entries.into_iter().collect(),
            Some(other) => {
                warn!(
                    "'files_to_process' must be an object, found {}; ignoring it",
                    type_name(&other)
                );
                defaults.files_to_process
            }
            None => defaults.files_to_process,
        };

        Self {
            name,
            solution_path,
            layers,
            process_all_files,
            files_to_process,
            extra: document,
        }
    }

    /// Sets the selectors for `layer` from plain patterns.
    pub fn select(&mut self, layer: &str, patterns: &[&str]) {
        let selectors: Vec<Value> = patterns.iter().map(|p| json!({ "path": p })).collect();
        self.files_to_process
            .insert(layer.to_string(), Value::Array(selectors));
    }

    /// Resolves how `layer` is bundled.
    ///
    /// Fails when the layer's entry is not a list of `{"path": "<regex>"}`
    /// objects; the failure belongs to that layer alone.
    pub fn selection_for(&self, layer: &str) -> Result<LayerSelection, DefinitionError> {
        if self.process_all_files {
            return Ok(LayerSelection::All);
        }
        let Some(entry) = self.files_to_process.get(layer) else {
            return Ok(LayerSelection::Skip);
        };

        let items = match entry {
            Value::Array(items) => items,
            other => {
                return Err(DefinitionError::invalid_selectors(
                    layer,
                    format!("expected a list, found {}", type_name(other)),
                ))
            }
        };
        if items.is_empty() {
            return Ok(LayerSelection::Skip);
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Selector::deserialize(item).map(|s| s.path).map_err(|e| {
                    DefinitionError::invalid_selectors(layer, format!("entry {}: {}", index, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(LayerSelection::Selected)
    }
}

impl Default for Definition {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            solution_path: PathBuf::from(DEFAULT_SOLUTION_PATH),
            layers: DEFAULT_LAYERS.iter().map(|l| l.to_string()).collect(),
            process_all_files: true,
            files_to_process: BTreeMap::new(),
            extra: Map::new(),
        }
    }
}

/// The defaults as a JSON object, the base every user document merges into.
pub fn default_document() -> Map<String, Value> {
    match json!({
        "name": DEFAULT_NAME,
        "solution_path": DEFAULT_SOLUTION_PATH,
        "layers": DEFAULT_LAYERS,
        "process_all_files": true,
        "files_to_process": {}
    }) {
        Value::Object(map) => map,
        _ => unreachable!("defaults literal is an object"),
    }
}

/// Merges `user` over `base`.
///
/// Object-valued keys of `base` receive a shallow merge; all other keys are
/// overwritten, even when the type changes. A non-object value for an
/// object-valued default cannot be merged and is dropped with a warning.
pub fn merge_document(base: &mut Map<String, Value>, user: Map<String, Value>) {
    for (key, value) in user {
        match base.get_mut(&key) {
            Some(Value::Object(existing)) => match value {
                Value::Object(incoming) => existing.extend(incoming),
                other => warn!(
                    "'{}' must be an object, found {}; keeping the default",
                    key,
                    type_name(&other)
                ),
            },
            _ => {
                base.insert(key, value);
            }
        }
    }
}

/// Loads and merges the definition at `path`.
///
/// Only an unreadable file or a document that is not a JSON object fails;
/// field-level surprises are handled by [`Definition::from_document`].
pub fn try_load_definition(path: &Path) -> Result<Definition, DefinitionError> {
    let raw = fs::read_to_string(path).map_err(|source| DefinitionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let user: Value = serde_json::from_str(&raw).map_err(|source| DefinitionError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let user = match user {
        Value::Object(map) => map,
        other => return Err(DefinitionError::NotAnObject(type_name(&other))),
    };

    let mut document = default_document();
    merge_document(&mut document, user);
    Ok(Definition::from_document(document))
}

/// Loads the definition, falling back to the defaults when the file cannot
/// be read or parsed.
pub fn load_definition(path: Option<&Path>) -> Definition {
    let Some(path) = path else {
        debug!("No definition file supplied, using defaults");
        return Definition::default();
    };

    match try_load_definition(path) {
        Ok(definition) => {
            debug!(path = %path.display(), name = %definition.name, "Loaded definition");
            definition
        }
        Err(e) => {
            error!("Error loading definition file: {}", e);
            error!("Using default definition.");
            Definition::default()
        }
    }
}

fn scalar_text(key: &str, value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            warn!("Ignoring {} value for '{}'", type_name(&other), key);
            None
        }
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
