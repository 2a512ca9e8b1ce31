//! Benchmark description and rule file loading.
//!
//! The benchmarks file is a JSON array of benchmarks, each owning an ordered
//! list of items. Relative file references inside an item resolve against the
//! benchmarks file's own directory; absolute ones pass through unchanged.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{BenchError, BenchResult};

/// File references for one benchmark item.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemFiles {
    /// Raw circuit design source
    pub design: PathBuf,
    /// Cached tree artifact (parser output)
    pub tree: PathBuf,
    /// Cached entropy artifact
    pub entropy: PathBuf,
}

/// One entry of a benchmark's item list.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkItem {
    pub name: String,
    /// Forwarded to the parser; affects how majority gates are expanded
    #[serde(default)]
    pub majority_support: bool,
    pub files: ItemFiles,
}

/// A named benchmark with its ordered item list.
#[derive(Debug, Clone, Deserialize)]
pub struct Benchmark {
    pub name: String,
    pub list: Vec<BenchmarkItem>,
}

/// Accept/ignore rule: a benchmark name plus an optional explicit item list.
///
/// An absent or empty list matches every item of the named benchmark.
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub benchmark: String,
    #[serde(default)]
    pub list: Option<Vec<String>>,
}

/// Load the benchmarks description from a JSON file.
///
/// # Errors
/// Returns an error if the file is unreadable or structurally malformed.
/// This is a fatal input error; no tasks run after it.
pub fn load_benchmarks(path: &Path) -> BenchResult<Vec<Benchmark>> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| BenchError::Message(format!("failed to read '{}': {e}", path.display())))?;
    serde_json::from_str(&s)
        .map_err(|e| BenchError::Message(format!("malformed benchmarks file '{}': {e}", path.display())))
}

/// Load an accept or ignore rule file (JSON array of rules).
pub fn load_rules(path: &Path) -> BenchResult<Vec<Rule>> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| BenchError::Message(format!("failed to read '{}': {e}", path.display())))?;
    serde_json::from_str(&s)
        .map_err(|e| BenchError::Message(format!("malformed rule file '{}': {e}", path.display())))
}

/// Resolve a file reference against the benchmarks file's directory.
pub fn resolve_path(root: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    }
}
