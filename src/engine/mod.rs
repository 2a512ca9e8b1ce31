//! Seam for the external parsing and entropy algorithms.
//!
//! The harness never interprets artifact contents; it only obtains, caches,
//! and times them. The only contract on an artifact's text form is that
//! deserializing what was serialized reconstructs an equivalent value.

pub mod command;
pub mod mock;

use serde_json::Value as JsonValue;

use crate::BenchResult;

pub use command::CommandEngine;
pub use mock::{MockConfig, MockEngine};

/// Parser output for one design. Opaque to the harness.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeArtifact(pub JsonValue);

/// Entropy computation output. Opaque to the harness; nothing inside the
/// harness consumes it after it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct EntropyArtifact(pub JsonValue);

/// External parsing and entropy computation, plus the text codecs for both
/// artifact kinds.
pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    /// Parse a raw design text into a tree artifact.
    fn parse(&self, design: &str, majority_support: bool) -> BenchResult<TreeArtifact>;

    fn serialize_tree(&self, tree: &TreeArtifact) -> BenchResult<String>;

    fn deserialize_tree(&self, text: &str) -> BenchResult<TreeArtifact>;

    /// Compute the entropy artifact for a tree. `timeout` is the computation's
    /// internal time budget in seconds; 0 means unbounded.
    fn entropy(&self, tree: &TreeArtifact, timeout: u64) -> BenchResult<EntropyArtifact>;

    fn serialize_entropy(&self, entropy: &EntropyArtifact) -> BenchResult<String>;

    fn deserialize_entropy(&self, text: &str) -> BenchResult<EntropyArtifact>;
}
