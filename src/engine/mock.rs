//! Mock engine for testing.

use serde_json::json;

use crate::{BenchError, BenchResult};

use super::{Engine, EntropyArtifact, TreeArtifact};

/// Configuration for mock engine responses.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Name to report
    pub name: String,
    /// Whether parse should fail
    pub parse_fails: bool,
    /// Whether entropy should fail
    pub entropy_fails: bool,
    /// Whether parse should panic instead of returning an error
    pub parse_panics: bool,
    /// Honor a `#delay <ms>` line in design texts by sleeping in parse
    pub honor_delay_directive: bool,
}

impl MockConfig {
    /// Create a new mock config with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        MockConfig {
            name: name.into(),
            parse_fails: false,
            entropy_fails: false,
            parse_panics: false,
            honor_delay_directive: false,
        }
    }

    /// Make parse fail.
    pub fn parse_fails(mut self) -> Self {
        self.parse_fails = true;
        self
    }

    /// Make entropy fail.
    pub fn entropy_fails(mut self) -> Self {
        self.entropy_fails = true;
        self
    }

    /// Make parse panic.
    pub fn parse_panics(mut self) -> Self {
        self.parse_panics = true;
        self
    }

    /// Honor `#delay <ms>` directives in design texts.
    pub fn with_delay_directive(mut self) -> Self {
        self.honor_delay_directive = true;
        self
    }
}

/// Mock engine returning deterministic artifacts without any real parsing or
/// entropy computation.
pub struct MockEngine {
    config: MockConfig,
}

impl MockEngine {
    /// Create a new mock engine with the given configuration.
    pub fn new(config: MockConfig) -> Self {
        MockEngine { config }
    }

    /// Create a mock engine with default configuration.
    pub fn default_mock() -> Self {
        Self::new(MockConfig::new("mock"))
    }

    fn delay_from(design: &str) -> Option<u64> {
        design
            .lines()
            .find_map(|line| line.strip_prefix("#delay "))
            .and_then(|ms| ms.trim().parse().ok())
    }
}

impl Engine for MockEngine {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn parse(&self, design: &str, majority_support: bool) -> BenchResult<TreeArtifact> {
        if self.config.parse_panics {
            panic!("mock parse panicked");
        }
        if self.config.parse_fails {
            return Err(BenchError::Message("mock parse failed".into()));
        }
        if self.config.honor_delay_directive {
            if let Some(ms) = Self::delay_from(design) {
                std::thread::sleep(std::time::Duration::from_millis(ms));
            }
        }
        // Deterministic stand-in tree: line count plays the node count.
        Ok(TreeArtifact(json!({
            "nodes": design.lines().count(),
            "majority_support": majority_support,
        })))
    }

    fn serialize_tree(&self, tree: &TreeArtifact) -> BenchResult<String> {
        serde_json::to_string(&tree.0).map_err(|e| BenchError::Message(e.to_string()))
    }

    fn deserialize_tree(&self, text: &str) -> BenchResult<TreeArtifact> {
        serde_json::from_str(text)
            .map(TreeArtifact)
            .map_err(|e| BenchError::Message(format!("malformed tree artifact: {e}")))
    }

    fn entropy(&self, tree: &TreeArtifact, timeout: u64) -> BenchResult<EntropyArtifact> {
        if self.config.entropy_fails {
            return Err(BenchError::Message("mock entropy failed".into()));
        }
        let nodes = tree.0.get("nodes").and_then(|n| n.as_u64()).unwrap_or(0);
        Ok(EntropyArtifact(json!({
            "entropy": nodes as f64 * 0.5,
            "timeout": timeout,
        })))
    }

    fn serialize_entropy(&self, entropy: &EntropyArtifact) -> BenchResult<String> {
        serde_json::to_string(&entropy.0).map_err(|e| BenchError::Message(e.to_string()))
    }

    fn deserialize_entropy(&self, text: &str) -> BenchResult<EntropyArtifact> {
        serde_json::from_str(text)
            .map(EntropyArtifact)
            .map_err(|e| BenchError::Message(format!("malformed entropy artifact: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_deterministic() {
        let engine = MockEngine::default_mock();
        let a = engine.parse("one\ntwo", true).unwrap();
        let b = engine.parse("one\ntwo", true).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.0["nodes"], 2);
        assert_eq!(a.0["majority_support"], true);
    }

    #[test]
    fn test_tree_round_trip() {
        let engine = MockEngine::default_mock();
        let tree = engine.parse("x\ny\nz", false).unwrap();
        let text = engine.serialize_tree(&tree).unwrap();
        assert_eq!(engine.deserialize_tree(&text).unwrap(), tree);
    }

    #[test]
    fn test_failure_injection() {
        let engine = MockEngine::new(MockConfig::new("mock").parse_fails());
        assert!(engine.parse("x", false).is_err());

        let engine = MockEngine::new(MockConfig::new("mock").entropy_fails());
        let tree = engine.parse("x", false).unwrap();
        assert!(engine.entropy(&tree, 0).is_err());
    }

    #[test]
    fn test_delay_directive_parsing() {
        assert_eq!(MockEngine::delay_from("#delay 40\nrest"), Some(40));
        assert_eq!(MockEngine::delay_from("no directive"), None);
    }
}
