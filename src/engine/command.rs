//! Engine backed by external command templates.
//!
//! The parse and entropy algorithms live in external tools; this engine runs
//! them through caller-supplied command templates and captures stdout as the
//! artifact text. Placeholders: `{design}` for the parse template, `{tree}`
//! and `{timeout}` for the entropy template. Inputs are handed over as temp
//! files so the tools only ever see paths.

use std::io::Write;

use serde_json::Value as JsonValue;
use shlex::Shlex;
use tracing::debug;

use crate::{BenchError, BenchResult};

use super::{Engine, EntropyArtifact, TreeArtifact};

/// Engine that shells out to external parse/entropy tools.
pub struct CommandEngine {
    parse_template: String,
    entropy_template: String,
}

impl CommandEngine {
    pub fn new(parse_template: impl Into<String>, entropy_template: impl Into<String>) -> Self {
        CommandEngine {
            parse_template: parse_template.into(),
            entropy_template: entropy_template.into(),
        }
    }

    fn build_command(template: &str, fill: impl Fn(&str) -> String) -> BenchResult<std::process::Command> {
        let mut parts: Vec<String> = Shlex::new(template).collect();
        if parts.is_empty() {
            return Err(BenchError::Message("empty command template".into()));
        }
        for p in &mut parts {
            *p = fill(p);
        }
        let mut cmd = std::process::Command::new(&parts[0]);
        for p in &parts[1..] {
            cmd.arg(p);
        }
        Ok(cmd)
    }

    fn run_capture(mut cmd: std::process::Command) -> BenchResult<String> {
        debug!("running {:?}", cmd);
        let out = cmd
            .output()
            .map_err(|e| BenchError::Message(format!("failed to spawn engine command: {e}")))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(BenchError::Message(format!(
                "engine command exited with {}: {}",
                out.status,
                stderr.trim()
            )));
        }
        String::from_utf8(out.stdout)
            .map_err(|e| BenchError::Message(format!("engine output is not UTF-8: {e}")))
    }

    fn write_temp(contents: &str) -> BenchResult<tempfile::NamedTempFile> {
        let mut file = tempfile::NamedTempFile::new()
            .map_err(|e| BenchError::Message(e.to_string()))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| BenchError::Message(e.to_string()))?;
        Ok(file)
    }

    fn parse_json(text: &str, what: &str) -> BenchResult<JsonValue> {
        serde_json::from_str(text)
            .map_err(|e| BenchError::Message(format!("malformed {what} artifact: {e}")))
    }
}

impl Engine for CommandEngine {
    fn name(&self) -> &str {
        "command"
    }

    fn parse(&self, design: &str, majority_support: bool) -> BenchResult<TreeArtifact> {
        let design_file = Self::write_temp(design)?;
        let design_s = design_file.path().to_string_lossy().to_string();
        let mut cmd = Self::build_command(&self.parse_template, |p| {
            p.replace("{design}", &design_s)
        })?;
        if majority_support {
            cmd.arg("--majority-support");
        }
        let stdout = Self::run_capture(cmd)?;
        Ok(TreeArtifact(Self::parse_json(&stdout, "tree")?))
    }

    fn serialize_tree(&self, tree: &TreeArtifact) -> BenchResult<String> {
        serde_json::to_string(&tree.0).map_err(|e| BenchError::Message(e.to_string()))
    }

    fn deserialize_tree(&self, text: &str) -> BenchResult<TreeArtifact> {
        Ok(TreeArtifact(Self::parse_json(text, "tree")?))
    }

    fn entropy(&self, tree: &TreeArtifact, timeout: u64) -> BenchResult<EntropyArtifact> {
        let tree_text = self.serialize_tree(tree)?;
        let tree_file = Self::write_temp(&tree_text)?;
        let tree_s = tree_file.path().to_string_lossy().to_string();
        let timeout_s = timeout.to_string();
        let cmd = Self::build_command(&self.entropy_template, |p| {
            p.replace("{tree}", &tree_s).replace("{timeout}", &timeout_s)
        })?;
        let stdout = Self::run_capture(cmd)?;
        Ok(EntropyArtifact(Self::parse_json(&stdout, "entropy")?))
    }

    fn serialize_entropy(&self, entropy: &EntropyArtifact) -> BenchResult<String> {
        serde_json::to_string(&entropy.0).map_err(|e| BenchError::Message(e.to_string()))
    }

    fn deserialize_entropy(&self, text: &str) -> BenchResult<EntropyArtifact> {
        Ok(EntropyArtifact(Self::parse_json(text, "entropy")?))
    }
}
