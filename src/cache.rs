//! Generic compute-or-load step for cached artifacts.
//!
//! Both artifact kinds (tree and entropy) go through this one primitive so the
//! two call sites cannot drift in caching policy.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::{BenchError, BenchResult};

/// Outcome of one cache step.
#[derive(Debug)]
pub struct StepResult<T> {
    /// The artifact value. `None` only on a cache hit with `load_if_fresh`
    /// disabled.
    pub value: Option<T>,
    /// Whether the artifact was computed and written on this run.
    pub recomputed: bool,
    /// Wall time of the branch taken, including directory creation and I/O.
    pub elapsed: Duration,
}

/// Compute the artifact or load it from `target`.
///
/// The artifact is recomputed iff `overwrite` is set, the target file does not
/// exist, or an existing file fails to deserialize (a corrupt cache entry is
/// treated as a miss so the harness self-heals across runs). On recompute the
/// serialized value is persisted to `target`, creating parent directories as
/// needed.
///
/// With `load_if_fresh` disabled a cache hit skips the read entirely and
/// returns no value; callers use this when nothing downstream consumes the
/// cached artifact.
pub fn cache_step<T>(
    target: &Path,
    overwrite: bool,
    load_if_fresh: bool,
    compute: impl FnOnce() -> BenchResult<T>,
    serialize: impl FnOnce(&T) -> BenchResult<String>,
    deserialize: impl FnOnce(&str) -> BenchResult<T>,
) -> BenchResult<StepResult<T>> {
    let start = Instant::now();

    let mut recompute = overwrite || !target.is_file();
    let mut cached: Option<T> = None;

    if !recompute && load_if_fresh {
        let loaded = std::fs::read_to_string(target)
            .map_err(|e| BenchError::Message(format!("failed to read '{}': {e}", target.display())))
            .and_then(|s| deserialize(&s));
        match loaded {
            Ok(value) => cached = Some(value),
            Err(e) => {
                warn!("unusable cached artifact '{}', recomputing: {e}", target.display());
                recompute = true;
            }
        }
    }

    if recompute {
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    BenchError::Message(format!("failed to create directory: {e}"))
                })?;
            }
        }
        let value = compute()?;
        let text = serialize(&value)?;
        std::fs::write(target, text).map_err(|e| {
            BenchError::Message(format!("failed to write '{}': {e}", target.display()))
        })?;
        return Ok(StepResult { value: Some(value), recomputed: true, elapsed: start.elapsed() });
    }

    Ok(StepResult { value: cached, recomputed: false, elapsed: start.elapsed() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(
        target: &Path,
        overwrite: bool,
        load_if_fresh: bool,
    ) -> BenchResult<StepResult<u64>> {
        cache_step(
            target,
            overwrite,
            load_if_fresh,
            || Ok(42),
            |v| Ok(v.to_string()),
            |s| {
                s.trim()
                    .parse()
                    .map_err(|e| BenchError::Message(format!("bad artifact: {e}")))
            },
        )
    }

    #[test]
    fn test_miss_computes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/value.txt");

        let result = step(&target, false, true).unwrap();
        assert_eq!(result.value, Some(42));
        assert!(result.recomputed);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "42");
    }

    #[test]
    fn test_hit_loads_without_recompute() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("value.txt");
        std::fs::write(&target, "7").unwrap();

        let result = step(&target, false, true).unwrap();
        assert_eq!(result.value, Some(7));
        assert!(!result.recomputed);
    }

    #[test]
    fn test_overwrite_forces_recompute() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("value.txt");
        std::fs::write(&target, "7").unwrap();

        let result = step(&target, true, true).unwrap();
        assert_eq!(result.value, Some(42));
        assert!(result.recomputed);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "42");
    }

    #[test]
    fn test_corrupt_artifact_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("value.txt");
        std::fs::write(&target, "not a number").unwrap();

        let result = step(&target, false, true).unwrap();
        assert_eq!(result.value, Some(42));
        assert!(result.recomputed);
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "42");
    }

    #[test]
    fn test_hit_without_load_skips_read() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("value.txt");
        // Contents would fail to deserialize; a skipped read must not notice.
        std::fs::write(&target, "garbage").unwrap();

        let result = step(&target, false, false).unwrap();
        assert_eq!(result.value, None);
        assert!(!result.recomputed);
    }

    #[test]
    fn test_compute_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("value.txt");

        let result: BenchResult<StepResult<u64>> = cache_step(
            &target,
            false,
            true,
            || Err(BenchError::Message("parser exploded".into())),
            |v: &u64| Ok(v.to_string()),
            |_| Ok(0),
        );
        assert!(result.is_err());
        assert!(!target.exists());
    }
}
