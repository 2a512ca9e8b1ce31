//! End-to-end execution of one benchmark item.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::time::Duration;

use tracing::{error, info};

use crate::cache::cache_step;
use crate::config::{BenchmarkItem, resolve_path};
use crate::engine::Engine;
use crate::{BenchError, BenchResult};

/// One unit of work: a benchmark item under its benchmark's name.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub benchmark: String,
    pub item: BenchmarkItem,
}

/// Success record for one task.
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub benchmark: String,
    pub name: String,
    pub tree_recomputed: bool,
    pub tree_time: Duration,
    pub entropy_recomputed: bool,
    pub entropy_time: Duration,
}

/// Failure record: task identity plus the cause. Logged, then dropped from
/// the report.
#[derive(Debug, Clone)]
pub struct TaskFailure {
    pub benchmark: String,
    pub name: String,
    pub message: String,
}

pub type TaskOutcome = Result<TaskRow, TaskFailure>;

fn run_task_inner(
    engine: &dyn Engine,
    root: &Path,
    spec: &TaskSpec,
    overwrite: bool,
    timeout: u64,
) -> BenchResult<TaskRow> {
    let design = resolve_path(root, &spec.item.files.design);
    if !design.is_file() {
        return Err(BenchError::Message(format!(
            "design not found: '{}'",
            design.display()
        )));
    }
    let design_data = std::fs::read_to_string(&design)
        .map_err(|e| BenchError::Message(format!("failed to read '{}': {e}", design.display())))?;

    let tree_path = resolve_path(root, &spec.item.files.tree);
    let tree_step = cache_step(
        &tree_path,
        overwrite,
        true,
        || engine.parse(&design_data, spec.item.majority_support),
        |t| engine.serialize_tree(t),
        |s| engine.deserialize_tree(s),
    )?;
    let tree = tree_step
        .value
        .as_ref()
        .ok_or_else(|| BenchError::Message("tree artifact unavailable".into()))?;

    // Staleness propagates forward: a fresh tree invalidates the cached
    // entropy, never the reverse. The entropy value has no consumer here, so
    // a cache hit skips the read.
    let entropy_path = resolve_path(root, &spec.item.files.entropy);
    let entropy_step = cache_step(
        &entropy_path,
        overwrite || tree_step.recomputed,
        false,
        || engine.entropy(tree, timeout),
        |e| engine.serialize_entropy(e),
        |s| engine.deserialize_entropy(s),
    )?;

    Ok(TaskRow {
        benchmark: spec.benchmark.clone(),
        name: spec.item.name.clone(),
        tree_recomputed: tree_step.recomputed,
        tree_time: tree_step.elapsed,
        entropy_recomputed: entropy_step.recomputed,
        entropy_time: entropy_step.elapsed,
    })
}

/// Run one task, containing every failure at the task boundary.
///
/// Errors and panics anywhere in the task (missing design, parser fault,
/// entropy fault, artifact I/O) are logged with the task identity and
/// converted into a `TaskFailure`; they never reach sibling tasks or the
/// worker pool.
pub fn run_task(
    engine: &dyn Engine,
    root: &Path,
    spec: &TaskSpec,
    overwrite: bool,
    timeout: u64,
) -> TaskOutcome {
    info!("'{}' from '{}': started", spec.item.name, spec.benchmark);

    let result = catch_unwind(AssertUnwindSafe(|| {
        run_task_inner(engine, root, spec, overwrite, timeout)
    }));

    let result = match result {
        Ok(inner) => inner,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic in task".to_string());
            Err(BenchError::Message(message))
        }
    };

    match result {
        Ok(row) => {
            info!("'{}' from '{}': completed", spec.item.name, spec.benchmark);
            Ok(row)
        }
        Err(e) => {
            error!("'{}' from '{}': failed: {e}", spec.item.name, spec.benchmark);
            Err(TaskFailure {
                benchmark: spec.benchmark.clone(),
                name: spec.item.name.clone(),
                message: e.to_string(),
            })
        }
    }
}
