//! Fixed-size worker pool for independent task runs.

use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::engine::Engine;
use crate::task::{TaskOutcome, TaskSpec, run_task};
use crate::{BenchError, BenchResult};

/// Dispatches task runs across a dedicated thread pool and collects outcomes
/// in submission order.
///
/// Tasks share no in-memory state; the only shared resource is the
/// filesystem, and unique task identities keep artifact paths disjoint within
/// a run. Concurrent harness runs over the same root with overlapping task
/// sets are unsafe.
pub struct Executor {
    root: PathBuf,
    workers: usize,
}

impl Executor {
    /// Create an executor resolving task paths against `root`. A worker count
    /// of 0 means the number of available processing units.
    pub fn new(root: impl AsRef<Path>, workers: usize) -> Self {
        let workers = if workers == 0 {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            workers
        };
        Executor { root: root.as_ref().to_path_buf(), workers }
    }

    /// Run all tasks, up to the worker count concurrently.
    ///
    /// The returned outcomes are in the same order as `tasks` regardless of
    /// completion order. Task failures have already been converted to
    /// `TaskFailure` outcomes by the task runner and never abort the pool.
    pub fn execute(
        &self,
        engine: &dyn Engine,
        tasks: &[TaskSpec],
        overwrite: bool,
        timeout: u64,
    ) -> BenchResult<Vec<TaskOutcome>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let worker_count = self.workers.min(tasks.len());
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .build()
            .map_err(|e| BenchError::Message(format!("failed to build worker pool: {e}")))?;

        let outcomes = pool.install(|| {
            tasks
                .par_iter()
                .map(|spec| run_task(engine, &self.root, spec, overwrite, timeout))
                .collect()
        });
        Ok(outcomes)
    }
}
