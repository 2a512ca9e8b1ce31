//! The `run` command: select tasks, fan them out, report.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::BenchResult;
use crate::config::{self, Benchmark, Rule};
use crate::engine::Engine;
use crate::executor::Executor;
use crate::report::{CsvExporter, aggregate};
use crate::rules::{TaskId, select};
use crate::task::TaskSpec;

/// Options for one harness run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Accept rule file; absent means every task is a candidate
    pub accept: Option<PathBuf>,
    /// Ignore rule file; absent means nothing is removed
    pub ignore: Option<PathBuf>,
    /// Worker count; 0 means available parallelism
    pub workers: usize,
    /// Entropy computation budget in seconds; 0 means unbounded
    pub timeout: u64,
    /// Force recomputation of all artifacts
    pub overwrite: bool,
    /// Report destination; absent means stdout
    pub output: Option<PathBuf>,
}

/// Build the ordered task list from the description and the selection rules.
///
/// Selection is a set, but tasks keep the description's order so the report
/// is stable across runs.
pub fn plan_tasks(
    benchmarks: &[Benchmark],
    accept: Option<&[Rule]>,
    ignore: Option<&[Rule]>,
) -> Vec<TaskSpec> {
    let universe: BTreeSet<TaskId> = benchmarks
        .iter()
        .flat_map(|b| {
            b.list
                .iter()
                .map(|item| (b.name.clone(), item.name.clone()))
        })
        .collect();

    let selection = select(universe, accept, ignore);

    benchmarks
        .iter()
        .flat_map(|b| {
            b.list.iter().filter_map(|item| {
                let id = (b.name.clone(), item.name.clone());
                selection.contains(&id).then(|| TaskSpec {
                    benchmark: b.name.clone(),
                    item: item.clone(),
                })
            })
        })
        .collect()
}

/// Run the harness over a benchmarks description file.
///
/// Per-task failures are logged and dropped from the report; only malformed
/// or unreadable top-level input is fatal.
pub fn run(engine: &dyn Engine, benchmarks_path: &Path, opts: &RunOptions) -> BenchResult<()> {
    let benchmarks = config::load_benchmarks(benchmarks_path)?;

    let accept = opts
        .accept
        .as_deref()
        .map(config::load_rules)
        .transpose()?;
    let ignore = opts
        .ignore
        .as_deref()
        .map(config::load_rules)
        .transpose()?;

    let tasks = plan_tasks(&benchmarks, accept.as_deref(), ignore.as_deref());
    info!("selected {} task(s) with engine '{}'", tasks.len(), engine.name());
    debug!("overwrite={} timeout={}s", opts.overwrite, opts.timeout);

    // Relative artifact paths resolve against the description's own location.
    let root = benchmarks_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let executor = Executor::new(&root, opts.workers);
    let outcomes = executor.execute(engine, &tasks, opts.overwrite, opts.timeout)?;
    let rows = aggregate(outcomes);

    let exporter = CsvExporter::new();
    match opts.output.as_deref() {
        Some(path) => exporter.export(&rows, path),
        None => exporter.export_to_stdout(&rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BenchmarkItem, ItemFiles};

    fn benchmark(name: &str, items: &[&str]) -> Benchmark {
        Benchmark {
            name: name.to_string(),
            list: items
                .iter()
                .map(|item| BenchmarkItem {
                    name: item.to_string(),
                    majority_support: false,
                    files: ItemFiles {
                        design: format!("designs/{item}.v").into(),
                        tree: format!("trees/{item}.json").into(),
                        entropy: format!("entropy/{item}.json").into(),
                    },
                })
                .collect(),
        }
    }

    fn rule(benchmark: &str, list: Option<&[&str]>) -> Rule {
        Rule {
            benchmark: benchmark.to_string(),
            list: list.map(|names| names.iter().map(|n| n.to_string()).collect()),
        }
    }

    #[test]
    fn test_plan_keeps_description_order() {
        let benchmarks = vec![benchmark("B", &["z"]), benchmark("A", &["y", "x"])];
        let tasks = plan_tasks(&benchmarks, None, None);
        let names: Vec<_> = tasks.iter().map(|t| t.item.name.as_str()).collect();
        // description order, not the selection set's sorted order
        assert_eq!(names, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_plan_applies_accept_and_ignore() {
        let benchmarks = vec![benchmark("A", &["x", "y"]), benchmark("B", &["z"])];
        let accept = [rule("A", None)];
        let ignore = [rule("A", Some(&["x"]))];

        let tasks = plan_tasks(&benchmarks, Some(&accept), Some(&ignore));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].benchmark, "A");
        assert_eq!(tasks[0].item.name, "y");
    }
}
