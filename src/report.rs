//! CSV report over task outcomes.

use std::io::Write;
use std::path::Path;

use crate::BenchError;
use crate::task::{TaskOutcome, TaskRow};

/// CSV column headers in deterministic order.
pub const CSV_HEADERS: &[&str] = &[
    "benchmark",
    "name",
    "tree_recomputed",
    "tree_time_ms",
    "entropy_recomputed",
    "entropy_time_ms",
];

/// Keep the successes, in order. Failures were already logged at the task
/// boundary and are dropped from the report.
pub fn aggregate(outcomes: Vec<TaskOutcome>) -> Vec<TaskRow> {
    outcomes.into_iter().filter_map(|o| o.ok()).collect()
}

/// CSV exporter for task rows.
///
/// Writes one row per successful task with a deterministic column order so
/// reports from different runs line up for comparison.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Create a new CsvExporter.
    pub fn new() -> Self {
        CsvExporter
    }

    /// Export rows to a CSV file.
    ///
    /// # Errors
    /// Returns an error if file operations or CSV writing fails.
    pub fn export(&self, rows: &[TaskRow], output: &Path) -> Result<(), BenchError> {
        // Ensure parent directory exists
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| BenchError::Message(format!("failed to create directory: {e}")))?;
            }
        }

        let file = std::fs::File::create(output)
            .map_err(|e| BenchError::Message(format!("failed to create file: {e}")))?;

        self.export_to_writer(rows, file)
    }

    /// Export rows to stdout.
    pub fn export_to_stdout(&self, rows: &[TaskRow]) -> Result<(), BenchError> {
        let stdout = std::io::stdout();
        let handle = stdout.lock();
        self.export_to_writer(rows, handle)
    }

    /// Export rows to any writer implementing Write.
    pub fn export_to_writer<W: Write>(
        &self,
        rows: &[TaskRow],
        writer: W,
    ) -> Result<(), BenchError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(CSV_HEADERS)
            .map_err(|e| BenchError::Message(format!("failed to write CSV headers: {e}")))?;

        for row in rows {
            csv_writer
                .write_record(&self.row_to_record(row))
                .map_err(|e| BenchError::Message(format!("failed to write CSV row: {e}")))?;
        }

        csv_writer
            .flush()
            .map_err(|e| BenchError::Message(format!("failed to flush CSV writer: {e}")))?;

        Ok(())
    }

    fn row_to_record(&self, row: &TaskRow) -> Vec<String> {
        vec![
            row.benchmark.clone(),
            row.name.clone(),
            row.tree_recomputed.to_string(),
            format!("{:.3}", row.tree_time.as_secs_f64() * 1000.0),
            row.entropy_recomputed.to_string(),
            format!("{:.3}", row.entropy_time.as_secs_f64() * 1000.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskFailure;
    use std::time::Duration;

    fn make_row(benchmark: &str, name: &str) -> TaskRow {
        TaskRow {
            benchmark: benchmark.to_string(),
            name: name.to_string(),
            tree_recomputed: true,
            tree_time: Duration::from_micros(1500),
            entropy_recomputed: false,
            entropy_time: Duration::from_millis(2),
        }
    }

    #[test]
    fn test_aggregate_drops_failures_keeps_order() {
        let outcomes: Vec<TaskOutcome> = vec![
            Ok(make_row("A", "x")),
            Err(TaskFailure {
                benchmark: "A".to_string(),
                name: "y".to_string(),
                message: "design not found".to_string(),
            }),
            Ok(make_row("B", "z")),
        ];

        let rows = aggregate(outcomes);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "x");
        assert_eq!(rows[1].name, "z");
    }

    #[test]
    fn test_export_to_writer() {
        let exporter = CsvExporter::new();
        let mut buffer = Vec::new();
        exporter
            .export_to_writer(&[make_row("epfl", "adder")], &mut buffer)
            .unwrap();

        let csv_str = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = csv_str.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "benchmark,name,tree_recomputed,tree_time_ms,entropy_recomputed,entropy_time_ms"
        );
        assert_eq!(lines[1], "epfl,adder,true,1.500,false,2.000");
    }

    #[test]
    fn test_export_empty_rows() {
        let exporter = CsvExporter::new();
        let mut buffer = Vec::new();
        exporter.export_to_writer(&[], &mut buffer).unwrap();

        let csv_str = String::from_utf8(buffer).unwrap();
        assert_eq!(csv_str.lines().count(), 1);
    }

    #[test]
    fn test_export_to_file_creates_parent() {
        let exporter = CsvExporter::new();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("reports/run.csv");

        exporter.export(&[make_row("epfl", "adder")], &output).unwrap();

        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.contains("epfl,adder"));
    }
}
