#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use entropy_bench::engine::{CommandEngine, Engine, MockEngine};
use entropy_bench::run_cmd::{self, RunOptions};
use entropy_bench::{BenchError, BenchResult};

#[derive(Parser, Debug)]
#[command(name = "entropy-bench")]
#[command(about = "Batch benchmark harness for circuit entropy analysis", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set ENTROPY_BENCH_LOG)
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the selected benchmark items and report timings
    Run {
        /// Path to the benchmarks description (JSON)
        benchmarks: PathBuf,
        /// Accept rule file (JSON); default is to accept everything
        #[arg(long)]
        accept: Option<PathBuf>,
        /// Ignore rule file (JSON); default is to ignore nothing
        #[arg(long)]
        ignore: Option<PathBuf>,
        /// Worker count (default: available parallelism)
        #[arg(long, default_value_t = 0)]
        workers: usize,
        /// Entropy computation budget in seconds (0 = unbounded)
        #[arg(long, default_value_t = 0)]
        timeout: u64,
        /// Recompute all artifacts even when cached
        #[arg(long)]
        overwrite: bool,
        /// Write the CSV report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Engine name: "command" (default) or "mock"
        #[arg(long, default_value = "command")]
        engine: String,
        /// Parse command template (placeholder: {design})
        #[arg(long)]
        parse_cmd: Option<String>,
        /// Entropy command template (placeholders: {tree}, {timeout})
        #[arg(long)]
        entropy_cmd: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("ENTROPY_BENCH_LOG").unwrap_or_else(|_| {
        if verbose { "entropy_bench=debug".to_string() } else { "entropy_bench=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn build_engine(
    name: &str,
    parse_cmd: Option<String>,
    entropy_cmd: Option<String>,
) -> BenchResult<Box<dyn Engine>> {
    match name {
        "mock" => Ok(Box::new(MockEngine::default_mock())),
        "command" => match (parse_cmd, entropy_cmd) {
            (Some(parse), Some(entropy)) => Ok(Box::new(CommandEngine::new(parse, entropy))),
            _ => Err(BenchError::Message(
                "--parse-cmd and --entropy-cmd are required with the command engine".into(),
            )),
        },
        other => Err(BenchError::Message(format!("unknown engine '{other}'"))),
    }
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            benchmarks,
            accept,
            ignore,
            workers,
            timeout,
            overwrite,
            output,
            engine,
            parse_cmd,
            entropy_cmd,
        } => build_engine(&engine, parse_cmd, entropy_cmd).and_then(|engine| {
            let opts = RunOptions { accept, ignore, workers, timeout, overwrite, output };
            run_cmd::run(engine.as_ref(), &benchmarks, &opts)
        }),
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
