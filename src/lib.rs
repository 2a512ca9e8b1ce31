pub mod cache;
pub mod config;
pub mod engine;
pub mod executor;
pub mod report;
pub mod rules;
pub mod run_cmd;
pub mod task;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type BenchResult<T> = Result<T, BenchError>;
