use std::io;

use thiserror::Error;

/// Failures while discovering or loading workout plans
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan data: {0}")]
    Io(#[from] io::Error),

    #[error("malformed plan csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("plan library error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("malformed plan json in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "plan '{plan}' step {position} ('{exercise}') has {sets} sets, expected 1 to {}",
        crate::plan::MAX_SETS_PER_EXERCISE
    )]
    InvalidStep {
        plan: String,
        position: usize,
        exercise: String,
        sets: usize,
    },

    #[error("plan source '{0}' needs a file path")]
    MissingFile(String),
}
