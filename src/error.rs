//! Ошибки обучения и инференса

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    /// Входной файл с датасетом отсутствует.
    #[error("Dataset file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    #[error("Column '{column}', row {row}: '{value}' is not a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    /// Неизвестная категория при `UnknownCategory::Error`.
    #[error("Column '{column}': unknown category '{value}'")]
    UnknownCategory { column: String, value: String },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
