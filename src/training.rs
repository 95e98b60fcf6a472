//! Полный цикл обучения: загрузка, разделение, обучение, сохранение

#![allow(non_snake_case)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::TrainingConfig;
use crate::error::Result;
use crate::models::TrainedPipeline;
use crate::preprocessing::load_table;

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub n_samples: usize,
    pub n_encoded_features: usize,
    pub targets: Vec<String>,
    pub model_path: PathBuf,
    pub elapsed: Duration,
}

/// Обучает конвейер на датасете из конфигурации и сохраняет его в `model_path`.
///
/// Если датасета нет, возвращает `PlannerError::InputNotFound`, ничего не читая и не записывая.
pub fn run(config: &TrainingConfig) -> Result<TrainingReport> {
    let started = Instant::now();
    tracing::info!("Starting model training process...");

    let table = load_table(&config.dataset_path)?;
    tracing::info!(
        "Dataset loaded: {} rows, {} columns",
        table.n_rows(),
        table.n_columns()
    );

    let features = config.features.select(&table)?;
    let targets = config.targets.discover(&table);
    let Y = config.targets.matrix(&table, &targets)?;
    tracing::info!(
        "Training model with {} rows of data, {} targets",
        features.n_rows(),
        targets.len()
    );

    let pipeline = TrainedPipeline::fit(
        &features,
        &Y,
        targets,
        config.handle_unknown,
        &config.booster,
    )?;
    tracing::info!("Final model training complete");

    pipeline.save(&config.model_path)?;
    tracing::info!("Model has been saved to '{}'", config.model_path.display());

    Ok(TrainingReport {
        n_samples: pipeline.n_samples,
        n_encoded_features: pipeline.feature_names().len(),
        targets: pipeline.targets.clone(),
        model_path: config.model_path.clone(),
        elapsed: started.elapsed(),
    })
}
