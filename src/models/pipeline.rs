//! Обученный конвейер: кодировщик признаков + цепочка регрессоров

#![allow(non_snake_case)]

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chain::RegressorChain;
use super::gbdt::BoosterParams;
use crate::error::{PlannerError, Result};
use crate::preprocessing::{CategoricalEncoder, UnknownCategory};
use crate::types::{CropQuery, PredictionTable, Table, TargetPrediction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedPipeline {
    pub features: Vec<String>,
    pub targets: Vec<String>,
    pub n_samples: usize,
    pub trained_at: DateTime<Utc>,
    encoder: CategoricalEncoder,
    regressor: RegressorChain,
}

impl TrainedPipeline {
    /// Обучение на таблице признаков и матрице целей (по колонке на `targets`).
    pub fn fit(
        features: &Table,
        Y: &ndarray::Array2<f64>,
        targets: Vec<String>,
        handle_unknown: UnknownCategory,
        params: &BoosterParams,
    ) -> Result<Self> {
        if features.n_rows() == 0 {
            return Err(PlannerError::EmptyDataset);
        }
        if Y.ncols() != targets.len() {
            return Err(PlannerError::ShapeMismatch(format!(
                "{} target columns, {} target names",
                Y.ncols(),
                targets.len()
            )));
        }

        let encoder = CategoricalEncoder::fit(features, handle_unknown)?;
        let X = encoder.transform(features)?;
        tracing::info!(
            "Encoded {} categorical columns into {} features",
            features.n_columns(),
            X.ncols()
        );

        let regressor = RegressorChain::fit(X.view(), Y.view(), params)?;

        Ok(Self {
            features: encoder.columns().map(str::to_string).collect(),
            targets,
            n_samples: features.n_rows(),
            trained_at: Utc::now(),
            encoder,
            regressor,
        })
    }

    /// Предсказание по таблице признаков; колонки результата в порядке обучения.
    pub fn predict(&self, features: &Table) -> Result<PredictionTable> {
        let X = self.encoder.transform(features)?;
        let values = self.regressor.predict(X.view())?;
        Ok(PredictionTable {
            targets: self.targets.clone(),
            values,
        })
    }

    pub fn predict_query(&self, query: &CropQuery) -> Result<Vec<TargetPrediction>> {
        let X = self.encoder.transform_row(|name| query.field(name))?;
        let values = self.regressor.predict(X.view())?;
        Ok(PredictionTable {
            targets: self.targets.clone(),
            values,
        }
        .row(0))
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.encoder.feature_names()
    }

    /// Сохранение в JSON. Существующий файл перезаписывается.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
