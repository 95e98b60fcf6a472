//! Цепочка регрессоров для нескольких целевых переменных

#![allow(non_snake_case)]

use std::time::Instant;

use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::gbdt::{BoosterParams, GradientBoostedRegressor};
use crate::error::{PlannerError, Result};

/// Модель `i` обучается на признаках и истинных значениях целей `0..i`,
/// при предсказании получает предсказанные значения этих целей.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressorChain {
    n_features: usize,
    models: Vec<GradientBoostedRegressor>,
}

impl RegressorChain {
    pub fn fit<'a>(
        X: ArrayView2<'a, f64>,
        Y: ArrayView2<'a, f64>,
        params: &BoosterParams,
    ) -> Result<Self> {
        if X.nrows() != Y.nrows() {
            return Err(PlannerError::ShapeMismatch(format!(
                "{} feature rows, {} target rows",
                X.nrows(),
                Y.nrows()
            )));
        }

        let pool = match params.n_jobs {
            Some(n) => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            None => None,
        };

        let n_features = X.ncols();
        let n_targets = Y.ncols();

        // Признаки + все цели; модель i видит первые n_features + i колонок
        let augmented = ndarray::concatenate(ndarray::Axis(1), &[X, Y])
            .map_err(|e| PlannerError::ShapeMismatch(e.to_string()))?;

        let mut models = Vec::with_capacity(n_targets);
        for i in 0..n_targets {
            let started = Instant::now();
            let inputs = augmented.slice(s![.., ..n_features + i]);
            let target = Y.column(i);

            let model = match &pool {
                Some(pool) => pool.install(|| GradientBoostedRegressor::fit(inputs, target, params))?,
                None => GradientBoostedRegressor::fit(inputs, target, params)?,
            };

            tracing::info!(
                "Chain link {}/{} trained ({} trees) in {:.2?}",
                i + 1,
                n_targets,
                model.n_trees(),
                started.elapsed()
            );
            models.push(model);
        }

        Ok(Self { n_features, models })
    }

    pub fn n_targets(&self) -> usize {
        self.models.len()
    }

    pub fn predict(&self, X: ArrayView2<f64>) -> Result<Array2<f64>> {
        if X.ncols() != self.n_features {
            return Err(PlannerError::ShapeMismatch(format!(
                "expected {} encoded features, got {}",
                self.n_features,
                X.ncols()
            )));
        }

        let mut augmented = Array2::zeros((X.nrows(), self.n_features + self.models.len()));
        augmented.slice_mut(s![.., ..self.n_features]).assign(&X);

        for (i, model) in self.models.iter().enumerate() {
            let column = self.n_features + i;
            let predictions = model.predict(augmented.slice(s![.., ..column]));
            augmented.column_mut(column).assign(&predictions);
        }

        Ok(augmented.slice(s![.., self.n_features..]).to_owned())
    }
}
