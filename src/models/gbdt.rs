//! Градиентный бустинг деревьев регрессии (квадратичная функция потерь)

#![allow(non_snake_case)]

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::binning::BinnedMatrix;
use super::tree::{RegressionTree, TreeParams};
use crate::error::{PlannerError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoosterParams {
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// `None` - все ядра.
    #[serde(default)]
    pub n_jobs: Option<usize>,
    #[serde(default = "default_reg_lambda")]
    pub reg_lambda: f64,
    #[serde(default)]
    pub min_split_gain: f64,
    #[serde(default = "default_min_child_weight")]
    pub min_child_weight: f64,
    #[serde(default = "default_subsample")]
    pub subsample: f64,
    #[serde(default = "default_max_bins")]
    pub max_bins: usize,
}

fn default_n_estimators() -> usize { 100 }
fn default_learning_rate() -> f64 { 0.1 }
fn default_max_depth() -> usize { 5 }
fn default_seed() -> u64 { 42 }
fn default_reg_lambda() -> f64 { 1.0 }
fn default_min_child_weight() -> f64 { 1.0 }
fn default_subsample() -> f64 { 1.0 }
fn default_max_bins() -> usize { 256 }

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            learning_rate: default_learning_rate(),
            max_depth: default_max_depth(),
            seed: default_seed(),
            n_jobs: None,
            reg_lambda: default_reg_lambda(),
            min_split_gain: 0.0,
            min_child_weight: default_min_child_weight(),
            subsample: default_subsample(),
            max_bins: default_max_bins(),
        }
    }
}

impl BoosterParams {
    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            learning_rate: self.learning_rate,
            reg_lambda: self.reg_lambda,
            min_split_gain: self.min_split_gain,
            min_child_weight: self.min_child_weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedRegressor {
    base_score: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedRegressor {
    pub fn fit(X: ArrayView2<f64>, y: ArrayView1<f64>, params: &BoosterParams) -> Result<Self> {
        let n_samples = X.nrows();
        if n_samples == 0 || X.ncols() == 0 {
            return Err(PlannerError::EmptyDataset);
        }
        if y.len() != n_samples {
            return Err(PlannerError::ShapeMismatch(format!(
                "{} feature rows, {} target values",
                n_samples,
                y.len()
            )));
        }

        let binned = BinnedMatrix::build(X, params.max_bins);
        let tree_params = params.tree_params();
        let mut rng = StdRng::seed_from_u64(params.seed);

        // Начальное предсказание - среднее целевой переменной
        let base_score = y.mean().unwrap_or(0.0);
        let mut predictions = Array1::from_elem(n_samples, base_score);

        let hess = vec![1.0; n_samples];
        let mut grad = vec![0.0; n_samples];
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            for (i, g) in grad.iter_mut().enumerate() {
                *g = predictions[i] - y[i];
            }

            let rows: Vec<usize> = if params.subsample < 1.0 {
                (0..n_samples)
                    .filter(|_| rng.gen::<f64>() < params.subsample)
                    .collect()
            } else {
                (0..n_samples).collect()
            };
            if rows.is_empty() {
                continue;
            }

            let tree = RegressionTree::grow(&binned, &grad, &hess, rows, &tree_params);
            predictions += &tree.predict(X);
            trees.push(tree);
        }

        let mse = predictions
            .iter()
            .zip(y.iter())
            .map(|(p, t)| (p - t).powi(2))
            .sum::<f64>()
            / n_samples as f64;
        tracing::debug!("Boosted {} trees, training MSE: {:.4}", trees.len(), mse);

        Ok(Self { base_score, trees })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn predict(&self, X: ArrayView2<f64>) -> Array1<f64> {
        let mut predictions = Array1::from_elem(X.nrows(), self.base_score);
        for tree in &self.trees {
            predictions += &tree.predict(X);
        }
        predictions
    }
}
