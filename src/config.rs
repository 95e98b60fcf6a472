/// Конфигурация обучения

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::BoosterParams;
use crate::preprocessing::{FeatureSpec, TargetSpec, UnknownCategory};

pub const DEFAULT_DATASET_PATH: &str = "mp_agriculture_stagewise_10000rows_district_season.csv";
pub const DEFAULT_MODEL_PATH: &str = "final_crop_model.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default)]
    pub features: FeatureSpec,
    #[serde(default)]
    pub targets: TargetSpec,
    #[serde(default)]
    pub handle_unknown: UnknownCategory,
    #[serde(default)]
    pub booster: BoosterParams,
}

fn default_dataset_path() -> PathBuf { PathBuf::from(DEFAULT_DATASET_PATH) }
fn default_model_path() -> PathBuf { PathBuf::from(DEFAULT_MODEL_PATH) }

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            model_path: default_model_path(),
            features: FeatureSpec::default(),
            targets: TargetSpec::default(),
            handle_unknown: UnknownCategory::default(),
            booster: BoosterParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config: TrainingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.features.columns.len(), 5);
        assert_eq!(config.targets.duration_column, "total_duration_estimate");
        assert_eq!(config.handle_unknown, UnknownCategory::Ignore);
        assert_eq!(config.booster.n_estimators, 100);
        assert_eq!(config.booster.max_depth, 5);
        assert_eq!(config.booster.seed, 42);
    }
}
