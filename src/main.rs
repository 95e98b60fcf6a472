/// Обучение модели планировщика посевов

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crop_planner_ml::{training, PlannerError, TrainingConfig};

fn main() -> anyhow::Result<ExitCode> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TrainingConfig::default();

    match training::run(&config) {
        Ok(report) => {
            tracing::info!(
                "Trained on {} rows ({} encoded features, {} targets) in {:.1?}",
                report.n_samples,
                report.n_encoded_features,
                report.targets.len(),
                report.elapsed
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(PlannerError::InputNotFound(path)) => {
            tracing::error!("Error: '{}' not found.", path.display());
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
