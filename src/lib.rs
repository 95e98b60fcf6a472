//! Crop Planner ML - обучение модели стадий роста культур

pub mod config;
pub mod error;
pub mod models;
pub mod preprocessing;
pub mod training;
pub mod types;

pub use config::TrainingConfig;
pub use error::{PlannerError, Result};
pub use models::*;
pub use preprocessing::*;
pub use types::*;
