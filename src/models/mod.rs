/// ML модели

pub mod binning;
pub mod chain;
pub mod gbdt;
pub mod pipeline;
pub mod tree;

pub use chain::RegressorChain;
pub use gbdt::{BoosterParams, GradientBoostedRegressor};
pub use pipeline::TrainedPipeline;
pub use tree::{RegressionTree, TreeNode};
