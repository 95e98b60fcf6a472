/// Модуль предобработки данных

pub mod encoding;
pub mod loader;
pub mod splitter;

pub use encoding::{CategoricalEncoder, OneHotEncoder, UnknownCategory};
pub use loader::load_table;
pub use splitter::{FeatureSpec, TargetSpec};
