//! Training and inference pipeline for the rain risk model

pub mod dataset;
pub mod features;
pub mod forest;
pub mod imputer;
pub mod rain_model;

pub use crate::error::PipelineError;
pub use dataset::{load_observations, read_observations};
pub use features::{engineer_features, EngineeredDataset, LocationEncoder};
pub use forest::{ForestParams, RandomForest};
pub use imputer::MedianImputer;
pub use rain_model::{shared_model, ModelSummary, RainRiskModel, TrainingSettings};
