//! Rain risk model
//!
//! Engineers features from historical observations, fits the median imputer
//! and the random forest once, then scores prediction inputs. A trained
//! model is immutable; scoring only reads it, so one instance can serve any
//! number of concurrent callers.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use shared::{
    FeatureColumn, FeatureVector, Observation, PredictionInput, RainPrediction, RawFeatureRow,
    NUM_FEATURES,
};
use tokio::sync::OnceCell;

use super::dataset::load_observations;
use super::features::{engineer_features, LocationEncoder};
use super::forest::{ForestParams, RandomForest};
use super::imputer::MedianImputer;
use crate::config::ModelConfig;
use crate::error::PipelineError;

const N_CLASSES: usize = 2;
const RAIN_CLASS: usize = 1;

/// Everything that controls how the model is trained
#[derive(Debug, Clone, Default)]
pub struct TrainingSettings {
    pub forest: ForestParams,
    /// Fraction of rows held out for evaluation; 0 trains on every row
    pub test_fraction: f64,
}

impl From<&ModelConfig> for TrainingSettings {
    fn from(config: &ModelConfig) -> Self {
        Self {
            forest: ForestParams {
                n_trees: config.n_trees,
                seed: config.seed,
                max_features: None,
                min_samples_split: config.min_samples_split,
                max_depth: config.max_depth,
            },
            test_fraction: config.test_fraction,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnMedian {
    pub column: FeatureColumn,
    pub median: f64,
}

/// Facts about a trained model, for logs and the API
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub n_trees: usize,
    pub seed: u64,
    pub features: Vec<FeatureColumn>,
    pub medians: Vec<ColumnMedian>,
    pub locations: usize,
    pub training_rows: usize,
    pub holdout_rows: usize,
    pub holdout_accuracy: Option<f64>,
    /// Share of training rows labelled rain tomorrow
    pub positive_rate: f64,
    pub avg_tree_depth: f64,
    pub total_nodes: usize,
}

/// Trained rain risk model
#[derive(Debug)]
pub struct RainRiskModel {
    forest: RandomForest,
    imputer: MedianImputer,
    encoder: LocationEncoder,
    summary: ModelSummary,
}

impl RainRiskModel {
    /// Load the dataset at `path` and train on it
    pub fn from_dataset(
        path: impl AsRef<Path>,
        settings: &TrainingSettings,
    ) -> Result<Self, PipelineError> {
        let observations = load_observations(path)?;
        Self::train(observations, settings)
    }

    /// Train on a set of observations
    pub fn train(
        observations: Vec<Observation>,
        settings: &TrainingSettings,
    ) -> Result<Self, PipelineError> {
        let started = Instant::now();
        let dataset = engineer_features(observations);
        if dataset.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }
        let [no_rain, rain] = dataset.class_counts();
        tracing::info!(
            "Engineered {} labelled rows ({} rain, {} no rain) across {} locations",
            dataset.len(),
            rain,
            no_rain,
            dataset.encoder.len()
        );

        let (train_idx, test_idx) =
            holdout_split(dataset.len(), settings.test_fraction, settings.forest.seed);
        if train_idx.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }
        let train_rows: Vec<RawFeatureRow> = train_idx.iter().map(|&i| dataset.rows[i]).collect();
        let train_labels: Vec<usize> = train_idx.iter().map(|&i| dataset.labels[i]).collect();
        check_classes(&train_labels)?;

        let imputer = MedianImputer::fit(&train_rows)?;
        let x_train = imputer.transform_all(&train_rows);

        tracing::info!(
            "Training {} trees on {} rows (seed {})",
            settings.forest.n_trees,
            x_train.len(),
            settings.forest.seed
        );
        let forest = RandomForest::fit(&x_train, &train_labels, N_CLASSES, &settings.forest)?;

        let holdout_accuracy = if test_idx.is_empty() {
            None
        } else {
            let correct = test_idx
                .iter()
                .filter(|&&i| {
                    let features = imputer.transform(&dataset.rows[i]);
                    forest.predict(features.as_slice()) == dataset.labels[i]
                })
                .count();
            Some(correct as f64 / test_idx.len() as f64)
        };

        let positives = train_labels.iter().filter(|&&l| l == RAIN_CLASS).count();
        let summary = ModelSummary {
            n_trees: forest.n_trees(),
            seed: settings.forest.seed,
            features: FeatureColumn::ALL.to_vec(),
            medians: FeatureColumn::ALL
                .iter()
                .filter_map(|&column| {
                    imputer
                        .median(column)
                        .map(|median| ColumnMedian { column, median })
                })
                .collect(),
            locations: dataset.encoder.len(),
            training_rows: train_labels.len(),
            holdout_rows: test_idx.len(),
            holdout_accuracy,
            positive_rate: positives as f64 / train_labels.len() as f64,
            avg_tree_depth: forest.avg_depth(),
            total_nodes: forest.total_nodes(),
        };

        match holdout_accuracy {
            Some(accuracy) => tracing::info!(
                "Model trained in {:.1?}; holdout accuracy {:.3} on {} rows",
                started.elapsed(),
                accuracy,
                test_idx.len()
            ),
            None => tracing::info!("Model trained in {:.1?}", started.elapsed()),
        }

        Ok(Self {
            forest,
            imputer,
            encoder: dataset.encoder,
            summary,
        })
    }

    /// Build the model input for a prediction request.
    ///
    /// Returns the completed feature vector, the location code used and
    /// whether the location was known.
    pub fn feature_vector(&self, input: &PredictionInput) -> (FeatureVector, usize, bool) {
        let (code, recognized) = self.encoder.encode_or_default(input.location.trim());
        let mut row: RawFeatureRow = [None; NUM_FEATURES];
        for (slot, value) in row.iter_mut().zip(input.numeric_readings()) {
            *slot = value;
        }
        // rainfall is cleaned, not imputed, exactly as in training
        row[FeatureColumn::Rainfall.index()] = Some(input.rainfall.unwrap_or(0.0));
        row[FeatureColumn::LocationCode.index()] = Some(code as f64);
        (self.imputer.transform(&row), code, recognized)
    }

    /// Probability of rain tomorrow for a complete feature vector
    pub fn rain_probability(&self, features: &FeatureVector) -> f64 {
        self.forest.predict_proba(features.as_slice())[RAIN_CLASS]
    }

    /// Score one prediction request
    pub fn predict(&self, input: &PredictionInput) -> RainPrediction {
        let (features, code, recognized) = self.feature_vector(input);
        if !recognized {
            tracing::warn!(
                "Location '{}' not recognized, using default encoding {}",
                input.location,
                code
            );
        }
        RainPrediction::from_probability(self.rain_probability(&features), code, recognized)
    }

    pub fn encoder(&self) -> &LocationEncoder {
        &self.encoder
    }

    pub fn imputer(&self) -> &MedianImputer {
        &self.imputer
    }

    pub fn summary(&self) -> &ModelSummary {
        &self.summary
    }
}

/// Process-wide model, trained on first use
static SHARED_MODEL: OnceCell<Arc<RainRiskModel>> = OnceCell::const_new();

/// Get the process-wide model, training it on the first call.
///
/// Training runs on the blocking pool. If it fails the cell stays empty
/// and the error is returned, so no partially trained model is ever shared.
pub async fn shared_model(config: &ModelConfig) -> Result<Arc<RainRiskModel>, PipelineError> {
    SHARED_MODEL
        .get_or_try_init(|| async {
            let path = config.dataset_path.clone();
            let settings = TrainingSettings::from(config);
            tracing::info!("Training rain risk model from {}", path);
            let model = tokio::task::spawn_blocking(move || {
                RainRiskModel::from_dataset(&path, &settings)
            })
            .await
            .map_err(|e| PipelineError::TrainingAborted(e.to_string()))??;
            Ok(Arc::new(model))
        })
        .await
        .cloned()
}

fn check_classes(labels: &[usize]) -> Result<(), PipelineError> {
    let positives = labels.iter().filter(|&&l| l == RAIN_CLASS).count();
    if positives == 0 {
        return Err(PipelineError::SingleClass("No".to_string()));
    }
    if positives == labels.len() {
        return Err(PipelineError::SingleClass("Yes".to_string()));
    }
    Ok(())
}

/// Split row indices into (train, test); test gets `ceil(fraction * n)` rows
fn holdout_split(n: usize, fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    if fraction <= 0.0 {
        return ((0..n).collect(), Vec::new());
    }
    let n_test = ((n as f64 * fraction).ceil() as usize).min(n);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    let test = order[..n_test].to_vec();
    let mut train = order[n_test..].to_vec();
    train.sort_unstable();
    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holdout_split_sizes() {
        let (train, test) = holdout_split(10, 0.2, 42);
        assert_eq!(test.len(), 2);
        assert_eq!(train.len(), 8);
        let mut all: Vec<_> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());

        let (train, test) = holdout_split(7, 0.0, 42);
        assert_eq!(train.len(), 7);
        assert!(test.is_empty());

        // ceil: 0.25 * 5 = 1.25 -> 2
        assert_eq!(holdout_split(5, 0.25, 1).1.len(), 2);
    }

    #[test]
    fn test_holdout_split_is_seeded() {
        assert_eq!(holdout_split(50, 0.2, 9), holdout_split(50, 0.2, 9));
    }

    #[test]
    fn test_single_class_rejected() {
        assert!(matches!(
            check_classes(&[0, 0, 0]),
            Err(PipelineError::SingleClass(label)) if label == "No"
        ));
        assert!(matches!(
            check_classes(&[1]),
            Err(PipelineError::SingleClass(label)) if label == "Yes"
        ));
        assert!(check_classes(&[0, 1]).is_ok());
    }

    #[test]
    fn test_failed_training_leaves_shared_model_empty() {
        let config = ModelConfig {
            dataset_path: "missing/weatherAUS.csv".to_string(),
            ..ModelConfig::default()
        };
        for _ in 0..2 {
            let result = tokio_test::block_on(shared_model(&config));
            assert!(matches!(
                result,
                Err(PipelineError::DatasetUnavailable { .. })
            ));
        }
        assert!(SHARED_MODEL.get().is_none());
    }

    #[test]
    fn test_model_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RainRiskModel>();
        assert_send_sync::<Arc<RainRiskModel>>();
    }
}
