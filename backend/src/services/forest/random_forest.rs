//! Bagged ensemble of [`DecisionTree`]s with soft voting.
//!
//! Every tree is grown on its own bootstrap resample of the training rows
//! with its own RNG, derived from the forest seed and the tree index. The
//! same seed and data therefore always rebuild the same forest.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::FeatureVector;

use super::decision_tree::{argmax, DecisionTree, TreeParams};
use crate::error::PipelineError;

/// Settings for growing a forest
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_trees: usize,
    pub seed: u64,
    /// Features examined per split; `floor(sqrt(n_features))` when absent
    pub max_features: Option<usize>,
    pub min_samples_split: usize,
    pub max_depth: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            max_features: None,
            min_samples_split: 2,
            max_depth: None,
        }
    }
}

impl ForestParams {
    pub fn features_per_split(&self, n_features: usize) -> usize {
        self.max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().floor() as usize)
            .clamp(1, n_features.max(1))
    }
}

/// A Random Forest classifier.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    /// Grow a forest on `samples` with class `labels` (each below `n_classes`).
    pub fn fit(
        samples: &[FeatureVector],
        labels: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self, PipelineError> {
        if samples.is_empty() {
            return Err(PipelineError::EmptyTrainingSet);
        }
        if samples.len() != labels.len() {
            return Err(PipelineError::InvalidSettings(format!(
                "{} feature rows but {} labels",
                samples.len(),
                labels.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(PipelineError::InvalidSettings(
                "forest needs at least one tree".to_string(),
            ));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= n_classes) {
            return Err(PipelineError::InvalidSettings(format!(
                "label {} outside {} classes",
                bad, n_classes
            )));
        }

        let n_features = samples[0].as_slice().len();
        let tree_params = TreeParams {
            max_features: params.features_per_split(n_features),
            min_samples_split: params.min_samples_split,
            max_depth: params.max_depth,
        };

        let n = samples.len();
        let trees = (0..params.n_trees)
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(tree_seed(params.seed, t));
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                DecisionTree::fit(samples, labels, bootstrap, n_classes, &tree_params, &mut rng)
            })
            .collect();

        Ok(Self {
            trees,
            n_features,
            n_classes,
        })
    }

    /// Mean of the per-tree class distributions
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut sum = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.predict_proba(features)) {
                *acc += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        sum.iter_mut().for_each(|p| *p /= n_trees);
        sum
    }

    /// Most likely class under soft voting
    pub fn predict(&self, features: &[f64]) -> usize {
        argmax(&self.predict_proba(features))
    }

    /// Individual tree predictions for a single sample (useful for debugging).
    pub fn tree_predictions(&self, features: &[f64]) -> Vec<usize> {
        self.trees.iter().map(|t| t.predict(features)).collect()
    }

    /// Number of trees in the forest.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Expected number of features per sample.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of output classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Average tree depth across the forest.
    pub fn avg_depth(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: usize = self.trees.iter().map(DecisionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }

    /// Total number of nodes across all trees.
    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }
}

fn tree_seed(seed: u64, tree: usize) -> u64 {
    seed ^ (tree as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> (Vec<FeatureVector>, Vec<usize>) {
        // rain (1) when humidity is high and pressure is low
        let mut samples = Vec::new();
        let mut labels = Vec::new();
        for i in 0..60 {
            let humidity = 30.0 + i as f64;
            let pressure = 1020.0 - i as f64 * 0.3;
            samples.push(FeatureVector([
                0.0, humidity, humidity - 5.0, pressure, pressure - 2.0, 4.0, 4.0, 10.0, 0.0,
            ]));
            labels.push(usize::from(i >= 30));
        }
        (samples, labels)
    }

    fn small_params(seed: u64) -> ForestParams {
        ForestParams {
            n_trees: 15,
            seed,
            ..ForestParams::default()
        }
    }

    #[test]
    fn probabilities_are_a_distribution() {
        let (x, y) = dataset();
        let rf = RandomForest::fit(&x, &y, 2, &small_params(42)).unwrap();
        for s in &x {
            let p = rf.predict_proba(s.as_slice());
            assert_eq!(p.len(), 2);
            assert!((p[0] + p[1] - 1.0).abs() < 1e-9);
            assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn same_seed_same_forest() {
        let (x, y) = dataset();
        let a = RandomForest::fit(&x, &y, 2, &small_params(42)).unwrap();
        let b = RandomForest::fit(&x, &y, 2, &small_params(42)).unwrap();
        assert_eq!(a.total_nodes(), b.total_nodes());
        for s in &x {
            assert_eq!(a.predict_proba(s.as_slice()), b.predict_proba(s.as_slice()));
        }
    }

    #[test]
    fn learns_a_clear_boundary() {
        let (x, y) = dataset();
        let rf = RandomForest::fit(&x, &y, 2, &small_params(3)).unwrap();
        assert_eq!(rf.predict(x[0].as_slice()), 0);
        assert_eq!(rf.predict(x[59].as_slice()), 1);
        assert_eq!(rf.tree_predictions(x[0].as_slice()).len(), 15);
    }

    #[test]
    fn forest_metadata() {
        let (x, y) = dataset();
        let rf = RandomForest::fit(&x, &y, 2, &small_params(1)).unwrap();
        assert_eq!(rf.n_trees(), 15);
        assert_eq!(rf.n_features(), 9);
        assert_eq!(rf.n_classes(), 2);
        assert!(rf.total_nodes() >= 15);
        assert!(rf.avg_depth() >= 1.0);
    }

    #[test]
    fn default_features_per_split_is_sqrt() {
        assert_eq!(ForestParams::default().features_per_split(9), 3);
        assert_eq!(ForestParams::default().features_per_split(2), 1);
    }

    #[test]
    fn empty_training_set_error() {
        let result = RandomForest::fit(&[], &[], 2, &ForestParams::default());
        assert!(matches!(result, Err(PipelineError::EmptyTrainingSet)));
    }

    #[test]
    fn out_of_range_label_error() {
        let (x, _) = dataset();
        let labels = vec![2; x.len()];
        assert!(RandomForest::fit(&x, &labels, 2, &small_params(1)).is_err());
    }
}
