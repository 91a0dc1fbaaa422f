//! CART decision tree classifier.
//!
//! Trees are stored as a flat node array and grown from an explicit work
//! stack, so deep trees never recurse. Splits minimise the
//! weighted Gini impurity of the two children; at each node only a random
//! subset of features is examined.

use rand::seq::SliceRandom;
use rand::Rng;
use shared::FeatureVector;

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// Non-constant features examined per split
    pub max_features: usize,
    /// Nodes with fewer samples become leaves
    pub min_samples_split: usize,
    /// Depth limit; `None` grows until leaves are pure
    pub max_depth: Option<usize>,
}

/// A node in the decision tree.
#[derive(Debug, Clone)]
pub enum TreeNode {
    /// Samples with `features[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class distribution of the training samples that reached this leaf.
    Leaf { distribution: Vec<f64> },
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }
}

/// A decision tree classifier.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    n_classes: usize,
}

struct Frame {
    node: usize,
    start: usize,
    end: usize,
    depth: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree on the rows named by `sample_indices`.
    ///
    /// Indices may repeat (bootstrap samples). `labels[i]` must be below
    /// `n_classes` for every index used.
    pub fn fit<R: Rng + ?Sized>(
        samples: &[FeatureVector],
        labels: &[usize],
        sample_indices: Vec<usize>,
        n_classes: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut indices = sample_indices;
        let mut nodes = vec![TreeNode::Leaf {
            distribution: vec![0.0; n_classes],
        }];
        let n_features = samples.first().map(|s| s.as_slice().len()).unwrap_or(0);
        let mut feature_order: Vec<usize> = (0..n_features).collect();

        let mut stack = vec![Frame {
            node: 0,
            start: 0,
            end: indices.len(),
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            let idx = &mut indices[frame.start..frame.end];
            let counts = class_counts(labels, idx, n_classes);
            let n = idx.len();

            let depth_reached = params.max_depth.is_some_and(|d| frame.depth >= d);
            let split = if gini(&counts, n) <= 0.0 || n < params.min_samples_split || depth_reached
            {
                None
            } else {
                feature_order.shuffle(&mut *rng);
                best_split(samples, labels, idx, &feature_order, params.max_features, &counts)
            };

            match split {
                None => nodes[frame.node] = leaf(&counts, n),
                Some(split) => {
                    let mid = partition(idx, |i| samples[i].0[split.feature] <= split.threshold);
                    let left = nodes.len();
                    let right = left + 1;
                    nodes.push(leaf(&counts, n));
                    nodes.push(leaf(&counts, n));
                    nodes[frame.node] = TreeNode::Split {
                        feature: split.feature,
                        threshold: split.threshold,
                        left,
                        right,
                    };
                    stack.push(Frame {
                        node: right,
                        start: frame.start + mid,
                        end: frame.end,
                        depth: frame.depth + 1,
                    });
                    stack.push(Frame {
                        node: left,
                        start: frame.start,
                        end: frame.start + mid,
                        depth: frame.depth + 1,
                    });
                }
            }
        }

        Self { nodes, n_classes }
    }

    /// Class distribution of the leaf a sample falls into
    pub fn predict_proba(&self, features: &[f64]) -> &[f64] {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { distribution } => return distribution,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Most likely class for a sample
    pub fn predict(&self, features: &[f64]) -> usize {
        argmax(self.predict_proba(features))
    }

    /// Number of nodes in the tree.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaf nodes.
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Tree depth (longest root-to-leaf path).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let TreeNode::Split { left, right, .. } = &self.nodes[idx] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        deepest
    }
}

/// Index of the largest probability; ties go to the lower class
pub fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
        .0
}

fn class_counts(labels: &[usize], idx: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &i in idx {
        counts[labels[i]] += 1;
    }
    counts
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

fn leaf(counts: &[usize], n: usize) -> TreeNode {
    let total = n.max(1) as f64;
    TreeNode::Leaf {
        distribution: counts.iter().map(|&c| c as f64 / total).collect(),
    }
}

/// Midpoint between two consecutive distinct values, falling back to the
/// lower one when rounding would put the midpoint on the upper value.
fn split_threshold(lower: f64, upper: f64) -> f64 {
    let mid = lower / 2.0 + upper / 2.0;
    if mid >= upper || !mid.is_finite() {
        lower
    } else {
        mid
    }
}

fn best_split(
    samples: &[FeatureVector],
    labels: &[usize],
    idx: &[usize],
    feature_order: &[usize],
    max_features: usize,
    total: &[usize],
) -> Option<BestSplit> {
    let n = idx.len();
    let mut best: Option<BestSplit> = None;
    let mut visited = 0;
    let mut column: Vec<(f64, usize)> = Vec::with_capacity(n);
    let mut left = vec![0usize; total.len()];
    let mut right = vec![0usize; total.len()];

    for &feature in feature_order {
        if visited >= max_features {
            break;
        }
        column.clear();
        column.extend(idx.iter().map(|&i| (samples[i].0[feature], labels[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));
        if column[0].0 == column[n - 1].0 {
            // constant features do not count towards max_features
            continue;
        }
        visited += 1;

        left.iter_mut().for_each(|c| *c = 0);
        for pos in 0..n - 1 {
            left[column[pos].1] += 1;
            if column[pos].0 == column[pos + 1].0 {
                continue;
            }
            let n_left = pos + 1;
            let n_right = n - n_left;
            for (r, (t, l)) in right.iter_mut().zip(total.iter().zip(left.iter())) {
                *r = t - l;
            }
            let impurity = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / n as f64;
            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(BestSplit {
                    feature,
                    threshold: split_threshold(column[pos].0, column[pos + 1].0),
                    impurity,
                });
            }
        }
    }

    best
}

/// Move indices satisfying `goes_left` to the front; returns how many moved
fn partition(idx: &mut [usize], goes_left: impl Fn(usize) -> bool) -> usize {
    let mut mid = 0;
    for i in 0..idx.len() {
        if goes_left(idx[i]) {
            idx.swap(i, mid);
            mid += 1;
        }
    }
    mid
}
