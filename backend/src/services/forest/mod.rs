//! Decision tree ensemble used by the rain risk model

pub mod decision_tree;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeNode, TreeParams};
pub use random_forest::{ForestParams, RandomForest};
