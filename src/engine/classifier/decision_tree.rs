//! CART decision tree for binary features.
//!
//! Each internal node splits on the presence of one symptom, choosing the
//! feature with the lowest weighted Gini impurity (lowest index on ties).
//! Leaves store the class distribution of the training examples that reached
//! them, which is returned as the probability estimate.

use super::Classifier;
use crate::config::ModelKind;
use crate::engine::features::FeatureVector;
use crate::engine::training::TrainingSet;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        absent: usize,
        present: usize,
    },
}

/// A fitted decision tree stored as a node arena rooted at index 0.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    class_count: usize,
    feature_count: usize,
}

impl DecisionTree {
    /// Grows a tree on `data`, optionally limited to `max_depth` splits per path.
    #[must_use]
    pub fn fit(data: &TrainingSet, max_depth: Option<usize>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            class_count: data.classes().len(),
            feature_count: data.feature_count(),
        };
        let indices: Vec<usize> = (0..data.len()).collect();
        tree.grow(data, &indices, 0, max_depth);

        tracing::debug!(
            nodes = tree.nodes.len(),
            depth = tree.depth(),
            "Fitted decision tree"
        );
        tree
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest root-to-leaf path, in splits.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, id: usize) -> usize {
        match self.nodes.get(id) {
            Some(Node::Split {
                absent, present, ..
            }) => 1 + self.depth_from(*absent).max(self.depth_from(*present)),
            _ => 0,
        }
    }

    fn grow(
        &mut self,
        data: &TrainingSet,
        indices: &[usize],
        depth: usize,
        max_depth: Option<usize>,
    ) -> usize {
        let counts = self.class_counts(data, indices);
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: distribution(&counts),
        });

        let depth_allows = max_depth.is_none_or(|limit| depth < limit);
        if !depth_allows || gini(&counts) <= f64::EPSILON {
            return id;
        }

        let Some(feature) = self.best_split(data, indices) else {
            return id;
        };

        let (with, without): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|i| data.examples()[*i].get(feature));
        let absent = self.grow(data, &without, depth + 1, max_depth);
        let present = self.grow(data, &with, depth + 1, max_depth);
        self.nodes[id] = Node::Split {
            feature,
            absent,
            present,
        };
        id
    }

    fn class_counts(&self, data: &TrainingSet, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.class_count];
        for i in indices {
            counts[data.labels()[*i]] += 1;
        }
        counts
    }

    /// Feature with the lowest weighted child impurity among splits that
    /// leave both children non-empty.
    #[allow(clippy::cast_precision_loss)]
    fn best_split(&self, data: &TrainingSet, indices: &[usize]) -> Option<usize> {
        let total = indices.len() as f64;
        let mut best: Option<(usize, f64)> = None;

        for feature in 0..self.feature_count {
            let mut present = vec![0; self.class_count];
            let mut absent = vec![0; self.class_count];
            for i in indices {
                let label = data.labels()[*i];
                if data.examples()[*i].get(feature) {
                    present[label] += 1;
                } else {
                    absent[label] += 1;
                }
            }

            let n_present: usize = present.iter().sum();
            let n_absent = indices.len() - n_present;
            if n_present == 0 || n_absent == 0 {
                continue;
            }

            let weighted = (n_present as f64).mul_add(
                gini(&present),
                n_absent as f64 * gini(&absent),
            ) / total;
            if best.is_none_or(|(_, score)| weighted < score) {
                best = Some((feature, weighted));
            }
        }

        best.map(|(feature, _)| feature)
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> ModelKind {
        ModelKind::DecisionTree
    }

    fn class_count(&self) -> usize {
        self.class_count
    }

    fn predict_proba(&self, features: &FeatureVector) -> Vec<f64> {
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Split {
                    feature,
                    absent,
                    present,
                }) => {
                    id = if features.get(*feature) {
                        *present
                    } else {
                        *absent
                    };
                },
                Some(Node::Leaf { distribution }) => return distribution.clone(),
                None => return vec![0.0; self.class_count],
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn gini(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|c| {
            let p = *c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

#[allow(clippy::cast_precision_loss)]
fn distribution(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|c| *c as f64 / total as f64).collect()
}
