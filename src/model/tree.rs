//! CART regression tree
//!
//! Squared-error splits over all features; thresholds sit halfway between
//! consecutive distinct feature values. Nodes are stored in a flat arena and
//! children refer to each other by index.

use super::forest::ForestParams;

/// A node in the regression tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Feature index used for splitting (None for leaves)
    pub feature_index: Option<usize>,
    pub threshold: f64,
    /// Mean target of the samples reaching this node
    pub prediction: f64,
    pub left_child: Option<usize>,
    pub right_child: Option<usize>,
    pub n_samples: usize,
    /// Mean squared deviation from `prediction`
    pub impurity: f64,
    pub depth: usize,
}

impl TreeNode {
    fn leaf(prediction: f64, n_samples: usize, impurity: f64, depth: usize) -> Self {
        TreeNode {
            feature_index: None,
            threshold: 0.0,
            prediction,
            left_child: None,
            right_child: None,
            n_samples,
            impurity,
            depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_index.is_none()
    }
}

/// Best split found for one node
struct Split {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
    /// Sum of squared errors of both children
    children_sse: f64,
}

/// Fitted regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
    n_features: usize,
    /// Total impurity decrease (sum of squared errors) per feature
    impurity_decrease: Vec<f64>,
}

impl RegressionTree {
    /// Grow a tree on the rows at `sample_indices` (repeats act as weights)
    pub fn fit(x: &[Vec<f64>], y: &[f64], sample_indices: &[usize], params: &ForestParams) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let mut tree = RegressionTree {
            nodes: Vec::new(),
            n_features,
            impurity_decrease: vec![0.0; n_features],
        };
        if !sample_indices.is_empty() {
            tree.build(x, y, sample_indices.to_vec(), 0, params);
        }
        tree
    }

    fn build(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: Vec<usize>,
        depth: usize,
        params: &ForestParams,
    ) -> usize {
        let n = indices.len();
        let (sum, sum_sq) = indices
            .iter()
            .fold((0.0, 0.0), |(s, sq), &i| (s + y[i], sq + y[i] * y[i]));
        let prediction = sum / n as f64;
        let sse = (sum_sq - sum * sum / n as f64).max(0.0);
        let impurity = sse / n as f64;

        let node_idx = self.nodes.len();
        self.nodes.push(TreeNode::leaf(prediction, n, impurity, depth));

        let should_stop = params.max_depth.map_or(false, |d| depth >= d)
            || n < params.min_samples_split
            || n < 2 * params.min_samples_leaf
            || impurity <= f64::EPSILON;
        if should_stop {
            return node_idx;
        }

        let Some(split) = self.find_best_split(x, y, &indices, params.min_samples_leaf) else {
            return node_idx;
        };

        self.impurity_decrease[split.feature] += (sse - split.children_sse).max(0.0);

        let left = self.build(x, y, split.left, depth + 1, params);
        let right = self.build(x, y, split.right, depth + 1, params);

        let node = &mut self.nodes[node_idx];
        node.feature_index = Some(split.feature);
        node.threshold = split.threshold;
        node.left_child = Some(left);
        node.right_child = Some(right);
        node_idx
    }

    fn find_best_split(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        min_samples_leaf: usize,
    ) -> Option<Split> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();

        let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, sse)

        for feature in 0..self.n_features {
            let mut order: Vec<(f64, f64)> = indices.iter().map(|&i| (x[i][feature], y[i])).collect();
            // NaN last whatever its sign, matching `x <= threshold` sending it right
            order.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or_else(|| a.0.is_nan().cmp(&b.0.is_nan()))
            });

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 0..n.saturating_sub(1) {
                let (value, target) = order[pos];
                left_sum += target;
                left_sq += target * target;

                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_samples_leaf || n_right < min_samples_leaf {
                    continue;
                }
                let next_value = order[pos + 1].0;
                if !value.is_finite() || !next_value.is_finite() || next_value <= value {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left as f64)
                    + (right_sq - right_sum * right_sum / n_right as f64);

                if best.map_or(true, |(_, _, b)| sse < b) {
                    let mut threshold = value + (next_value - value) / 2.0;
                    if threshold >= next_value {
                        threshold = value;
                    }
                    best = Some((feature, threshold, sse));
                }
            }
        }

        let (feature, threshold, sse) = best?;
        let (left, right): (Vec<usize>, Vec<usize>) =
            indices.iter().partition(|&&i| x[i][feature] <= threshold);
        if left.is_empty() || right.is_empty() {
            return None;
        }

        Some(Split {
            feature,
            threshold,
            left,
            right,
            children_sse: sse.max(0.0),
        })
    }

    /// Predict a single sample
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let Some(node) = self.nodes.get(idx) else {
                return 0.0;
            };
            match (node.feature_index, node.left_child, node.right_child) {
                (Some(f), Some(left), Some(right)) => {
                    let value = features.get(f).copied().unwrap_or(0.0);
                    idx = if value <= node.threshold { left } else { right };
                }
                _ => return node.prediction,
            }
        }
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Vec<f64> {
        x.iter().map(|row| self.predict_one(row)).collect()
    }

    /// Impurity decrease per feature, normalized to sum to 1 (all zeros for a stump)
    pub fn feature_importances(&self) -> Vec<f64> {
        let total: f64 = self.impurity_decrease.iter().sum();
        if total <= 0.0 {
            return vec![0.0; self.n_features];
        }
        self.impurity_decrease.iter().map(|v| v / total).collect()
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Longest root-to-leaf path
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}
