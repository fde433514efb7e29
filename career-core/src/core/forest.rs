//! # Random Forest
//!
//! Bagged CART trees with Gini impurity and √n feature subsampling per
//! split. Prediction averages the leaf class distributions of every tree
//! and takes the argmax (ties resolve to the lowest class index).
//!
//! Training is fully determined by `ForestConfig::seed`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::classifier::Classifier;
use crate::error::{CareerError, Result};

/// Forest hyper-parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_estimators: usize,
    /// `None` grows each tree until leaves are pure.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 25,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// One CART tree stored as a flat node array; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct TreeBuilder<'a> {
    features: &'a [Vec<f64>],
    labels: &'a [usize],
    n_classes: usize,
    max_features: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

impl TreeBuilder<'_> {
    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &s in samples {
            counts[self.labels[s]] += 1;
        }
        counts
    }

    fn leaf(&mut self, counts: &[usize], total: usize) -> usize {
        let distribution = counts
            .iter()
            .map(|&c| c as f64 / total.max(1) as f64)
            .collect();
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }

    fn build(&mut self, samples: &mut [usize], depth: usize, rng: &mut StdRng) -> usize {
        let counts = self.class_counts(samples);
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.max_depth.is_some_and(|d| depth >= d);

        if pure || depth_reached || samples.len() < self.min_samples_split {
            return self.leaf(&counts, samples.len());
        }

        let Some(split) = self.best_split(samples, rng) else {
            return self.leaf(&counts, samples.len());
        };

        // reserve the slot so children land after their parent
        let slot = self.leaf(&counts, samples.len());

        samples.sort_by(|&a, &b| {
            let fa = self.features[a][split.feature] <= split.threshold;
            let fb = self.features[b][split.feature] <= split.threshold;
            fb.cmp(&fa)
        });
        let mid = samples
            .iter()
            .take_while(|&&s| self.features[s][split.feature] <= split.threshold)
            .count();

        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.build(left_samples, depth + 1, rng);
        let right = self.build(right_samples, depth + 1, rng);

        self.nodes[slot] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        slot
    }

    /// Search features in random order until `max_features` non-constant
    /// ones have been evaluated.
    fn best_split(&self, samples: &[usize], rng: &mut StdRng) -> Option<BestSplit> {
        let n_features = self.features[samples[0]].len();
        let mut candidates: Vec<usize> = (0..n_features).collect();
        candidates.shuffle(rng);

        let total = samples.len();
        let mut best: Option<BestSplit> = None;
        let mut order: Vec<usize> = samples.to_vec();
        let mut visited = 0;

        for feature in candidates {
            if visited >= self.max_features {
                break;
            }
            order.sort_by(|&a, &b| {
                self.features[a][feature].total_cmp(&self.features[b][feature])
            });
            let lo = self.features[order[0]][feature];
            let hi = self.features[order[total - 1]][feature];
            if lo >= hi {
                continue;
            }
            visited += 1;

            let mut left = vec![0usize; self.n_classes];
            let mut right = self.class_counts(&order);

            for i in 0..total - 1 {
                let class = self.labels[order[i]];
                left[class] += 1;
                right[class] -= 1;

                let here = self.features[order[i]][feature];
                let next = self.features[order[i + 1]][feature];
                if here >= next {
                    continue;
                }

                let n_left = i + 1;
                let n_right = total - n_left;
                let impurity = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini(&right, n_right))
                    / total as f64;

                if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                    let mut threshold = here + (next - here) / 2.0;
                    if threshold >= next {
                        threshold = here;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best
    }
}

impl DecisionTree {
    fn fit(
        features: &[Vec<f64>],
        labels: &[usize],
        samples: &mut [usize],
        n_classes: usize,
        config: &ForestConfig,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = features.first().map(Vec::len).unwrap_or(0);
        let mut builder = TreeBuilder {
            features,
            labels,
            n_classes,
            max_features: ((n_features as f64).sqrt() as usize).max(1),
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split.max(2),
            nodes: Vec::new(),
        };
        builder.build(samples, 0, rng);
        Self {
            nodes: builder.nodes,
        }
    }

    fn distribution(&self, features: &[f64]) -> &[f64] {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Structural check for a deserialized tree: at least one node, split
    /// children in bounds and after their parent, features below
    /// `n_features`, leaf distributions `n_classes` wide.
    pub fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        let len = self.nodes.len();
        for (at, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(format!(
                            "leaf {at} has {} classes, expected {n_classes}",
                            distribution.len()
                        ));
                    }
                }
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {at} splits on feature {feature}, model has {n_features}"
                        ));
                    }
                    for child in [*left, *right] {
                        if child <= at || child >= len {
                            return Err(format!("node {at} has invalid child {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: usize) -> usize {
            match &nodes[at] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }
}

/// Bagged ensemble of [`DecisionTree`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    n_features: usize,
    n_classes: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            n_features: 0,
            n_classes: 0,
            trees: Vec::new(),
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Check every tree against this forest's feature and class counts.
    pub fn validate(&self) -> Result<()> {
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_classes)
                .map_err(|reason| CareerError::ArtifactCorrupt(format!("tree {i}: {reason}")))?;
        }
        Ok(())
    }

    /// Averaged class probabilities for one vector.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(CareerError::Training("random forest is not fitted".into()));
        }
        if features.len() != self.n_features {
            return Err(CareerError::ShapeMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, d) in proba.iter_mut().zip(tree.distribution(features)) {
                *p += d;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        Ok(proba)
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[usize], n_classes: usize) -> Result<()> {
        if features.is_empty() {
            return Err(CareerError::Training("cannot fit on an empty matrix".into()));
        }
        if features.len() != labels.len() {
            return Err(CareerError::ShapeMismatch {
                expected: features.len(),
                actual: labels.len(),
            });
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= n_classes) {
            return Err(CareerError::UnknownClass(bad));
        }
        let width = features[0].len();
        if let Some(row) = features.iter().find(|r| r.len() != width) {
            return Err(CareerError::ShapeMismatch {
                expected: width,
                actual: row.len(),
            });
        }
        if self.config.n_estimators == 0 {
            return Err(CareerError::Config("n_estimators must be at least 1".into()));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let n = features.len();

        self.trees = (0..self.config.n_estimators)
            .map(|_| {
                let mut tree_rng = StdRng::seed_from_u64(rng.r#gen());
                let mut bootstrap: Vec<usize> =
                    (0..n).map(|_| tree_rng.gen_range(0..n)).collect();
                DecisionTree::fit(
                    features,
                    labels,
                    &mut bootstrap,
                    n_classes,
                    &self.config,
                    &mut tree_rng,
                )
            })
            .collect();
        self.n_features = width;
        self.n_classes = n_classes;

        tracing::debug!(
            trees = self.trees.len(),
            features = width,
            classes = n_classes,
            "random forest fitted"
        );
        Ok(())
    }

    fn predict(&self, features: &[f64]) -> Result<usize> {
        let proba = self.predict_proba(features)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(best)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor_like() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..40 {
            let a = (i % 2) as f64;
            let b = ((i / 2) % 2) as f64;
            x.push(vec![a, b, 0.5]);
            y.push(if a == b { 0 } else { 1 });
        }
        (x, y)
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[5, 0], 5), 0.0);
        assert_eq!(gini(&[2, 2], 4), 0.5);
    }

    #[test]
    fn test_fits_separable_data() {
        let x = vec![
            vec![0.0, 1.0],
            vec![0.1, 1.1],
            vec![0.2, 0.9],
            vec![5.0, -1.0],
            vec![5.1, -1.2],
            vec![4.9, -0.8],
        ];
        let y = vec![0, 0, 0, 1, 1, 1];
        let mut forest = RandomForest::new(ForestConfig {
            n_estimators: 10,
            ..ForestConfig::default()
        });
        forest.fit(&x, &y, 2).unwrap();
        assert_eq!(forest.predict(&[0.05, 1.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[5.0, -1.1]).unwrap(), 1);
    }

    #[test]
    fn test_xor_with_full_depth() {
        let (x, y) = xor_like();
        let mut forest = RandomForest::default();
        forest.fit(&x, &y, 2).unwrap();
        let predicted = forest.predict_batch(&x).unwrap();
        let correct = predicted.iter().zip(&y).filter(|(p, t)| p == t).count();
        assert!(correct >= 36, "only {correct}/40 correct");
    }

    #[test]
    fn test_deterministic_with_seed() {
        let (x, y) = xor_like();
        let mut a = RandomForest::default();
        let mut b = RandomForest::default();
        a.fit(&x, &y, 2).unwrap();
        b.fit(&x, &y, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_depth_respected() {
        let (x, y) = xor_like();
        let mut forest = RandomForest::new(ForestConfig {
            max_depth: Some(1),
            ..ForestConfig::default()
        });
        forest.fit(&x, &y, 2).unwrap();
        assert!(forest.trees().iter().all(|t| t.depth() <= 1));
    }

    #[test]
    fn test_proba_sums_to_one() {
        let (x, y) = xor_like();
        let mut forest = RandomForest::default();
        forest.fit(&x, &y, 2).unwrap();
        let proba = forest.predict_proba(&x[0]).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_shape_checks() {
        let (x, y) = xor_like();
        let mut forest = RandomForest::default();
        assert!(forest.predict(&[0.0, 0.0, 0.0]).is_err());
        forest.fit(&x, &y, 2).unwrap();
        assert!(matches!(
            forest.predict(&[0.0]),
            Err(CareerError::ShapeMismatch { expected: 3, actual: 1 })
        ));
        assert!(forest.fit(&x, &y[..3], 2).is_err());
        assert!(forest.fit(&x, &y, 1).is_err());
    }

    #[test]
    fn test_serde_round_trip_predicts_same() {
        let (x, y) = xor_like();
        let mut forest = RandomForest::default();
        forest.fit(&x, &y, 2).unwrap();
        let json = serde_json::to_string(&forest).unwrap();
        let back: RandomForest = serde_json::from_str(&json).unwrap();
        assert_eq!(forest.predict_batch(&x).unwrap(), back.predict_batch(&x).unwrap());
    }
}
