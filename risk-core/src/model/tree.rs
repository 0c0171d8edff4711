//! CART decision tree (Gini impurity)
//!
//! Nodes are stored flat; node 0 is the root. Traversal goes left when
//! `value <= threshold`. Leaves hold the class distribution of the
//! (bootstrapped) training samples that reached them.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Candidate features drawn per split
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Walk from the root to a leaf and return its class distribution.
    /// The caller guarantees `x` has the fitted dimensionality.
    pub fn leaf_distribution(&self, x: &[f64]) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if x[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { distribution } => return distribution,
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
                Node::Leaf { .. } => 0,
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Structural check used when loading artifacts: every child index in
    /// bounds and pointing forward, every leaf of the right width.
    pub fn is_well_formed(&self, n_features: usize, n_classes: usize) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(id, node)| match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    *feature < n_features
                        && threshold.is_finite()
                        && *left > id
                        && *right > id
                        && *left < self.nodes.len()
                        && *right < self.nodes.len()
                }
                Node::Leaf { distribution } => distribution.len() == n_classes,
            })
    }

    /// Grow a tree on the given sample indices (duplicates allowed, as drawn
    /// by bootstrap). Returns the tree and its unnormalised impurity-decrease
    /// per feature.
    pub fn fit(
        x: ArrayView2<f64>,
        y: &[usize],
        samples: Vec<usize>,
        n_classes: usize,
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> (Self, Vec<f64>) {
        let mut grower = Grower {
            x,
            y,
            n_classes,
            params,
            rng,
            nodes: Vec::new(),
            importances: vec![0.0; x.ncols()],
        };
        grower.grow(samples, 0);

        (DecisionTree { nodes: grower.nodes }, grower.importances)
    }
}

// ============================================================================
// GROWTH
// ============================================================================

struct Grower<'a, 'r> {
    x: ArrayView2<'a, f64>,
    y: &'r [usize],
    n_classes: usize,
    params: &'r TreeParams,
    rng: &'r mut StdRng,
    nodes: Vec<Node>,
    importances: Vec<f64>,
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

impl Grower<'_, '_> {
    fn counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in samples {
            counts[self.y[i]] += 1;
        }
        counts
    }

    fn leaf(&mut self, counts: &[usize], total: usize) -> usize {
        let distribution = counts
            .iter()
            .map(|&c| c as f64 / total as f64)
            .collect();
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }

    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let n = samples.len();
        let counts = self.counts(&samples);
        let impurity = gini(&counts, n);

        if depth >= self.params.max_depth || n < self.params.min_samples_split || impurity == 0.0 {
            return self.leaf(&counts, n);
        }

        let Some(best) = self.best_split(&samples, &counts) else {
            return self.leaf(&counts, n);
        };

        self.importances[best.feature] += n as f64 * (impurity - best.impurity);

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.x[[i, best.feature]] <= best.threshold);

        // Reserve this node's slot; children are appended after it
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });

        let left_id = self.grow(left, depth + 1);
        let right_id = self.grow(right, depth + 1);

        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: left_id,
            right: right_id,
        };
        id
    }

    fn best_split(&mut self, samples: &[usize], counts: &[usize]) -> Option<BestSplit> {
        let n = samples.len();
        let n_features = self.x.ncols();
        let max_features = self.params.max_features.clamp(1, n_features);
        let min_leaf = self.params.min_samples_leaf.max(1);

        // Features in random order; constant ones don't count toward max_features
        let order = rand::seq::index::sample(&mut *self.rng, n_features, n_features).into_vec();

        let mut best: Option<BestSplit> = None;
        let mut sorted = samples.to_vec();
        let mut visited = 0;

        for feature in order {
            if visited >= max_features {
                break;
            }

            let column = self.x.column(feature);
            sorted.sort_by(|&a, &b| column[a].total_cmp(&column[b]));
            if column[sorted[0]] == column[sorted[n - 1]] {
                continue;
            }
            visited += 1;

            let mut left = vec![0usize; self.n_classes];
            let mut right = counts.to_vec();

            for pos in 0..n - 1 {
                let class = self.y[sorted[pos]];
                left[class] += 1;
                right[class] -= 1;

                let current = column[sorted[pos]];
                let next = column[sorted[pos + 1]];
                if current == next {
                    continue;
                }

                let n_left = pos + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let weighted = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini(&right, n_right))
                    / n as f64;

                if best.as_ref().map_or(true, |b| weighted < b.impurity) {
                    let mut threshold = current + (next - current) / 2.0;
                    if threshold >= next {
                        threshold = current;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        impurity: weighted,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn params(max_features: usize) -> TreeParams {
        TreeParams {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features,
        }
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[4, 0], 4), 0.0);
        assert_eq!(gini(&[2, 2], 4), 0.5);
        assert_eq!(gini(&[], 0), 0.0);
    }

    #[test]
    fn test_learns_single_threshold() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = [0, 0, 0, 1, 1, 1];
        let mut rng = StdRng::seed_from_u64(7);

        let (tree, importances) =
            DecisionTree::fit(x.view(), &y, (0..6).collect(), 2, &params(1), &mut rng);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(
            tree.nodes[0],
            Node::Split { feature: 0, threshold: 6.5, left: 1, right: 2 }
        );
        assert_eq!(tree.leaf_distribution(&[0.0]), &[1.0, 0.0]);
        assert_eq!(tree.leaf_distribution(&[6.5]), &[1.0, 0.0]);
        assert_eq!(tree.leaf_distribution(&[7.0]), &[0.0, 1.0]);
        assert!(importances[0] > 0.0);
        assert!(tree.is_well_formed(1, 2));
    }

    #[test]
    fn test_picks_informative_feature() {
        // feature 0 is noise, feature 1 separates the classes
        let x = array![[5.0, 0.0], [1.0, 0.1], [4.0, 0.2], [2.0, 0.9], [5.0, 1.0], [1.0, 1.1]];
        let y = [0, 0, 0, 1, 1, 1];
        let mut rng = StdRng::seed_from_u64(1);

        let (tree, importances) =
            DecisionTree::fit(x.view(), &y, (0..6).collect(), 2, &params(2), &mut rng);

        assert!(matches!(tree.nodes[0], Node::Split { feature: 1, .. }));
        assert_eq!(importances[0], 0.0);
        assert_eq!(tree.leaf_distribution(&[3.0, 0.05]), &[1.0, 0.0]);
        assert_eq!(tree.leaf_distribution(&[3.0, 1.05]), &[0.0, 1.0]);
    }

    #[test]
    fn test_respects_min_samples_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = [1, 0, 0, 0];
        let mut rng = StdRng::seed_from_u64(3);
        let p = TreeParams {
            min_samples_leaf: 2,
            ..params(1)
        };

        let (tree, _) = DecisionTree::fit(x.view(), &y, (0..4).collect(), 2, &p, &mut rng);

        // the lone class-1 sample cannot be isolated
        assert_eq!(tree.leaf_distribution(&[1.0]), &[0.5, 0.5]);
    }

    #[test]
    fn test_max_depth_zero_is_a_single_leaf() {
        let x = array![[1.0], [2.0]];
        let y = [0, 1];
        let mut rng = StdRng::seed_from_u64(3);
        let p = TreeParams {
            max_depth: 0,
            ..params(1)
        };

        let (tree, _) = DecisionTree::fit(x.view(), &y, vec![0, 1], 2, &p, &mut rng);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.leaf_distribution(&[100.0]), &[0.5, 0.5]);
    }

    #[test]
    fn test_malformed_tree_detected() {
        let tree = DecisionTree {
            nodes: vec![Node::Split { feature: 0, threshold: 1.0, left: 5, right: 6 }],
        };
        assert!(!tree.is_well_formed(1, 2));
        assert!(!DecisionTree { nodes: vec![] }.is_well_formed(1, 2));
    }
}
