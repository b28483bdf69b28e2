//! CART classification tree (Gini impurity).
//!
//! Trees are grown on a sample of row indices (a bootstrap sample when used
//! inside the forest) and stored as a flat node arena. At each node a random
//! order of features is scanned until `max_features` non-constant features
//! have been evaluated; the split with the lowest weighted Gini impurity wins.
//!
//! Splits send `x <= threshold` left. Thresholds sit halfway between adjacent
//! distinct values. Leaves predict the majority class, lowest class index on ties.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Smallest impurity decrease that still counts as a useful split.
const MIN_IMPURITY_DECREASE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    /// Maximum depth; the root is depth 0.
    pub max_depth: usize,
    /// Non-constant features evaluated per split.
    pub max_features: usize,
    /// Nodes with fewer samples become leaves.
    pub min_samples_split: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct Builder<'a> {
    x: &'a DMatrix<f64>,
    y: &'a [usize],
    n_classes: usize,
    params: &'a TreeParams,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `sample` (duplicates allowed).
    ///
    /// `y[i]` is the class index of row `i` of `x`, in `0..n_classes`.
    pub fn fit(
        x: &DMatrix<f64>,
        y: &[usize],
        n_classes: usize,
        sample: &[usize],
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = Builder {
            x,
            y,
            n_classes: n_classes.max(1),
            params,
            rng,
            nodes: Vec::new(),
        };
        let mut samples = sample.to_vec();
        builder.build(&mut samples, 0);
        Self { nodes: builder.nodes }
    }

    /// Predict the class index of row `row` of `x`.
    pub fn predict_row(&self, x: &DMatrix<f64>, row: usize) -> usize {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { class } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[(row, *feature)] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }

    /// Depth of the deepest leaf (a single leaf has depth 0).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }
}

impl Builder<'_> {
    fn build(&mut self, samples: &mut [usize], depth: usize) -> usize {
        let counts = self.class_counts(samples);
        let majority = majority_class(&counts);
        let distinct = counts.iter().filter(|&&c| c > 0).count();

        let is_leaf = depth >= self.params.max_depth
            || samples.len() < self.params.min_samples_split.max(2)
            || distinct <= 1;

        let split = if is_leaf {
            None
        } else {
            self.best_split(samples, &counts)
        };

        let Some(split) = split else {
            self.nodes.push(Node::Leaf { class: majority });
            return self.nodes.len() - 1;
        };

        // Partition in place: rows going left first.
        let mut mid = 0;
        for i in 0..samples.len() {
            if self.x[(samples[i], split.feature)] <= split.threshold {
                samples.swap(i, mid);
                mid += 1;
            }
        }

        // Reserve the slot so the parent precedes its children.
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { class: majority });

        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.build(left_samples, depth + 1);
        let right = self.build(right_samples, depth + 1);

        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        idx
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in samples {
            counts[self.y[i]] += 1;
        }
        counts
    }

    fn best_split(&mut self, samples: &[usize], counts: &[usize]) -> Option<SplitCandidate> {
        let n = samples.len() as f64;
        let parent = n * gini(counts, samples.len());

        let mut features: Vec<usize> = (0..self.x.ncols()).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<SplitCandidate> = None;
        let mut evaluated = 0;

        let mut column: Vec<(f64, usize)> = Vec::with_capacity(samples.len());
        for feature in features {
            if evaluated >= self.params.max_features.max(1) {
                break;
            }

            column.clear();
            column.extend(samples.iter().map(|&i| (self.x[(i, feature)], self.y[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let (first, last) = (column[0].0, column[column.len() - 1].0);
            if first == last {
                continue;
            }
            evaluated += 1;

            let mut left = vec![0usize; self.n_classes];
            let mut right = counts.to_vec();
            for i in 0..column.len() - 1 {
                let (value, class) = column[i];
                left[class] += 1;
                right[class] -= 1;

                let next = column[i + 1].0;
                if value == next {
                    continue;
                }

                let n_left = i + 1;
                let n_right = column.len() - n_left;
                let impurity = n_left as f64 * gini(&left, n_left) + n_right as f64 * gini(&right, n_right);

                if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best.filter(|b| parent - b.impurity > MIN_IMPURITY_DECREASE)
    }
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts.iter().map(|&c| (c as f64 / n).powi(2)).sum::<f64>()
}

/// Index of the largest count; the lowest index wins ties.
pub(crate) fn majority_class(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            max_features: 2,
            min_samples_split: 2,
        }
    }

    fn all_rows(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn separable_data_is_fit_perfectly() {
        let x = DMatrix::from_row_slice(4, 1, &[0.0, 1.0, 10.0, 11.0]);
        let y = [0, 0, 1, 1];
        let mut rng = StdRng::seed_from_u64(1);
        let tree = DecisionTree::fit(&x, &y, 2, &all_rows(4), &params(10), &mut rng);

        let preds: Vec<usize> = (0..4).map(|i| tree.predict_row(&x, i)).collect();
        assert_eq!(preds, y);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn threshold_sits_between_distinct_values() {
        let x = DMatrix::from_row_slice(4, 1, &[0.0, 1.0, 10.0, 11.0]);
        let y = [0, 0, 1, 1];
        let mut rng = StdRng::seed_from_u64(1);
        let tree = DecisionTree::fit(&x, &y, 2, &all_rows(4), &params(10), &mut rng);

        let probe = DMatrix::from_row_slice(3, 1, &[5.4, 5.6, -100.0]);
        assert_eq!(tree.predict_row(&probe, 0), 0);
        assert_eq!(tree.predict_row(&probe, 1), 1);
        assert_eq!(tree.predict_row(&probe, 2), 0);
    }

    #[test]
    fn depth_limit_is_respected() {
        // XOR-like pattern needs depth 2.
        let x = DMatrix::from_row_slice(4, 2, &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]);
        let y = [0, 1, 1, 0];
        let mut rng = StdRng::seed_from_u64(3);
        let stump = DecisionTree::fit(&x, &y, 2, &all_rows(4), &params(0), &mut rng);
        assert_eq!(stump.n_nodes(), 1);
        assert_eq!(stump.depth(), 0);

        let tree = DecisionTree::fit(&x, &y, 2, &all_rows(4), &params(1), &mut rng);
        assert!(tree.depth() <= 1);
    }

    #[test]
    fn constant_features_produce_a_majority_leaf() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
        let y = [1, 0, 1];
        let mut rng = StdRng::seed_from_u64(5);
        let tree = DecisionTree::fit(&x, &y, 2, &all_rows(3), &params(10), &mut rng);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_row(&x, 0), 1);
    }

    #[test]
    fn majority_ties_go_to_lowest_class() {
        assert_eq!(majority_class(&[2, 2]), 0);
        assert_eq!(majority_class(&[1, 3, 3]), 1);
        assert_eq!(majority_class(&[0, 0, 0]), 0);
    }

    #[test]
    fn same_seed_grows_the_same_tree() {
        let x = DMatrix::from_fn(40, 3, |i, j| ((i * 7 + j * 13) % 11) as f64);
        let y: Vec<usize> = (0..40).map(|i| usize::from(i % 3 == 0)).collect();
        let grow = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            DecisionTree::fit(&x, &y, 2, &all_rows(40), &params(10), &mut rng)
        };
        assert_eq!(grow(9), grow(9));
    }
}
