//! Bagged decision-tree ensemble.
//!
//! Every tree is grown on its own bootstrap sample (size `n`, with replacement)
//! with `max(1, floor(sqrt(n_features)))` candidate features per split.
//! Per-tree seeds are drawn up front from one `StdRng` seeded with the
//! ensemble seed, so training in parallel does not change the result.
//!
//! Prediction is a majority vote over trees (lowest class index on ties).

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::PipelineError;
use crate::predict::tree::{DecisionTree, TreeParams, majority_class};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Train on every row of `x`; `y[i]` is the class index of row `i`.
    pub fn fit(x: &DMatrix<f64>, y: &[usize], n_classes: usize, params: &ForestParams) -> Result<Self, PipelineError> {
        let n = x.nrows();
        if n == 0 {
            return Err(PipelineError::configuration("cannot train an ensemble on zero rows"));
        }
        if y.len() != n {
            return Err(PipelineError::configuration(format!(
                "label count {} does not match row count {n}",
                y.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(PipelineError::configuration("ensemble needs at least one tree"));
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            max_features: ((x.ncols() as f64).sqrt().floor() as usize).max(1),
            min_samples_split: 2,
        };

        let mut seeder = StdRng::seed_from_u64(params.seed);
        let tree_seeds: Vec<u64> = (0..params.n_trees).map(|_| seeder.r#gen()).collect();

        let trees = tree_seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(x, y, n_classes, &sample, &tree_params, &mut rng)
            })
            .collect();

        Ok(Self { trees, n_classes })
    }

    /// Majority-vote class index for every row of `x`.
    pub fn predict(&self, x: &DMatrix<f64>) -> Vec<usize> {
        (0..x.nrows())
            .map(|row| {
                let mut votes = vec![0usize; self.n_classes.max(1)];
                for tree in &self.trees {
                    votes[tree.predict_row(x, row)] += 1;
                }
                majority_class(&votes)
            })
            .collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
