//! Standardizer + forest pairs, trained per fold and once more on all labeled rows.
//!
//! A `ScaledEnsemble` owns the scaler fitted on its own training rows. Each
//! fold builds, uses and drops its own instance; the final model is a fresh
//! instance fitted on every labeled row and shares nothing with the folds.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::domain::{Disposition, Fold, PipelineConfig, PredictionRecord, Provenance};
use crate::error::PipelineError;
use crate::math::Standardizer;
use crate::predict::features::FeatureTable;
use crate::predict::forest::{ForestParams, RandomForest};

#[derive(Debug, Clone)]
pub struct ScaledEnsemble {
    scaler: Standardizer,
    forest: RandomForest,
    /// Class index → label, sorted.
    classes: Vec<Disposition>,
}

impl ScaledEnsemble {
    /// Fit the scaler on `x` (training rows only), then train the forest on the scaled rows.
    pub fn fit(x: &DMatrix<f64>, labels: &[Disposition], config: &PipelineConfig) -> Result<Self, PipelineError> {
        if labels.len() != x.nrows() {
            return Err(PipelineError::configuration(format!(
                "{} labels for {} training rows",
                labels.len(),
                x.nrows()
            )));
        }

        let mut classes = labels.to_vec();
        classes.sort();
        classes.dedup();

        let y: Vec<usize> = labels
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or(0))
            .collect();

        let (scaler, scaled) = Standardizer::fit_transform(x);
        let params = ForestParams {
            n_trees: config.n_trees,
            max_depth: config.max_depth,
            seed: config.seed,
        };
        let forest = RandomForest::fit(&scaled, &y, classes.len(), &params)?;

        Ok(Self { scaler, forest, classes })
    }

    /// Predict labels for `x` using the training-set scaling.
    pub fn predict(&self, x: &DMatrix<f64>) -> Vec<Disposition> {
        let scaled = self.scaler.transform(x);
        self.forest
            .predict(&scaled)
            .into_iter()
            .map(|class| self.classes[class])
            .collect()
    }

    pub fn classes(&self) -> &[Disposition] {
        &self.classes
    }
}

/// Out-of-fold predictions: one per labeled row, each from the model of the fold holding it out.
///
/// Folds train in parallel; results come back in fold order.
pub fn cross_validate(
    labeled: &FeatureTable,
    labels: &[Disposition],
    folds: &[Fold],
    config: &PipelineConfig,
) -> Result<Vec<PredictionRecord>, PipelineError> {
    let n = labeled.len();
    if labels.len() != n {
        return Err(PipelineError::configuration(format!(
            "{} labels for {n} labeled rows",
            labels.len()
        )));
    }

    let per_fold: Vec<Vec<PredictionRecord>> = folds
        .par_iter()
        .map(|fold| -> Result<Vec<PredictionRecord>, PipelineError> {
            let train = fold.training(n);
            let x_train = labeled.select(&train);
            let y_train: Vec<Disposition> = train.iter().map(|&i| labels[i]).collect();

            let model = ScaledEnsemble::fit(&x_train, &y_train, config)?;
            let x_val = labeled.select(&fold.validation);
            let predicted = model.predict(&x_val);

            tracing::debug!(
                fold = fold.index,
                train = train.len(),
                validation = fold.validation.len(),
                "fold trained"
            );

            Ok(fold
                .validation
                .iter()
                .zip(predicted)
                .map(|(&pos, label)| PredictionRecord {
                    row: labeled.rows[pos],
                    label,
                    provenance: Provenance::OutOfFold,
                })
                .collect())
        })
        .collect::<Result<_, _>>()?;

    Ok(per_fold.into_iter().flatten().collect())
}

/// Final-model predictions for the unlabeled rows, from a model trained on all labeled rows.
pub fn predict_unlabeled(
    labeled: &FeatureTable,
    labels: &[Disposition],
    unlabeled: &FeatureTable,
    config: &PipelineConfig,
) -> Result<Vec<PredictionRecord>, PipelineError> {
    if unlabeled.is_empty() {
        return Ok(Vec::new());
    }

    let model = ScaledEnsemble::fit(&labeled.values, labels, config)?;
    let predicted = model.predict(&unlabeled.values);

    Ok(unlabeled
        .rows
        .iter()
        .zip(predicted)
        .map(|(&row, label)| PredictionRecord {
            row,
            label,
            provenance: Provenance::FinalModel,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CelestialObjectRecord, DiagnosticFlags, RowId};
    use crate::predict::features::split_by_disposition;
    use crate::predict::folds::partition;

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            folds: 5,
            seed: 42,
            n_trees: 11,
            max_depth: 6,
        }
    }

    /// False positives carry the not-transit-like flag; confirmed planets do not.
    fn records(n: usize) -> Vec<CelestialObjectRecord> {
        (0..n)
            .map(|i| {
                let mut r = CelestialObjectRecord::new(RowId(i));
                let fp = i % 2 == 0;
                r.period = Some(1.0 + (i % 9) as f64);
                r.flags = DiagnosticFlags {
                    not_transit_like: Some(fp),
                    stellar_eclipse: Some(false),
                    centroid_offset: Some(i % 5 == 0),
                    ephemeris_match: Some(false),
                };
                r.disposition = Some(match i % 7 {
                    6 => Disposition::Candidate,
                    _ if fp => Disposition::FalsePositive,
                    _ => Disposition::Confirmed,
                });
                r
            })
            .collect()
    }

    #[test]
    fn every_labeled_row_gets_exactly_one_out_of_fold_prediction() {
        let recs = records(60);
        let split = split_by_disposition(&recs);
        let config = small_config();
        let folds = partition(split.labeled.len(), config.folds, config.seed).unwrap();

        let preds = cross_validate(&split.labeled, &split.labels, &folds, &config).unwrap();
        assert_eq!(preds.len(), split.labeled.len());

        let mut rows: Vec<RowId> = preds.iter().map(|p| p.row).collect();
        rows.sort();
        let mut expected = split.labeled.rows.clone();
        expected.sort();
        assert_eq!(rows, expected);
        assert!(preds.iter().all(|p| p.provenance == Provenance::OutOfFold));
    }

    #[test]
    fn informative_flag_is_learned_out_of_fold() {
        let recs = records(60);
        let split = split_by_disposition(&recs);
        let config = small_config();
        let folds = partition(split.labeled.len(), config.folds, config.seed).unwrap();
        let preds = cross_validate(&split.labeled, &split.labels, &folds, &config).unwrap();

        let correct = preds
            .iter()
            .filter(|p| recs[p.row.0].disposition == Some(p.label))
            .count();
        assert!(correct * 10 >= preds.len() * 9, "{correct}/{} correct", preds.len());
    }

    #[test]
    fn cross_validation_is_reproducible() {
        let recs = records(45);
        let split = split_by_disposition(&recs);
        let config = small_config();
        let run = || {
            let folds = partition(split.labeled.len(), config.folds, config.seed).unwrap();
            cross_validate(&split.labeled, &split.labels, &folds, &config).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn final_model_predicts_only_unlabeled_rows() {
        let recs = records(40);
        let split = split_by_disposition(&recs);
        let preds = predict_unlabeled(&split.labeled, &split.labels, &split.unlabeled, &small_config()).unwrap();

        assert_eq!(preds.len(), split.unlabeled.len());
        for p in &preds {
            assert_eq!(p.provenance, Provenance::FinalModel);
            assert_eq!(recs[p.row.0].disposition, Some(Disposition::Candidate));
            assert!(p.label.is_resolved());
        }
    }

    #[test]
    fn classes_are_sorted_and_unique() {
        let x = DMatrix::from_row_slice(4, 1, &[0.0, 1.0, 5.0, 6.0]);
        let labels = [
            Disposition::Confirmed,
            Disposition::FalsePositive,
            Disposition::Confirmed,
            Disposition::FalsePositive,
        ];
        let model = ScaledEnsemble::fit(&x, &labels, &small_config()).unwrap();
        assert_eq!(model.classes(), &[Disposition::FalsePositive, Disposition::Confirmed]);
    }
}
