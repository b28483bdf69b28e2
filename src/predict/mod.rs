//! Disposition prediction.
//!
//! Responsibilities:
//!
//! - build the fixed feature matrix and split labeled / unlabeled rows (`features`)
//! - partition labeled rows into seeded folds (`folds`)
//! - train scaler + forest per fold and once on all labeled rows (`ensemble`)
//! - write predictions back by row identity (`assemble`)

pub mod assemble;
pub mod ensemble;
pub mod features;
pub mod folds;
pub mod forest;
pub mod tree;

pub use assemble::*;
pub use ensemble::*;
pub use features::*;
pub use folds::*;

use std::collections::HashMap;

use crate::domain::{CelestialObjectRecord, Disposition, PipelineConfig, RowId};
use crate::error::PipelineError;

/// Output of one prediction run.
#[derive(Debug, Clone)]
pub struct DispositionRun {
    /// Every input record, with `predicted_label` set where a prediction exists.
    pub records: Vec<CelestialObjectRecord>,
    pub n_labeled: usize,
    pub n_unlabeled: usize,
    pub fold_sizes: Vec<usize>,
    /// Share of labeled rows whose out-of-fold prediction matches the catalog.
    pub oof_accuracy: f64,
}

/// Cross-validated predictions for labeled rows plus final-model predictions for candidates.
pub fn predict_dispositions(
    records: &[CelestialObjectRecord],
    config: &PipelineConfig,
) -> Result<DispositionRun, PipelineError> {
    let split = split_by_disposition(records);
    let n_labeled = split.labeled.len();
    let n_unlabeled = split.unlabeled.len();

    // Partition before any parallel work so fold assignment stays seeded.
    let folds = partition(n_labeled, config.folds, config.seed)?;
    let fold_sizes: Vec<usize> = folds.iter().map(|f| f.validation.len()).collect();
    tracing::info!(labeled = n_labeled, unlabeled = n_unlabeled, folds = folds.len(), "training disposition models");

    let mut predictions = cross_validate(&split.labeled, &split.labels, &folds, config)?;

    let truth: HashMap<RowId, Disposition> = split.labeled.rows.iter().copied().zip(split.labels.iter().copied()).collect();
    let correct = predictions.iter().filter(|p| truth.get(&p.row) == Some(&p.label)).count();
    let oof_accuracy = correct as f64 / n_labeled as f64;
    tracing::info!(accuracy = oof_accuracy, "out-of-fold predictions complete");

    predictions.extend(predict_unlabeled(&split.labeled, &split.labels, &split.unlabeled, config)?);

    let annotated = assemble(records, &split.labeled.rows, &split.unlabeled.rows, &predictions)?;

    Ok(DispositionRun {
        records: annotated,
        n_labeled,
        n_unlabeled,
        fold_sizes,
        oof_accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DiagnosticFlags;

    fn config() -> PipelineConfig {
        PipelineConfig {
            n_trees: 9,
            max_depth: 5,
            ..PipelineConfig::default()
        }
    }

    fn catalog(n: usize) -> Vec<CelestialObjectRecord> {
        (0..n)
            .map(|i| {
                let mut r = CelestialObjectRecord::new(RowId(i));
                r.period = if i % 11 == 0 { Some(0.0) } else { Some(2.0 + i as f64) };
                r.flags = DiagnosticFlags {
                    not_transit_like: Some(i % 3 == 0),
                    stellar_eclipse: Some(i % 4 == 0),
                    centroid_offset: None,
                    ephemeris_match: Some(false),
                };
                r.disposition = match i % 5 {
                    0 => Some(Disposition::Candidate),
                    1 => None,
                    _ if i % 3 == 0 => Some(Disposition::FalsePositive),
                    _ => Some(Disposition::Confirmed),
                };
                r
            })
            .collect()
    }

    #[test]
    fn every_row_with_a_disposition_gets_a_prediction() {
        let recs = catalog(50);
        let run = predict_dispositions(&recs, &config()).unwrap();

        assert_eq!(run.records.len(), recs.len());
        assert_eq!(run.n_labeled + run.n_unlabeled, recs.iter().filter(|r| r.disposition.is_some()).count());
        assert_eq!(run.fold_sizes.iter().sum::<usize>(), run.n_labeled);
        for (before, after) in recs.iter().zip(&run.records) {
            assert_eq!(before.row, after.row);
            assert_eq!(after.predicted_label.is_some(), before.disposition.is_some());
        }
        assert!((0.0..=1.0).contains(&run.oof_accuracy));
    }

    #[test]
    fn runs_are_bit_identical() {
        let recs = catalog(40);
        let a = predict_dispositions(&recs, &config()).unwrap();
        let b = predict_dispositions(&recs, &config()).unwrap();
        assert_eq!(a.records, b.records);
        assert_eq!(a.oof_accuracy, b.oof_accuracy);
    }

    #[test]
    fn default_configuration_is_reproducible() {
        let config = PipelineConfig::default();
        assert_eq!((config.n_trees, config.max_depth), (50, 10));

        let recs = catalog(60);
        let a = predict_dispositions(&recs, &config).unwrap();
        let b = predict_dispositions(&recs, &config).unwrap();
        assert_eq!(a.records, b.records);
        assert_eq!(a.fold_sizes, b.fold_sizes);
        assert_eq!(a.oof_accuracy.to_bits(), b.oof_accuracy.to_bits());
    }

    #[test]
    fn too_few_labeled_rows_is_a_configuration_error() {
        let recs = catalog(6);
        let err = predict_dispositions(&recs, &config()).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration { .. }));
    }
}
