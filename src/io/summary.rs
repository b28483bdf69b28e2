//! Prediction run summary JSON.
//!
//! The summary is a small, machine-readable record of one prediction run:
//! - run parameters (folds, seed, forest shape)
//! - labeled / candidate row counts and out-of-fold accuracy
//! - the row-normalized crosstab

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::PipelineConfig;
use crate::error::AppError;
use crate::predict::DispositionRun;
use crate::report::Crosstab;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub catalog: String,
    pub folds: usize,
    pub seed: u64,
    pub n_trees: usize,
    pub max_depth: usize,
    pub n_labeled: usize,
    pub n_unlabeled: usize,
    pub fold_sizes: Vec<usize>,
    pub oof_accuracy: f64,
    pub crosstab: Crosstab,
}

impl PredictionSummary {
    pub fn new(catalog: &str, config: &PipelineConfig, run: &DispositionRun, crosstab: Crosstab) -> Self {
        Self {
            tool: "exo".to_string(),
            generated_at: Utc::now(),
            catalog: catalog.to_string(),
            folds: config.folds,
            seed: config.seed,
            n_trees: config.n_trees,
            max_depth: config.max_depth,
            n_labeled: run.n_labeled,
            n_unlabeled: run.n_unlabeled,
            fold_sizes: run.fold_sizes.clone(),
            oof_accuracy: run.oof_accuracy,
            crosstab,
        }
    }
}

/// Write a summary JSON file.
pub fn write_summary_json(path: &Path, summary: &PredictionSummary) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;
    tracing::info!(path = %path.display(), "wrote prediction summary");
    Ok(())
}

/// Read a summary JSON file.
pub fn read_summary_json(path: &Path) -> Result<PredictionSummary, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open summary JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid summary JSON: {e}")))
}
