//! Merge predictions back onto the full record set by row identity.
//!
//! Every labeled row must receive exactly one out-of-fold prediction and every
//! unlabeled row exactly one final-model prediction. Anything else (a gap, a
//! duplicate, an unknown row or the wrong provenance) aborts the run.

use std::collections::HashMap;

use crate::domain::{CelestialObjectRecord, Disposition, PredictionRecord, Provenance, RowId};
use crate::error::PipelineError;

/// Return copies of `records` with `predicted_label` filled from `predictions`.
///
/// Rows in neither `labeled` nor `unlabeled` keep `predicted_label = None`.
pub fn assemble(
    records: &[CelestialObjectRecord],
    labeled: &[RowId],
    unlabeled: &[RowId],
    predictions: &[PredictionRecord],
) -> Result<Vec<CelestialObjectRecord>, PipelineError> {
    let mut expected: HashMap<RowId, Provenance> = HashMap::with_capacity(labeled.len() + unlabeled.len());
    for &row in labeled {
        expected.insert(row, Provenance::OutOfFold);
    }
    for &row in unlabeled {
        if expected.insert(row, Provenance::FinalModel).is_some() {
            return Err(PipelineError::assembly(format!(
                "{row} is listed as both labeled and unlabeled"
            )));
        }
    }

    let mut assigned: HashMap<RowId, Disposition> = HashMap::with_capacity(predictions.len());
    for p in predictions {
        let Some(&want) = expected.get(&p.row) else {
            return Err(PipelineError::assembly(format!(
                "prediction for {} which is neither labeled nor unlabeled",
                p.row
            )));
        };
        if p.provenance != want {
            return Err(PipelineError::assembly(format!(
                "{} expects a {} prediction, got {}",
                p.row,
                provenance_name(want),
                provenance_name(p.provenance)
            )));
        }
        if assigned.insert(p.row, p.label).is_some() {
            return Err(PipelineError::assembly(format!("{} has more than one prediction", p.row)));
        }
    }

    let mut missing: Vec<RowId> = expected.keys().filter(|row| !assigned.contains_key(row)).copied().collect();
    if !missing.is_empty() {
        missing.sort();
        let shown: Vec<String> = missing.iter().take(5).map(|r| r.0.to_string()).collect();
        return Err(PipelineError::assembly(format!(
            "{} row(s) have no prediction (rows {}{})",
            missing.len(),
            shown.join(", "),
            if missing.len() > shown.len() { ", ..." } else { "" }
        )));
    }

    let known: std::collections::HashSet<RowId> = records.iter().map(|r| r.row).collect();
    if let Some(row) = expected.keys().find(|row| !known.contains(row)) {
        return Err(PipelineError::assembly(format!("{row} is not in the record set")));
    }

    Ok(records
        .iter()
        .map(|r| CelestialObjectRecord {
            predicted_label: assigned.get(&r.row).copied(),
            ..r.clone()
        })
        .collect())
}

fn provenance_name(p: Provenance) -> &'static str {
    match p {
        Provenance::OutOfFold => "out-of-fold",
        Provenance::FinalModel => "final-model",
    }
}
