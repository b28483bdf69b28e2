//! Shared pipeline logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> schema check -> mass/class and/or disposition prediction -> crosstab
//!
//! The command handlers can then focus on presentation and file output.

use std::path::{Path, PathBuf};

use crate::classify::{MassEstimator, classify_records};
use crate::domain::{CelestialObjectRecord, PipelineConfig};
use crate::error::AppError;
use crate::io::ingest::{IngestedCatalog, load_calibration, load_catalog};
use crate::math::interp::CalibrationInterpolator;
use crate::predict::{DispositionRun, predict_dispositions};
use crate::report::{Crosstab, crosstab};

pub const MASS_SUFFIX: &str = "with_mass";
pub const PREDICTION_SUFFIX: &str = "with_predictions";

/// One catalog after the mass/class stage.
#[derive(Debug, Clone)]
pub struct ClassifiedCatalog {
    pub catalog: IngestedCatalog,
    pub records: Vec<CelestialObjectRecord>,
}

/// Outputs of one prediction run.
#[derive(Debug, Clone)]
pub struct PredictionOutput {
    pub run: DispositionRun,
    pub crosstab: Crosstab,
}

/// Build the mass estimator from a calibration CSV.
pub fn load_estimator(path: &Path) -> Result<MassEstimator, AppError> {
    let pairs = load_calibration(path)?;
    let interp = CalibrationInterpolator::from_mass_radius_pairs(&pairs)?;
    tracing::info!(
        knots = interp.len(),
        min_radius = interp.min_radius(),
        max_radius = interp.max_radius(),
        "calibration ready"
    );
    Ok(MassEstimator::new(interp))
}

/// Load a catalog and annotate every record with mass and class.
pub fn run_classification(estimator: &MassEstimator, path: &Path) -> Result<ClassifiedCatalog, AppError> {
    let catalog = load_catalog(path)?;
    Ok(classify_catalog(estimator, catalog))
}

pub fn classify_catalog(estimator: &MassEstimator, catalog: IngestedCatalog) -> ClassifiedCatalog {
    let records = classify_records(estimator, &catalog.records);
    ClassifiedCatalog { catalog, records }
}

/// Predict dispositions for `records` (which must come from `catalog`).
///
/// The catalog must carry every prediction input column; this is checked
/// before any model is trained.
pub fn run_prediction(
    catalog: &IngestedCatalog,
    records: &[CelestialObjectRecord],
    config: &PipelineConfig,
) -> Result<PredictionOutput, AppError> {
    catalog.schema.require_prediction_inputs(&catalog.source)?;
    let run = predict_dispositions(records, config)?;
    let crosstab = crosstab(&run.records);
    Ok(PredictionOutput { run, crosstab })
}

/// `<out_dir>/<source stem>_<suffix>.csv`.
pub fn output_path(out_dir: &Path, source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string());
    out_dir.join(format!("{stem}_{suffix}.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlanetClass;
    use crate::io::ingest::read_catalog;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn output_path_uses_source_stem() {
        let path = output_path(Path::new("out"), Path::new("data/koi.csv"), MASS_SUFFIX);
        assert_eq!(path, PathBuf::from("out/koi_with_mass.csv"));
    }

    #[test]
    fn classification_end_to_end_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let calibration = write(dir.path(), "mr.csv", "mass,radius\n1,1\n10,4\n318,11\n");
        let catalog = write(dir.path(), "koi.csv", "kepoi_name,koi_prad\nK1,4\nK2,\nK3,20\n");

        let estimator = load_estimator(&calibration).unwrap();
        let out = run_classification(&estimator, &catalog).unwrap();

        assert_eq!(out.records.len(), 3);
        assert_eq!(out.records[0].planet_class, Some(PlanetClass::NeptuneLike));
        assert_eq!(out.records[1].estimated_mass, None);
        assert_eq!(out.records[2].planet_class, Some(PlanetClass::GasGiant));
    }

    #[test]
    fn bad_calibration_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let calibration = write(dir.path(), "mr.csv", "mass,radius\n1,1\n");
        let err = load_estimator(&calibration).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn catalog_without_flags_cannot_be_predicted() {
        let catalog = read_catalog("toi,pl_rade,pl_orbper\n1.01,2.0,3.5\n".as_bytes(), "toi.csv").unwrap();
        let err = run_prediction(&catalog, &catalog.records, &PipelineConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("toi.csv"));
    }
}
