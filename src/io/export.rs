//! Export annotated catalogs to CSV.
//!
//! Every input column is written back unchanged, followed by the derived
//! columns. A derived column replaces an input column of the same name, so
//! re-running the pipeline on its own output does not duplicate columns.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::CelestialObjectRecord;
use crate::error::AppError;
use crate::io::ingest::normalize_header_name;

pub const MASS_COLUMN: &str = "calc_pmass";
pub const CLASS_COLUMN: &str = "planet_class";
pub const PREDICTION_COLUMN: &str = "predicted_label";

/// Which derived columns to append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportColumns {
    pub mass_and_class: bool,
    pub prediction: bool,
}

impl ExportColumns {
    fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.mass_and_class {
            names.push(MASS_COLUMN);
            names.push(CLASS_COLUMN);
        }
        if self.prediction {
            names.push(PREDICTION_COLUMN);
        }
        names
    }
}

/// Write annotated records to a CSV file.
pub fn write_annotated_csv(
    path: &Path,
    headers: &[String],
    records: &[CelestialObjectRecord],
    columns: ExportColumns,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_annotated(file, headers, records, columns)?;
    tracing::info!(path = %path.display(), rows = records.len(), "wrote annotated catalog");
    Ok(())
}

/// Write annotated records as CSV to any writer.
pub fn write_annotated<W: Write>(
    output: W,
    headers: &[String],
    records: &[CelestialObjectRecord],
    columns: ExportColumns,
) -> Result<(), AppError> {
    let derived = columns.names();
    let kept: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !derived.contains(&normalize_header_name(h).as_str()))
        .map(|(i, _)| i)
        .collect();

    let mut writer = csv::Writer::from_writer(output);

    let mut header_row: Vec<&str> = kept.iter().map(|&i| headers[i].as_str()).collect();
    header_row.extend(derived.iter().copied());
    writer
        .write_record(&header_row)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        let mut row: Vec<String> = kept
            .iter()
            .map(|&i| r.fields.get(i).cloned().unwrap_or_default())
            .collect();

        if columns.mass_and_class {
            row.push(r.estimated_mass.map(|m| m.to_string()).unwrap_or_default());
            row.push(r.planet_class.map(|c| c.label().to_string()).unwrap_or_default());
        }
        if columns.prediction {
            row.push(
                r.predicted_label
                    .map(|d| d.catalog_label().to_string())
                    .unwrap_or_default(),
            );
        }

        writer
            .write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row ({}): {e}", r.row)))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
