//! CSV ingest and normalization.
//!
//! This module turns survey-catalog CSVs into `CelestialObjectRecord`s and
//! reads the mass-radius calibration table.
//!
//! Design goals:
//! - **Schema resolved once** per file (see `io::schema`)
//! - **Cell-level tolerance**: unparseable or out-of-range values become missing
//!   values (counted, never fatal)
//! - **Row-level validation**: malformed CSV rows are reported but never dropped,
//!   so row identity matches the input line order
//! - **Separation of concerns**: no estimation or prediction logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{CelestialObjectRecord, DiagnosticFlags, Disposition, RowId};
use crate::error::AppError;
use crate::io::schema::{CanonicalField, CatalogSchema};

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output for one catalog.
#[derive(Debug, Clone)]
pub struct IngestedCatalog {
    /// Display name of the source (usually the file path).
    pub source: String,
    /// Header row as it appeared in the file.
    pub headers: Vec<String>,
    pub schema: CatalogSchema,
    pub records: Vec<CelestialObjectRecord>,
    pub row_errors: Vec<RowError>,
    /// Cells present but unusable (non-numeric, non-finite, non-positive radius).
    pub invalid_cells: usize,
    pub rows_read: usize,
}

/// Load a catalog CSV from disk.
pub fn load_catalog(path: &Path) -> Result<IngestedCatalog, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open catalog CSV '{}': {e}", path.display())))?;
    read_catalog(file, &path.display().to_string())
}

/// Read a catalog CSV from any reader.
///
/// Lines starting with `#` are comments (archive exports prepend a block of them).
pub fn read_catalog<R: Read>(input: R, source: &str) -> Result<IngestedCatalog, AppError> {
    let mut reader = csv_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers of '{source}': {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let schema = CatalogSchema::resolve(&header_map);

    for field in CanonicalField::ALL {
        match schema.column_name(field) {
            Some(name) => tracing::debug!(catalog = source, ?field, column = name, "resolved column"),
            None => tracing::debug!(catalog = source, ?field, "column not present"),
        }
    }
    if schema.column(CanonicalField::Radius).is_none() {
        tracing::warn!(
            catalog = source,
            "no radius column ({}); mass and class will be empty",
            CanonicalField::Radius.candidates().join(" / ")
        );
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut invalid_cells = 0usize;
    let mut rows_read = 0usize;

    // Every data row yields a record, so `RowId` is the data-row index and the
    // export keeps one line per input row.
    for (idx, result) in reader.byte_records().enumerate() {
        // Header is line 1; comment lines are not counted.
        let line = idx + 2;
        let row = RowId(idx);
        rows_read += 1;

        let bytes = match result {
            Ok(b) => b,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                records.push(CelestialObjectRecord::new(row));
                continue;
            }
        };

        let record = match StringRecord::from_byte_record(bytes) {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: "invalid UTF-8; decoded lossily".to_string(),
                });
                StringRecord::from_byte_record_lossy(e.into_byte_record())
            }
        };

        records.push(parse_row(&record, &schema, row, &mut invalid_cells));
    }

    if !row_errors.is_empty() {
        tracing::warn!(catalog = source, rows = row_errors.len(), "malformed rows kept with missing values");
    }
    tracing::info!(catalog = source, rows = records.len(), invalid_cells, "catalog loaded");

    Ok(IngestedCatalog {
        source: source.to_string(),
        headers: headers.iter().map(str::to_string).collect(),
        schema,
        records,
        row_errors,
        invalid_cells,
        rows_read,
    })
}

/// Load the calibration table: `(mass, radius)` pairs from the first two columns.
pub fn load_calibration(path: &Path) -> Result<Vec<(f64, f64)>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open calibration CSV '{}': {e}", path.display())))?;
    read_calibration(file)
}

/// Read calibration pairs from any reader.
///
/// Columns are positional (mass first, radius second); header names are ignored.
/// Rows with a missing or non-numeric value in either column are rejected.
pub fn read_calibration<R: Read>(input: R) -> Result<Vec<(f64, f64)>, AppError> {
    let mut reader = csv_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read calibration headers: {e}")))?;
    if headers.len() < 2 {
        return Err(AppError::new(
            2,
            "Calibration table needs two columns (mass, radius).",
        ));
    }

    let mut pairs = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("Calibration line {line}: {e}")))?;

        let mass = parse_opt_f64(record.get(0).map(str::trim))
            .ok_or_else(|| AppError::new(2, format!("Calibration line {line}: invalid mass value")))?;
        let radius = parse_opt_f64(record.get(1).map(str::trim))
            .ok_or_else(|| AppError::new(2, format!("Calibration line {line}: invalid radius value")))?;
        pairs.push((mass, radius));
    }

    tracing::info!(points = pairs.len(), "calibration table loaded");
    Ok(pairs)
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(input)
}

fn parse_row(record: &StringRecord, schema: &CatalogSchema, row: RowId, invalid: &mut usize) -> CelestialObjectRecord {
    let mut numeric = |field: CanonicalField| -> Option<f64> {
        let raw = get_field(record, schema, field)?;
        let value = parse_opt_f64(Some(raw));
        if value.is_none() {
            *invalid += 1;
        }
        value
    };

    let radius = numeric(CanonicalField::Radius).filter(|&r| r > 0.0);
    let period = numeric(CanonicalField::Period);

    // Count non-positive radii here; `numeric` already counted unparseable ones.
    if get_field(record, schema, CanonicalField::Radius)
        .and_then(|raw| parse_opt_f64(Some(raw)))
        .is_some_and(|r| r <= 0.0)
    {
        *invalid += 1;
    }

    let mut flag = |field: CanonicalField| -> Option<bool> {
        let raw = get_field(record, schema, field)?;
        let value = parse_flag(raw);
        if value.is_none() {
            *invalid += 1;
        }
        value
    };

    let flags = DiagnosticFlags {
        not_transit_like: flag(CanonicalField::NotTransitLike),
        stellar_eclipse: flag(CanonicalField::StellarEclipse),
        centroid_offset: flag(CanonicalField::CentroidOffset),
        ephemeris_match: flag(CanonicalField::EphemerisMatch),
    };

    CelestialObjectRecord {
        name: get_field(record, schema, CanonicalField::Name).map(str::to_string),
        radius,
        period,
        flags,
        disposition: get_field(record, schema, CanonicalField::Disposition).and_then(Disposition::parse),
        fields: record.iter().map(str::to_string).collect(),
        ..CelestialObjectRecord::new(row)
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // Keep the first occurrence of a duplicated header.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

pub(crate) fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema resolution misses that column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_field<'a>(record: &'a StringRecord, schema: &CatalogSchema, field: CanonicalField) -> Option<&'a str> {
    let idx = schema.column(field)?;
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn parse_flag(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    parse_opt_f64(Some(s)).map(|v| v != 0.0)
}
