//! Formatted terminal output.
//!
//! Formatting lives here so the classification and prediction code only
//! produces values, and output changes stay localized.

use crate::domain::{CelestialObjectRecord, PipelineConfig};
use crate::io::ingest::IngestedCatalog;
use crate::predict::DispositionRun;
use crate::report::{Crosstab, count_classes, value_range};

/// Summary of one classified catalog: row counts, ranges and class counts.
pub fn format_classification_summary(catalog: &IngestedCatalog, records: &[CelestialObjectRecord]) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", catalog.source));
    out.push_str(&format!(
        "Rows: read={} | kept={} | malformed={} | invalid cells={}\n",
        catalog.rows_read,
        records.len(),
        catalog.row_errors.len(),
        catalog.invalid_cells,
    ));

    match value_range(records.iter().map(|r| r.radius)) {
        Some(r) => out.push_str(&format!("Radius: n={} | [{:.3}, {:.3}] Earth radii\n", r.n, r.min, r.max)),
        None => out.push_str("Radius: no values\n"),
    }
    match value_range(records.iter().map(|r| r.estimated_mass)) {
        Some(r) => out.push_str(&format!("Mass:   n={} | [{:.3}, {:.3}] Earth masses\n", r.n, r.min, r.max)),
        None => out.push_str("Mass:   no values\n"),
    }

    let counts = count_classes(records);
    out.push_str("\nPlanet classes:\n");
    for (class, n) in &counts.counts {
        out.push_str(&format!("  {:<14} {:>7}\n", class.label(), n));
    }
    out.push_str(&format!("  {:<14} {:>7}\n", "(unclassified)", counts.unclassified));

    for e in catalog.row_errors.iter().take(5) {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    if catalog.row_errors.len() > 5 {
        out.push_str(&format!("  ... and {} more malformed rows\n", catalog.row_errors.len() - 5));
    }

    out
}

/// Fold layout, out-of-fold accuracy and the crosstab.
pub fn format_prediction_summary(run: &DispositionRun, config: &PipelineConfig, crosstab: &Crosstab) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Model: random forest | trees={} | max_depth={} | seed={}\n",
        config.n_trees, config.max_depth, config.seed
    ));
    let sizes: Vec<String> = run.fold_sizes.iter().map(|n| n.to_string()).collect();
    out.push_str(&format!(
        "Labeled: n={} | folds={} [{}]\n",
        run.n_labeled,
        run.fold_sizes.len(),
        sizes.join(", ")
    ));
    out.push_str(&format!("Candidates (final model): n={}\n", run.n_unlabeled));
    out.push_str(&format!("Out-of-fold accuracy: {:.2}%\n", 100.0 * run.oof_accuracy));
    out.push('\n');
    out.push_str(&format_crosstab(crosstab));

    out
}

/// Row-normalized crosstab as a percentage table.
pub fn format_crosstab(crosstab: &Crosstab) -> String {
    let mut out = String::new();
    out.push_str("Actual \\ predicted (% of row):\n");

    let mut header = format!("{:<16}", "");
    for p in &crosstab.predicted {
        header.push_str(&format!(" {:>15}", p.catalog_label()));
    }
    header.push_str(&format!(" {:>8}", "n"));
    out.push_str(header.trim_end());
    out.push('\n');

    for (i, a) in crosstab.actual.iter().enumerate() {
        let mut line = format!("{:<16}", a.catalog_label());
        for pct in &crosstab.percent[i] {
            line.push_str(&format!(" {:>14.2}%", pct));
        }
        let total: usize = crosstab.counts[i].iter().sum();
        line.push_str(&format!(" {total:>8}"));
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Disposition, PlanetClass, RowId};
    use crate::io::ingest::read_catalog;
    use crate::report::crosstab;

    #[test]
    fn classification_summary_lists_counts_and_ranges() {
        let csv = "kepoi_name,koi_prad\nK1,1.0\nK2,4.0\nK3,\n";
        let catalog = read_catalog(csv.as_bytes(), "koi.csv").unwrap();
        let mut records = catalog.records.clone();
        records[0].estimated_mass = Some(1.0);
        records[0].planet_class = Some(PlanetClass::Terrestrial);
        records[1].estimated_mass = Some(10.0);
        records[1].planet_class = Some(PlanetClass::NeptuneLike);

        let text = format_classification_summary(&catalog, &records);
        assert!(text.starts_with("=== koi.csv ===\n"));
        assert!(text.contains("Radius: n=2 | [1.000, 4.000]"));
        assert!(text.contains("Mass:   n=2 | [1.000, 10.000]"));
        assert!(text.contains("Neptune-Like"));
        assert!(text.contains(&format!("{:<14} {:>7}", "(unclassified)", 1)));
    }

    #[test]
    fn crosstab_table_has_one_line_per_actual_label() {
        let mut a = CelestialObjectRecord::new(RowId(0));
        a.disposition = Some(Disposition::Confirmed);
        a.predicted_label = Some(Disposition::Confirmed);
        let mut b = CelestialObjectRecord::new(RowId(1));
        b.disposition = Some(Disposition::FalsePositive);
        b.predicted_label = Some(Disposition::Confirmed);

        let text = format_crosstab(&crosstab(&[a, b]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("CONFIRMED"));
        assert!(lines[2].starts_with("FALSE POSITIVE"));
        assert!(lines[2].contains("100.00%"));
    }
}
