//! Reporting utilities: class counts, value ranges and the disposition crosstab.

pub mod format;

pub use format::*;

use serde::{Deserialize, Serialize};

use crate::domain::{CelestialObjectRecord, Disposition, PlanetClass};

/// Number of records per planet class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCounts {
    /// Sorted by count, largest first (class order breaks ties).
    pub counts: Vec<(PlanetClass, usize)>,
    pub unclassified: usize,
}

pub fn count_classes(records: &[CelestialObjectRecord]) -> ClassCounts {
    let mut counts: Vec<(PlanetClass, usize)> = PlanetClass::ALL
        .iter()
        .map(|&class| (class, records.iter().filter(|r| r.planet_class == Some(class)).count()))
        .filter(|&(_, n)| n > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    ClassCounts {
        counts,
        unclassified: records.iter().filter(|r| r.planet_class.is_none()).count(),
    }
}

/// Min/max over the present values of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

pub fn value_range(values: impl IntoIterator<Item = Option<f64>>) -> Option<ValueRange> {
    let mut range: Option<ValueRange> = None;
    for v in values.into_iter().flatten().filter(|v| v.is_finite()) {
        range = Some(match range {
            None => ValueRange { min: v, max: v, n: 1 },
            Some(r) => ValueRange {
                min: r.min.min(v),
                max: r.max.max(v),
                n: r.n + 1,
            },
        });
    }
    range
}

/// Actual vs predicted disposition, row-normalized.
///
/// Only records with both a catalog disposition and a prediction are counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crosstab {
    /// Row labels (catalog disposition).
    pub actual: Vec<Disposition>,
    /// Column labels (predicted disposition).
    pub predicted: Vec<Disposition>,
    pub counts: Vec<Vec<usize>>,
    /// `counts` as a percentage of each row total.
    pub percent: Vec<Vec<f64>>,
}

pub fn crosstab(records: &[CelestialObjectRecord]) -> Crosstab {
    let pairs: Vec<(Disposition, Disposition)> = records
        .iter()
        .filter_map(|r| Some((r.disposition?, r.predicted_label?)))
        .collect();

    let mut actual: Vec<Disposition> = pairs.iter().map(|p| p.0).collect();
    actual.sort();
    actual.dedup();
    let mut predicted: Vec<Disposition> = pairs.iter().map(|p| p.1).collect();
    predicted.sort();
    predicted.dedup();

    let mut counts = vec![vec![0usize; predicted.len()]; actual.len()];
    for (a, p) in &pairs {
        if let (Ok(i), Ok(j)) = (actual.binary_search(a), predicted.binary_search(p)) {
            counts[i][j] += 1;
        }
    }

    let percent = counts
        .iter()
        .map(|row| {
            let total: usize = row.iter().sum();
            row.iter()
                .map(|&c| if total == 0 { 0.0 } else { 100.0 * c as f64 / total as f64 })
                .collect()
        })
        .collect();

    Crosstab {
        actual,
        predicted,
        counts,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RowId;

    fn rec(row: usize, actual: Option<Disposition>, predicted: Option<Disposition>) -> CelestialObjectRecord {
        let mut r = CelestialObjectRecord::new(RowId(row));
        r.disposition = actual;
        r.predicted_label = predicted;
        r
    }

    #[test]
    fn crosstab_rows_sum_to_one_hundred() {
        use Disposition::*;
        let records = vec![
            rec(0, Some(Confirmed), Some(Confirmed)),
            rec(1, Some(Confirmed), Some(Confirmed)),
            rec(2, Some(Confirmed), Some(FalsePositive)),
            rec(3, Some(FalsePositive), Some(FalsePositive)),
            rec(4, Some(Candidate), Some(Confirmed)),
            rec(5, None, Some(Confirmed)),
            rec(6, Some(Candidate), None),
        ];
        let ct = crosstab(&records);

        assert_eq!(ct.actual, vec![FalsePositive, Confirmed, Candidate]);
        assert_eq!(ct.predicted, vec![FalsePositive, Confirmed]);
        assert_eq!(ct.counts[1], vec![1, 2]);
        for row in &ct.percent {
            assert!((row.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        }
        assert!((ct.percent[1][1] - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn class_counts_are_sorted_by_frequency() {
        let mut records: Vec<CelestialObjectRecord> = (0..6).map(|i| CelestialObjectRecord::new(RowId(i))).collect();
        records[0].planet_class = Some(PlanetClass::Terrestrial);
        records[1].planet_class = Some(PlanetClass::SuperEarth);
        records[2].planet_class = Some(PlanetClass::SuperEarth);
        records[3].planet_class = Some(PlanetClass::GasGiant);

        let counts = count_classes(&records);
        assert_eq!(counts.counts[0], (PlanetClass::SuperEarth, 2));
        assert_eq!(counts.counts[1], (PlanetClass::GasGiant, 1));
        assert_eq!(counts.counts[2], (PlanetClass::Terrestrial, 1));
        assert_eq!(counts.unclassified, 2);
    }

    #[test]
    fn value_range_skips_missing_values() {
        let r = value_range([Some(3.0), None, Some(-1.0), Some(f64::NAN)]).unwrap();
        assert_eq!((r.min, r.max, r.n), (-1.0, 3.0, 2));
        assert!(value_range([None, None]).is_none());
    }
}
