//! ASCII histogram of planet radius by class.
//!
//! This is intentionally "dumb" (one column per bin, fixed height), optimized for:
//! - quick visual sanity checks of a classified catalog in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Bins are equal-width in log10(radius). Bar height is log-scaled in the bin
//! count, and each bar is stacked by class using `PlanetClass::marker`.

use crate::domain::{CelestialObjectRecord, PlanetClass};

/// Default number of log-radius bins.
pub const DEFAULT_BINS: usize = 70;

/// Per-class counts over log-spaced radius bins.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusHistogram {
    /// `bins + 1` edges in Earth radii, increasing.
    pub edges: Vec<f64>,
    /// `counts[bin][class]`, class order as `PlanetClass::ALL`.
    pub counts: Vec<[usize; 4]>,
}

impl RadiusHistogram {
    /// Bin every record with both a radius and a class.
    ///
    /// Returns `None` when no such record exists.
    pub fn build(records: &[CelestialObjectRecord], bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let points: Vec<(f64, usize)> = records
            .iter()
            .filter_map(|r| {
                let radius = r.radius.filter(|&x| x > 0.0 && x.is_finite())?;
                let class = r.planet_class?;
                Some((radius.log10(), class_index(class)))
            })
            .collect();
        if points.is_empty() {
            return None;
        }

        let mut lo = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let mut hi = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        if hi - lo < 1e-12 {
            lo -= 0.05;
            hi += 0.05;
        }
        let step = (hi - lo) / bins as f64;

        let mut counts = vec![[0usize; 4]; bins];
        for &(x, class) in &points {
            let bin = (((x - lo) / step).floor() as usize).min(bins - 1);
            counts[bin][class] += 1;
        }
        let edges = (0..=bins).map(|i| 10f64.powf(lo + step * i as f64)).collect();

        Some(Self { edges, counts })
    }

    pub fn max_total(&self) -> usize {
        self.counts.iter().map(|c| c.iter().sum::<usize>()).max().unwrap_or(0)
    }
}

/// Render a stacked radius histogram, `height` rows tall, plus axis and legend.
pub fn render_radius_histogram(records: &[CelestialObjectRecord], bins: usize, height: usize) -> String {
    let Some(hist) = RadiusHistogram::build(records, bins) else {
        return "Radius histogram: no classified records\n".to_string();
    };
    render_histogram(&hist, height)
}

pub fn render_histogram(hist: &RadiusHistogram, height: usize) -> String {
    let height = height.max(2);
    let width = hist.counts.len();
    let max_total = hist.max_total();

    let mut grid = vec![vec![' '; width]; height];
    for (x, counts) in hist.counts.iter().enumerate() {
        let bar = bar_height(counts.iter().sum(), max_total, height);
        // Terrestrial at the bottom, gas giants on top.
        let mut y = 0;
        for (class, rows) in stack(counts, bar).into_iter().rev() {
            for _ in 0..rows {
                grid[height - 1 - y][x] = PlanetClass::ALL[class].marker();
                y += 1;
            }
        }
    }

    let first = hist.edges.first().copied().unwrap_or(0.0);
    let last = hist.edges.last().copied().unwrap_or(0.0);

    let mut out = String::new();
    out.push_str(&format!(
        "Radius histogram: {width} log bins | radius=[{first:.2}, {last:.2}] Earth radii | max bin={max_total}\n"
    ));
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(&"-".repeat(width));
    out.push('\n');

    let legend: Vec<String> = PlanetClass::ALL
        .iter()
        .map(|c| format!("{}={}", c.marker(), c.label()))
        .collect();
    out.push_str(&legend.join("  "));
    out.push('\n');

    out
}

fn class_index(class: PlanetClass) -> usize {
    PlanetClass::ALL.iter().position(|&c| c == class).unwrap_or(0)
}

/// Rows for a bin holding `total` objects: `ceil(height * ln(1+total) / ln(1+max))`.
fn bar_height(total: usize, max_total: usize, height: usize) -> usize {
    if total == 0 || max_total == 0 {
        return 0;
    }
    let u = (1.0 + total as f64).ln() / (1.0 + max_total as f64).ln();
    ((u * height as f64).ceil() as usize).clamp(1, height)
}

/// Split `rows` across classes in proportion to their counts (largest remainder).
///
/// Every class with a non-zero count gets at least one row when `rows` allows it.
fn stack(counts: &[usize; 4], rows: usize) -> Vec<(usize, usize)> {
    let total: usize = counts.iter().sum();
    if total == 0 || rows == 0 {
        return Vec::new();
    }

    let mut shares: Vec<(usize, usize, f64)> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .map(|(class, &n)| {
            let exact = rows as f64 * n as f64 / total as f64;
            (class, exact.floor() as usize, exact - exact.floor())
        })
        .collect();

    let mut assigned: usize = shares.iter().map(|s| s.1).sum();
    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (&shares[a], &shares[b]);
        (sa.1 == 0)
            .cmp(&(sb.1 == 0))
            .reverse()
            .then(sb.2.total_cmp(&sa.2))
            .then(sa.0.cmp(&sb.0))
    });
    for &i in order.iter().cycle().take(shares.len() * rows) {
        if assigned >= rows {
            break;
        }
        if shares[i].1 == 0 || shares[i].2 > 0.0 {
            shares[i].1 += 1;
            shares[i].2 = 0.0;
            assigned += 1;
        }
    }

    shares.into_iter().map(|(class, n, _)| (class, n)).collect()
}
