//! Piecewise-linear radius → mass interpolant built from a calibration table.
//!
//! Outside the sampled radius range the interpolant **extrapolates** along the
//! nearest edge segment. It does not clamp to the edge values: a radius below
//! the smallest knot continues the slope of the first segment, and a radius
//! above the largest knot continues the slope of the last one.
//!
//! Callers that need an upper limit (see `classify::mass`) apply it to the
//! radius before evaluating.

use crate::error::PipelineError;

/// Linear interpolant over sorted, distinct radius knots.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationInterpolator {
    radii: Vec<f64>,
    masses: Vec<f64>,
}

impl CalibrationInterpolator {
    /// Build from parallel radius and mass arrays (radius need not be sorted).
    ///
    /// Repeated radius values collapse into one knot carrying the mean mass.
    pub fn new(radii: &[f64], masses: &[f64]) -> Result<Self, PipelineError> {
        if radii.len() != masses.len() {
            return Err(PipelineError::calibration(format!(
                "radius and mass columns differ in length ({} vs {})",
                radii.len(),
                masses.len()
            )));
        }
        if radii.len() < 2 {
            return Err(PipelineError::calibration(format!(
                "at least 2 reference points are required, got {}",
                radii.len()
            )));
        }
        if let Some(i) = radii
            .iter()
            .zip(masses)
            .position(|(r, m)| !(r.is_finite() && m.is_finite()))
        {
            return Err(PipelineError::calibration(format!(
                "non-finite value in reference point {}",
                i + 1
            )));
        }

        let mut pairs: Vec<(f64, f64)> = radii.iter().copied().zip(masses.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut knot_radii: Vec<f64> = Vec::with_capacity(pairs.len());
        let mut knot_masses: Vec<f64> = Vec::with_capacity(pairs.len());
        let mut i = 0;
        while i < pairs.len() {
            let r = pairs[i].0;
            let mut sum = 0.0;
            let mut count = 0usize;
            while i < pairs.len() && pairs[i].0 == r {
                sum += pairs[i].1;
                count += 1;
                i += 1;
            }
            knot_radii.push(r);
            knot_masses.push(sum / count as f64);
        }

        if knot_radii.len() < 2 {
            return Err(PipelineError::calibration(
                "all reference radii are identical (degenerate radius axis)",
            ));
        }

        Ok(Self {
            radii: knot_radii,
            masses: knot_masses,
        })
    }

    /// Build from `(mass, radius)` pairs, the column order of the reference table.
    pub fn from_mass_radius_pairs(pairs: &[(f64, f64)]) -> Result<Self, PipelineError> {
        let masses: Vec<f64> = pairs.iter().map(|&(m, _)| m).collect();
        let radii: Vec<f64> = pairs.iter().map(|&(_, r)| r).collect();
        Self::new(&radii, &masses)
    }

    /// Mass at the given radius (interpolated inside the knots, extrapolated outside).
    pub fn mass_of(&self, radius: f64) -> f64 {
        let n = self.radii.len();

        // Pick the segment [left, left + 1]. Out-of-range radii reuse the edge
        // segment, which makes the same formula extrapolate.
        let left = if radius <= self.radii[0] {
            0
        } else if radius >= self.radii[n - 1] {
            n - 2
        } else {
            // First knot strictly greater than `radius`, minus one.
            self.radii.partition_point(|&r| r <= radius) - 1
        };

        let (x0, x1) = (self.radii[left], self.radii[left + 1]);
        let (y0, y1) = (self.masses[left], self.masses[left + 1]);

        if radius == x0 {
            return y0;
        }
        if radius == x1 {
            return y1;
        }

        let alpha = (radius - x0) / (x1 - x0);
        y0 + alpha * (y1 - y0)
    }

    /// Smallest calibrated radius.
    pub fn min_radius(&self) -> f64 {
        self.radii[0]
    }

    /// Largest calibrated radius.
    pub fn max_radius(&self) -> f64 {
        self.radii[self.radii.len() - 1]
    }

    /// Number of distinct knots.
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }
}
