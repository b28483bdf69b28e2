//! Per-feature standardization (zero mean, unit variance).
//!
//! A `Standardizer` is fitted on one matrix and then applied to others. The
//! disposition predictor fits it on training rows only and transforms the
//! held-out rows with the same statistics.
//!
//! Missing values are `NaN`:
//! - fitting ignores them (mean/variance over the present values)
//! - transforming maps them to `0.0`, i.e. the fitted mean
//!
//! Variance is the population variance (divide by `n`). A feature with zero
//! variance (or no present values) keeps a scale of `1.0`.

use nalgebra::DMatrix;

#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl Standardizer {
    /// Fit column statistics on `x` (rows = observations, columns = features).
    pub fn fit(x: &DMatrix<f64>) -> Self {
        let mut means = Vec::with_capacity(x.ncols());
        let mut scales = Vec::with_capacity(x.ncols());

        for col in x.column_iter() {
            let present: Vec<f64> = col.iter().copied().filter(|v| v.is_finite()).collect();
            if present.is_empty() {
                means.push(0.0);
                scales.push(1.0);
                continue;
            }

            let n = present.len() as f64;
            let mean = present.iter().sum::<f64>() / n;
            let var = present.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
            let std = var.sqrt();

            means.push(mean);
            scales.push(if std > 0.0 && std.is_finite() { std } else { 1.0 });
        }

        Self { means, scales }
    }

    /// Apply the fitted statistics to `x`, returning a new matrix.
    ///
    /// # Panics
    /// Panics if `x` does not have the same number of columns as the fitted matrix.
    pub fn transform(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        assert_eq!(
            x.ncols(),
            self.means.len(),
            "standardizer fitted on {} features, got {}",
            self.means.len(),
            x.ncols()
        );

        DMatrix::from_fn(x.nrows(), x.ncols(), |i, j| {
            let v = x[(i, j)];
            if v.is_finite() {
                (v - self.means[j]) / self.scales[j]
            } else {
                0.0
            }
        })
    }

    /// Fit on `x` and return the transformed copy alongside the fitted scaler.
    pub fn fit_transform(x: &DMatrix<f64>) -> (Self, DMatrix<f64>) {
        let scaler = Self::fit(x);
        let scaled = scaler.transform(x);
        (scaler, scaled)
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_columns_have_zero_mean_unit_variance() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0]);
        let (_, z) = Standardizer::fit_transform(&x);

        for col in z.column_iter() {
            let n = col.len() as f64;
            let mean = col.iter().sum::<f64>() / n;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_column_keeps_unit_scale() {
        let x = DMatrix::from_row_slice(3, 1, &[5.0, 5.0, 5.0]);
        let scaler = Standardizer::fit(&x);
        assert_eq!(scaler.scales(), &[1.0]);
        assert_eq!(scaler.transform(&x), DMatrix::zeros(3, 1));
    }

    #[test]
    fn missing_values_are_ignored_when_fitting_and_zeroed_when_transforming() {
        let x = DMatrix::from_row_slice(3, 1, &[1.0, f64::NAN, 3.0]);
        let scaler = Standardizer::fit(&x);
        assert_eq!(scaler.means(), &[2.0]);
        let z = scaler.transform(&x);
        assert_eq!(z[(1, 0)], 0.0);
        assert!((z[(0, 0)] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn transform_uses_training_statistics_only() {
        let train = DMatrix::from_row_slice(2, 1, &[0.0, 2.0]);
        let held_out = DMatrix::from_row_slice(1, 1, &[100.0]);
        let scaler = Standardizer::fit(&train);
        let z = scaler.transform(&held_out);
        // mean 1, std 1 from the training rows.
        assert!((z[(0, 0)] - 99.0).abs() < 1e-12);
    }
}
