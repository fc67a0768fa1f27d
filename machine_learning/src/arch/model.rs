use std::fmt;

use ndarray::{Array1, ArrayView1, AsArray};
use serde::{Deserialize, Serialize};

use crate::preprocessing::MinMaxParams;

/// A line `y = slope * x + intercept` fitted in normalized space.
///
/// Both coordinates are expected to be normalized with their own `MinMaxParams`, use
/// `to_original_scale` to get the same line in the dataset's units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    /// Amount of trainable parameters, laid out as `[slope, intercept]`.
    pub const NUM_PARAMS: usize = 2;

    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    pub fn from_params(params: [f64; Self::NUM_PARAMS]) -> Self {
        let [slope, intercept] = params;
        Self { slope, intercept }
    }

    pub fn params(&self) -> [f64; Self::NUM_PARAMS] {
        [self.slope, self.intercept]
    }

    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn predict_batch<'a, V>(&self, x: V) -> Array1<f64>
    where
        V: AsArray<'a, f64>,
    {
        let x: ArrayView1<f64> = x.into();
        x.mapv(|x| self.predict(x))
    }

    pub fn is_finite(&self) -> bool {
        self.slope.is_finite() && self.intercept.is_finite()
    }

    /// Expresses this model in the original units of the data it was trained on.
    ///
    /// # Arguments
    /// * `x_params` - The bounds the inputs were normalized with.
    /// * `y_params` - The bounds the targets were normalized with.
    pub fn to_original_scale(
        &self,
        x_params: &MinMaxParams,
        y_params: &MinMaxParams,
    ) -> OriginalLine {
        let slope = self.slope * y_params.range() / x_params.range();
        let intercept =
            self.intercept * y_params.range() + y_params.min() - slope * x_params.min();

        OriginalLine { slope, intercept }
    }
}

impl fmt::Display for LinearModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {:.2}x + {:.2}", self.slope, self.intercept)
    }
}

/// Evaluates `model` at a normalized `x`, the result is a normalized `y`.
#[inline]
pub fn predict(x: f64, model: &LinearModel) -> f64 {
    model.predict(x)
}

/// A line in the dataset's own units, the only kind of line handed to plotting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OriginalLine {
    pub slope: f64,
    pub intercept: f64,
}

impl OriginalLine {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    #[inline]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

impl fmt::Display for OriginalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {:.2}x + {:.2}", self.slope, self.intercept)
    }
}

/// Computes the gradient of the mean squared error of a linear model:
///
/// * `dL/dslope = (2/n) * sum_j (err_j * x_j)`
/// * `dL/dintercept = (2/n) * sum_j err_j`
///
/// where `err_j = y_pred_j - y_j`. This is `Mse::loss_prime` chained with the model's
/// partial derivatives (`x_j` and `1`), with `2/n` factored out of the sums so they run
/// in index order over the raw errors.
///
/// # Returns
/// The gradient laid out as `[slope, intercept]`.
pub fn mse_gradient(
    y_pred: ArrayView1<f64>,
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
) -> [f64; LinearModel::NUM_PARAMS] {
    debug_assert_eq!(y_pred.len(), x.len());
    debug_assert_eq!(y.len(), x.len());

    let two_over_n = 2.0 / x.len() as f64;
    let mut d_slope = 0.0;
    let mut d_intercept = 0.0;

    for ((&pred, &x), &y) in y_pred.iter().zip(x.iter()).zip(y.iter()) {
        let err = pred - y;
        d_slope += err * x;
        d_intercept += err;
    }

    [two_over_n * d_slope, two_over_n * d_intercept]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::loss::{LossFn, Mse};
    use ndarray::array;

    #[test]
    fn gradient_matches_expected_simple_case() {
        // y = 2x + 1, starting from slope = 0, intercept = 0
        let x = array![1.0, 2.0, 3.0];
        let y = array![3.0, 5.0, 7.0];
        let model = LinearModel::default();
        let y_pred = model.predict_batch(&x);

        let [d_slope, d_intercept] = mse_gradient(y_pred.view(), x.view(), y.view());

        // errors: [-3, -5, -7]
        // d_slope = (2/3) * (-3 - 10 - 21) = -22.666..
        // d_intercept = (2/3) * -15 = -10
        assert!((d_slope - (-68.0 / 3.0)).abs() < 1e-12);
        assert!((d_intercept - (-10.0)).abs() < 1e-12);
    }

    #[test]
    fn gradient_follows_the_chain_rule_on_loss_prime() {
        let x = array![0.0, 0.2, 0.45, 0.7, 1.0];
        let y = array![0.1, 0.0, 0.6, 0.5, 1.0];
        let y_pred = LinearModel::new(0.3, 0.2).predict_batch(&x);

        let d_pred = Mse::new().loss_prime(y_pred.view(), y.view());
        let d_slope: f64 = d_pred.iter().zip(x.iter()).map(|(d, x)| d * x).sum();
        let d_intercept: f64 = d_pred.iter().sum();

        let grad = mse_gradient(y_pred.view(), x.view(), y.view());
        assert!((grad[0] - d_slope).abs() < 1e-12);
        assert!((grad[1] - d_intercept).abs() < 1e-12);
    }

    #[test]
    fn gradient_is_zero_on_a_perfect_fit() {
        let x = array![0.0, 0.5, 1.0];
        let model = LinearModel::new(1.0, 0.0);
        let y_pred = model.predict_batch(&x);

        assert_eq!(mse_gradient(y_pred.view(), x.view(), x.view()), [0.0, 0.0]);
    }

    #[test]
    fn params_roundtrip_keeps_layout() {
        let model = LinearModel::new(0.25, -3.0);
        assert_eq!(model.params(), [0.25, -3.0]);
        assert_eq!(LinearModel::from_params(model.params()), model);
    }

    #[test]
    fn original_scale_line_agrees_with_normalized_chain() {
        let x_params = MinMaxParams::new(10.0, 30.0).unwrap();
        let y_params = MinMaxParams::new(1500.0, 2500.0).unwrap();
        let model = LinearModel::new(0.8, 0.1);
        let line = model.to_original_scale(&x_params, &y_params);

        for raw_x in [10.0, 17.5, 30.0, 42.0] {
            let chained = y_params.denormalize(model.predict(x_params.normalize_one(raw_x)));
            assert!((line.predict(raw_x) - chained).abs() < 1e-9);
        }
    }

    #[test]
    fn display_rounds_to_two_decimals() {
        assert_eq!(LinearModel::new(0.999, 0.004).to_string(), "y = 1.00x + 0.00");
        assert_eq!(OriginalLine::new(49.8, 1502.0).to_string(), "y = 49.80x + 1502.00");
    }
}
