use ndarray::{Array1, ArrayView1};

use super::LossFn;

/// Mean squared error loss function.
#[derive(Default, Clone, Copy)]
pub struct Mse;

impl Mse {
    /// Returns a new `Mse`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Mse {
    /// Sums the squared errors in index order before dividing, so the result doesn't depend
    /// on how the arrays are laid out in memory.
    fn loss(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
        let n = y_pred.len();
        if n == 0 {
            return 0.0;
        }

        let sum = y_pred
            .iter()
            .zip(y.iter())
            .fold(0.0, |acc, (p, t)| acc + (p - t).powi(2));

        sum / n as f64
    }

    /// `(2/n) * (y_pred - y)`, element-wise.
    fn loss_prime(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        let two_over_n = 2.0 / y_pred.len() as f64;

        y_pred
            .iter()
            .zip(y.iter())
            .map(|(p, t)| two_over_n * (p - t))
            .collect()
    }
}
