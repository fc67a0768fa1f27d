use ndarray::{Array1, ArrayView1};

/// A measure of how far a model's predictions are from the expected values.
pub trait LossFn {
    fn loss(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> f64;

    /// The derivative of `loss` with respect to each prediction.
    fn loss_prime(&self, y_pred: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64>;
}
