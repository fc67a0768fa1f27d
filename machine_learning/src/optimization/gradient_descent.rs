use super::Optimizer;

/// Plain batch gradient descent with a fixed step size.
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - Scales every gradient before it's subtracted from the parameters.
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Optimizer for GradientDescent {
    /// Applies `param -= learning_rate * grad` to each `(param, grad)` pair, in index order.
    ///
    /// # Arguments
    /// * `params` - The slope and intercept, updated in place.
    /// * `grad` - The loss gradient with respect to `params`, same length.
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]) {
        for (param, g) in params.iter_mut().zip(grad) {
            *param -= self.learning_rate * g;
        }
    }
}
