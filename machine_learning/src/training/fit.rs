use ndarray::{ArrayView1, AsArray};

use super::observer::{IterationStats, NoopObserver, TrainingObserver};
use crate::{
    MlErr, Result,
    arch::{
        LinearModel,
        loss::{LossFn, Mse},
        mse_gradient,
    },
    optimization::{GradientDescent, Optimizer},
};

/// How a gradient descent run ended.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TrainingOutcome {
    /// Amount of iterations that updated the model.
    pub iterations_run: usize,
    /// Whether the run was cut short by a `NaN` gradient.
    pub stopped_on_nan: bool,
    /// Whether the run was cut short because an update overflowed the parameters.
    pub diverged: bool,
    /// Loss reported by the last completed iteration.
    pub final_loss: Option<f64>,
}

impl TrainingOutcome {
    /// Whether the run blew up instead of converging, either by stopping early or by
    /// reporting a loss that overflowed.
    pub fn is_degraded(&self) -> bool {
        self.stopped_on_nan
            || self.diverged
            || self.final_loss.is_some_and(|loss| !loss.is_finite())
    }
}

/// A fitted model together with how its training went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub model: LinearModel,
    pub outcome: TrainingOutcome,
}

/// Fits `y = slope * x + intercept` with batch gradient descent, starting from the zero model.
///
/// # Arguments
/// * `x` - The normalized inputs.
/// * `y` - The normalized targets, same length as `x`.
/// * `learning_rate` - The step size, finite and positive.
/// * `iterations` - The amount of iterations to run, `0` returns the zero model.
///
/// # Errors
/// * `MlErr::SizeMismatch` if `x` and `y` have different lengths.
/// * `MlErr::EmptyInput` if there are no samples.
/// * `MlErr::InvalidConfig` if the learning rate isn't a positive number.
pub fn fit<'a, 'b, X, Y>(x: X, y: Y, learning_rate: f64, iterations: usize) -> Result<LinearModel>
where
    X: AsArray<'a, f64>,
    Y: AsArray<'b, f64>,
{
    fit_with_observer(x, y, learning_rate, iterations, &mut NoopObserver).map(|fit| fit.model)
}

/// Same as `fit`, reporting every iteration to `observer`.
///
/// The gradient is checked before each update: if either component is `NaN` the loop stops
/// right away and the model of the previous iteration is returned. An update that would
/// leave a parameter infinite stops the loop the same way, so the returned model is always
/// finite.
///
/// # Returns
/// The fitted model and the outcome of the run.
pub fn fit_with_observer<'a, 'b, X, Y, O>(
    x: X,
    y: Y,
    learning_rate: f64,
    iterations: usize,
    observer: &mut O,
) -> Result<Fit>
where
    X: AsArray<'a, f64>,
    Y: AsArray<'b, f64>,
    O: TrainingObserver + ?Sized,
{
    let x: ArrayView1<f64> = x.into();
    let y: ArrayView1<f64> = y.into();

    if x.len() != y.len() {
        return Err(MlErr::SizeMismatch {
            a: "x",
            b: "y",
            got: y.len(),
            expected: x.len(),
        });
    }

    if x.is_empty() {
        return Err(MlErr::EmptyInput("training data"));
    }

    if !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(MlErr::InvalidConfig(format!(
            "learning rate must be a positive number, got {learning_rate}"
        )));
    }

    let loss_fn = Mse::new();
    let mut optimizer = GradientDescent::new(learning_rate);
    let mut params = LinearModel::default().params();
    let mut outcome = TrainingOutcome::default();

    for iteration in 0..iterations {
        let model = LinearModel::from_params(params);
        let y_pred = model.predict_batch(x);
        let grad = mse_gradient(y_pred.view(), x, y);

        if grad.iter().any(|g| g.is_nan()) {
            observer.on_nan_gradient(iteration, grad);
            outcome.stopped_on_nan = true;
            break;
        }

        let mut next = params;
        optimizer.update_params(&mut next, &grad);

        if next.iter().any(|p| !p.is_finite()) {
            observer.on_divergence(iteration, next);
            outcome.diverged = true;
            break;
        }

        params = next;

        let loss = loss_fn.loss(y_pred.view(), y);
        outcome.iterations_run += 1;
        outcome.final_loss = Some(loss);

        let [slope, intercept] = params;
        observer.on_iteration(&IterationStats {
            iteration,
            loss,
            slope,
            intercept,
        });
    }

    Ok(Fit {
        model: LinearModel::from_params(params),
        outcome,
    })
}
