use std::num::NonZeroUsize;

use log::{info, warn};

/// What a single completed gradient descent iteration produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    pub iteration: usize,
    /// Mean squared error of the predictions made before this iteration's update.
    pub loss: f64,
    /// Slope after the update.
    pub slope: f64,
    /// Intercept after the update.
    pub intercept: f64,
}

/// Hook invoked by the fitting loop, keeps the loop itself free of any output.
pub trait TrainingObserver {
    fn on_iteration(&mut self, stats: &IterationStats);

    /// Called instead of `on_iteration` when the gradient turned out to be `NaN` and the
    /// loop stops without updating the model.
    fn on_nan_gradient(&mut self, _iteration: usize, _grad: [f64; 2]) {}

    /// Called instead of `on_iteration` when the update would have left a parameter
    /// infinite, `params` holds the rejected values.
    fn on_divergence(&mut self, _iteration: usize, _params: [f64; 2]) {}
}

impl<F> TrainingObserver for F
where
    F: FnMut(&IterationStats),
{
    fn on_iteration(&mut self, stats: &IterationStats) {
        self(stats)
    }
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TrainingObserver for NoopObserver {
    fn on_iteration(&mut self, _stats: &IterationStats) {}
}

/// Logs the training progress every `every` iterations.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    every: NonZeroUsize,
}

impl LogObserver {
    pub fn new(every: NonZeroUsize) -> Self {
        Self { every }
    }
}

impl TrainingObserver for LogObserver {
    fn on_iteration(&mut self, stats: &IterationStats) {
        if stats.iteration % self.every.get() != 0 {
            return;
        }

        info!(
            "Iteration {}: Loss = {:.4}, m = {:.4}, b = {:.4}",
            stats.iteration, stats.loss, stats.slope, stats.intercept
        );
    }

    fn on_nan_gradient(&mut self, iteration: usize, grad: [f64; 2]) {
        warn!(
            iteration = iteration;
            "NaN detected in gradients (d_slope={}, d_intercept={}), stopping gradient descent",
            grad[0], grad[1]
        );
    }

    fn on_divergence(&mut self, iteration: usize, params: [f64; 2]) {
        warn!(
            iteration = iteration;
            "parameters overflowed (m={}, b={}), stopping gradient descent",
            params[0], params[1]
        );
    }
}

/// Keeps the loss of every iteration.
#[derive(Debug, Default, Clone)]
pub struct LossHistory {
    losses: Vec<f64>,
    nan_at: Option<usize>,
    diverged_at: Option<usize>,
}

impl LossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn losses(&self) -> &[f64] {
        &self.losses
    }

    /// The iteration at which a `NaN` gradient stopped training, if any.
    pub fn nan_at(&self) -> Option<usize> {
        self.nan_at
    }

    pub fn diverged_at(&self) -> Option<usize> {
        self.diverged_at
    }
}

impl TrainingObserver for LossHistory {
    fn on_iteration(&mut self, stats: &IterationStats) {
        self.losses.push(stats.loss);
    }

    fn on_nan_gradient(&mut self, iteration: usize, _grad: [f64; 2]) {
        self.nan_at = Some(iteration);
    }

    fn on_divergence(&mut self, iteration: usize, _params: [f64; 2]) {
        self.diverged_at = Some(iteration);
    }
}
