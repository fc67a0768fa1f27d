use log::info;
use serde::Serialize;

use super::{
    TrainingConfig,
    fit::{TrainingOutcome, fit_with_observer},
    observer::{LogObserver, TrainingObserver},
};
use crate::{
    MlErr, Result,
    arch::{LinearModel, OriginalLine},
    dataset::Dataset,
    preprocessing::{MinMaxParams, MinMaxScaler},
};

/// Trains linear models on whole datasets: normalizes both columns, fits in normalized
/// space and keeps the bounds needed to answer predictions in the dataset's units.
#[derive(Debug, Clone, Copy)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `config` - The hyper parameters, already validated.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains on `dataset`, logging progress every `log_every` iterations.
    ///
    /// # Errors
    /// * `MlErr::DegenerateRange` if either column is constant.
    /// * `MlErr::Diverged` if gradient descent blew up instead of converging.
    pub fn train(&self, dataset: &Dataset) -> Result<FittedRegression> {
        let mut observer = LogObserver::new(self.config.log_every());
        self.train_with_observer(dataset, &mut observer)
    }

    /// Same as `train` but reports every iteration to `observer` instead.
    pub fn train_with_observer<O>(
        &self,
        dataset: &Dataset,
        observer: &mut O,
    ) -> Result<FittedRegression>
    where
        O: TrainingObserver + ?Sized,
    {
        let mut x_scaler = MinMaxScaler::new("x");
        let mut y_scaler = MinMaxScaler::new("y");
        let x = x_scaler.fit_transform(dataset.x())?;
        let y = y_scaler.fit_transform(dataset.y())?;

        let fit = fit_with_observer(
            &x,
            &y,
            self.config.learning_rate(),
            self.config.iterations(),
            observer,
        )?;

        info!(
            iterations = fit.outcome.iterations_run,
            stopped_on_nan = fit.outcome.stopped_on_nan,
            diverged = fit.outcome.diverged;
            "training finished: {}", fit.model
        );

        // The columns are finite and normalized, so an early stop can only come from
        // the parameters blowing up.
        if fit.outcome.is_degraded() {
            return Err(MlErr::Diverged {
                iteration: fit.outcome.iterations_run,
                learning_rate: self.config.learning_rate(),
            });
        }

        Ok(FittedRegression {
            model: fit.model,
            x_params: x_scaler.fitted()?,
            y_params: y_scaler.fitted()?,
            outcome: fit.outcome,
        })
    }
}

/// A model fitted in normalized space plus the bounds of each column.
///
/// Inputs are always normalized with `x_params` and outputs denormalized with `y_params`,
/// `predict` is the only place where both are combined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedRegression {
    model: LinearModel,
    x_params: MinMaxParams,
    y_params: MinMaxParams,
    #[serde(skip)]
    outcome: TrainingOutcome,
}

impl FittedRegression {
    /// Predicts `y` for a raw `x`, both in the dataset's units.
    pub fn predict(&self, x: f64) -> f64 {
        let x_norm = self.x_params.normalize_one(x);
        let y_norm = self.model.predict(x_norm);
        self.y_params.denormalize(y_norm)
    }

    /// The fitted line expressed in the dataset's units.
    pub fn original_line(&self) -> OriginalLine {
        self.model.to_original_scale(&self.x_params, &self.y_params)
    }

    /// The model in normalized space.
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn x_params(&self) -> &MinMaxParams {
        &self.x_params
    }

    pub fn y_params(&self) -> &MinMaxParams {
        &self.y_params
    }

    pub fn outcome(&self) -> &TrainingOutcome {
        &self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MlErr, training::NoopObserver};

    fn doubling() -> Dataset {
        Dataset::new(vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![2.0, 4.0, 6.0, 8.0, 10.0]).unwrap()
    }

    #[test]
    fn predicts_in_the_original_scale() {
        let trainer = Trainer::new(TrainingConfig::new(0.1, 5000).unwrap());
        let fitted = trainer
            .train_with_observer(&doubling(), &mut NoopObserver)
            .unwrap();

        assert!((fitted.predict(6.0) - 12.0).abs() < 0.5);
        assert!((fitted.predict(3.0) - 6.0).abs() < 0.05);
        assert_eq!(fitted.outcome().iterations_run, 5000);
    }

    #[test]
    fn scale_roles_are_not_swapped() {
        // x spans 0..10 and y spans 100..300, swapping them would be off by orders of magnitude.
        let ds = Dataset::new(vec![0.0, 5.0, 10.0], vec![100.0, 200.0, 300.0]).unwrap();
        let trainer = Trainer::new(TrainingConfig::new(0.5, 5000).unwrap());
        let fitted = trainer.train_with_observer(&ds, &mut NoopObserver).unwrap();

        assert_eq!(fitted.x_params().min(), 0.0);
        assert_eq!(fitted.y_params().max(), 300.0);
        assert!((fitted.predict(7.5) - 250.0).abs() < 1e-3);
    }

    #[test]
    fn original_line_matches_predictions() {
        let trainer = Trainer::new(TrainingConfig::new(0.1, 2000).unwrap());
        let fitted = trainer
            .train_with_observer(&doubling(), &mut NoopObserver)
            .unwrap();
        let line = fitted.original_line();

        for x in [0.0, 2.5, 7.0] {
            assert!((line.predict(x) - fitted.predict(x)).abs() < 1e-9);
        }
    }

    #[test]
    fn divergent_learning_rate_is_an_error() {
        let trainer = Trainer::new(TrainingConfig::new(5.0, 1000).unwrap());
        let res = trainer.train_with_observer(&doubling(), &mut NoopObserver);

        assert!(
            matches!(res, Err(MlErr::Diverged { learning_rate, .. }) if learning_rate == 5.0),
            "{res:?}"
        );
    }

    #[test]
    fn fitted_predictions_are_finite() {
        let trainer = Trainer::new(TrainingConfig::new(0.5, 1000).unwrap());
        let fitted = trainer
            .train_with_observer(&doubling(), &mut NoopObserver)
            .unwrap();

        assert!(fitted.model().is_finite());
        assert!(!fitted.outcome().is_degraded());
        for x in [-100.0, 1.0, 6.0, 1e6] {
            assert!(fitted.predict(x).is_finite());
        }
    }

    #[test]
    fn constant_columns_are_rejected() {
        let ds = Dataset::new(vec![1.0, 2.0, 3.0], vec![5.0, 5.0, 5.0]).unwrap();
        let trainer = Trainer::new(TrainingConfig::default());

        assert!(matches!(
            trainer.train(&ds),
            Err(MlErr::DegenerateRange { what: "y", .. })
        ));
    }
}
