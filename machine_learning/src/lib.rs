//! Univariate linear regression fitted with batch gradient descent over min-max normalized
//! data.
//!
//! The usual flow is `Dataset` -> `Trainer::train` -> `FittedRegression::predict`, the
//! building blocks (`normalize`, `fit`, `predict`, `denormalize`) are exported as well.

pub mod arch;
pub mod dataset;
pub mod error;
pub mod optimization;
pub mod preprocessing;
pub mod training;

pub use arch::{LinearModel, OriginalLine, predict};
pub use dataset::Dataset;
pub use error::{MlErr, Result, parse_input};
pub use preprocessing::{MinMaxParams, denormalize, normalize};
pub use training::{FittedRegression, Trainer, TrainingConfig, fit};
