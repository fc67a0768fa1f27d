mod config;
mod fit;
mod observer;
mod trainer;

pub use config::TrainingConfig;
pub use fit::{Fit, TrainingOutcome, fit, fit_with_observer};
pub use observer::{IterationStats, LogObserver, LossHistory, NoopObserver, TrainingObserver};
pub use trainer::{FittedRegression, Trainer};
