pub mod loss;
mod model;

pub use model::{LinearModel, OriginalLine, mse_gradient, predict};
