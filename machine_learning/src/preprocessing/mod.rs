mod min_max;

pub use min_max::{MinMaxParams, MinMaxScaler, denormalize, normalize};
