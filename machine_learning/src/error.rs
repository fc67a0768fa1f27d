use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    /// The dataset could not be read or one of its rows is malformed.
    DatasetLoad {
        line: Option<usize>,
        reason: String,
    },
    /// Normalization was attempted on a sequence where `min == max`.
    DegenerateRange {
        what: &'static str,
        value: f64,
    },
    /// `max - min` doesn't fit in an `f64`.
    RangeOverflow {
        what: &'static str,
        min: f64,
        max: f64,
    },
    InvalidConfig(String),
    /// The value given for a prediction is not a finite number.
    NonNumericInput(String),
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    EmptyInput(&'static str),
    NonFiniteInput {
        what: &'static str,
        index: usize,
    },
    ScalerNotFitted,
    /// Gradient descent blew up, the learning rate is too large for the data.
    Diverged {
        iteration: usize,
        learning_rate: f64,
    },
    Io(io::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::DatasetLoad {
                line: Some(line),
                reason,
            } => write!(f, "failed to load dataset at line {line}: {reason}"),
            MlErr::DatasetLoad { line: None, reason } => {
                write!(f, "failed to load dataset: {reason}")
            }
            MlErr::DegenerateRange { what, value } => write!(
                f,
                "cannot normalize {what}, every value equals {value} so its range is zero"
            ),
            MlErr::RangeOverflow { what, min, max } => write!(
                f,
                "cannot normalize {what}, the range between {min} and {max} overflows"
            ),
            MlErr::InvalidConfig(msg) => write!(f, "invalid training config: {msg}"),
            MlErr::NonNumericInput(input) => {
                write!(f, "invalid input '{input}', please enter a numeric value")
            }
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            MlErr::EmptyInput(what) => write!(f, "{what} must not be empty"),
            MlErr::NonFiniteInput { what, index } => {
                write!(f, "{what} contains a non finite value at index {index}")
            }
            MlErr::ScalerNotFitted => write!(f, "the scaler must be fitted before transforming"),
            MlErr::Diverged {
                iteration,
                learning_rate,
            } => write!(
                f,
                "training diverged at iteration {iteration}, \
                 learning rate {learning_rate} is too large"
            ),
            MlErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Parses a user supplied value to predict for.
///
/// # Arguments
/// * `input` - The raw text, surrounding whitespace is ignored.
///
/// # Returns
/// The parsed value or `MlErr::NonNumericInput` if it isn't a finite number.
pub fn parse_input(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MlErr::NonNumericInput(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_input_accepts_numbers_with_whitespace() {
        assert_eq!(parse_input(" 6\n").unwrap(), 6.0);
        assert_eq!(parse_input("-1.5e2").unwrap(), -150.0);
    }

    #[test]
    fn parse_input_rejects_garbage() {
        assert!(matches!(parse_input("six"), Err(MlErr::NonNumericInput(s)) if s == "six"));
        assert!(matches!(parse_input(""), Err(MlErr::NonNumericInput(_))));
        assert!(matches!(parse_input("NaN"), Err(MlErr::NonNumericInput(_))));
        assert!(matches!(parse_input("inf"), Err(MlErr::NonNumericInput(_))));
    }

    #[test]
    fn degenerate_range_message_names_the_column() {
        let err = MlErr::DegenerateRange { what: "x", value: 5.0 };
        assert!(err.to_string().contains("cannot normalize x"));
    }

    #[test]
    fn diverged_message_names_the_learning_rate() {
        let err = MlErr::Diverged {
            iteration: 12,
            learning_rate: 5.0,
        };
        assert_eq!(
            err.to_string(),
            "training diverged at iteration 12, learning rate 5 is too large"
        );
    }
}
