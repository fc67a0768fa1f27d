use log::debug;
use ndarray::{Array1, ArrayView1, AsArray};
use serde::{Deserialize, Serialize};

use crate::{MlErr, Result};

/// The bounds captured from a sequence when normalizing it to `[0, 1]`.
///
/// They must be kept around by the caller for as long as values in normalized space need to
/// be mapped back to the original scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxParams {
    min: f64,
    max: f64,
}

impl MinMaxParams {
    /// Returns a new `MinMaxParams`.
    ///
    /// # Arguments
    /// * `min` - The value that maps to `0`.
    /// * `max` - The value that maps to `1`.
    ///
    /// # Errors
    /// * `MlErr::DegenerateRange` if the bounds are not finite or `min >= max`.
    /// * `MlErr::RangeOverflow` if `max - min` isn't representable.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(MlErr::DegenerateRange {
                what: "bounds",
                value: min,
            });
        }

        Self::checked("bounds", min, max)
    }

    fn checked(what: &'static str, min: f64, max: f64) -> Result<Self> {
        if !(max - min).is_finite() {
            return Err(MlErr::RangeOverflow { what, min, max });
        }

        Ok(Self { min, max })
    }

    /// Captures the minimum and maximum of `values`.
    ///
    /// # Arguments
    /// * `values` - The sequence to scan.
    /// * `what` - A name for the sequence used in errors and logs.
    ///
    /// # Errors
    /// * `MlErr::EmptyInput` if `values` is empty.
    /// * `MlErr::NonFiniteInput` if any value is `NaN` or infinite.
    /// * `MlErr::DegenerateRange` if every value is the same.
    /// * `MlErr::RangeOverflow` if the values are too far apart to be normalized.
    pub fn fit<'a, V>(values: V, what: &'static str) -> Result<Self>
    where
        V: AsArray<'a, f64>,
    {
        let values: ArrayView1<f64> = values.into();
        let first = *values.get(0).ok_or(MlErr::EmptyInput(what))?;

        let mut min = first;
        let mut max = first;
        for (index, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                return Err(MlErr::NonFiniteInput { what, index });
            }

            min = min.min(v);
            max = max.max(v);
        }

        if min == max {
            return Err(MlErr::DegenerateRange { what, value: min });
        }

        let params = Self::checked(what, min, max)?;
        debug!(what = what, min = min, max = max; "captured normalization bounds");
        Ok(params)
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// The width of the captured range, always positive and finite.
    #[inline]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Maps `value` into normalized space. Values outside the captured bounds land outside
    /// of `[0, 1]`.
    #[inline]
    pub fn normalize_one(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }

    /// Maps a normalized `value` back into the original scale.
    #[inline]
    pub fn denormalize(&self, value: f64) -> f64 {
        value * self.range() + self.min
    }

    /// Normalizes every element of `values` with these bounds.
    pub fn transform<'a, V>(&self, values: V) -> Array1<f64>
    where
        V: AsArray<'a, f64>,
    {
        let values: ArrayView1<f64> = values.into();
        values.mapv(|v| self.normalize_one(v))
    }
}

/// Normalizes a sequence to the `[0, 1]` range using its own minimum and maximum.
///
/// # Arguments
/// * `values` - A non empty sequence of finite values.
///
/// # Returns
/// The normalized sequence together with the bounds needed to reverse it.
///
/// # Errors
/// `MlErr::DegenerateRange` when the sequence is constant, see `MinMaxParams::fit` for the rest.
pub fn normalize<'a, V>(values: V) -> Result<(Array1<f64>, MinMaxParams)>
where
    V: AsArray<'a, f64>,
{
    let values: ArrayView1<f64> = values.into();
    let params = MinMaxParams::fit(values, "sequence")?;
    Ok((params.transform(values), params))
}

/// Inverse of `normalize` for a single value: `value * (max - min) + min`.
#[inline]
pub fn denormalize(value: f64, params: &MinMaxParams) -> f64 {
    params.denormalize(value)
}

/// Stateful min-max scaler for a named column, fitted once and then reused to transform
/// other sequences with the same bounds.
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    what: &'static str,
    params: Option<MinMaxParams>,
}

impl MinMaxScaler {
    /// Returns a new, unfitted `MinMaxScaler`.
    ///
    /// # Arguments
    /// * `what` - The column name used in errors and logs.
    pub fn new(what: &'static str) -> Self {
        Self { what, params: None }
    }

    /// Captures the bounds of `values`, replacing any previous fit.
    pub fn fit<'a, V>(&mut self, values: V) -> Result<&MinMaxParams>
    where
        V: AsArray<'a, f64>,
    {
        let params = MinMaxParams::fit(values, self.what)?;
        Ok(&*self.params.insert(params))
    }

    /// The fitted bounds.
    ///
    /// # Errors
    /// `MlErr::ScalerNotFitted` if `fit` was never called successfully.
    pub fn fitted(&self) -> Result<MinMaxParams> {
        self.params.ok_or(MlErr::ScalerNotFitted)
    }

    /// Normalizes `values` with the fitted bounds.
    ///
    /// # Errors
    /// `MlErr::ScalerNotFitted` if `fit` was never called successfully.
    pub fn transform<'a, V>(&self, values: V) -> Result<Array1<f64>>
    where
        V: AsArray<'a, f64>,
    {
        Ok(self.fitted()?.transform(values))
    }

    pub fn fit_transform<'a, V>(&mut self, values: V) -> Result<Array1<f64>>
    where
        V: AsArray<'a, f64>,
    {
        let values: ArrayView1<f64> = values.into();
        let params = *self.fit(values)?;
        Ok(params.transform(values))
    }

    pub fn params(&self) -> Option<&MinMaxParams> {
        self.params.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_bounds_to_zero_and_one() {
        let (normalized, params) = normalize(&[3.0, -1.0, 7.0, 5.0]).unwrap();

        assert_eq!(params.min(), -1.0);
        assert_eq!(params.max(), 7.0);
        assert_eq!(normalized.to_vec(), vec![0.5, 0.0, 1.0, 0.75]);
        assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn normalize_rejects_constant_sequence() {
        let res = normalize(&[5.0, 5.0, 5.0]);
        assert!(matches!(res, Err(MlErr::DegenerateRange { value, .. }) if value == 5.0));
    }

    #[test]
    fn normalize_rejects_single_value() {
        assert!(matches!(
            normalize(&[2.0]),
            Err(MlErr::DegenerateRange { .. })
        ));
    }

    #[test]
    fn normalize_rejects_empty_and_non_finite() {
        let empty: [f64; 0] = [];
        assert!(matches!(normalize(&empty), Err(MlErr::EmptyInput(_))));
        assert!(matches!(
            normalize(&[1.0, f64::NAN, 3.0]),
            Err(MlErr::NonFiniteInput { index: 1, .. })
        ));
        assert!(matches!(
            normalize(&[f64::INFINITY, 1.0]),
            Err(MlErr::NonFiniteInput { index: 0, .. })
        ));
    }

    #[test]
    fn denormalize_reverses_normalize_one() {
        let params = MinMaxParams::new(1200.0, 2075.5).unwrap();

        for v in [1200.0, 1333.3, 2075.5, 900.0, 3000.25] {
            let back = denormalize(params.normalize_one(v), &params);
            assert!((back - v).abs() < 1e-9, "{v} came back as {back}");
        }
    }

    #[test]
    fn params_new_validates_bounds() {
        assert!(MinMaxParams::new(0.0, 1.0).is_ok());
        assert!(MinMaxParams::new(1.0, 1.0).is_err());
        assert!(MinMaxParams::new(2.0, 1.0).is_err());
        assert!(MinMaxParams::new(f64::NAN, 1.0).is_err());
        assert!(matches!(
            MinMaxParams::new(-f64::MAX, f64::MAX),
            Err(MlErr::RangeOverflow { .. })
        ));
    }

    #[test]
    fn normalize_rejects_ranges_that_overflow() {
        let res = normalize(&[-1e308, 0.0, 1e308]);
        assert!(matches!(res, Err(MlErr::RangeOverflow { what: "sequence", .. })));

        // Wide but representable ranges still land in [0, 1].
        let (normalized, _) = normalize(&[-1e307, 1e307]).unwrap();
        assert_eq!(normalized.to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn scaler_must_be_fitted_first() {
        let scaler = MinMaxScaler::new("x");
        assert!(matches!(
            scaler.transform(&[1.0]),
            Err(MlErr::ScalerNotFitted)
        ));
        assert!(matches!(scaler.fitted(), Err(MlErr::ScalerNotFitted)));
    }

    #[test]
    fn scaler_errors_name_its_column() {
        let mut scaler = MinMaxScaler::new("y");
        assert!(matches!(
            scaler.fit(&[4.0, 4.0]),
            Err(MlErr::DegenerateRange { what: "y", .. })
        ));
        assert!(scaler.params().is_none());
    }

    #[test]
    fn scaler_reuses_fitted_bounds() {
        let mut scaler = MinMaxScaler::new("x");
        let fitted = scaler.fit_transform(&[0.0, 10.0]).unwrap();
        assert_eq!(fitted.to_vec(), vec![0.0, 1.0]);

        let other = scaler.transform(&[5.0, 20.0]).unwrap();
        assert_eq!(other.to_vec(), vec![0.5, 2.0]);
        assert_eq!(scaler.params().map(|p| p.range()), Some(10.0));
    }
}
