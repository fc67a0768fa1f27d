use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use ndarray::{Array1, ArrayView1};

use crate::{MlErr, Result};

/// An in memory dataset of `(x, y)` pairs, with at least one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array1<f64>,
    y: Array1<f64>,
}

impl Dataset {
    /// Creates a new dataset from owned buffers.
    ///
    /// # Errors
    /// * `MlErr::SizeMismatch` if `x` and `y` have different lengths.
    /// * `MlErr::EmptyInput` if there are no samples.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MlErr::SizeMismatch {
                a: "x",
                b: "y",
                got: y.len(),
                expected: x.len(),
            });
        }

        if x.is_empty() {
            return Err(MlErr::EmptyInput("dataset"));
        }

        Ok(Self {
            x: Array1::from_vec(x),
            y: Array1::from_vec(y),
        })
    }

    /// Loads a header-less CSV file with one `x,y` pair per row.
    ///
    /// # Errors
    /// `MlErr::DatasetLoad` if the file can't be read or any row is malformed.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| MlErr::DatasetLoad {
            line: None,
            reason: format!("cannot read '{}': {e}", path.display()),
        })?;

        let dataset = Self::from_reader(file)?;
        debug!(path:? = path, samples = dataset.len(); "loaded dataset");
        Ok(dataset)
    }

    /// Reads header-less CSV rows from `reader`, blank lines are skipped.
    ///
    /// # Errors
    /// `MlErr::DatasetLoad` if a row doesn't have exactly two numeric fields or no rows were
    /// found at all.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut x = Vec::new();
        let mut y = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| MlErr::DatasetLoad {
                line: e.position().map(|p| p.line() as usize),
                reason: e.to_string(),
            })?;

            let (xi, yi) = parse_row(&record)?;
            x.push(xi);
            y.push(yi);
        }

        if x.is_empty() {
            return Err(MlErr::DatasetLoad {
                line: None,
                reason: "dataset is empty".to_string(),
            });
        }

        Self::new(x, y)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false, kept for symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[inline]
    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.x.view()
    }

    #[inline]
    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }
}

fn parse_row(record: &StringRecord) -> Result<(f64, f64)> {
    let line = record.position().map(|p| p.line() as usize);

    if record.len() != 2 {
        return Err(MlErr::DatasetLoad {
            line,
            reason: format!("expected 2 values (x,y), got {}", record.len()),
        });
    }

    let parse = |field: &str| -> Result<f64> {
        match field.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(MlErr::DatasetLoad {
                line,
                reason: format!("cannot parse '{field}' as a number"),
            }),
        }
    };

    Ok((parse(&record[0])?, parse(&record[1])?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_pairs_and_skips_blank_lines() {
        let csv = "1,1500.5\n 2 , 1550\n\n3,1601.25\n";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.x().to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(ds.y().to_vec(), vec![1500.5, 1550.0, 1601.25]);
    }

    #[test]
    fn rejects_non_numeric_fields_with_line_number() {
        let csv = "1,2\nthree,4\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, MlErr::DatasetLoad { line: Some(2), .. }), "{err}");
    }

    #[test]
    fn rejects_rows_with_wrong_arity() {
        let csv = "1,2\n3,4,5\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(MlErr::DatasetLoad { line: Some(2), .. })
        ));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            Dataset::from_reader("".as_bytes()),
            Err(MlErr::DatasetLoad { line: None, .. })
        ));
    }

    #[test]
    fn rejects_missing_file() {
        assert!(matches!(
            Dataset::from_csv_path("this/file/does/not/exist.csv"),
            Err(MlErr::DatasetLoad { line: None, .. })
        ));
    }

    #[test]
    fn new_checks_lengths() {
        assert!(matches!(
            Dataset::new(vec![1.0, 2.0], vec![1.0]),
            Err(MlErr::SizeMismatch { .. })
        ));
        assert!(matches!(
            Dataset::new(vec![], vec![]),
            Err(MlErr::EmptyInput(_))
        ));
    }
}
