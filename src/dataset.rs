use ndarray::{Array2, ArrayView1, ArrayView2, s};

use crate::{
    Scalar,
    error::{OptErr, Result, check_dim, check_index},
};

/// Input samples and their targets, one row per sample.
#[derive(Debug, Clone)]
pub struct Dataset<F> {
    x: Array2<F>,
    y: Array2<F>,
}

impl<F: Scalar> Dataset<F> {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `x` - The inputs, `len x input_width`.
    /// * `y` - The targets, `len x output_width`.
    ///
    /// # Returns
    /// A `DimensionMismatch` error if `x` and `y` have a different amount of rows.
    pub fn new(x: Array2<F>, y: Array2<F>) -> Result<Self> {
        check_dim("dataset targets", y.nrows(), x.nrows())?;
        Ok(Self { x, y })
    }

    /// Creates a new `Dataset` out of row vectors.
    ///
    /// Every input row must have the width of the first one, the same goes for targets.
    pub fn from_rows(x: &[Vec<F>], y: &[Vec<F>]) -> Result<Self> {
        check_dim("dataset targets", y.len(), x.len())?;
        let x = Self::stack("dataset input row", x)?;
        let y = Self::stack("dataset target row", y)?;
        Self::new(x, y)
    }

    /// Creates a new `Dataset` out of a flat buffer where each sample is laid out as its
    /// `x_size` inputs followed by its `y_size` targets.
    pub fn from_flat(data: Vec<F>, x_size: usize, y_size: usize) -> Result<Self> {
        let row = x_size + y_size;
        if x_size == 0 || y_size == 0 {
            return Err(OptErr::InvalidConfiguration(
                "dataset input and target widths must be positive",
            ));
        }

        if data.len() % row != 0 {
            return Err(OptErr::DimensionMismatch {
                what: "flat dataset",
                got: data.len(),
                expected: data.len() / row * row,
            });
        }

        let len = data.len() / row;
        let full = Array2::from_shape_vec((len, row), data).map_err(|_| {
            OptErr::DimensionMismatch {
                what: "flat dataset",
                got: len * row,
                expected: len * row,
            }
        })?;

        let x = full.slice(s![.., ..x_size]).to_owned();
        let y = full.slice(s![.., x_size..]).to_owned();
        Self::new(x, y)
    }

    fn stack(what: &'static str, rows: &[Vec<F>]) -> Result<Array2<F>> {
        let width = rows.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(rows.len() * width);

        for row in rows {
            check_dim(what, row.len(), width)?;
            flat.extend_from_slice(row);
        }

        Array2::from_shape_vec((rows.len(), width), flat).map_err(|_| OptErr::DimensionMismatch {
            what,
            got: rows.len() * width,
            expected: rows.len() * width,
        })
    }

    /// Returns the amount of samples.
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the width of every input sample.
    pub fn x_size(&self) -> usize {
        self.x.ncols()
    }

    /// Returns the width of every target sample.
    pub fn y_size(&self) -> usize {
        self.y.ncols()
    }

    pub fn x(&self) -> ArrayView2<'_, F> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView2<'_, F> {
        self.y.view()
    }

    /// Returns the `index`-th sample as an `(input, target)` pair.
    ///
    /// # Returns
    /// An `IndexOutOfRange` error if `index` is not lower than `len`.
    pub fn sample(&self, index: usize) -> Result<(ArrayView1<'_, F>, ArrayView1<'_, F>)> {
        check_index("sample", index, self.len())?;
        Ok((self.x.row(index), self.y.row(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_keeps_samples_in_order() {
        let x = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let y = vec![vec![5.0], vec![6.0]];
        let dataset = Dataset::<f64>::from_rows(&x, &y).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.x_size(), 2);
        assert_eq!(dataset.y_size(), 1);

        let (x1, y1) = dataset.sample(1).unwrap();
        assert_eq!(x1.to_vec(), [3.0, 4.0]);
        assert_eq!(y1.to_vec(), [6.0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let x = vec![vec![1.0, 2.0], vec![3.0]];
        let y = vec![vec![5.0], vec![6.0]];

        assert!(matches!(
            Dataset::<f64>::from_rows(&x, &y),
            Err(OptErr::DimensionMismatch { got: 1, expected: 2, .. })
        ));
    }

    #[test]
    fn different_amount_of_targets_is_rejected() {
        let x = vec![vec![1.0], vec![2.0]];
        let y = vec![vec![5.0]];

        assert!(matches!(
            Dataset::<f32>::from_rows(&x, &y),
            Err(OptErr::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn from_flat_splits_inputs_and_targets() {
        let data = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0];
        let dataset = Dataset::<f32>::from_flat(data, 2, 1).unwrap();

        assert_eq!(dataset.len(), 4);
        let (x, y) = dataset.sample(2).unwrap();
        assert_eq!(x.to_vec(), [1.0, 0.0]);
        assert_eq!(y.to_vec(), [1.0]);
    }

    #[test]
    fn from_flat_with_a_partial_sample_fails() {
        let data = vec![0.0, 1.0, 2.0, 3.0];
        assert!(Dataset::<f64>::from_flat(data, 2, 1).is_err());
    }

    #[test]
    fn out_of_range_sample() {
        let dataset = Dataset::<f64>::from_rows(&[vec![1.0]], &[vec![2.0]]).unwrap();

        assert!(matches!(
            dataset.sample(1),
            Err(OptErr::IndexOutOfRange { index: 1, len: 1, .. })
        ));
    }
}
