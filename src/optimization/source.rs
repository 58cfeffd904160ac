use crate::{Scalar, error::Result};

/// Where an update rule gets its gradients from.
///
/// Each iteration selects a point (a sample, a subset of samples or the whole dataset) with
/// `random_point` and then queries the gradient at that point one parameter at a time.
pub trait StochasticGradient {
    type Float: Scalar;

    /// Returns the amount of parameters of the underlying model.
    fn dim(&self) -> usize;

    /// Selects the point the following `grad` calls are computed at.
    fn random_point(&mut self) -> Result<()>;

    /// Computes the gradient component of the `i`-th parameter at the selected point.
    ///
    /// # Returns
    /// The component, which is also kept until the next call as `dq_dw`, or an
    /// `IndexOutOfRange` error if `i` is not lower than `dim`.
    fn grad(&mut self, i: usize) -> Result<Self::Float>;

    /// Returns the last gradient component computed by `grad`.
    fn dq_dw(&self) -> Self::Float;

    fn params(&self) -> &[Self::Float];

    fn params_mut(&mut self) -> &mut [Self::Float];

    /// Computes the mean loss over the whole dataset at the current parameters.
    fn objective(&mut self) -> Result<Self::Float>;
}
