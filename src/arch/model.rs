use ndarray::ArrayView1;

use crate::{
    Scalar,
    error::{OptErr, Result, check_index},
};

/// The input and output widths of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub input: usize,
    pub output: usize,
}

impl Shape {
    pub fn new(input: usize, output: usize) -> Self {
        Self { input, output }
    }
}

/// The buffers every model owns: its parameters, the current input, the last output signal
/// and the derivative of that signal with respect to the last requested parameter.
#[derive(Debug, Clone)]
pub struct ModelState<F> {
    shape: Shape,
    params: Vec<F>,
    input: Vec<F>,
    signal: Vec<F>,
    dsdw: Vec<F>,
}

impl<F: Scalar> ModelState<F> {
    /// Creates a new `ModelState`.
    ///
    /// # Arguments
    /// * `shape` - The input and output widths.
    /// * `params` - The initial parameters, it's length is the model's dimension.
    ///
    /// # Returns
    /// An `InvalidConfiguration` error if there are no parameters or any of the widths is zero.
    pub fn new(shape: Shape, params: Vec<F>) -> Result<Self> {
        if params.is_empty() {
            return Err(OptErr::InvalidConfiguration("a model needs at least one parameter"));
        }

        if shape.input == 0 || shape.output == 0 {
            return Err(OptErr::InvalidConfiguration(
                "model input and output widths must be positive",
            ));
        }

        Ok(Self {
            shape,
            params,
            input: vec![F::zero(); shape.input],
            signal: vec![F::zero(); shape.output],
            dsdw: vec![F::zero(); shape.output],
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn dim(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[F] {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut [F] {
        &mut self.params
    }

    pub fn input(&self) -> &[F] {
        &self.input
    }

    pub fn signal(&self) -> &[F] {
        &self.signal
    }

    pub fn signal_mut(&mut self) -> &mut [F] {
        &mut self.signal
    }

    pub fn output_derivative(&self) -> &[F] {
        &self.dsdw
    }

    pub fn output_derivative_mut(&mut self) -> &mut [F] {
        &mut self.dsdw
    }

    /// Copies the first `shape.input` values of `x` into the input buffer.
    pub fn set_input(&mut self, x: ArrayView1<F>) -> Result<()> {
        if x.len() < self.shape.input {
            return Err(OptErr::DimensionMismatch {
                what: "model input",
                got: x.len(),
                expected: self.shape.input,
            });
        }

        for (dst, &src) in self.input.iter_mut().zip(x.iter()) {
            *dst = src;
        }

        Ok(())
    }
}

/// A differentiable model.
///
/// Implementors own a `ModelState` and must provide both the forward evaluation and the
/// derivative of the output signal with respect to a single parameter; there are no default
/// implementations for either.
pub trait Model<F: Scalar> {
    fn state(&self) -> &ModelState<F>;

    fn state_mut(&mut self) -> &mut ModelState<F>;

    /// Computes the output signal from the current input and parameters.
    fn evaluate(&mut self) -> Result<()>;

    /// Computes the derivative of the output signal with respect to the `i`-th parameter and
    /// writes it to the output derivative buffer.
    ///
    /// Implementors may assume `i < dim` and that `evaluate` was called for the current input.
    fn compute_derivative(&mut self, i: usize) -> Result<()>;

    /// Bounds checked version of `compute_derivative`.
    ///
    /// # Returns
    /// An `IndexOutOfRange` error if `i` is not lower than the model's dimension.
    fn derivative(&mut self, i: usize) -> Result<()> {
        check_index("parameter", i, self.dim())?;
        self.compute_derivative(i)
    }

    fn set_input(&mut self, x: ArrayView1<F>) -> Result<()> {
        self.state_mut().set_input(x)
    }

    fn shape(&self) -> Shape {
        self.state().shape()
    }

    /// Returns the amount of parameters of the model.
    fn dim(&self) -> usize {
        self.state().dim()
    }

    fn params(&self) -> &[F] {
        self.state().params()
    }

    fn params_mut(&mut self) -> &mut [F] {
        self.state_mut().params_mut()
    }

    fn signal(&self) -> &[F] {
        self.state().signal()
    }

    fn output_derivative(&self) -> &[F] {
        self.state().output_derivative()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn empty_parameters_are_rejected() {
        assert!(matches!(
            ModelState::<f64>::new(Shape::new(1, 1), vec![]),
            Err(OptErr::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn zero_widths_are_rejected() {
        assert!(ModelState::<f64>::new(Shape::new(0, 1), vec![1.0]).is_err());
        assert!(ModelState::<f64>::new(Shape::new(1, 0), vec![1.0]).is_err());
    }

    #[test]
    fn buffers_follow_the_shape() {
        let state = ModelState::<f32>::new(Shape::new(3, 2), vec![0.0; 8]).unwrap();

        assert_eq!(state.dim(), 8);
        assert_eq!(state.input().len(), 3);
        assert_eq!(state.signal().len(), 2);
        assert_eq!(state.output_derivative().len(), 2);
    }

    #[test]
    fn set_input_copies_only_the_input_width() {
        let mut state = ModelState::<f64>::new(Shape::new(2, 1), vec![0.0]).unwrap();
        state.set_input(array![1.0, 2.0, 3.0].view()).unwrap();
        assert_eq!(state.input(), [1.0, 2.0]);
    }

    #[test]
    fn set_input_with_a_short_sample_fails() {
        let mut state = ModelState::<f64>::new(Shape::new(2, 1), vec![0.0]).unwrap();

        assert!(matches!(
            state.set_input(array![1.0].view()),
            Err(OptErr::DimensionMismatch { got: 1, expected: 2, .. })
        ));
    }
}
