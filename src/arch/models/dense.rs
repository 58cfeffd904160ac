use ndarray::{ArrayView1, ArrayView2};

use crate::{
    Scalar,
    arch::{Model, ModelState, Shape, activations::ActFn},
    error::{OptErr, Result, check_dim},
};

/// A fully connected unit: `signal = act(Wᵀ·x + b)`.
///
/// The parameters are laid out as the `input x output` weights in row major order followed by
/// the `output` biases, if any.
#[derive(Debug, Clone)]
pub struct Dense<F> {
    state: ModelState<F>,
    bias: bool,
    act_fn: Option<ActFn<F>>,

    // Forward metadata
    z: Vec<F>,
}

impl<F: Scalar> Dense<F> {
    /// Creates a new `Dense` model.
    ///
    /// # Arguments
    /// * `shape` - The input and output widths.
    /// * `bias` - Whether the unit has a bias per output.
    /// * `act_fn` - An optional activation applied to every output.
    /// * `params` - The initial parameters, must have exactly `Dense::size(shape, bias)` values.
    pub fn new(
        shape: Shape,
        bias: bool,
        act_fn: Option<ActFn<F>>,
        params: Vec<F>,
    ) -> Result<Self> {
        check_dim("dense parameters", params.len(), Self::size(shape, bias))?;

        Ok(Self {
            state: ModelState::new(shape, params)?,
            bias,
            act_fn,
            z: vec![F::zero(); shape.output],
        })
    }

    /// Returns the amount of parameters a `Dense` model of the given shape has.
    pub fn size(shape: Shape, bias: bool) -> usize {
        let biases = if bias { shape.output } else { 0 };
        shape.input * shape.output + biases
    }

    fn weights_len(&self) -> usize {
        let Shape { input, output } = self.state.shape();
        input * output
    }

    fn act_prime(&self, z: F) -> F {
        match &self.act_fn {
            Some(act_fn) => act_fn.df(z),
            None => F::one(),
        }
    }
}

impl<F: Scalar> Model<F> for Dense<F> {
    fn state(&self) -> &ModelState<F> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ModelState<F> {
        &mut self.state
    }

    fn evaluate(&mut self) -> Result<()> {
        let Shape { input, output } = self.state.shape();
        let w_len = self.weights_len();
        let params = self.state.params();

        let w = ArrayView2::from_shape((input, output), &params[..w_len]).map_err(|_| {
            OptErr::DimensionMismatch {
                what: "dense weights",
                got: params.len(),
                expected: w_len,
            }
        })?;

        let x = ArrayView1::from(self.state.input());
        let mut z = x.dot(&w);

        if self.bias {
            z += &ArrayView1::from(&params[w_len..]);
        }

        for (dst, &z) in self.z.iter_mut().zip(z.iter()) {
            *dst = z;
        }

        let act_fn = &self.act_fn;
        for (s, &z) in self.state.signal_mut().iter_mut().zip(&self.z) {
            *s = match act_fn {
                Some(act_fn) => act_fn.f(z),
                None => z,
            };
        }

        Ok(())
    }

    fn compute_derivative(&mut self, i: usize) -> Result<()> {
        let output = self.state.shape().output;
        let w_len = self.weights_len();

        // Only the output fed by the i-th parameter depends on it.
        let (k, value) = if i < w_len {
            let (j, k) = (i / output, i % output);
            (k, self.state.input()[j] * self.act_prime(self.z[k]))
        } else {
            let k = i - w_len;
            (k, self.act_prime(self.z[k]))
        };

        let dsdw = self.state.output_derivative_mut();
        dsdw.fill(F::zero());
        dsdw[k] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn size_accounts_for_biases() {
        assert_eq!(Dense::<f64>::size(Shape::new(3, 2), true), 8);
        assert_eq!(Dense::<f64>::size(Shape::new(3, 2), false), 6);
    }

    #[test]
    fn wrong_amount_of_parameters_is_rejected() {
        let dense = Dense::<f64>::new(Shape::new(2, 1), true, None, vec![1.0, 2.0]);
        assert!(matches!(dense, Err(OptErr::DimensionMismatch { got: 2, expected: 3, .. })));
    }

    #[test]
    fn linear_forward() {
        // w = [[1, 2], [3, 4]], b = [0.5, -0.5]
        let params = vec![1.0, 2.0, 3.0, 4.0, 0.5, -0.5];
        let mut dense = Dense::new(Shape::new(2, 2), true, None, params).unwrap();

        dense.set_input(array![1.0, 1.0].view()).unwrap();
        dense.evaluate().unwrap();

        assert_eq!(dense.signal(), [4.5, 5.5]);
    }

    #[test]
    fn activation_is_applied_to_every_output() {
        // w = [[0, 1]], so z = [0, x].
        let act_fn = Some(ActFn::sigmoid(2.0));
        let mut dense = Dense::new(Shape::new(1, 2), false, act_fn, vec![0.0, 1.0]).unwrap();

        dense.set_input(array![3.0].view()).unwrap();
        dense.evaluate().unwrap();
        assert_relative_eq!(dense.signal()[0], 1.0);
        assert_relative_eq!(dense.signal()[1], 2.0 / (1.0 + (-3.0_f64).exp()));

        dense.set_input(array![-3.0].view()).unwrap();
        dense.evaluate().unwrap();
        assert_relative_eq!(dense.signal()[0], 1.0);
        assert_relative_eq!(dense.signal()[1], 2.0 / (1.0 + 3.0_f64.exp()));
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let params = vec![0.3, -0.2, 0.8, 0.1, 0.5, -0.4, 0.05, 0.2];
        let shape = Shape::new(3, 2);
        let act_fn = Some(ActFn::sigmoid(1.0));
        let x = array![0.7, -1.2, 2.0];
        let h = 1e-6;

        let mut dense = Dense::new(shape, true, act_fn, params.clone()).unwrap();
        dense.set_input(x.view()).unwrap();
        dense.evaluate().unwrap();

        for i in 0..params.len() {
            dense.derivative(i).unwrap();
            let analytic = dense.output_derivative().to_vec();

            let signal_at = |delta: f64| {
                let mut p = params.clone();
                p[i] += delta;
                let mut probe = Dense::new(shape, true, act_fn, p).unwrap();
                probe.set_input(x.view()).unwrap();
                probe.evaluate().unwrap();
                probe.signal().to_vec()
            };

            let plus = signal_at(h);
            let minus = signal_at(-h);

            for r in 0..shape.output {
                let numeric = (plus[r] - minus[r]) / (2.0 * h);
                assert_relative_eq!(analytic[r], numeric, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn derivative_index_is_bounds_checked() {
        let mut dense = Dense::<f64>::new(Shape::new(1, 1), false, None, vec![1.0]).unwrap();

        assert!(matches!(
            dense.derivative(1),
            Err(OptErr::IndexOutOfRange { index: 1, len: 1, .. })
        ));
    }
}
