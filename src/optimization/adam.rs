use super::{
    UpdateRule,
    update_rule::{check_decay_rate, check_epsilon, check_learning_rate},
};
use crate::{Scalar, error::Result};

/// The Adam update rule, with the conventional `beta^t` bias correction.
#[derive(Debug, Clone)]
pub struct Adam<F> {
    learning_rate: F,
    beta1: F,
    beta2: F,
    beta1_t: F,
    beta2_t: F,
    step_size: F,
    m: Box<[F]>,
    v: Box<[F]>,
    epsilon: F,
}

impl<F: Scalar> Adam<F> {
    /// Creates a new `Adam` rule.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `learning_rate` - The small coefficient that modulates the length of every step.
    /// * `beta1`, `beta2`, `epsilon` - Hyperparameters to the optimization algorithm.
    ///
    /// # Returns
    /// An `InvalidConfiguration` error if a beta is outside `[0, 1)` or the learning rate or
    /// epsilon are not positive.
    pub fn new(len: usize, learning_rate: F, beta1: F, beta2: F, epsilon: F) -> Result<Self> {
        check_learning_rate(learning_rate)?;
        check_decay_rate(beta1, "beta1 must be in [0, 1)")?;
        check_decay_rate(beta2, "beta2 must be in [0, 1)")?;
        check_epsilon(epsilon)?;

        Ok(Self {
            learning_rate,
            beta1,
            beta2,
            beta1_t: F::one(),
            beta2_t: F::one(),
            step_size: F::zero(),
            m: vec![F::zero(); len].into_boxed_slice(),
            v: vec![F::zero(); len].into_boxed_slice(),
            epsilon,
        })
    }
}

impl<F: Scalar> UpdateRule<F> for Adam<F> {
    fn dim(&self) -> Option<usize> {
        Some(self.m.len())
    }

    fn begin(&mut self) {
        self.beta1_t *= self.beta1;
        self.beta2_t *= self.beta2;

        let bc1 = F::one() - self.beta1_t;
        let bc2 = F::one() - self.beta2_t;
        self.step_size = self.learning_rate * (bc2.sqrt() / bc1);
    }

    fn step(&mut self, i: usize, g: F) -> F {
        let Self {
            beta1: b1,
            beta2: b2,
            epsilon: eps,
            ..
        } = *self;
        let one = F::one();

        let m = &mut self.m[i];
        *m = b1 * *m + (one - b1) * g;
        let v = &mut self.v[i];
        *v = b2 * *v + (one - b2) * g * g;

        self.step_size * self.m[i] / (self.v[i].sqrt() + eps)
    }
}
