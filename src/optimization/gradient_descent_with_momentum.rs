use super::{
    UpdateRule,
    update_rule::{check_decay_rate, check_learning_rate},
};
use crate::{Scalar, error::Result};

/// Gradient descent that keeps a decaying velocity per parameter.
#[derive(Debug, Clone)]
pub struct GradientDescentWithMomentum<F> {
    learning_rate: F,
    momentum: F,
    velocity: Box<[F]>,
}

impl<F: Scalar> GradientDescentWithMomentum<F> {
    /// Creates a new `GradientDescentWithMomentum` rule.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `learning_rate` - The small coefficient that modulates the length of every step.
    /// * `momentum` - How much of the previous velocity survives each iteration.
    ///
    /// # Returns
    /// An `InvalidConfiguration` error if the learning rate is not positive or the momentum
    /// is outside `[0, 1)`.
    pub fn new(len: usize, learning_rate: F, momentum: F) -> Result<Self> {
        check_learning_rate(learning_rate)?;
        check_decay_rate(momentum, "the momentum must be in [0, 1)")?;

        Ok(Self {
            learning_rate,
            momentum,
            velocity: vec![F::zero(); len].into_boxed_slice(),
        })
    }

    pub fn velocity(&self) -> &[F] {
        &self.velocity
    }
}

impl<F: Scalar> UpdateRule<F> for GradientDescentWithMomentum<F> {
    fn dim(&self) -> Option<usize> {
        Some(self.velocity.len())
    }

    fn begin(&mut self) {}

    fn step(&mut self, i: usize, g: F) -> F {
        let v = &mut self.velocity[i];
        *v = self.momentum * *v + g;
        self.learning_rate * *v
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::OptErr;

    #[test]
    fn velocity_builds_up_under_a_constant_gradient() {
        let mut rule = GradientDescentWithMomentum::new(1, 0.1, 0.5).unwrap();

        rule.begin();
        assert_eq!(rule.step(0, 1.0), 0.1);
        rule.begin();
        assert_relative_eq!(rule.step(0, 1.0), 0.15);
        assert_eq!(rule.velocity(), [1.5]);
    }

    #[test]
    fn out_of_range_hyperparameters_are_rejected() {
        for (learning_rate, momentum) in [(0.0, 0.5), (0.1, 1.0), (0.1, -0.2), (0.1, f64::NAN)] {
            assert!(matches!(
                GradientDescentWithMomentum::new(2, learning_rate, momentum),
                Err(OptErr::InvalidConfiguration(_))
            ));
        }
    }
}
