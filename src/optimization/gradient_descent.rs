use super::{UpdateRule, update_rule::check_learning_rate};
use crate::{Scalar, error::Result};

/// Gradient descent: a step in the opposite direction of the gradient, scaled by the
/// learning rate.
#[derive(Debug, Clone)]
pub struct GradientDescent<F> {
    learning_rate: F,
}

impl<F: Scalar> GradientDescent<F> {
    /// Creates a new `GradientDescent` rule.
    ///
    /// # Arguments
    /// * `learning_rate` - The small coefficient that modulates the length of every step.
    ///
    /// # Returns
    /// An `InvalidConfiguration` error if the learning rate is not positive.
    pub fn new(learning_rate: F) -> Result<Self> {
        check_learning_rate(learning_rate)?;
        Ok(Self { learning_rate })
    }
}

impl<F: Scalar> UpdateRule<F> for GradientDescent<F> {
    fn dim(&self) -> Option<usize> {
        None
    }

    fn begin(&mut self) {}

    fn step(&mut self, _i: usize, g: F) -> F {
        self.learning_rate * g
    }
}
