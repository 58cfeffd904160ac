use crate::{
    Scalar,
    error::{OptErr, Result},
};

/// Defines how a single parameter moves given its gradient component.
pub trait UpdateRule<F: Scalar> {
    /// Returns the amount of parameters this rule keeps state for, `None` if it's stateless.
    fn dim(&self) -> Option<usize>;

    /// Advances the per iteration bookkeeping, called once before the iteration's steps.
    fn begin(&mut self);

    /// Computes the step for the `i`-th parameter, the parameter is then decreased by it.
    ///
    /// # Arguments
    /// * `i` - The index of the parameter.
    /// * `g` - The gradient component of that parameter.
    fn step(&mut self, i: usize, g: F) -> F;
}

pub(crate) fn check_learning_rate<F: Scalar>(learning_rate: F) -> Result<()> {
    if !(learning_rate > F::zero()) {
        return Err(OptErr::InvalidConfiguration("the learning rate must be positive"));
    }

    Ok(())
}

pub(crate) fn check_decay_rate<F: Scalar>(rate: F, what: &'static str) -> Result<()> {
    if !(rate >= F::zero() && rate < F::one()) {
        return Err(OptErr::InvalidConfiguration(what));
    }

    Ok(())
}

pub(crate) fn check_epsilon<F: Scalar>(epsilon: F) -> Result<()> {
    if !(epsilon > F::zero()) {
        return Err(OptErr::InvalidConfiguration("epsilon must be positive"));
    }

    Ok(())
}
