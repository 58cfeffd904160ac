use log::trace;

use super::{NAdam, StochasticGradient, Tolerance, UpdateRule};
use crate::{
    Scalar,
    error::{OptErr, Result},
};

/// A stochastic optimizer: drives an `UpdateRule` with the gradients of a
/// `StochasticGradient` source, updating the model's parameters in place.
pub struct Optimizer<G, U> {
    source: G,
    rule: U,
}

/// Stochastic gradient descent with the NAdam update rule.
pub type NAdamSgd<G> = Optimizer<G, NAdam<<G as StochasticGradient>::Float>>;

impl<F, G, U> Optimizer<G, U>
where
    F: Scalar,
    G: StochasticGradient<Float = F>,
    U: UpdateRule<F>,
{
    /// Creates a new `Optimizer`.
    ///
    /// # Arguments
    /// * `source` - Where the gradients come from.
    /// * `rule` - How the parameters move given their gradient.
    ///
    /// # Returns
    /// An `InvalidConfiguration` error if the model has no parameters, or a
    /// `DimensionMismatch` if the rule keeps state for a different amount of parameters.
    pub fn new(source: G, rule: U) -> Result<Self> {
        let dim = source.dim();
        if dim == 0 {
            return Err(OptErr::InvalidConfiguration(
                "cannot optimize a model without parameters",
            ));
        }

        if let Some(rule_dim) = rule.dim() {
            if rule_dim != dim {
                return Err(OptErr::DimensionMismatch {
                    what: "update rule state",
                    got: rule_dim,
                    expected: dim,
                });
            }
        }

        Ok(Self { source, rule })
    }

    pub fn source(&self) -> &G {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut G {
        &mut self.source
    }

    pub fn rule(&self) -> &U {
        &self.rule
    }

    pub fn params(&self) -> &[F] {
        self.source.params()
    }

    pub fn into_parts(self) -> (G, U) {
        (self.source, self.rule)
    }

    /// Performs one iteration: selects a new point, then steps every parameter.
    ///
    /// # Arguments
    /// * `tolerance` - The band the steps are normalized by.
    ///
    /// # Returns
    /// The root mean square of the normalized steps. A value lower than one means every
    /// parameter moved less than its tolerance on average, callers usually stop there.
    pub fn update(&mut self, tolerance: Tolerance<F>) -> Result<F> {
        tolerance.validate()?;

        self.source.random_point()?;
        self.rule.begin();

        let dim = self.source.dim();
        let mut sum = F::zero();

        for i in 0..dim {
            let g = self.source.grad(i)?;
            let dw = self.rule.step(i, g);

            let w = &mut self.source.params_mut()[i];
            *w -= dw;

            let normalized = dw / tolerance.band(*w);
            sum += normalized * normalized;
        }

        let statistic = (sum / F::cast(dim as f64)).sqrt();
        trace!("update statistic {statistic:e}");
        Ok(statistic)
    }
}
