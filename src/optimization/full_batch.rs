use super::StochasticGradient;
use crate::{
    Scalar,
    arch::{Model, loss::LossEvaluator},
    error::{Result, check_index},
};

/// Uses the whole dataset as the point of every iteration, turning any update rule into its
/// deterministic batch version.
pub struct FullBatch<'a, F, M> {
    evaluator: LossEvaluator<'a, F, M>,
    dq_dw: F,
}

impl<'a, F, M> FullBatch<'a, F, M>
where
    F: Scalar,
    M: Model<F>,
{
    pub fn new(evaluator: LossEvaluator<'a, F, M>) -> Self {
        Self {
            evaluator,
            dq_dw: F::zero(),
        }
    }

    pub fn evaluator(&self) -> &LossEvaluator<'a, F, M> {
        &self.evaluator
    }
}

impl<F, M> StochasticGradient for FullBatch<'_, F, M>
where
    F: Scalar,
    M: Model<F>,
{
    type Float = F;

    fn dim(&self) -> usize {
        self.evaluator.dim()
    }

    fn random_point(&mut self) -> Result<()> {
        self.evaluator.average_gradient()?;
        Ok(())
    }

    fn grad(&mut self, i: usize) -> Result<F> {
        check_index("parameter", i, self.dim())?;
        self.dq_dw = self.evaluator.gradient()[i];
        Ok(self.dq_dw)
    }

    fn dq_dw(&self) -> F {
        self.dq_dw
    }

    fn params(&self) -> &[F] {
        self.evaluator.model().params()
    }

    fn params_mut(&mut self) -> &mut [F] {
        self.evaluator.model_mut().params_mut()
    }

    fn objective(&mut self) -> Result<F> {
        self.evaluator.dataset_loss()
    }
}
