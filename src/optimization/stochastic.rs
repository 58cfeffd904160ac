use std::{mem, num::NonZeroUsize};

use log::trace;
use rand::Rng;

use super::StochasticGradient;
use crate::{
    Scalar,
    arch::{Model, loss::LossEvaluator},
    error::{Result, check_index},
};

/// Samples the gradient at uniformly drawn dataset samples.
///
/// Every `random_point` call draws `batch_size` sample indices with replacement and computes
/// the mean gradient over them at the current parameters.
pub struct StochasticLoss<'a, F, M, R> {
    evaluator: LossEvaluator<'a, F, M>,
    rng: R,
    batch_size: NonZeroUsize,
    batch: Vec<usize>,
    point_grad: Vec<F>,
    dq_dw: F,
}

impl<'a, F, M, R> StochasticLoss<'a, F, M, R>
where
    F: Scalar,
    M: Model<F>,
    R: Rng,
{
    /// Creates a new `StochasticLoss` that selects a single sample per iteration.
    ///
    /// # Arguments
    /// * `evaluator` - The evaluator of the model's loss over the dataset.
    /// * `rng` - A random number generator.
    pub fn new(evaluator: LossEvaluator<'a, F, M>, rng: R) -> Self {
        let dim = evaluator.dim();

        Self {
            evaluator,
            rng,
            batch_size: NonZeroUsize::MIN,
            batch: Vec::with_capacity(1),
            point_grad: vec![F::zero(); dim],
            dq_dw: F::zero(),
        }
    }

    /// Sets the amount of samples drawn per iteration.
    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self.batch = Vec::with_capacity(batch_size.get());
        self
    }

    /// Returns the indices of the samples selected by the last `random_point` call.
    pub fn batch(&self) -> &[usize] {
        &self.batch
    }

    pub fn evaluator(&self) -> &LossEvaluator<'a, F, M> {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut LossEvaluator<'a, F, M> {
        &mut self.evaluator
    }
}

impl<F, M, R> StochasticGradient for StochasticLoss<'_, F, M, R>
where
    F: Scalar,
    M: Model<F>,
    R: Rng,
{
    type Float = F;

    fn dim(&self) -> usize {
        self.evaluator.dim()
    }

    fn random_point(&mut self) -> Result<()> {
        let len = self.evaluator.dataset().len();
        let batch_size = self.batch_size.get();

        self.batch.clear();
        self.batch.extend((0..batch_size).map(|_| self.rng.random_range(0..len)));
        trace!("selected samples {:?}", self.batch);

        let scale = F::one() / F::cast(batch_size as f64);
        let mut grad = mem::take(&mut self.point_grad);
        grad.fill(F::zero());

        let ret = self
            .batch
            .iter()
            .try_for_each(|&index| self.evaluator.sample_gradient(index, scale, &mut grad));

        self.point_grad = grad;
        ret
    }

    fn grad(&mut self, i: usize) -> Result<F> {
        check_index("parameter", i, self.dim())?;
        self.dq_dw = self.point_grad[i];
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

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        arch::{Shape, loss::LossKernel, models::Dense},
        dataset::Dataset,
        error::OptErr,
    };

    #[test]
    fn single_sample_gradient() {
        let mut model = Dense::new(Shape::new(1, 1), false, None, vec![0.0]).unwrap();
        let dataset = Dataset::from_rows(&[vec![1.0]], &[vec![2.0]]).unwrap();
        let evaluator =
            LossEvaluator::new(&mut model, &dataset, LossKernel::squared_error()).unwrap();
        let mut source = StochasticLoss::new(evaluator, StdRng::seed_from_u64(0));

        source.random_point().unwrap();
        assert_eq!(source.batch(), [0]);
        assert_eq!(source.grad(0).unwrap(), -4.0);
        assert_eq!(source.dq_dw(), -4.0);
    }

    #[test]
    fn batches_are_drawn_from_the_dataset() {
        let x: Vec<_> = (0..10).map(|i| vec![i as f64]).collect();
        let y: Vec<_> = (0..10).map(|i| vec![2.0 * i as f64]).collect();
        let dataset = Dataset::from_rows(&x, &y).unwrap();
        let mut model = Dense::new(Shape::new(1, 1), true, None, vec![0.0, 0.0]).unwrap();
        let evaluator =
            LossEvaluator::new(&mut model, &dataset, LossKernel::squared_error()).unwrap();

        let batch_size = NonZeroUsize::new(4).unwrap();
        let mut source =
            StochasticLoss::new(evaluator, StdRng::seed_from_u64(3)).with_batch_size(batch_size);

        for _ in 0..20 {
            source.random_point().unwrap();
            assert_eq!(source.batch().len(), 4);
            assert!(source.batch().iter().all(|&i| i < 10));
        }
    }

    #[test]
    fn batch_gradient_is_the_mean_over_the_batch() {
        let dataset =
            Dataset::from_rows(&[vec![1.0], vec![3.0]], &[vec![0.0], vec![0.0]]).unwrap();
        let mut model = Dense::new(Shape::new(1, 1), false, None, vec![1.0]).unwrap();
        let evaluator =
            LossEvaluator::new(&mut model, &dataset, LossKernel::squared_error()).unwrap();

        let batch_size = NonZeroUsize::new(3).unwrap();
        let mut source =
            StochasticLoss::new(evaluator, StdRng::seed_from_u64(11)).with_batch_size(batch_size);
        source.random_point().unwrap();

        // dQ/dw at x is 2 * x * x.
        let expected = source
            .batch()
            .iter()
            .map(|&i| if i == 0 { 2.0 } else { 18.0 })
            .sum::<f64>()
            / 3.0;

        assert_relative_eq!(source.grad(0).unwrap(), expected, max_relative = 1e-12);
    }

    #[test]
    fn grad_is_bounds_checked() {
        let mut model = Dense::new(Shape::new(1, 1), false, None, vec![0.0]).unwrap();
        let dataset = Dataset::from_rows(&[vec![1.0]], &[vec![2.0]]).unwrap();
        let evaluator =
            LossEvaluator::new(&mut model, &dataset, LossKernel::squared_error()).unwrap();
        let mut source = StochasticLoss::new(evaluator, StdRng::seed_from_u64(0));

        assert!(matches!(
            source.grad(1),
            Err(OptErr::IndexOutOfRange { index: 1, len: 1, .. })
        ));
    }
}
