use std::mem;

use log::trace;
use ndarray::ArrayView1;

use super::LossKernel;
use crate::{
    Scalar,
    arch::Model,
    dataset::Dataset,
    error::{OptErr, Result, check_dim},
};

/// Evaluates the mean loss of a model over a dataset and its gradient with respect to the
/// model's parameters.
///
/// The evaluator borrows both the model and the dataset, so neither can outlive it nor be
/// handed to another evaluator while it's alive.
pub struct LossEvaluator<'a, F, M> {
    model: &'a mut M,
    dataset: &'a Dataset<F>,
    kernel: LossKernel<F>,
    data_size: usize,
    output_width: usize,
    dim: usize,

    grad: Vec<F>,
    target: Vec<F>,
    dq_ds: Vec<F>,
}

impl<'a, F, M> LossEvaluator<'a, F, M>
where
    F: Scalar,
    M: Model<F>,
{
    /// Creates a new `LossEvaluator`.
    ///
    /// # Arguments
    /// * `model` - The model whose parameters are being evaluated.
    /// * `dataset` - The samples and targets the loss is measured on.
    /// * `kernel` - The per component loss and its derivative.
    ///
    /// # Returns
    /// An `InvalidConfiguration` error if the dataset is empty, or a `DimensionMismatch` if
    /// the dataset widths don't match the model's shape.
    pub fn new(model: &'a mut M, dataset: &'a Dataset<F>, kernel: LossKernel<F>) -> Result<Self> {
        if dataset.is_empty() {
            return Err(OptErr::InvalidConfiguration("the dataset is empty"));
        }

        let shape = model.shape();
        check_dim("dataset input width", dataset.x_size(), shape.input)?;
        check_dim("dataset target width", dataset.y_size(), shape.output)?;

        let dim = model.dim();

        Ok(Self {
            model,
            dataset,
            kernel,
            data_size: dataset.len(),
            output_width: shape.output,
            dim,
            grad: vec![F::zero(); dim],
            target: vec![F::zero(); shape.output],
            dq_ds: vec![F::zero(); shape.output],
        })
    }

    pub fn model(&self) -> &M {
        &*self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut *self.model
    }

    pub fn dataset(&self) -> &'a Dataset<F> {
        self.dataset
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the gradient accumulated so far.
    pub fn gradient(&self) -> &[F] {
        &self.grad
    }

    /// Sets the accumulated gradient to zero.
    pub fn reset(&mut self) {
        self.grad.fill(F::zero());
    }

    /// Computes the mean loss over the output components of the model's last signal.
    ///
    /// # Arguments
    /// * `target` - The expected output, one value per output component.
    pub fn loss(&self, target: ArrayView1<F>) -> Result<F> {
        check_dim("target", target.len(), self.output_width)?;

        let total = self
            .model
            .signal()
            .iter()
            .zip(target.iter())
            .fold(F::zero(), |acc, (&s, &t)| acc + self.kernel.q(s, t));

        Ok(total / F::cast(self.output_width as f64))
    }

    /// Computes the mean loss over the whole dataset at the current parameters.
    pub fn dataset_loss(&mut self) -> Result<F> {
        let dataset = self.dataset;
        let mut total = F::zero();

        for index in 0..self.data_size {
            let (x, y) = dataset.sample(index)?;
            self.model.set_input(x)?;
            self.model.evaluate()?;
            total += self.loss(y)?;
        }

        Ok(total / F::cast(self.data_size as f64))
    }

    /// Computes the dataset mean gradient of the loss, overwriting the accumulated one.
    ///
    /// # Returns
    /// The gradient, one value per parameter.
    pub fn average_gradient(&mut self) -> Result<&[F]> {
        self.reset();
        self.accumulate_gradient()
    }

    /// Adds the dataset mean gradient of the loss to the accumulated one without resetting it.
    pub fn accumulate_gradient(&mut self) -> Result<&[F]> {
        trace!(samples = self.data_size; "full dataset gradient pass");

        let scale = F::one() / F::cast(self.data_size as f64);
        let mut grad = mem::take(&mut self.grad);
        let ret = (0..self.data_size)
            .try_for_each(|index| self.sample_gradient(index, scale, &mut grad));
        self.grad = grad;

        ret.map(|_| self.gradient())
    }

    /// Adds `scale` times the gradient of the loss at a single sample into `out`.
    ///
    /// # Arguments
    /// * `index` - The sample's index in the dataset.
    /// * `scale` - The weight of this sample's contribution.
    /// * `out` - The buffer to accumulate into, one value per parameter.
    pub fn sample_gradient(&mut self, index: usize, scale: F, out: &mut [F]) -> Result<()> {
        check_dim("gradient buffer", out.len(), self.dim())?;

        let dataset = self.dataset;
        let (x, y) = dataset.sample(index)?;

        for (t, &y) in self.target.iter_mut().zip(y.iter()) {
            *t = y;
        }

        self.model.set_input(x)?;
        self.model.evaluate()?;

        // dQ/ds does not depend on the parameter, only ds/dw does.
        let n = F::cast(self.output_width as f64);
        let signal = self.model.signal();
        for ((d, &s), &t) in self.dq_ds.iter_mut().zip(signal).zip(&self.target) {
            *d = self.kernel.dq_ds(s, t) / n;
        }

        for (i, g) in out.iter_mut().enumerate() {
            self.model.derivative(i)?;

            let dq_dw = self
                .dq_ds
                .iter()
                .zip(self.model.output_derivative())
                .fold(F::zero(), |acc, (&d, &dsdw)| acc + d * dsdw);

            *g += dq_dw * scale;
        }

        Ok(())
    }
}
