use std::{cell::RefCell, rc::Rc};

use rand::{SeedableRng, rngs::StdRng};

use super::{Train, Trainer, TrainerConfig};
use crate::{
    Scalar,
    arch::{
        Model, Shape,
        activations::ActFn,
        loss::{LossEvaluator, LossKernel},
        models::Dense,
    },
    dataset::Dataset,
    error::Result,
    initialization::{ChainedParamGen, ConstParamGen, ParamGen, RandParamGen},
    optimization::{
        Adam, FullBatch, GradientDescent, GradientDescentWithMomentum, NAdam, NAdamConfig,
        Optimizer, StochasticGradient, StochasticLoss, Tolerance, UpdateRule,
    },
    specs::{ActFnSpec, InitSpec, LossSpec, ModelSpec, OptimizerSpec, SourceSpec, TrainerSpec},
};

/// Builds models and `Trainer`s given a specification.
#[derive(Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new model following a spec, drawing its initial parameters.
    ///
    /// # Arguments
    /// * `spec` - The specification of the model.
    /// * `seed` - An optional seed for the initialization.
    ///
    /// # Returns
    /// A `Distribution` error if the initialization is invalid, or an `InvalidConfiguration`
    /// one if the model would have no parameters.
    pub fn build_model<F: Scalar>(
        &self,
        spec: &ModelSpec,
        seed: Option<u64>,
    ) -> Result<Dense<F>> {
        match *spec {
            ModelSpec::Dense {
                input_width,
                output_width,
                bias,
                act_fn,
                init,
            } => {
                let shape = Shape::new(input_width, output_width);
                let size = Dense::<F>::size(shape, bias);
                let bias_len = size - input_width * output_width;

                let rng = Rc::new(RefCell::new(self.generate_rng(seed)));
                let weights = self.resolve_init(init, rng, shape)?;
                let biases: Box<dyn ParamGen<F>> =
                    Box::new(ConstParamGen::new(F::zero(), bias_len));
                let mut param_gen = ChainedParamGen::new(vec![weights, biases]);

                let params = param_gen.sample(size).unwrap_or_default();
                Dense::new(shape, bias, act_fn.map(|spec| self.resolve_act_fn(spec)), params)
            }
        }
    }

    /// Builds a new boxed trainer following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the trainer.
    /// * `model` - The model to train, borrowed for as long as the trainer lives.
    /// * `dataset` - The samples the model is fitted to.
    pub fn build<'a, F, M>(
        &self,
        spec: &TrainerSpec,
        model: &'a mut M,
        dataset: &'a Dataset<F>,
    ) -> Result<Box<dyn Train<F> + 'a>>
    where
        F: Scalar,
        M: Model<F> + 'a,
    {
        let kernel = self.resolve_loss(spec.loss);
        let evaluator = LossEvaluator::new(model, dataset, kernel)?;

        match spec.source {
            SourceSpec::Stochastic { batch_size } => {
                let rng = self.generate_rng(spec.seed);
                let source = StochasticLoss::new(evaluator, rng).with_batch_size(batch_size);
                self.resolve_optimizer(spec, source)
            }
            SourceSpec::FullBatch => self.resolve_optimizer(spec, FullBatch::new(evaluator)),
        }
    }

    fn resolve_act_fn<F: Scalar>(&self, spec: ActFnSpec) -> ActFn<F> {
        match spec {
            ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(F::cast(amp)),
            ActFnSpec::Tanh => ActFn::tanh(),
        }
    }

    fn resolve_init<F: Scalar>(
        &self,
        spec: InitSpec,
        rng: Rc<RefCell<StdRng>>,
        shape: Shape,
    ) -> Result<Box<dyn ParamGen<F>>> {
        let limit = shape.input * shape.output;

        let param_gen: Box<dyn ParamGen<F>> = match spec {
            InitSpec::Const { value } => Box::new(ConstParamGen::new(F::cast(value), limit)),
            InitSpec::Uniform { low, high } => {
                Box::new(RandParamGen::<F, _, _>::uniform(rng, limit, low, high)?)
            }
            InitSpec::Normal { mean, std_dev } => {
                Box::new(RandParamGen::<F, _, _>::normal(rng, limit, mean, std_dev)?)
            }
            InitSpec::XavierUniform => Box::new(RandParamGen::<F, _, _>::xavier_uniform(
                rng,
                limit,
                shape.input,
                shape.output,
            )?),
            InitSpec::Lecun => Box::new(RandParamGen::<F, _, _>::lecun(rng, limit, shape.input)?),
        };

        Ok(param_gen)
    }

    fn resolve_loss<F: Scalar>(&self, spec: LossSpec) -> LossKernel<F> {
        match spec {
            LossSpec::SquaredError => LossKernel::squared_error(),
            LossSpec::LogCosh => LossKernel::log_cosh(),
        }
    }

    fn resolve_optimizer<'a, F, G>(
        &self,
        spec: &TrainerSpec,
        source: G,
    ) -> Result<Box<dyn Train<F> + 'a>>
    where
        F: Scalar,
        G: StochasticGradient<Float = F> + 'a,
    {
        let dim = source.dim();

        match spec.optimizer {
            OptimizerSpec::GradientDescent { learning_rate } => {
                let rule = GradientDescent::new(F::cast(learning_rate))?;
                self.terminate_build(spec, source, rule)
            }
            OptimizerSpec::Momentum {
                learning_rate,
                momentum,
            } => {
                let rule = GradientDescentWithMomentum::new(
                    dim,
                    F::cast(learning_rate),
                    F::cast(momentum),
                )?;
                self.terminate_build(spec, source, rule)
            }
            OptimizerSpec::Adam {
                learning_rate,
                beta1,
                beta2,
                epsilon,
            } => {
                let rule = Adam::new(
                    dim,
                    F::cast(learning_rate),
                    F::cast(beta1),
                    F::cast(beta2),
                    F::cast(epsilon),
                )?;
                self.terminate_build(spec, source, rule)
            }
            OptimizerSpec::Nadam {
                decay_rate_moment,
                decay_rate_variance,
                epsilon,
                learning_rate,
                bias_correction,
            } => {
                let config = NAdamConfig {
                    decay_rate_moment: F::cast(decay_rate_moment),
                    decay_rate_variance: F::cast(decay_rate_variance),
                    epsilon: F::cast(epsilon),
                    learning_rate: F::cast(learning_rate),
                    bias_correction,
                };
                let rule = NAdam::new(dim, config)?;
                self.terminate_build(spec, source, rule)
            }
        }
    }

    fn terminate_build<'a, F, G, U>(
        &self,
        spec: &TrainerSpec,
        source: G,
        rule: U,
    ) -> Result<Box<dyn Train<F> + 'a>>
    where
        F: Scalar,
        G: StochasticGradient<Float = F> + 'a,
        U: UpdateRule<F> + 'a,
    {
        let config = TrainerConfig {
            max_iters: spec.max_iters,
            tolerance: Tolerance::new(
                F::cast(spec.tolerance.absolute),
                F::cast(spec.tolerance.relative),
            ),
            log_every: spec.log_every,
        };

        let optimizer = Optimizer::new(source, rule)?;
        Ok(Box::new(Trainer::new(optimizer, config)?))
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
