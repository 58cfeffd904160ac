use log::{debug, info};

use crate::{
    Scalar,
    error::{OptErr, Result},
    optimization::{Optimizer, StochasticGradient, Tolerance, UpdateRule},
};

/// The stopping rule of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerConfig<F> {
    /// The maximum amount of updates to perform.
    pub max_iters: usize,
    /// The band steps are normalized by, a statistic below one stops the run.
    pub tolerance: Tolerance<F>,
    /// Log the progress every this many iterations, zero disables it.
    pub log_every: usize,
}

impl<F: Scalar> Default for TrainerConfig<F> {
    fn default() -> Self {
        Self {
            max_iters: 10_000,
            tolerance: Tolerance::default(),
            log_every: 0,
        }
    }
}

/// The outcome of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport<F> {
    pub iterations: usize,
    pub converged: bool,
    /// The statistic of the last update.
    pub statistic: F,
    /// The dataset loss at the final parameters.
    pub loss: F,
}

/// Something that can fit a model's parameters.
pub trait Train<F> {
    /// Runs updates until the stopping rule is met.
    fn train(&mut self) -> Result<TrainingReport<F>>;

    /// Returns the model's current parameters.
    fn params(&self) -> &[F];
}

/// Drives an `Optimizer` until its steps become negligible or it runs out of iterations.
pub struct Trainer<G: StochasticGradient, U> {
    optimizer: Optimizer<G, U>,
    config: TrainerConfig<G::Float>,
}

impl<F, G, U> Trainer<G, U>
where
    F: Scalar,
    G: StochasticGradient<Float = F>,
    U: UpdateRule<F>,
{
    /// Creates a new `Trainer`.
    ///
    /// # Arguments
    /// * `optimizer` - The optimizer to drive.
    /// * `config` - When to stop.
    ///
    /// # Returns
    /// An `InvalidConfiguration` error if `max_iters` is zero or the tolerance is invalid.
    pub fn new(optimizer: Optimizer<G, U>, config: TrainerConfig<F>) -> Result<Self> {
        if config.max_iters == 0 {
            return Err(OptErr::InvalidConfiguration("max_iters must be positive"));
        }

        config.tolerance.validate()?;
        Ok(Self { optimizer, config })
    }

    pub fn optimizer(&self) -> &Optimizer<G, U> {
        &self.optimizer
    }

    pub fn into_optimizer(self) -> Optimizer<G, U> {
        self.optimizer
    }
}

impl<F, G, U> Train<F> for Trainer<G, U>
where
    F: Scalar,
    G: StochasticGradient<Float = F>,
    U: UpdateRule<F>,
{
    fn train(&mut self) -> Result<TrainingReport<F>> {
        let TrainerConfig {
            max_iters,
            tolerance,
            log_every,
        } = self.config;

        let one = F::one();
        let mut statistic = F::infinity();
        let mut iterations = 0;

        while iterations < max_iters && !(statistic < one) {
            statistic = self.optimizer.update(tolerance)?;
            iterations += 1;

            if log_every > 0 && iterations % log_every == 0 {
                let loss = self.optimizer.source_mut().objective()?;
                debug!(iteration = iterations; "statistic {statistic:e}, loss {loss:e}");
            }
        }

        let converged = statistic < one;
        let loss = self.optimizer.source_mut().objective()?;
        info!(iterations, converged; "training finished with loss {loss:e}");

        Ok(TrainingReport {
            iterations,
            converged,
            statistic,
            loss,
        })
    }

    fn params(&self) -> &[F] {
        self.optimizer.params()
    }
}
