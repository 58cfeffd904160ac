use serde::{Deserialize, Serialize};

use super::{
    UpdateRule,
    update_rule::{check_decay_rate, check_epsilon, check_learning_rate},
};
use crate::{Scalar, error::Result};

/// How the decay accumulators used for bias correction advance every iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasCorrection {
    /// The accumulators start at one and are multiplied by their decay rate, so at iteration
    /// `t` they hold `rate^t`.
    #[default]
    Power,
    /// The accumulators start at their decay rate and are squared, so at iteration `t` they
    /// hold `rate^(2^t)`. The correction vanishes after a handful of iterations.
    Squaring,
}

/// The hyperparameters of `NAdam`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NAdamConfig<F> {
    pub decay_rate_moment: F,
    pub decay_rate_variance: F,
    pub epsilon: F,
    pub learning_rate: F,
    pub bias_correction: BiasCorrection,
}

impl<F: Scalar> NAdamConfig<F> {
    /// Checks both decay rates lie in `[0, 1)` and that epsilon and the learning rate are
    /// positive.
    pub fn validate(&self) -> Result<()> {
        check_decay_rate(
            self.decay_rate_moment,
            "the moment decay rate must be in [0, 1)",
        )?;
        check_decay_rate(
            self.decay_rate_variance,
            "the variance decay rate must be in [0, 1)",
        )?;
        check_epsilon(self.epsilon)?;
        check_learning_rate(self.learning_rate)
    }
}

impl<F: Scalar> Default for NAdamConfig<F> {
    fn default() -> Self {
        Self {
            decay_rate_moment: F::cast(0.9),
            decay_rate_variance: F::cast(0.999),
            epsilon: F::cast(1e-6),
            learning_rate: F::cast(1e-2),
            bias_correction: BiasCorrection::default(),
        }
    }
}

/// Adam with a Nesterov look ahead on the first moment.
///
/// Keeps a decaying estimate of the gradient and of its square per parameter. Those
/// estimates, together with the two decay accumulators, are the only state that survives
/// between iterations.
#[derive(Debug, Clone)]
pub struct NAdam<F> {
    config: NAdamConfig<F>,
    first_moment: Box<[F]>,
    second_moment: Box<[F]>,
    moment_acc: F,
    variance_acc: F,
}

impl<F: Scalar> NAdam<F> {
    /// Creates a new `NAdam` rule.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `config` - The hyperparameters, fixed for the lifetime of the rule.
    ///
    /// # Returns
    /// An `InvalidConfiguration` error if any hyperparameter is out of range.
    pub fn new(len: usize, config: NAdamConfig<F>) -> Result<Self> {
        config.validate()?;

        let (moment_acc, variance_acc) = match config.bias_correction {
            BiasCorrection::Power => (F::one(), F::one()),
            BiasCorrection::Squaring => (config.decay_rate_moment, config.decay_rate_variance),
        };

        Ok(Self {
            config,
            first_moment: vec![F::zero(); len].into_boxed_slice(),
            second_moment: vec![F::zero(); len].into_boxed_slice(),
            moment_acc,
            variance_acc,
        })
    }

    pub fn config(&self) -> &NAdamConfig<F> {
        &self.config
    }

    pub fn first_moment(&self) -> &[F] {
        &self.first_moment
    }

    pub fn second_moment(&self) -> &[F] {
        &self.second_moment
    }

    /// Returns the current moment and variance decay accumulators.
    pub fn accumulators(&self) -> (F, F) {
        (self.moment_acc, self.variance_acc)
    }
}

impl<F: Scalar> UpdateRule<F> for NAdam<F> {
    fn dim(&self) -> Option<usize> {
        Some(self.first_moment.len())
    }

    fn begin(&mut self) {
        match self.config.bias_correction {
            BiasCorrection::Power => {
                self.moment_acc *= self.config.decay_rate_moment;
                self.variance_acc *= self.config.decay_rate_variance;
            }
            BiasCorrection::Squaring => {
                self.moment_acc *= self.moment_acc;
                self.variance_acc *= self.variance_acc;
            }
        }
    }

    fn step(&mut self, i: usize, g: F) -> F {
        let NAdamConfig {
            decay_rate_moment: bm,
            decay_rate_variance: bv,
            epsilon,
            learning_rate,
            ..
        } = self.config;
        let one = F::one();

        let m = &mut self.first_moment[i];
        *m = bm * *m + (one - bm) * g;
        let m = *m;

        let v = &mut self.second_moment[i];
        *v = bv * *v + (one - bv) * g * g;
        let v = *v;

        let v_hat = v / (one - self.variance_acc);
        let m_hat = (bm * m + (one - bm) * g) / (one - self.moment_acc);

        learning_rate / (v_hat.sqrt() + epsilon) * m_hat
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;
    use crate::error::OptErr;

    #[test]
    fn first_step_on_the_single_weight_scenario() {
        let mut rule = NAdam::<f64>::new(1, NAdamConfig::default()).unwrap();

        rule.begin();
        let dw = rule.step(0, -4.0);

        assert_relative_eq!(rule.first_moment()[0], -0.4, max_relative = 1e-12);
        assert_relative_eq!(rule.second_moment()[0], 0.016, max_relative = 1e-12);
        assert_relative_eq!(-dw, 0.019, max_relative = 1e-5);
    }

    #[test]
    fn zero_gradient_is_a_fixed_point() {
        let mut rule = NAdam::<f64>::new(3, NAdamConfig::default()).unwrap();

        for _ in 0..10 {
            rule.begin();
            for i in 0..3 {
                assert_eq!(rule.step(i, 0.0), 0.0);
            }
        }

        assert_eq!(rule.first_moment(), [0.0; 3]);
        assert_eq!(rule.second_moment(), [0.0; 3]);
    }

    #[test]
    fn moments_stay_within_the_gradient_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut rule = NAdam::<f64>::new(4, NAdamConfig::default()).unwrap();
        let bound = 3.0;

        for _ in 0..500 {
            rule.begin();
            for i in 0..4 {
                rule.step(i, rng.random_range(-bound..bound));
            }

            for (&m, &v) in rule.first_moment().iter().zip(rule.second_moment()) {
                assert!(m.abs() <= bound);
                assert!((0.0..=bound * bound).contains(&v));
            }
        }
    }

    #[test]
    fn power_accumulators_follow_the_iteration_count() {
        let mut rule = NAdam::<f64>::new(1, NAdamConfig::default()).unwrap();
        assert_eq!(rule.accumulators(), (1.0, 1.0));

        for _ in 0..3 {
            rule.begin();
        }

        let (m, v) = rule.accumulators();
        assert_relative_eq!(m, 0.9_f64.powi(3), max_relative = 1e-12);
        assert_relative_eq!(v, 0.999_f64.powi(3), max_relative = 1e-12);
    }

    #[test]
    fn squaring_accumulators_follow_powers_of_two() {
        let config = NAdamConfig {
            bias_correction: BiasCorrection::Squaring,
            ..Default::default()
        };
        let mut rule = NAdam::<f64>::new(1, config).unwrap();
        assert_eq!(rule.accumulators(), (0.9, 0.999));

        for _ in 0..3 {
            rule.begin();
        }

        let (m, v) = rule.accumulators();
        assert_relative_eq!(m, 0.9_f64.powi(8), max_relative = 1e-12);
        assert_relative_eq!(v, 0.999_f64.powi(8), max_relative = 1e-12);
    }

    #[test]
    fn out_of_range_hyperparameters_are_rejected() {
        let invalid = [
            NAdamConfig {
                decay_rate_moment: 1.0,
                ..Default::default()
            },
            NAdamConfig {
                decay_rate_variance: -0.1,
                ..Default::default()
            },
            NAdamConfig {
                epsilon: 0.0,
                ..Default::default()
            },
            NAdamConfig {
                learning_rate: f64::NAN,
                ..Default::default()
            },
        ];

        for config in invalid {
            assert!(matches!(
                NAdam::new(2, config),
                Err(OptErr::InvalidConfiguration(_))
            ));
        }
    }
}
