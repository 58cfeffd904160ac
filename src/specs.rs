use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{error::Result, optimization::BiasCorrection};

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Sigmoid { amp: f64 },
    Tanh,
}

/// How the weights of a model are initialized, biases always start at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSpec {
    Const {
        value: f64,
    },
    Uniform {
        low: f64,
        high: f64,
    },
    Normal {
        mean: f64,
        std_dev: f64,
    },
    #[default]
    XavierUniform,
    Lecun,
}

/// The specification for the `Model` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Dense {
        input_width: usize,
        output_width: usize,
        #[serde(default)]
        bias: bool,
        #[serde(default)]
        act_fn: Option<ActFnSpec>,
        #[serde(default)]
        init: InitSpec,
    },
}

/// The specification for the `LossKernel` struct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossSpec {
    #[default]
    SquaredError,
    LogCosh,
}

/// The specification for the `UpdateRule` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    GradientDescent {
        learning_rate: f64,
    },
    Momentum {
        learning_rate: f64,
        momentum: f64,
    },
    Adam {
        learning_rate: f64,
        beta1: f64,
        beta2: f64,
        epsilon: f64,
    },
    Nadam {
        #[serde(default = "default_decay_rate_moment")]
        decay_rate_moment: f64,
        #[serde(default = "default_decay_rate_variance")]
        decay_rate_variance: f64,
        #[serde(default = "default_epsilon")]
        epsilon: f64,
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
        #[serde(default)]
        bias_correction: BiasCorrection,
    },
}

impl Default for OptimizerSpec {
    fn default() -> Self {
        Self::Nadam {
            decay_rate_moment: default_decay_rate_moment(),
            decay_rate_variance: default_decay_rate_variance(),
            epsilon: default_epsilon(),
            learning_rate: default_learning_rate(),
            bias_correction: BiasCorrection::default(),
        }
    }
}

/// The specification for the `StochasticGradient` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSpec {
    Stochastic {
        #[serde(default = "default_batch_size")]
        batch_size: NonZeroUsize,
    },
    FullBatch,
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self::Stochastic {
            batch_size: default_batch_size(),
        }
    }
}

/// The specification for the `Tolerance` struct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceSpec {
    pub absolute: f64,
    pub relative: f64,
}

impl Default for ToleranceSpec {
    fn default() -> Self {
        Self {
            absolute: 1e-5,
            relative: 1e-3,
        }
    }
}

/// The specification for the `Trainer` struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerSpec {
    pub model: ModelSpec,
    #[serde(default)]
    pub loss: LossSpec,
    #[serde(default)]
    pub optimizer: OptimizerSpec,
    #[serde(default)]
    pub source: SourceSpec,
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    #[serde(default)]
    pub tolerance: ToleranceSpec,
    #[serde(default)]
    pub log_every: usize,
    pub seed: Option<u64>,
}

impl TrainerSpec {
    /// Parses a `TrainerSpec` from its json representation.
    ///
    /// # Returns
    /// A `Config` error if the json is malformed or doesn't describe a trainer.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_decay_rate_moment() -> f64 {
    0.9
}

fn default_decay_rate_variance() -> f64 {
    0.999
}

fn default_epsilon() -> f64 {
    1e-6
}

fn default_learning_rate() -> f64 {
    1e-2
}

fn default_batch_size() -> NonZeroUsize {
    NonZeroUsize::MIN
}

fn default_max_iters() -> usize {
    10_000
}
