use std::{cell::RefCell, marker::PhantomData, rc::Rc};

use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use super::ParamGen;
use crate::{Scalar, error::Result};

/// A parameter generator that follows a certain probabilistic distribution.
///
/// The values are drawn in double precision and then cast to the model's scalar type.
pub struct RandParamGen<F, R: Rng, D: Distribution<f64>> {
    rng: Rc<RefCell<R>>,
    distribution: D,
    remaining: usize,
    _float: PhantomData<F>,
}

impl<F, R: Rng, D: Distribution<f64>> RandParamGen<F, R, D> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator, shared with other generators.
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(rng: Rc<RefCell<R>>, distribution: D, limit: usize) -> Self {
        Self {
            rng,
            distribution,
            remaining: limit,
            _float: PhantomData,
        }
    }
}

impl<F, R: Rng> RandParamGen<F, R, Uniform<f64>> {
    /// Creates a new `RandParamGen` with a uniform distribution.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit.
    ///
    /// # Returns
    /// A `Distribution` error if the range is invalid (low >= high).
    pub fn uniform(rng: Rc<RefCell<R>>, limit: usize, low: f64, high: f64) -> Result<Self> {
        Ok(Self::new(rng, Uniform::new(low, high)?, limit))
    }

    /// Creates a new `RandParamGen` using Xavier uniform initialization.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `fan_in` - The number of inputs of the model.
    /// * `fan_out` - The number of outputs of the model.
    pub fn xavier_uniform(
        rng: Rc<RefCell<R>>,
        limit: usize,
        fan_in: usize,
        fan_out: usize,
    ) -> Result<Self> {
        let range = (6. / (fan_in + fan_out) as f64).sqrt();
        Self::uniform(rng, limit, -range, range)
    }
}

impl<F, R: Rng> RandParamGen<F, R, Normal<f64>> {
    /// Creates a new `RandParamGen` with a normal distribution.
    ///
    /// # Returns
    /// A `Distribution` error if `std_dev` is not finite (Nan or infinite).
    pub fn normal(rng: Rc<RefCell<R>>, limit: usize, mean: f64, std_dev: f64) -> Result<Self> {
        Ok(Self::new(rng, Normal::new(mean, std_dev)?, limit))
    }

    /// Creates a new `RandParamGen` using LeCun normal initialization.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `fan_in` - The number of inputs of the model.
    pub fn lecun(rng: Rc<RefCell<R>>, limit: usize, fan_in: usize) -> Result<Self> {
        let std_dev = (1. / fan_in as f64).sqrt();
        Self::normal(rng, limit, 0., std_dev)
    }
}

impl<F: Scalar, R: Rng, D: Distribution<f64>> ParamGen<F> for RandParamGen<F, R, D> {
    fn sample(&mut self, mut n: usize) -> Option<Vec<F>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;

        let mut rng = self.rng.borrow_mut();
        let sample = (0..n)
            .map(|_| F::cast(self.distribution.sample(&mut *rng)))
            .collect();

        Some(sample)
    }
}
