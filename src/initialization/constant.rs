use super::ParamGen;
use crate::Scalar;

/// A parameter generator that always generates the same value.
pub struct ConstParamGen<F> {
    value: F,
    remaining: usize,
}

impl<F: Scalar> ConstParamGen<F> {
    /// Creates a new `ConstParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `value` - The value to always generate.
    /// * `limit` - The maximum amount of times to generate that value.
    pub fn new(value: F, limit: usize) -> Self {
        Self {
            value,
            remaining: limit,
        }
    }
}

impl<F: Scalar> ParamGen<F> for ConstParamGen<F> {
    fn sample(&mut self, mut n: usize) -> Option<Vec<F>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;
        Some(vec![self.value; n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let mut param_gen = ConstParamGen::<f64>::new(1., 0);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn partial() {
        let mut param_gen = ConstParamGen::<f32>::new(1., 10);

        assert_eq!(param_gen.sample(7).unwrap(), vec![1.; 7]);
        assert_eq!(param_gen.sample(7).unwrap(), vec![1.; 3]);
        assert!(param_gen.sample(1).is_none());
    }
}
