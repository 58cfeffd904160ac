use super::ParamGen;

/// A parameter generator that delegates the generation to a chain of generators, moving on to
/// the next one once the current one is exhausted.
///
/// Handy to draw the weights of a model from one distribution and its biases from another.
pub struct ChainedParamGen<'a, F> {
    param_gens: Vec<Box<dyn ParamGen<F> + 'a>>,
    curr: usize,
}

impl<'a, F> ChainedParamGen<'a, F> {
    /// Creates a new `ChainedParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `param_gens` - The generators, in the order their values are handed out.
    pub fn new(param_gens: Vec<Box<dyn ParamGen<F> + 'a>>) -> Self {
        Self {
            param_gens,
            curr: 0,
        }
    }
}

impl<F> ParamGen<F> for ChainedParamGen<'_, F> {
    fn sample(&mut self, n: usize) -> Option<Vec<F>> {
        if self.curr == self.param_gens.len() {
            return None;
        }

        match self.param_gens[self.curr].sample(n) {
            Some(sample) if sample.len() == n => Some(sample),
            Some(mut sample) => {
                self.curr += 1;

                if let Some(rest) = self.sample(n - sample.len()) {
                    sample.extend(rest);
                }

                Some(sample)
            }
            None => {
                self.curr += 1;
                self.sample(n)
            }
        }
    }
}
