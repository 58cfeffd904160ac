/// A `ParamGen` generates values for the initial state of a model's parameters.
pub trait ParamGen<F> {
    /// Should sample at most `n` parameters.
    ///
    /// # Arguments
    /// * `n` - The upper limit of samples to generate.
    ///
    /// # Returns
    /// The samples, or `None` if the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<F>>;
}
