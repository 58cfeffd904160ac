mod adam;
mod full_batch;
mod gradient_descent;
mod gradient_descent_with_momentum;
mod nadam;
mod optimizer;
mod source;
mod stochastic;
mod tolerance;
mod update_rule;

pub use adam::Adam;
pub use full_batch::FullBatch;
pub use gradient_descent::GradientDescent;
pub use gradient_descent_with_momentum::GradientDescentWithMomentum;
pub use nadam::{BiasCorrection, NAdam, NAdamConfig};
pub use optimizer::{NAdamSgd, Optimizer};
pub use source::StochasticGradient;
pub use stochastic::StochasticLoss;
pub use tolerance::Tolerance;
pub use update_rule::UpdateRule;
