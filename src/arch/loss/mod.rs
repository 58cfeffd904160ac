mod evaluator;
mod kernel;

pub use evaluator::LossEvaluator;
pub use kernel::{KernelFn, LossKernel};
