pub mod arch;
pub mod dataset;
pub mod error;
pub mod initialization;
pub mod optimization;
mod scalar;
pub mod specs;
pub mod training;

pub use error::{OptErr, Result};
pub use scalar::Scalar;
