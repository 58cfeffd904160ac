pub mod activations;
pub mod loss;
mod model;
pub mod models;

pub use model::{Model, ModelState, Shape};
