use ndarray::NdFloat;

/// The floating point element type the models and optimizers are generic over.
pub trait Scalar: NdFloat {
    /// Converts an `f64` constant (a hyperparameter, a spec value) into `Self`.
    fn cast(x: f64) -> Self;
}

impl Scalar for f32 {
    fn cast(x: f64) -> Self {
        x as f32
    }
}

impl Scalar for f64 {
    fn cast(x: f64) -> Self {
        x
    }
}
