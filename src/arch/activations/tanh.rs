use crate::Scalar;

/// Hyperbolic tangent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tanh;

impl Tanh {
    pub fn f<F: Scalar>(&self, z: F) -> F {
        z.tanh()
    }

    pub fn df<F: Scalar>(&self, z: F) -> F {
        let t = z.tanh();
        F::one() - t * t
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn derivative_matches_finite_differences() {
        let h = 1e-6;

        for z in [-2.0_f64, -0.3, 0.0, 1.1] {
            let numeric = (Tanh.f(z + h) - Tanh.f(z - h)) / (2.0 * h);
            assert_relative_eq!(Tanh.df(z), numeric, max_relative = 1e-6);
        }
    }
}
