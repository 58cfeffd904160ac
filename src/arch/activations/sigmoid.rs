use crate::Scalar;

/// A logistic function scaled by `amp`.
#[derive(Debug, Clone, Copy)]
pub struct Sigmoid<F> {
    amp: F,
}

impl<F: Scalar> Sigmoid<F> {
    pub fn new(amp: F) -> Self {
        Self { amp }
    }

    pub fn f(&self, z: F) -> F {
        self.amp / (F::one() + (-z).exp())
    }

    pub fn df(&self, z: F) -> F {
        let e = (-z).exp();
        let d = e + F::one();

        self.amp * e / (d * d)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn derivative_matches_finite_differences() {
        let sigmoid = Sigmoid::new(2.0_f64);
        let h = 1e-6;

        for z in [-3.0, -0.5, 0.0, 0.7, 4.0] {
            let numeric = (sigmoid.f(z + h) - sigmoid.f(z - h)) / (2.0 * h);
            assert_relative_eq!(sigmoid.df(z), numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn midpoint_is_half_the_amplitude() {
        let sigmoid = Sigmoid::new(3.0_f32);
        assert_relative_eq!(sigmoid.f(0.0), 1.5);
    }
}
