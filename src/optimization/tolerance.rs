use crate::{
    Scalar,
    error::{OptErr, Result},
};

/// The absolute/relative band each parameter step is normalized by when computing the
/// convergence statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<F> {
    pub absolute: F,
    pub relative: F,
}

impl<F: Scalar> Tolerance<F> {
    pub fn new(absolute: F, relative: F) -> Self {
        Self { absolute, relative }
    }

    /// Checks that the absolute bound is positive and the relative one non negative, so the
    /// band is never zero.
    pub fn validate(&self) -> Result<()> {
        let zero = F::zero();
        if !(self.absolute > zero && self.absolute.is_finite()) {
            return Err(OptErr::InvalidConfiguration(
                "the absolute tolerance must be positive",
            ));
        }

        if !(self.relative >= zero && self.relative.is_finite()) {
            return Err(OptErr::InvalidConfiguration(
                "the relative tolerance must be non negative",
            ));
        }

        Ok(())
    }

    /// Returns the size of a step that is considered negligible for a parameter of value `w`.
    pub fn band(&self, w: F) -> F {
        self.absolute + w.abs() * self.relative
    }
}

impl<F: Scalar> Default for Tolerance<F> {
    fn default() -> Self {
        Self::new(F::cast(1e-5), F::cast(1e-3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let tol = Tolerance::<f64>::default();
        assert_eq!(tol.absolute, 1e-5);
        assert_eq!(tol.relative, 1e-3);
        assert!(tol.validate().is_ok());
    }

    #[test]
    fn band_grows_with_the_parameter() {
        let tol = Tolerance::new(1.0, 0.5);
        assert_eq!(tol.band(0.0), 1.0);
        assert_eq!(tol.band(-4.0), 3.0);
    }

    #[test]
    fn invalid_tolerances() {
        assert!(Tolerance::new(0.0, 0.0).validate().is_err());
        assert!(Tolerance::new(-1.0, 1e-3).validate().is_err());
        assert!(Tolerance::new(1e-5, f64::NAN).validate().is_err());
        assert!(Tolerance::new(0.0, 1e-3).validate().is_err());
        assert!(Tolerance::new(1e-5, 0.0).validate().is_ok());
    }
}
