use crate::Scalar;

/// A per component loss function of a signal and its target.
pub type KernelFn<F> = fn(F, F) -> F;

/// A per sample loss `Q(signal, target)` paired with its derivative with respect to the signal.
#[derive(Clone, Copy)]
pub struct LossKernel<F> {
    q: KernelFn<F>,
    dq_ds: KernelFn<F>,
}

impl<F: Scalar> LossKernel<F> {
    /// Creates a new `LossKernel`.
    ///
    /// # Arguments
    /// * `q` - The loss of a signal component given its target.
    /// * `dq_ds` - The derivative of `q` with respect to the signal component.
    pub fn new(q: KernelFn<F>, dq_ds: KernelFn<F>) -> Self {
        Self { q, dq_ds }
    }

    /// `Q(s, t) = (s - t)²`.
    pub fn squared_error() -> Self {
        Self::new(squared_error, squared_error_prime)
    }

    /// `Q(s, t) = ln(cosh(s - t))`, quadratic near the target and linear far from it.
    pub fn log_cosh() -> Self {
        Self::new(log_cosh, log_cosh_prime)
    }

    pub fn q(&self, signal: F, target: F) -> F {
        (self.q)(signal, target)
    }

    pub fn dq_ds(&self, signal: F, target: F) -> F {
        (self.dq_ds)(signal, target)
    }
}

fn squared_error<F: Scalar>(s: F, t: F) -> F {
    (s - t) * (s - t)
}

fn squared_error_prime<F: Scalar>(s: F, t: F) -> F {
    (s - t) * F::cast(2.)
}

// ln(cosh(d)) = |d| + ln(1 + e^(-2|d|)) - ln(2), which doesn't overflow for large |d|.
fn log_cosh<F: Scalar>(s: F, t: F) -> F {
    let d = (s - t).abs();
    d + (F::cast(-2.) * d).exp().ln_1p() - F::cast(std::f64::consts::LN_2)
}

fn log_cosh_prime<F: Scalar>(s: F, t: F) -> F {
    (s - t).tanh()
}
