use super::{Sigmoid, Tanh};
use crate::Scalar;

#[derive(Debug, Clone, Copy)]
pub enum ActFn<F> {
    Sigmoid(Sigmoid<F>),
    Tanh(Tanh),
}

impl<F: Scalar> ActFn<F> {
    pub fn sigmoid(amp: F) -> Self {
        Self::Sigmoid(Sigmoid::new(amp))
    }

    pub fn tanh() -> Self {
        Self::Tanh(Tanh)
    }

    pub fn f(&self, z: F) -> F {
        match self {
            Self::Sigmoid(a) => a.f(z),
            Self::Tanh(a) => a.f(z),
        }
    }

    pub fn df(&self, z: F) -> F {
        match self {
            Self::Sigmoid(a) => a.df(z),
            Self::Tanh(a) => a.df(z),
        }
    }
}
