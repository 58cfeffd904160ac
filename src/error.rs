use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::{NormalError, uniform::Error as UniformError};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, OptErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum OptErr {
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    DimensionMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    InvalidConfiguration(&'static str),
    Distribution(String),
    Config(serde_json::Error),
}

impl Display for OptErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptErr::IndexOutOfRange { what, index, len } => {
                write!(f, "{what} index {index} is out of range for length {len}")
            }
            OptErr::DimensionMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "dimension mismatch for {what}: got {got}, expected {expected}"
            ),
            OptErr::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
            OptErr::Distribution(msg) => write!(f, "invalid distribution: {msg}"),
            OptErr::Config(e) => write!(f, "failed to parse spec: {e}"),
        }
    }
}

impl Error for OptErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OptErr::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OptErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value)
    }
}

impl From<NormalError> for OptErr {
    fn from(value: NormalError) -> Self {
        Self::Distribution(value.to_string())
    }
}

impl From<UniformError> for OptErr {
    fn from(value: UniformError) -> Self {
        Self::Distribution(value.to_string())
    }
}

/// Checks that `index` is lower than `len`.
pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(OptErr::IndexOutOfRange { what, index, len });
    }

    Ok(())
}

/// Checks that `got` equals `expected`.
pub(crate) fn check_dim(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(OptErr::DimensionMismatch {
            what,
            got,
            expected,
        });
    }

    Ok(())
}
