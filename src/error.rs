use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use rand_distr::uniform::Error as UniformError;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, NetErr>;

/// The broad family an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    /// The network or one of its configs was described incorrectly.
    Configuration,
    /// An operation was invoked on a network or data with incompatible shapes.
    Structure,
    /// A numeric distribution could not be built.
    Arithmetic,
    /// Reading or parsing an external resource failed.
    Io,
}

/// The crate's error type.
#[derive(Debug)]
pub enum NetErr {
    UnknownActFn(String),
    UnknownMethod(String),
    ZeroWidth {
        layer: usize,
    },
    InvalidConfig(String),
    InvalidLearningRate(f64),
    TooFewLayers {
        got: usize,
    },
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    ParamsOutOfRange {
        index: usize,
        len: usize,
    },
    Sampling(UniformError),
    Io(io::Error),
    Json(serde_json::Error),
}

impl NetErr {
    /// Returns the family of this error.
    pub fn kind(&self) -> ErrKind {
        use NetErr::*;

        match self {
            UnknownActFn(_)
            | UnknownMethod(_)
            | ZeroWidth { .. }
            | InvalidConfig(_)
            | InvalidLearningRate(_) => ErrKind::Configuration,
            TooFewLayers { .. } | SizeMismatch { .. } | ParamsOutOfRange { .. } => {
                ErrKind::Structure
            }
            Sampling(_) => ErrKind::Arithmetic,
            Io(_) | Json(_) => ErrKind::Io,
        }
    }
}

impl Display for NetErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetErr::UnknownActFn(name) => write!(f, "unknown activation function: {name}"),
            NetErr::UnknownMethod(name) => write!(f, "unknown gradient descent method: {name}"),
            NetErr::ZeroWidth { layer } => write!(f, "layer {layer} must have at least one node"),
            NetErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            NetErr::InvalidLearningRate(rate) => {
                write!(f, "the learning rate must be a positive number, got {rate}")
            }
            NetErr::TooFewLayers { got } => {
                write!(f, "the network needs at least 2 layers to run, it has {got}")
            }
            NetErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(f, "size mismatch for {what}: got {got}, expected {expected}"),
            NetErr::ParamsOutOfRange { index, len } => write!(
                f,
                "there is no parameter set {index}, the network only has {len}"
            ),
            NetErr::Sampling(e) => write!(f, "failed to build the parameter distribution: {e}"),
            NetErr::Io(e) => write!(f, "io error: {e}"),
            NetErr::Json(e) => write!(f, "invalid json: {e}"),
        }
    }
}

impl Error for NetErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetErr::Sampling(e) => Some(e),
            NetErr::Io(e) => Some(e),
            NetErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for NetErr {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NetErr {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<UniformError> for NetErr {
    fn from(e: UniformError) -> Self {
        Self::Sampling(e)
    }
}
