//! A feedforward neural network engine: a strict stack of fully connected layers trained one
//! example at a time by gradient descent.

pub mod arch;
pub mod config;
mod error;
pub mod evolution;
pub mod optimization;

pub use arch::{activations::ActFn, layers::BackwardRule, Network, NetworkSnapshot};
pub use config::{LayerConfig, NetworkConfig, TrainingConfig};
pub use error::{ErrKind, NetErr, Result};
pub use optimization::GradientDescentMethod;
