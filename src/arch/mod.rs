pub mod activations;
pub mod layers;
mod network;
mod snapshot;

pub use network::{argmax, Network};
pub use snapshot::{NetworkSnapshot, ParamsSnapshot};
