mod layer;
mod params;
mod rule;

pub use layer::Layer;
pub use params::Params;
pub use rule::BackwardRule;
