mod act_fn;
mod sigmoid;
mod softmax;
mod step;

pub use act_fn::ActFn;
pub use sigmoid::{sigmoid, sigmoid_prime, SATURATION};
pub use softmax::softmax;
pub use step::threshold;
