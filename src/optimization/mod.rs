mod gradient_descent;
mod method;
mod optimizer;

pub use gradient_descent::GradientDescent;
pub use method::GradientDescentMethod;
pub use optimizer::Optimizer;
