use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{GradientDescent, Optimizer};
use crate::{arch::layers::Params, NetErr};

/// The gradient descent strategy a network trains with.
///
/// Plain per-example descent is the only strategy available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDescentMethod {
    #[default]
    #[serde(alias = "stochastic_gradient_descent")]
    Sgd,
}

impl GradientDescentMethod {
    /// Steps `params` against the gradient they currently hold.
    ///
    /// # Arguments
    /// * `params` - The parameters to update, with their gradient already computed.
    /// * `learning_rate` - The length of the step.
    pub fn step(&self, params: &mut Params, learning_rate: f64) {
        match self {
            GradientDescentMethod::Sgd => {
                let mut optimizer = GradientDescent::new(learning_rate);
                for (values, grad) in params.with_grads_mut() {
                    optimizer.update_params(values, grad);
                }
            }
        }
    }
}

impl FromStr for GradientDescentMethod {
    type Err = NetErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sgd" | "stochastic_gradient_descent" => Ok(Self::Sgd),
            other => Err(NetErr::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for GradientDescentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sgd => f.write_str("sgd"),
        }
    }
}
