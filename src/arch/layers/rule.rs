use serde::{Deserialize, Serialize};

use crate::arch::activations::{sigmoid_prime, ActFn};

/// How the backward pass differentiates a layer's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackwardRule {
    /// Every layer is differentiated as a sigmoid, `a * (1 - a)`, whatever its activation.
    #[default]
    Logistic,
    /// Each layer is differentiated with its own activation's derivative.
    PerActivation,
}

impl BackwardRule {
    /// Derivative of a layer with activation `act_fn` at output `a`.
    pub fn df(&self, act_fn: ActFn, a: f64) -> f64 {
        match self {
            BackwardRule::Logistic => sigmoid_prime(a),
            BackwardRule::PerActivation => act_fn.df(a),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_logistic_ignores_the_activation() {
        for act_fn in [ActFn::Relu, ActFn::Linear, ActFn::Hyperbolic, ActFn::Threshold] {
            assert_eq!(BackwardRule::Logistic.df(act_fn, 0.5), 0.25);
        }
    }

    #[test]
    fn test_per_activation_dispatches() {
        assert_eq!(BackwardRule::PerActivation.df(ActFn::Linear, 0.5), 1.);
        assert_eq!(BackwardRule::PerActivation.df(ActFn::Sigmoid, 0.5), 0.25);
    }
}
