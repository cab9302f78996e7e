use std::{fmt, str::FromStr};

use ndarray::{ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};

use super::{sigmoid, softmax, step};
use crate::NetErr;

/// The activation function of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFn {
    Sigmoid,
    Softmax,
    #[serde(alias = "tanh")]
    Hyperbolic,
    Relu,
    Threshold,
    Linear,
}
use ActFn::*;

impl ActFn {
    /// Activates every row of `z` in place.
    ///
    /// Every kind but `Softmax` works elementwise, `Softmax` normalizes each row as a whole.
    ///
    /// # Arguments
    /// * `z` - The pre-activations, one example per row.
    pub fn apply(&self, mut z: ArrayViewMut2<f64>) {
        match self {
            Sigmoid => z.mapv_inplace(sigmoid::sigmoid),
            Softmax => z.axis_iter_mut(Axis(0)).for_each(softmax::softmax),
            Hyperbolic => z.mapv_inplace(hyperbolic),
            Relu => z.mapv_inplace(|z| z.max(0.)),
            Threshold => z.mapv_inplace(step::threshold),
            Linear => {}
        }
    }

    /// Derivative of the function expressed in terms of its own output `a`.
    pub fn df(&self, a: f64) -> f64 {
        match self {
            Sigmoid => sigmoid::sigmoid_prime(a),
            Softmax => softmax::softmax_prime(a),
            Hyperbolic => 1. - a * a,
            Relu => {
                if a > 0. {
                    1.
                } else {
                    0.
                }
            }
            Threshold => step::threshold_prime(a),
            Linear => 1.,
        }
    }

    /// The name this function is parsed from.
    pub fn name(&self) -> &'static str {
        match self {
            Sigmoid => "sigmoid",
            Softmax => "softmax",
            Hyperbolic => "hyperbolic",
            Relu => "relu",
            Threshold => "threshold",
            Linear => "linear",
        }
    }
}

// Computed from the exponentials directly, overflows to NaN for |z| > ~710.
fn hyperbolic(z: f64) -> f64 {
    let (ez, emz) = (z.exp(), (-z).exp());
    (ez - emz) / (ez + emz)
}

impl FromStr for ActFn {
    type Err = NetErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sigmoid" => Ok(Sigmoid),
            "softmax" => Ok(Softmax),
            "hyperbolic" | "tanh" => Ok(Hyperbolic),
            "relu" => Ok(Relu),
            "threshold" => Ok(Threshold),
            "linear" => Ok(Linear),
            other => Err(NetErr::UnknownActFn(other.to_string())),
        }
    }
}

impl fmt::Display for ActFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrKind;
    use ndarray::array;

    #[test]
    fn test_parse_every_known_name() {
        for act_fn in [Sigmoid, Softmax, Hyperbolic, Relu, Threshold, Linear] {
            assert_eq!(act_fn.name().parse::<ActFn>().unwrap(), act_fn);
        }

        assert_eq!("tanh".parse::<ActFn>().unwrap(), Hyperbolic);
    }

    #[test]
    fn test_parse_unknown_name_is_a_configuration_error() {
        let err = "swish".parse::<ActFn>().unwrap_err();

        assert_eq!(err.kind(), ErrKind::Configuration);
        assert!(err.to_string().contains("swish"));
    }

    #[test]
    fn test_elementwise_kinds() {
        let mut z = array![[-2., 0., 3.]];

        Relu.apply(z.view_mut());
        assert_eq!(z, array![[0., 0., 3.]]);

        let mut z = array![[-2., 0., 3.]];
        Threshold.apply(z.view_mut());
        assert_eq!(z, array![[0., 0., 1.]]);

        let mut z = array![[-2., 0., 3.]];
        Linear.apply(z.view_mut());
        assert_eq!(z, array![[-2., 0., 3.]]);
    }

    #[test]
    fn test_hyperbolic_matches_tanh() {
        let mut z = array![[-1.5, 0., 0.25, 4.]];
        let expected = z.mapv(f64::tanh);
        Hyperbolic.apply(z.view_mut());

        for (a, e) in z.iter().zip(&expected) {
            assert!((a - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_softmax_normalizes_rows_independently() {
        let mut z = array![[1., 1.], [0., 10.]];
        Softmax.apply(z.view_mut());

        assert_eq!(z[[0, 0]], 0.5);
        assert!((z.row(1).sum() - 1.).abs() < 1e-12);
        assert!(z[[1, 1]] > 0.99);
    }

    #[test]
    fn test_derivatives_in_terms_of_output() {
        assert_eq!(Sigmoid.df(0.5), 0.25);
        assert_eq!(Hyperbolic.df(0.), 1.);
        assert_eq!(Relu.df(2.), 1.);
        assert_eq!(Relu.df(0.), 0.);
        assert_eq!(Threshold.df(1.), 0.);
        assert_eq!(Linear.df(-7.), 1.);
    }

    #[test]
    fn test_serde_names() {
        let act_fn: ActFn = serde_json::from_str("\"tanh\"").unwrap();
        assert_eq!(act_fn, Hyperbolic);
        assert_eq!(serde_json::to_string(&Relu).unwrap(), "\"relu\"");
    }
}
