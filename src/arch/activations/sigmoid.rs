/// Pre-activations beyond this magnitude saturate the sigmoid.
pub const SATURATION: f64 = 24.;

/// The logistic function, clamped to exactly `1` above `SATURATION` and exactly `0` below
/// `-SATURATION`.
pub fn sigmoid(z: f64) -> f64 {
    if z > SATURATION {
        1.
    } else if z < -SATURATION {
        0.
    } else {
        1. / (1. + (-z).exp())
    }
}

/// The derivative of the sigmoid expressed in terms of its output `a`.
pub fn sigmoid_prime(a: f64) -> f64 {
    a * (1. - a)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sigmoid_at_zero_is_one_half() {
        assert_eq!(sigmoid(0.), 0.5);
        assert_eq!(sigmoid_prime(sigmoid(0.)), 0.25);
    }

    #[test]
    fn test_sigmoid_saturates_past_the_clamp() {
        assert_eq!(sigmoid(24.5), 1.);
        assert_eq!(sigmoid(-24.5), 0.);
        assert_eq!(sigmoid(1e6), 1.);
        assert_eq!(sigmoid(-1e6), 0.);
    }

    #[test]
    fn test_sigmoid_stays_open_inside_the_clamp() {
        for z in [-24., -10., -1., 0.3, 5., 24.] {
            let a = sigmoid(z);
            assert!(a > 0. && a < 1., "sigmoid({z}) = {a}");
        }
    }
}
