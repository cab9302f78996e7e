/// Heaviside step: `1` for strictly positive inputs, `0` otherwise.
pub fn threshold(z: f64) -> f64 {
    if z > 0. {
        1.
    } else {
        0.
    }
}

/// The step has no usable gradient.
pub fn threshold_prime(_a: f64) -> f64 {
    0.
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_threshold_is_strict_at_zero() {
        assert_eq!(threshold(0.), 0.);
        assert_eq!(threshold(1e-9), 1.);
        assert_eq!(threshold(-3.), 0.);
    }
}
