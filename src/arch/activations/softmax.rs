use ndarray::ArrayViewMut1;

/// Normalizes a row in place as `e^z_i / sum_j e^z_j`.
///
/// The exponentials are taken on the raw values, large inputs overflow to `inf` and the row
/// becomes `NaN`. Callers must keep pre-activations scaled.
pub fn softmax(mut row: ArrayViewMut1<f64>) {
    row.mapv_inplace(f64::exp);
    let sum = row.sum();
    row.mapv_inplace(|e| e / sum);
}

/// Diagonal of the softmax jacobian, in terms of the output `a`.
pub fn softmax_prime(a: f64) -> f64 {
    a * (1. - a)
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_softmax_sums_to_one() {
        let mut z = array![1., 2., 3.];
        softmax(z.view_mut());

        assert!((z.sum() - 1.).abs() < 1e-12);
        assert!(z[0] < z[1] && z[1] < z[2]);
    }

    #[test]
    fn test_softmax_of_equal_values_is_uniform() {
        let mut z = array![0.7, 0.7, 0.7, 0.7];
        softmax(z.view_mut());

        for a in z {
            assert!((a - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_softmax_is_not_guarded_against_overflow() {
        let mut z = array![1000., 0.];
        softmax(z.view_mut());

        assert!(z[0].is_nan());
    }
}
