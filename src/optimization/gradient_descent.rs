use ndarray::Array2;

use super::Optimizer;

/// Gradient descent optimization algorithm.
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    /// Updates the parameters according to the algorithm's learning rule, that is, making a step in
    /// the opposite direction of the gradient, with a length of `learning_rate`.
    ///
    /// # Arguments
    /// * `params` - The parameters that are going to be modified.
    /// * `grad` - The gradient used for taking the step.
    fn update_params(&mut self, params: &mut Array2<f64>, grad: &Array2<f64>) {
        params.scaled_add(-self.learning_rate, grad);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_step_against_the_gradient() {
        let mut params = array![[1., 2.], [3., 4.]];
        let grad = array![[10., 0.], [-10., 20.]];

        GradientDescent::new(0.5).update_params(&mut params, &grad);

        assert_eq!(params, array![[-4., 2.], [8., -6.]]);
    }
}
