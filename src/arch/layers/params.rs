use ndarray::{linalg, Array2, ArrayView2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::Uniform;

use crate::Result;

/// The weights and bias connecting a layer to the next one, along with the gradient computed
/// for them on the last training step.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    weights: Array2<f64>,
    bias: Array2<f64>,

    weight_grad: Array2<f64>,
    bias_grad: Array2<f64>,
}

impl Params {
    /// Creates a new `Params` with every weight and bias drawn uniformly from `[-1, 1]`.
    ///
    /// # Arguments
    /// * `dim` - The width of the upstream and downstream layers.
    /// * `rng` - The source of randomness.
    ///
    /// # Returns
    /// The new parameters or an error if the distribution could not be built.
    pub fn random<R: Rng + ?Sized>(dim: (usize, usize), rng: &mut R) -> Result<Self> {
        let uniform = Uniform::new_inclusive(-1.0, 1.0)?;
        let weights = Array2::random_using(dim, &uniform, rng);
        let bias = Array2::random_using((1, dim.1), &uniform, rng);

        Ok(Self::from_parts(weights, bias))
    }

    pub(crate) fn from_parts(weights: Array2<f64>, bias: Array2<f64>) -> Self {
        Self {
            weight_grad: Array2::zeros(weights.dim()),
            bias_grad: Array2::zeros(bias.dim()),
            weights,
            bias,
        }
    }

    /// Returns `(rows, cols)` of the weight matrix.
    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    /// The bias as a single row matrix.
    pub fn bias(&self) -> ArrayView2<'_, f64> {
        self.bias.view()
    }

    /// The weight gradient of the last training step.
    pub fn weight_grad(&self) -> ArrayView2<'_, f64> {
        self.weight_grad.view()
    }

    /// The bias gradient of the last training step.
    pub fn bias_grad(&self) -> ArrayView2<'_, f64> {
        self.bias_grad.view()
    }

    /// Whether every weight and bias is a finite number.
    pub fn is_finite(&self) -> bool {
        self.weights.iter().chain(&self.bias).all(|v| v.is_finite())
    }

    /// Writes `x @ weights + bias` into `z`.
    pub(crate) fn forward(&self, x: ArrayView2<f64>, z: &mut Array2<f64>) {
        linalg::general_mat_mul(1.0, &x, &self.weights, 0.0, z);
        *z += &self.bias;
    }

    /// Computes the gradient for the upstream output `x` and downstream delta `d`.
    pub(crate) fn compute_grad(&mut self, x: ArrayView2<f64>, d: ArrayView2<f64>) {
        linalg::general_mat_mul(1.0, &x.t(), &d, 0.0, &mut self.weight_grad);
        self.bias_grad.assign(&d);
    }

    /// Gives mutable access to every parameter paired with its gradient, weights first.
    pub(crate) fn with_grads_mut(&mut self) -> [(&mut Array2<f64>, &Array2<f64>); 2] {
        [
            (&mut self.weights, &self.weight_grad),
            (&mut self.bias, &self.bias_grad),
        ]
    }

    /// Gives mutable access to the weights and bias, in that order.
    pub(crate) fn values_mut(&mut self) -> [&mut Array2<f64>; 2] {
        [&mut self.weights, &mut self.bias]
    }
}
