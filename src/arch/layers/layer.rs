use ndarray::{linalg, Array2, ArrayView1, ArrayView2, ArrayViewMut1};

use super::BackwardRule;
use crate::arch::activations::ActFn;

/// A position in the network: the activated output of its nodes for the last example that went
/// through it and the error signal computed for it on the last backward pass.
#[derive(Debug, Clone)]
pub struct Layer {
    act_fn: ActFn,

    // Forward metadata
    output: Array2<f64>,

    // Backward metadata
    delta: Array2<f64>,
}

impl Layer {
    /// Creates a new `Layer` with zeroed buffers.
    ///
    /// # Arguments
    /// * `width` - The amount of nodes.
    /// * `act_fn` - The function applied to the pre-activations this layer receives.
    pub fn new(width: usize, act_fn: ActFn) -> Self {
        Self {
            act_fn,
            output: Array2::zeros((1, width)),
            delta: Array2::zeros((1, width)),
        }
    }

    /// Returns the amount of nodes of this layer.
    pub fn width(&self) -> usize {
        self.output.ncols()
    }

    pub fn act_fn(&self) -> ActFn {
        self.act_fn
    }

    /// The activated output row of the last forward pass.
    pub fn output(&self) -> ArrayView1<'_, f64> {
        self.output.row(0)
    }

    /// The delta row of the last backward pass.
    pub fn delta(&self) -> ArrayView1<'_, f64> {
        self.delta.row(0)
    }

    pub(crate) fn output_2d(&self) -> ArrayView2<'_, f64> {
        self.output.view()
    }

    pub(crate) fn delta_2d(&self) -> ArrayView2<'_, f64> {
        self.delta.view()
    }

    /// Gives the output row to write the input into, only meaningful for the input layer.
    pub(crate) fn output_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.output.row_mut(0)
    }

    /// Gives the output buffer to write the pre-activations into, to be followed by `activate`.
    pub(crate) fn preact_mut(&mut self) -> &mut Array2<f64> {
        &mut self.output
    }

    /// Applies the activation function to the pre-activations stored in the output buffer.
    pub(crate) fn activate(&mut self) {
        self.act_fn.apply(self.output.view_mut());
    }

    /// Computes the delta of the output layer: `(a - target) * a'`.
    pub(crate) fn output_delta(&mut self, target: ArrayView1<f64>, rule: BackwardRule) {
        let Self {
            act_fn,
            output,
            delta,
        } = self;

        delta.row_mut(0).assign(&target);
        delta.zip_mut_with(&*output, |d, &a| *d = (a - *d) * rule.df(*act_fn, a));
    }

    /// Computes the delta of a hidden layer: `(next_delta @ w^T) * a'`.
    ///
    /// # Arguments
    /// * `next_delta` - The delta of the layer right after this one.
    /// * `weights` - The weights connecting this layer to the next one, before being updated.
    /// * `rule` - The derivative applied to this layer's output.
    pub(crate) fn hidden_delta(
        &mut self,
        next_delta: ArrayView2<f64>,
        weights: ArrayView2<f64>,
        rule: BackwardRule,
    ) {
        let Self {
            act_fn,
            output,
            delta,
        } = self;

        linalg::general_mat_mul(1.0, &next_delta, &weights.t(), 0.0, delta);
        delta.zip_mut_with(&*output, |d, &a| *d *= rule.df(*act_fn, a));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_layer_is_zeroed() {
        let layer = Layer::new(3, ActFn::Relu);

        assert_eq!(layer.width(), 3);
        assert_eq!(layer.output(), array![0., 0., 0.]);
        assert_eq!(layer.delta(), array![0., 0., 0.]);
    }

    #[test]
    fn test_output_delta_uses_the_logistic_derivative() {
        let mut layer = Layer::new(2, ActFn::Relu);
        layer.output_mut().assign(&array![0.5, 0.25]);
        layer.output_delta(array![1., 0.].view(), BackwardRule::Logistic);

        // (0.5 - 1) * 0.5 * 0.5 and (0.25 - 0) * 0.25 * 0.75
        assert_eq!(layer.delta(), array![-0.125, 0.046875]);
    }

    #[test]
    fn test_hidden_delta_per_activation() {
        let mut layer = Layer::new(2, ActFn::Relu);
        layer.output_mut().assign(&array![2., 0.]);

        let next_delta = array![[1., -1.]];
        let weights = array![[1., 2.], [3., 4.]];
        layer.hidden_delta(next_delta.view(), weights.view(), BackwardRule::PerActivation);

        // [1 - 2, 3 - 4] masked by relu' of [2, 0]
        assert_eq!(layer.delta(), array![-1., 0.]);
    }
}
