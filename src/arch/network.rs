use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::{rngs::StdRng, SeedableRng};

use super::{
    activations::ActFn,
    layers::{BackwardRule, Layer, Params},
};
use crate::{optimization::GradientDescentMethod, NetErr, Result};

/// A feedforward network: a stack of fully connected layers where information flows forward when
/// computing an output and backward when computing the *deltas* of its layers.
///
/// `params[i]` always connects `layers[i]` to `layers[i + 1]`.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    params: Vec<Params>,
    method: GradientDescentMethod,
    backward_rule: BackwardRule,
    rng: StdRng,
}

impl Network {
    /// Creates a new empty `Network` whose parameters will be initialized from OS entropy.
    ///
    /// # Arguments
    /// * `method` - The gradient descent method used by `backpropagation`.
    pub fn new(method: GradientDescentMethod) -> Self {
        Self::with_rng(method, StdRng::from_os_rng())
    }

    /// Creates a new empty `Network` whose parameters will be initialized from a seeded generator,
    /// so that two networks with the same seed and architecture start out identical.
    pub fn with_seed(method: GradientDescentMethod, seed: u64) -> Self {
        Self::with_rng(method, StdRng::seed_from_u64(seed))
    }

    fn with_rng(method: GradientDescentMethod, rng: StdRng) -> Self {
        Self {
            layers: Vec::new(),
            params: Vec::new(),
            method,
            backward_rule: BackwardRule::default(),
            rng,
        }
    }

    /// Replaces the rule used to differentiate layer outputs in the backward pass.
    pub fn with_backward_rule(mut self, backward_rule: BackwardRule) -> Self {
        self.backward_rule = backward_rule;
        self
    }

    /// Appends a layer at the end of the network. Unless it is the first one, the parameters
    /// connecting it to the previous layer are created too, uniformly drawn from `[-1, 1]`.
    ///
    /// # Arguments
    /// * `width` - The amount of nodes of the new layer.
    /// * `act_fn` - The activation function of the new layer.
    ///
    /// # Returns
    /// An error if `width` is zero.
    pub fn add_layer(&mut self, width: usize, act_fn: ActFn) -> Result<()> {
        let index = self.layers.len();
        if width == 0 {
            return Err(NetErr::ZeroWidth { layer: index });
        }

        if let Some(prev) = self.layers.last() {
            let dim = (prev.width(), width);
            self.params.push(Params::random(dim, &mut self.rng)?);
        }

        self.layers.push(Layer::new(width, act_fn));
        debug!(layer = index, width = width; "appended {act_fn} layer");
        Ok(())
    }

    /// Same as `add_layer` but takes the activation function by name.
    ///
    /// # Returns
    /// An error if the name is not a known activation function or `width` is zero.
    pub fn add_layer_named(&mut self, width: usize, act_fn: &str) -> Result<()> {
        self.add_layer(width, act_fn.parse()?)
    }

    /// Overwrites the parameters connecting layer `index` to layer `index + 1`.
    ///
    /// # Arguments
    /// * `index` - The position of the parameters.
    /// * `weights` - A `[layers[index].width, layers[index + 1].width]` matrix.
    /// * `bias` - A `layers[index + 1].width` long vector.
    pub fn set_params(
        &mut self,
        index: usize,
        weights: Array2<f64>,
        bias: Array1<f64>,
    ) -> Result<()> {
        let len = self.params.len();
        let params = self
            .params
            .get_mut(index)
            .ok_or(NetErr::ParamsOutOfRange { index, len })?;

        let (rows, cols) = params.dim();
        check_size("weight rows", weights.nrows(), rows)?;
        check_size("weight columns", weights.ncols(), cols)?;
        check_size("bias", bias.len(), cols)?;

        *params = Params::from_parts(weights, bias.insert_axis(Axis(0)));
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn params(&self) -> &[Params] {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut [Params] {
        &mut self.params
    }

    /// Returns the amount of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn method(&self) -> GradientDescentMethod {
        self.method
    }

    pub fn backward_rule(&self) -> BackwardRule {
        self.backward_rule
    }

    /// Makes a forward pass through the network, storing every layer's output.
    ///
    /// # Arguments
    /// * `datapoint` - The input, as long as the first layer is wide.
    ///
    /// # Returns
    /// The output row of the last layer or an error if the network has less than two layers or
    /// the datapoint does not fit the input layer.
    pub fn feedforward(&mut self, datapoint: ArrayView1<f64>) -> Result<ArrayView1<'_, f64>> {
        let (input_width, _) = self.io_widths()?;
        check_size("datapoint", datapoint.len(), input_width)?;

        self.layers[0].output_mut().assign(&datapoint);
        for (i, params) in self.params.iter().enumerate() {
            let (upstream, downstream) = self.layers.split_at_mut(i + 1);
            let next = &mut downstream[0];

            params.forward(upstream[i].output_2d(), next.preact_mut());
            next.activate();
        }

        let last = self.layers.len() - 1;
        Ok(self.layers[last].output())
    }

    /// Makes a training step on a single example: a forward pass, then a backward pass computing
    /// every layer's delta and updating each set of parameters as soon as the delta after it is
    /// known. Hidden deltas are computed with the weights as they were before this step.
    ///
    /// # Arguments
    /// * `learning_rate` - The length of the gradient descent step.
    /// * `datapoint` - The input.
    /// * `target` - The expected output.
    pub fn backpropagation(
        &mut self,
        learning_rate: f64,
        datapoint: ArrayView1<f64>,
        target: ArrayView1<f64>,
    ) -> Result<()> {
        check_learning_rate(learning_rate)?;
        let (_, output_width) = self.io_widths()?;
        check_size("target", target.len(), output_width)?;

        self.feedforward(datapoint)?;

        let rule = self.backward_rule;
        let last = self.layers.len() - 1;
        self.layers[last].output_delta(target, rule);

        for i in (0..last).rev() {
            let (upstream, downstream) = self.layers.split_at_mut(i + 1);
            let (layer, next) = (&mut upstream[i], &downstream[0]);
            let params = &mut self.params[i];

            if i > 0 {
                layer.hidden_delta(next.delta_2d(), params.weights(), rule);
            }

            params.compute_grad(layer.output_2d(), next.delta_2d());
            self.method.step(params, learning_rate);
        }

        Ok(())
    }

    /// Trains the network for `max_epochs` epochs, each one a training step per example in
    /// dataset order.
    ///
    /// # Arguments
    /// * `dataset` - The inputs, one per row.
    /// * `targets` - The expected outputs, one per row, paired with `dataset`.
    /// * `learning_rate` - The length of each gradient descent step.
    /// * `max_epochs` - The amount of passes over the dataset.
    ///
    /// Every epoch runs even if the parameters diverge; the first epoch after which they are no
    /// longer finite is logged.
    ///
    /// # Returns
    /// An error if the data does not fit the network or the learning rate is not positive.
    pub fn learning(
        &mut self,
        dataset: ArrayView2<f64>,
        targets: ArrayView2<f64>,
        learning_rate: f64,
        max_epochs: usize,
    ) -> Result<()> {
        check_learning_rate(learning_rate)?;
        self.check_data(dataset, targets)?;

        info!(
            epochs = max_epochs,
            samples = dataset.nrows(),
            learning_rate = learning_rate;
            "training started"
        );

        let mut diverged = false;
        for epoch in 0..max_epochs {
            for (x, y) in dataset.outer_iter().zip(targets.outer_iter()) {
                self.backpropagation(learning_rate, x, y)?;
            }

            if !diverged && !self.params.iter().all(Params::is_finite) {
                diverged = true;
                warn!(epoch = epoch; "parameters diverged to non-finite values");
            }

            debug!(epoch = epoch; "epoch finished");
        }

        info!("training finished");
        Ok(())
    }

    /// Classifies every example of `dataset` as the one-hot encoding of the network's strongest
    /// output, ties going to the lowest index.
    ///
    /// # Arguments
    /// * `dataset` - The inputs, one per row.
    /// * `targets` - Only used for its shape, which the predictions take.
    ///
    /// # Returns
    /// A matrix of one-hot rows shaped like `targets`.
    pub fn predictions(
        &mut self,
        dataset: ArrayView2<f64>,
        targets: ArrayView2<f64>,
    ) -> Result<Array2<f64>> {
        self.check_data(dataset, targets)?;

        let mut predictions = Array2::zeros(targets.raw_dim());
        for (x, mut row) in dataset.outer_iter().zip(predictions.outer_iter_mut()) {
            let class = argmax(self.feedforward(x)?);
            row[class] = 1.;
        }

        Ok(predictions)
    }

    fn io_widths(&self) -> Result<(usize, usize)> {
        match (self.layers.first(), self.layers.last()) {
            (Some(first), Some(last)) if self.layers.len() >= 2 => Ok((first.width(), last.width())),
            _ => Err(NetErr::TooFewLayers {
                got: self.layers.len(),
            }),
        }
    }

    fn check_data(&self, dataset: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<()> {
        let (input_width, output_width) = self.io_widths()?;
        check_size("dataset columns", dataset.ncols(), input_width)?;
        check_size("target columns", targets.ncols(), output_width)?;
        check_size("target rows", targets.nrows(), dataset.nrows())
    }
}

fn check_learning_rate(learning_rate: f64) -> Result<()> {
    if !(learning_rate.is_finite() && learning_rate > 0.) {
        return Err(NetErr::InvalidLearningRate(learning_rate));
    }

    Ok(())
}

fn check_size(what: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(NetErr::SizeMismatch {
            what,
            got,
            expected,
        });
    }

    Ok(())
}

/// Index of the greatest value, the first one on ties. A NaN counts as greater than anything, so
/// the first NaN wins.
pub fn argmax(row: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v.is_nan() {
            return i;
        }
        if v > row[best] {
            best = i;
        }
    }

    best
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrKind;
    use ndarray::array;

    fn network(widths: &[usize], act_fn: ActFn) -> Network {
        let mut net = Network::with_seed(GradientDescentMethod::Sgd, 42);
        for &width in widths {
            net.add_layer(width, act_fn).unwrap();
        }
        net
    }

    #[test]
    fn test_add_layer_creates_params_between_pairs() {
        let net = network(&[3, 5, 2], ActFn::Sigmoid);

        assert_eq!(net.len(), 3);
        assert_eq!(net.params().len(), 2);
        assert_eq!(net.params()[0].dim(), (3, 5));
        assert_eq!(net.params()[1].dim(), (5, 2));
        assert_eq!(net.params()[1].bias().dim(), (1, 2));
    }

    #[test]
    fn test_add_layer_rejects_zero_width() {
        let mut net = network(&[2], ActFn::Linear);
        let err = net.add_layer(0, ActFn::Linear).unwrap_err();

        assert!(matches!(err, NetErr::ZeroWidth { layer: 1 }));
        assert_eq!(net.len(), 1);
        assert!(net.params().is_empty());
    }

    #[test]
    fn test_add_layer_named_rejects_unknown_names() {
        let mut net = network(&[2], ActFn::Linear);
        let err = net.add_layer_named(2, "gelu").unwrap_err();

        assert_eq!(err.kind(), ErrKind::Configuration);
        assert_eq!(net.len(), 1);
    }

    #[test]
    fn test_feedforward_needs_two_layers() {
        let mut net = network(&[2], ActFn::Linear);
        let err = net.feedforward(array![1., 2.].view()).unwrap_err();

        assert!(matches!(err, NetErr::TooFewLayers { got: 1 }));
    }

    #[test]
    fn test_feedforward_rejects_wrong_input_width() {
        let mut net = network(&[2, 2], ActFn::Linear);
        let err = net.feedforward(array![1., 2., 3.].view()).unwrap_err();

        assert_eq!(err.kind(), ErrKind::Structure);
    }

    #[test]
    fn test_feedforward_linear() {
        let mut net = network(&[2, 2, 1], ActFn::Linear);
        net.set_params(0, array![[1., 0.], [0., 2.]], array![1., 1.])
            .unwrap();
        net.set_params(1, array![[1.], [-1.]], array![0.5]).unwrap();

        // [3, 4] -> [4, 9] -> [-4.5]
        let y = net.feedforward(array![3., 4.].view()).unwrap();
        assert_eq!(y, array![-4.5]);
        assert_eq!(net.layers()[1].output(), array![4., 9.]);
    }

    #[test]
    fn test_set_params_validates_shapes() {
        let mut net = network(&[2, 3], ActFn::Linear);

        let err = net
            .set_params(0, Array2::zeros((3, 2)), Array1::zeros(3))
            .unwrap_err();
        assert!(matches!(err, NetErr::SizeMismatch { .. }));

        let err = net
            .set_params(1, Array2::zeros((2, 3)), Array1::zeros(3))
            .unwrap_err();
        assert!(matches!(err, NetErr::ParamsOutOfRange { index: 1, len: 1 }));
    }

    #[test]
    fn test_backpropagation_rejects_wrong_target_width() {
        let mut net = network(&[2, 3], ActFn::Sigmoid);
        let before = net.params().to_vec();

        let err = net
            .backpropagation(0.1, array![1., 0.].view(), array![1., 0.].view())
            .unwrap_err();

        assert_eq!(err.kind(), ErrKind::Structure);
        assert_eq!(net.params(), &before[..]);
    }

    #[test]
    fn test_hidden_delta_uses_weights_before_the_update() {
        let mut net = network(&[1, 1, 1], ActFn::Sigmoid);
        net.set_params(0, array![[0.]], array![0.]).unwrap();
        net.set_params(1, array![[2.]], array![0.]).unwrap();

        net.backpropagation(1., array![0.].view(), array![0.].view())
            .unwrap();

        let hidden = net.layers()[1].output()[0];
        let out = net.layers()[2].output()[0];
        let out_delta = out * (out * (1. - out));
        assert_eq!(net.layers()[2].delta()[0], out_delta);

        let hidden_delta = (out_delta * 2.) * (hidden * (1. - hidden));
        assert_eq!(net.layers()[1].delta()[0], hidden_delta);
        assert_eq!(net.params()[1].weights()[[0, 0]], 2. - hidden * out_delta);
    }

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(array![0.1, 0.7, 0.7].view()), 1);
        assert_eq!(argmax(array![-3., -1., -2.].view()), 1);
        assert_eq!(argmax(array![5.].view()), 0);
    }

    #[test]
    fn test_argmax_first_nan_wins() {
        assert_eq!(argmax(array![0.3, f64::NAN, 0.5].view()), 1);
        assert_eq!(argmax(array![f64::NAN, f64::NAN].view()), 0);
        assert_eq!(argmax(array![0.9, 0.1, f64::NAN].view()), 2);
    }

    #[test]
    fn test_learning_rate_must_be_positive() {
        let mut net = network(&[2, 2], ActFn::Sigmoid);
        let before = net.params().to_vec();
        let x = array![[1., 0.]];
        let y = array![[0., 1.]];

        for rate in [0., -0.5, f64::NAN, f64::INFINITY] {
            let err = net.learning(x.view(), y.view(), rate, 1).unwrap_err();
            assert!(matches!(err, NetErr::InvalidLearningRate(_)));
            assert_eq!(err.kind(), ErrKind::Configuration);

            let err = net
                .backpropagation(rate, x.row(0), y.row(0))
                .unwrap_err();
            assert_eq!(err.kind(), ErrKind::Configuration);
        }

        assert_eq!(net.params(), &before[..]);
    }

    #[test]
    fn test_predictions_check_shapes() {
        let mut net = network(&[2, 3], ActFn::Sigmoid);

        let err = net
            .predictions(Array2::zeros((4, 2)).view(), Array2::zeros((3, 3)).view())
            .unwrap_err();
        assert!(matches!(err, NetErr::SizeMismatch { what: "target rows", .. }));

        let err = net
            .predictions(Array2::zeros((4, 2)).view(), Array2::zeros((4, 2)).view())
            .unwrap_err();
        assert!(matches!(err, NetErr::SizeMismatch { what: "target columns", .. }));
    }
}
