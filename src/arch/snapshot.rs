use std::{fs, path::Path};

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{layers::BackwardRule, Network};
use crate::{config::LayerConfig, optimization::GradientDescentMethod, NetErr, Result};

/// The trained values of one set of parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsSnapshot {
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
}

/// Everything needed to rebuild a network exactly as it was: its architecture and the current
/// value of every parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub method: GradientDescentMethod,
    pub backward_rule: BackwardRule,
    pub layers: Vec<LayerConfig>,
    pub params: Vec<ParamsSnapshot>,
}

impl NetworkSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the snapshot as JSON to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reads a snapshot written by `save`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl Network {
    /// Captures the architecture and parameters of this network.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let layers = self
            .layers()
            .iter()
            .map(|layer| LayerConfig {
                width: layer.width(),
                act_fn: layer.act_fn(),
            })
            .collect();

        let params = self
            .params()
            .iter()
            .map(|params| ParamsSnapshot {
                weights: params.weights().to_owned(),
                bias: params.bias().row(0).to_owned(),
            })
            .collect();

        NetworkSnapshot {
            method: self.method(),
            backward_rule: self.backward_rule(),
            layers,
            params,
        }
    }

    /// Rebuilds a network from a snapshot.
    ///
    /// # Returns
    /// An error if the parameters do not fit the layers they connect.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self> {
        let NetworkSnapshot {
            method,
            backward_rule,
            layers,
            params,
        } = snapshot;

        let expected = layers.len().saturating_sub(1);
        if params.len() != expected {
            return Err(NetErr::SizeMismatch {
                what: "snapshot params",
                got: params.len(),
                expected,
            });
        }

        let mut net = Network::with_seed(method, 0).with_backward_rule(backward_rule);
        for layer in layers {
            net.add_layer(layer.width, layer.act_fn)?;
        }

        for (i, ParamsSnapshot { weights, bias }) in params.into_iter().enumerate() {
            net.set_params(i, weights, bias)?;
        }

        Ok(net)
    }
}
