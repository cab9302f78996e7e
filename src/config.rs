use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    arch::{activations::ActFn, layers::BackwardRule, Network},
    optimization::GradientDescentMethod,
    NetErr, Result,
};

/// The description of a single layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub width: usize,
    pub act_fn: ActFn,
}

/// The description of a whole network, from its input layer to its output layer.
///
/// ```json
/// {
///     "method": "sgd",
///     "seed": 7,
///     "layers": [
///         { "width": 2, "act_fn": "linear" },
///         { "width": 3, "act_fn": "sigmoid" },
///         { "width": 2, "act_fn": "softmax" }
///     ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub method: GradientDescentMethod,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub backward_rule: BackwardRule,
    pub layers: Vec<LayerConfig>,
}

impl NetworkConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        parse_json(json)
    }

    /// Loads a `NetworkConfig` from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Checks that the config describes a network that can be run.
    pub fn validate(&self) -> Result<()> {
        if self.layers.len() < 2 {
            return Err(NetErr::InvalidConfig(format!(
                "a network needs at least 2 layers, got {}",
                self.layers.len()
            )));
        }

        if let Some(layer) = self.layers.iter().position(|l| l.width == 0) {
            return Err(NetErr::ZeroWidth { layer });
        }

        Ok(())
    }

    /// Builds the described network with freshly initialized parameters.
    pub fn build(&self) -> Result<Network> {
        self.validate()?;

        let net = match self.seed {
            Some(seed) => Network::with_seed(self.method, seed),
            None => Network::new(self.method),
        };

        let mut net = net.with_backward_rule(self.backward_rule);
        for layer in &self.layers {
            net.add_layer(layer.width, layer.act_fn)?;
        }

        Ok(net)
    }
}

/// The hyperparameters of a `Network::learning` run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub max_epochs: usize,
}

impl TrainingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = parse_json(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `TrainingConfig` from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.) {
            return Err(NetErr::InvalidConfig(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }

        Ok(())
    }
}

// Well formed JSON that does not describe a config is a configuration error, not a parsing one.
pub(crate) fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| {
        if e.is_data() {
            NetErr::InvalidConfig(e.to_string())
        } else {
            NetErr::Json(e)
        }
    })
}
