use std::env;

use anyhow::{Context, Result};
use log::info;
use ndarray::{array, Axis};

use feedforward_network::{NetworkConfig, TrainingConfig};

const DEFAULT_NETWORK: &str = r#"{
    "method": "sgd",
    "seed": 7,
    "layers": [
        { "width": 2, "act_fn": "linear" },
        { "width": 4, "act_fn": "sigmoid" },
        { "width": 2, "act_fn": "sigmoid" }
    ]
}"#;

const DEFAULT_TRAINING: &str = r#"{ "learning_rate": 0.5, "max_epochs": 5000 }"#;

/// Trains a network on the xor gate with one-hot targets and reports how many cases it gets right.
///
/// Usage: `feedforward-network [network.json] [training.json]`
fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let network_config = match args.next() {
        Some(path) => NetworkConfig::from_path(&path)
            .with_context(|| format!("cannot load network config '{path}'"))?,
        None => NetworkConfig::from_json(DEFAULT_NETWORK)?,
    };
    let training = match args.next() {
        Some(path) => TrainingConfig::from_path(&path)
            .with_context(|| format!("cannot load training config '{path}'"))?,
        None => TrainingConfig::from_json(DEFAULT_TRAINING)?,
    };

    let x = array![[0., 0.], [0., 1.], [1., 0.], [1., 1.]];
    let y = array![[1., 0.], [0., 1.], [0., 1.], [1., 0.]];

    let mut net = network_config.build().context("cannot build the network")?;
    net.learning(x.view(), y.view(), training.learning_rate, training.max_epochs)?;

    let predictions = net.predictions(x.view(), y.view())?;
    let hits = predictions
        .axis_iter(Axis(0))
        .zip(y.axis_iter(Axis(0)))
        .filter(|(p, t)| p == t)
        .count();

    info!("predictions:\n{predictions}");
    println!("{hits}/{} xor cases classified correctly", y.nrows());

    Ok(())
}
