use log::info;
use ndarray::Zip;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Genome;
use crate::{
    arch::activations::ActFn, optimization::GradientDescentMethod, NetErr, Network, Result,
};

/// The shape of the evolved networks and how aggressively they are mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub input_size: usize,
    pub output_size: usize,
    #[serde(default = "default_hidden")]
    pub hidden: Vec<usize>,
    /// Probability of each weight and bias being perturbed on mutation.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Maximum magnitude of a perturbation.
    #[serde(default = "default_mutation_scale")]
    pub mutation_scale: f64,
}

fn default_hidden() -> Vec<usize> {
    vec![10, 10, 16]
}

fn default_mutation_rate() -> f64 {
    0.2
}

fn default_mutation_scale() -> f64 {
    0.5
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 25,
            input_size: 3,
            output_size: 3,
            hidden: default_hidden(),
            mutation_rate: default_mutation_rate(),
            mutation_scale: default_mutation_scale(),
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(NetErr::InvalidConfig(
                "population_size must be greater than 0".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(NetErr::InvalidConfig(format!(
                "mutation_rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }

        if !self.mutation_scale.is_finite() {
            return Err(NetErr::InvalidConfig(format!(
                "mutation_scale must be finite, got {}",
                self.mutation_scale
            )));
        }

        Ok(())
    }

    /// Builds a network `input (relu) -> hidden... (relu) -> output (softmax)`.
    fn build_network<R: Rng>(&self, rng: &mut R) -> Result<Network> {
        let mut net = Network::with_seed(GradientDescentMethod::Sgd, rng.random());

        net.add_layer(self.input_size, ActFn::Relu)?;
        for &width in &self.hidden {
            net.add_layer(width, ActFn::Relu)?;
        }
        net.add_layer(self.output_size, ActFn::Softmax)?;

        Ok(net)
    }
}

/// Evolves a population of networks by fitness-proportional selection, uniform crossover and
/// random mutation. Fitness is assigned by the caller between generations.
pub struct GeneticAlgorithm<R: Rng> {
    config: EvolutionConfig,
    population: Vec<Genome>,
    generation: usize,
    rng: R,
}

impl<R: Rng> GeneticAlgorithm<R> {
    /// Creates a new `GeneticAlgorithm` with a random initial population.
    ///
    /// # Arguments
    /// * `config` - The evolution parameters.
    /// * `rng` - The source of randomness for initialization and every later generation.
    pub fn new(config: EvolutionConfig, mut rng: R) -> Result<Self> {
        config.validate()?;

        let population = (0..config.population_size)
            .map(|_| config.build_network(&mut rng).map(Genome::new))
            .collect::<Result<_>>()?;

        Ok(Self {
            config,
            population,
            generation: 1,
            rng,
        })
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut [Genome] {
        &mut self.population
    }

    /// Returns the number of the current generation, starting at 1.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the fittest genome of the current generation.
    pub fn best(&self) -> Option<&Genome> {
        self.population
            .iter()
            .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
    }

    /// Replaces the population with the next generation.
    ///
    /// The fittest quarter of the population is kept as the breeding pool. Every child but one
    /// is bred from two parents of the pool, the last spot goes to an unchanged copy of the
    /// fittest genome.
    pub fn evolve(&mut self) {
        let size = self.config.population_size;
        let mut pool = std::mem::take(&mut self.population);
        pool.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        pool.truncate((size / 4).max(1));

        info!(
            generation = self.generation,
            best_fitness = pool[0].fitness();
            "evolving population"
        );

        let rng = &mut self.rng;
        let mut children = Vec::with_capacity(size);
        while children.len() < size - 1 {
            let parent_a = select_parent(&pool, rng);
            let parent_b = select_parent(&pool, rng);

            let mut child = crossover(parent_a, parent_b, rng);
            perturb(
                child.network_mut(),
                self.config.mutation_rate,
                self.config.mutation_scale,
                rng,
            );
            children.push(child);
        }
        children.push(pool[0].offspring());

        self.population = children;
        self.generation += 1;
    }
}

/// Roulette wheel selection: picks a genome with a probability proportional to its fitness.
pub fn select_parent<'a, R: Rng>(pool: &'a [Genome], rng: &mut R) -> &'a Genome {
    let total: f64 = pool.iter().map(Genome::fitness).sum();
    let threshold = rng.random::<f64>() * total;

    let mut running = 0.;
    for genome in pool {
        running += genome.fitness();
        if running >= threshold {
            return genome;
        }
    }

    &pool[pool.len() - 1]
}

/// Uniform crossover: every weight and bias of the child comes from either parent with the same
/// probability.
pub fn crossover<R: Rng>(parent_a: &Genome, parent_b: &Genome, rng: &mut R) -> Genome {
    let mut child = parent_a.offspring();

    let params = child.network_mut().params_mut().iter_mut();
    for (child_params, b_params) in params.zip(parent_b.network().params()) {
        let [weights, bias] = child_params.values_mut();

        Zip::from(weights)
            .and(b_params.weights())
            .for_each(|w, &b| {
                if rng.random_bool(0.5) {
                    *w = b;
                }
            });

        Zip::from(bias).and(b_params.bias()).for_each(|w, &b| {
            if rng.random_bool(0.5) {
                *w = b;
            }
        });
    }

    child
}

/// Perturbs each weight and bias with probability `rate` by a uniform amount in
/// `[-scale, scale)`.
///
/// # Returns
/// An error if `rate` is not a probability.
pub fn mutate<R: Rng>(network: &mut Network, rate: f64, scale: f64, rng: &mut R) -> Result<()> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(NetErr::InvalidConfig(format!(
            "mutation rate must be within [0, 1], got {rate}"
        )));
    }

    perturb(network, rate, scale, rng);
    Ok(())
}

// `rate` must already be within [0, 1].
fn perturb<R: Rng>(network: &mut Network, rate: f64, scale: f64, rng: &mut R) {
    for params in network.params_mut() {
        for values in params.values_mut() {
            values.iter_mut().for_each(|v| {
                if rng.random_bool(rate) {
                    *v += rng.random_range(-1.0..1.0) * scale;
                }
            });
        }
    }
}
