mod genetic_algorithm;
mod genome;

pub use genetic_algorithm::{crossover, mutate, select_parent, EvolutionConfig, GeneticAlgorithm};
pub use genome::Genome;
