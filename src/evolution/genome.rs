use crate::Network;

/// A member of an evolving population: a network and how well it did.
#[derive(Debug, Clone)]
pub struct Genome {
    network: Network,
    fitness: f64,
}

impl Genome {
    /// Creates a new `Genome` with no fitness.
    pub fn new(network: Network) -> Self {
        Self {
            network,
            fitness: 0.,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Copies the network with its fitness reset.
    pub(crate) fn offspring(&self) -> Self {
        Self::new(self.network.clone())
    }
}
