use crate::{EvolveError, Genotype, Individual};
use rand::Rng;
use rand::seq::index;

/// Which operator produced an offspring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variation {
    Crossover,
    Mutation,
    Reproduction,
}

impl Variation {
    /// Draws the operator for one offspring slot.
    pub fn choose<R: Rng>(rng: &mut R, crossover_prob: f64, mutation_prob: f64) -> Self {
        let choice = rng.random::<f64>();
        if choice < crossover_prob {
            Variation::Crossover
        } else if choice < crossover_prob + mutation_prob {
            Variation::Mutation
        } else {
            Variation::Reproduction
        }
    }
}

/// Produces exactly `lambda` offspring from `population`.
///
/// Each slot independently becomes, with probability `crossover_prob`, the
/// first child of a crossover between two distinct parents; with probability
/// `mutation_prob` a mutated copy of one parent; otherwise a plain copy.
/// Crossover and mutation children are unevaluated. Reproduced children
/// keep the parent's cached fitness since their genome is identical.
///
/// Parents are only ever read; every child is built from its own deep copy.
pub fn var_or<G: Genotype, R: Rng>(
    population: &[Individual<G>],
    lambda: usize,
    crossover_prob: f64,
    mutation_prob: f64,
    ctx: &G::Context,
    rng: &mut R,
) -> Result<Vec<Individual<G>>, EvolveError> {
    if crossover_prob + mutation_prob > 1.0 {
        return Err(EvolveError::InvalidConfig(format!(
            "crossover_prob + mutation_prob must not exceed 1, got {crossover_prob} + {mutation_prob}"
        )));
    }
    if population.is_empty() {
        return Err(EvolveError::EmptyPopulation);
    }
    if crossover_prob > 0.0 && population.len() < 2 {
        return Err(EvolveError::InvalidConfig(
            "crossover needs at least two parents".into(),
        ));
    }

    let n = population.len();
    let mut offspring = Vec::with_capacity(lambda);
    for _ in 0..lambda {
        let child = match Variation::choose(rng, crossover_prob, mutation_prob) {
            Variation::Crossover => {
                let pair = index::sample(rng, n, 2);
                let a = population[pair.index(0)].genome.clone();
                let b = population[pair.index(1)].genome.clone();
                let (first, _) = a.crossover(b, rng);
                Individual::new(first)
            }
            Variation::Mutation => {
                let mut genome = population[rng.random_range(0..n)].genome.clone();
                genome.mutate(rng, ctx);
                Individual::new(genome)
            }
            Variation::Reproduction => population[rng.random_range(0..n)].clone(),
        };
        offspring.push(child);
    }
    Ok(offspring)
}
