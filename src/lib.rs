use rand::Rng;
use serde::{Deserialize, Serialize};

pub use error::EvolveError;

/// The 'DNA' of an individual.
/// Defined by how it changes, not what it does.
///
/// Variation always works on owned values: `mutate` takes `&mut self` of a
/// private copy and `crossover` consumes both inputs, so an offspring can
/// never alias storage of a parent still living in the population.
pub trait Genotype: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Explicit configuration every operator needs (canvas bounds, limits, rates).
    type Context: Clone + Send + Sync + Serialize + for<'de> Deserialize<'de>;

    fn random<R: Rng>(rng: &mut R, ctx: &Self::Context) -> Self;
    fn mutate<R: Rng>(&mut self, rng: &mut R, ctx: &Self::Context);
    fn crossover<R: Rng>(self, other: Self, rng: &mut R) -> (Self, Self);

    /// Number of top-level genes (polygons for the image genome).
    fn size(&self) -> usize;

    /// Rejects a context the operators cannot work with.
    fn validate_context(_ctx: &Self::Context) -> Result<(), EvolveError> {
        Ok(())
    }
}

/// A genome together with its cached score.
/// `fitness` is `None` until the genome has been evaluated.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "G: Genotype")]
pub struct Individual<G: Genotype> {
    pub genome: G,
    pub fitness: Option<f64>,
}

impl<G: Genotype> Individual<G> {
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    pub fn with_fitness(genome: G, fitness: f64) -> Self {
        Self {
            genome,
            fitness: Some(fitness),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }
}

/// A trait for systems that can score a genome.
/// Implementations must be pure with respect to the genome so they can run
/// concurrently on distinct offspring.
pub trait Evaluator<G: Genotype>: Send + Sync {
    /// Returns a score in `[0, 1]`, 1.0 being a perfect match.
    fn evaluate(&self, genome: &G) -> Result<f64, EvolveError>;
}

/// The master engine trait.
pub trait Evolver<G: Genotype> {
    fn step<E: Evaluator<G>>(&mut self, evaluator: &E) -> Result<GenerationReport, EvolveError>;
    fn population(&self) -> &[Individual<G>];
}

/// Summary emitted once per generation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub best_fitness: f64,
    pub best_size: usize,
}

impl std::fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{:.6}\t{}",
            self.generation, self.best_fitness, self.best_size
        )
    }
}

pub mod config;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod selection;
pub mod snapshot;

pub mod algorithms {
    pub mod mu_comma_lambda;
}
