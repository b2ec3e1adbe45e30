//! (μ, λ) generational engine.
//!
//! Each generation draws λ offspring from the current μ individuals with
//! [`var_or`], scores every offspring that has no cached fitness, then
//! replaces the whole population with μ tournament winners taken from the
//! offspring alone. Parents never survive directly; good genomes persist
//! through reproduction copies.
//!
//! # Example
//!
//! ```rust
//! use polyevo::algorithms::mu_comma_lambda::MuCommaLambda;
//! use polyevo::config::{EvolutionSettings, GenomeConfig};
//! use polyevo::fitness::{ImageEvaluator, Rasterizer, SkiaRasterizer, Target};
//! use polyevo::genome::{Genome, Rgba};
//! use polyevo::Evolver;
//!
//! let white = Rgba::opaque(255, 255, 255);
//! let blank = SkiaRasterizer::default()
//!     .render(&Genome::default(), 16, 16, white)
//!     .unwrap();
//! let evaluator = ImageEvaluator::new(Target::from_pixmap(blank), SkiaRasterizer::default(), white);
//!
//! let settings = EvolutionSettings {
//!     population_size: 8,
//!     offspring: 12,
//!     tournament_size: 3,
//!     ..EvolutionSettings::default()
//! };
//! let mut engine = MuCommaLambda::<Genome>::random(settings, GenomeConfig::new(16, 16, 10), 42).unwrap();
//! let best = engine.run(3, &evaluator, |report, _| println!("{report}")).unwrap();
//! assert!(best.fitness.unwrap() <= 1.0);
//! assert_eq!(engine.population().len(), 8);
//! ```
//!
//! # Concurrency
//!
//! With the `parallel` feature, offspring are scored with rayon on a pool
//! of [`EvolutionSettings::workers`] threads (or the global pool when that
//! is 0). Every task writes only its own offspring's fitness, and `step`
//! does not return until all of them are done. Variation and selection stay
//! on the calling thread with the engine's seeded [`Pcg64`].

use crate::config::EvolutionSettings;
use crate::operators::var_or;
use crate::selection::{best, tournament};
use crate::{EvolveError, Evaluator, Evolver, GenerationReport, Genotype, Individual};
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn evaluate_one<G: Genotype, E: Evaluator<G>>(
    ind: &mut Individual<G>,
    evaluator: &E,
) -> Result<(), EvolveError> {
    if ind.fitness.is_none() {
        ind.fitness = Some(evaluator.evaluate(&ind.genome)?);
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn build_pool(workers: usize) -> Result<rayon::ThreadPool, EvolveError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("evaluator-{i}"))
        .build()?;
    Ok(pool)
}

#[derive(Serialize, Deserialize)]
#[serde(bound = "G: Genotype")]
pub struct MuCommaLambda<G: Genotype> {
    population: Vec<Individual<G>>,
    settings: EvolutionSettings,
    context: G::Context,
    generation: usize,
    rng: Pcg64,
    /// Rebuilt on demand after deserialization.
    #[cfg(feature = "parallel")]
    #[serde(skip)]
    pool: Option<rayon::ThreadPool>,
}

impl<G: Genotype> MuCommaLambda<G> {
    /// Starts from the given genomes, all unevaluated. The population size
    /// kept by selection is the number of genomes passed in.
    ///
    /// # Errors
    ///
    /// [`EvolveError::InvalidConfig`] if the settings or context are
    /// invalid (e.g. `crossover_prob + mutation_prob > 1`), or if the pool
    /// cannot be built.
    pub fn new(
        initial_pop: Vec<G>,
        settings: EvolutionSettings,
        context: G::Context,
        seed: u64,
    ) -> Result<Self, EvolveError> {
        Self::with_rng(initial_pop, settings, context, Pcg64::seed_from_u64(seed))
    }

    /// `settings.population_size` random genomes built from `context`.
    pub fn random(
        settings: EvolutionSettings,
        context: G::Context,
        seed: u64,
    ) -> Result<Self, EvolveError> {
        G::validate_context(&context)?;
        let mut rng = Pcg64::seed_from_u64(seed);
        let initial = (0..settings.population_size)
            .map(|_| G::random(&mut rng, &context))
            .collect();
        Self::with_rng(initial, settings, context, rng)
    }

    fn with_rng(
        initial_pop: Vec<G>,
        mut settings: EvolutionSettings,
        context: G::Context,
        rng: Pcg64,
    ) -> Result<Self, EvolveError> {
        if initial_pop.is_empty() {
            return Err(EvolveError::EmptyPopulation);
        }
        settings.population_size = initial_pop.len();
        settings.validate()?;
        G::validate_context(&context)?;

        #[cfg(feature = "parallel")]
        let pool = match settings.workers {
            0 => None,
            n => Some(build_pool(n)?),
        };

        Ok(Self {
            population: initial_pop.into_iter().map(Individual::new).collect(),
            settings,
            context,
            generation: 0,
            rng,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn settings(&self) -> &EvolutionSettings {
        &self.settings
    }

    pub fn context(&self) -> &G::Context {
        &self.context
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Fittest individual of the current population.
    pub fn best(&self) -> Option<&Individual<G>> {
        best(&self.population)
    }

    /// Runs `generations` steps, handing each report and the generation's
    /// best individual to `on_generation`, and returns the final best.
    pub fn run<E, F>(
        &mut self,
        generations: usize,
        evaluator: &E,
        mut on_generation: F,
    ) -> Result<&Individual<G>, EvolveError>
    where
        E: Evaluator<G>,
        F: FnMut(&GenerationReport, &Individual<G>),
    {
        for _ in 0..generations {
            let report = self.step(evaluator)?;
            if let Some(best) = self.best() {
                on_generation(&report, best);
            }
        }
        self.best().ok_or(EvolveError::EmptyPopulation)
    }

    #[cfg(feature = "parallel")]
    fn evaluate_offspring<E: Evaluator<G>>(
        &mut self,
        offspring: &mut [Individual<G>],
        evaluator: &E,
    ) -> Result<(), EvolveError> {
        if self.pool.is_none() && self.settings.workers > 0 {
            self.pool = Some(build_pool(self.settings.workers)?);
        }
        match &self.pool {
            Some(pool) => pool.install(|| {
                offspring
                    .par_iter_mut()
                    .try_for_each(|ind| evaluate_one(ind, evaluator))
            }),
            None => offspring
                .par_iter_mut()
                .try_for_each(|ind| evaluate_one(ind, evaluator)),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_offspring<E: Evaluator<G>>(
        &mut self,
        offspring: &mut [Individual<G>],
        evaluator: &E,
    ) -> Result<(), EvolveError> {
        offspring
            .iter_mut()
            .try_for_each(|ind| evaluate_one(ind, evaluator))
    }
}

impl<G: Genotype> Evolver<G> for MuCommaLambda<G> {
    fn step<E: Evaluator<G>>(&mut self, evaluator: &E) -> Result<GenerationReport, EvolveError> {
        let mut offspring = var_or(
            &self.population,
            self.settings.offspring,
            self.settings.crossover_prob,
            self.settings.mutation_prob,
            &self.context,
            &mut self.rng,
        )?;

        let pending = offspring.iter().filter(|ind| !ind.is_evaluated()).count();
        self.evaluate_offspring(&mut offspring, evaluator)?;
        log::debug!(
            "generation {}: evaluated {} of {} offspring, {} inherited",
            self.generation,
            pending,
            offspring.len(),
            offspring.len() - pending
        );

        self.population = tournament(
            &offspring,
            self.settings.population_size,
            self.settings.tournament_size,
            &mut self.rng,
        );

        let best = best(&self.population).ok_or(EvolveError::EmptyPopulation)?;
        let report = GenerationReport {
            generation: self.generation,
            best_fitness: best.fitness.unwrap_or(f64::NAN),
            best_size: best.genome.size(),
        };
        log::info!("{report}");
        self.generation += 1;
        Ok(report)
    }

    fn population(&self) -> &[Individual<G>] {
        &self.population
    }
}
