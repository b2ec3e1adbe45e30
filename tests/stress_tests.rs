use polyevo::algorithms::mu_comma_lambda::MuCommaLambda;
use polyevo::config::EvolutionSettings;
use polyevo::{EvolveError, Evaluator, Evolver, Genotype};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
struct HeavyDNA(Vec<f64>);

impl Genotype for HeavyDNA {
    type Context = usize;

    fn random<R: Rng>(rng: &mut R, len: &usize) -> Self {
        HeavyDNA((0..*len).map(|_| rng.random::<f64>()).collect())
    }
    fn mutate<R: Rng>(&mut self, rng: &mut R, _len: &usize) {
        let i = rng.random_range(0..self.0.len());
        self.0[i] = rng.random::<f64>();
    }
    fn crossover<R: Rng>(self, other: Self, _rng: &mut R) -> (Self, Self) {
        (other, self)
    }
    fn size(&self) -> usize {
        self.0.len()
    }
}

/// Sleeps to simulate a render and tracks how many evaluations overlap.
#[derive(Default)]
struct HeavyEvaluator {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl Evaluator<HeavyDNA> for HeavyEvaluator {
    fn evaluate(&self, genome: &HeavyDNA) -> Result<f64, EvolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(2));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(genome.0.iter().sum::<f64>() / genome.0.len() as f64)
    }
}

#[test]
fn stress_test_pool_bounds_concurrency() {
    let settings = EvolutionSettings {
        population_size: 50,
        offspring: 200,
        crossover_prob: 0.0,
        mutation_prob: 1.0,
        tournament_size: 3,
        workers: 2,
    };
    let mut engine = MuCommaLambda::<HeavyDNA>::random(settings, 8, 42).unwrap();
    let eval = HeavyEvaluator::default();

    engine.step(&eval).unwrap();

    assert_eq!(eval.calls.load(Ordering::SeqCst), 200, "every mutant is evaluated once");
    assert_eq!(eval.in_flight.load(Ordering::SeqCst), 0, "all tasks joined before selection");
    let peak = eval.peak.load(Ordering::SeqCst);
    #[cfg(feature = "parallel")]
    assert!(peak <= 2, "pool of 2 ran {peak} evaluations at once");
    #[cfg(not(feature = "parallel"))]
    assert_eq!(peak, 1);
}

#[test]
fn stress_test_reproduction_reuses_fitness() {
    let settings = EvolutionSettings {
        population_size: 40,
        offspring: 100,
        crossover_prob: 0.0,
        mutation_prob: 0.0,
        tournament_size: 2,
        workers: 0,
    };
    let mut engine = MuCommaLambda::<HeavyDNA>::random(settings, 4, 7).unwrap();
    let eval = HeavyEvaluator::default();

    // Only the initial, never-scored parents cost an evaluation.
    engine.step(&eval).unwrap();
    let first = eval.calls.load(Ordering::SeqCst);
    assert!(first <= 100);

    // From now on every offspring is a copy of an already scored parent.
    for _ in 0..3 {
        engine.step(&eval).unwrap();
    }
    assert_eq!(eval.calls.load(Ordering::SeqCst), first);
    assert!(engine.population().iter().all(|ind| ind.fitness.is_some()));
}
