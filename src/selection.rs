//! Selection strategies.
//!
//! Unevaluated individuals and NaN scores rank below every real score.

use crate::{Genotype, Individual};
use rand::Rng;

fn rank(fitness: Option<f64>) -> Option<f64> {
    fitness.filter(|f| !f.is_nan())
}

/// True if `candidate` strictly beats `incumbent`.
pub fn beats<G: Genotype>(candidate: &Individual<G>, incumbent: &Individual<G>) -> bool {
    match (rank(candidate.fitness), rank(incumbent.fitness)) {
        (Some(c), Some(i)) => c > i,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Highest-fitness individual, ties going to the first one seen.
/// Returns `None` on empty input.
pub fn best<'a, G, I>(individuals: I) -> Option<&'a Individual<G>>
where
    G: Genotype + 'a,
    I: IntoIterator<Item = &'a Individual<G>>,
{
    individuals.into_iter().fold(None, |winner, ind| match winner {
        Some(w) if !beats(ind, w) => Some(w),
        _ => Some(ind),
    })
}

/// `k` winners of independent tournaments. Each tournament draws
/// `tournament_size` contestants uniformly *with replacement* and keeps the
/// best of them, so one individual can win several times. A size of 0 is
/// treated as 1; an empty input yields no winners.
pub fn tournament<G: Genotype, R: Rng>(
    individuals: &[Individual<G>],
    k: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Individual<G>> {
    if individuals.is_empty() {
        return Vec::new();
    }
    let n = individuals.len();
    let size = tournament_size.max(1);
    let mut winners = Vec::with_capacity(k);
    for _ in 0..k {
        let mut winner = &individuals[rng.random_range(0..n)];
        for _ in 1..size {
            let contender = &individuals[rng.random_range(0..n)];
            if beats(contender, winner) {
                winner = contender;
            }
        }
        winners.push(winner.clone());
    }
    winners
}
