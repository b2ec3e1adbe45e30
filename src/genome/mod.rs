//! Polygon genome.
//!
//! A [`Genome`] is an ordered list of [`Polygon`]s painted back to front.
//! It owns every polygon and vertex outright (no shared pointers), so
//! `clone()` is a deep copy and an offspring can be mutated without touching
//! its parent.

mod polygon;

pub use polygon::{MIN_VERTICES, Point, Polygon, Rgba};

use crate::config::GenomeConfig;
use crate::operators::{crossover, mutation};
use crate::{EvolveError, Genotype};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub polygons: Vec<Polygon>,
}

impl Genome {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// `count` random triangles on the configured canvas.
    pub fn random_with<R: Rng>(rng: &mut R, ctx: &GenomeConfig, count: usize) -> Self {
        let polygons = (0..count)
            .map(|_| Polygon::random(rng, ctx.width, ctx.height, ctx.mutation.min_alpha))
            .collect();
        Self { polygons }
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices.len()).sum()
    }
}

impl Genotype for Genome {
    type Context = GenomeConfig;

    fn random<R: Rng>(rng: &mut R, ctx: &GenomeConfig) -> Self {
        Self::random_with(rng, ctx, ctx.initial_polygons)
    }

    fn mutate<R: Rng>(&mut self, rng: &mut R, ctx: &GenomeConfig) {
        mutation::mutate(self, rng, ctx);
    }

    /// One-point crossover. Parents shorter than three polygons are returned
    /// unchanged.
    fn crossover<R: Rng>(self, other: Self, rng: &mut R) -> (Self, Self) {
        if self.len().min(other.len()) < crossover::MIN_PARENT_LEN {
            return (self, other);
        }
        let (a, b) = crossover::one_point(self.polygons, other.polygons, rng);
        (Genome::new(a), Genome::new(b))
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn validate_context(ctx: &GenomeConfig) -> Result<(), EvolveError> {
        ctx.validate()
    }
}
