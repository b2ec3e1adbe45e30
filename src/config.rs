//! Explicit run configuration.
//!
//! Nothing in the crate reads process-wide state: the canvas bounds, genome
//! limits and operator rates travel in a [`GenomeConfig`], the generational
//! parameters in an [`EvolutionSettings`].

use crate::EvolveError;
use serde::{Deserialize, Serialize};

fn check_probability(name: &str, p: f64) -> Result<(), EvolveError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(EvolveError::InvalidConfig(format!(
            "{name} must be in [0, 1], got {p}"
        )))
    }
}

fn check_spread(name: &str, v: f64) -> Result<(), EvolveError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(EvolveError::InvalidConfig(format!(
            "{name} must be finite and non-negative, got {v}"
        )))
    }
}

/// Probabilities and magnitudes of the mutation micro-operators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationRates {
    pub color: f64,
    pub alpha: f64,
    pub add_polygon: f64,
    pub remove_polygon: f64,
    pub add_vertex: f64,
    pub reorder: f64,
    pub jitter_vertex: f64,
    pub jitter_polygon: f64,

    /// Standard deviation of the RGB and alpha noise.
    pub color_sigma: f64,
    /// Standard deviation of the coordinate noise.
    pub vertex_sigma: f64,
    /// Per-axis chance that a jittered vertex moves along that axis.
    pub vertex_axis: f64,
    /// Half-width of the square around the centroid where new vertices land.
    pub vertex_radius: f64,
    /// Lowest alpha a freshly created polygon may get.
    pub min_alpha: u8,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            color: 0.4,
            alpha: 0.5,
            add_polygon: 0.3,
            remove_polygon: 0.2,
            add_vertex: 0.2,
            reorder: 0.3,
            jitter_vertex: 0.7,
            jitter_polygon: 0.1,
            color_sigma: 30.0,
            vertex_sigma: 10.0,
            vertex_axis: 0.4,
            vertex_radius: 75.0,
            min_alpha: 75,
        }
    }
}

impl MutationRates {
    /// Every operator disabled. Handy as a base for targeted tests.
    pub fn none() -> Self {
        Self {
            color: 0.0,
            alpha: 0.0,
            add_polygon: 0.0,
            remove_polygon: 0.0,
            add_vertex: 0.0,
            reorder: 0.0,
            jitter_vertex: 0.0,
            jitter_polygon: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EvolveError> {
        check_probability("color", self.color)?;
        check_probability("alpha", self.alpha)?;
        check_probability("add_polygon", self.add_polygon)?;
        check_probability("remove_polygon", self.remove_polygon)?;
        check_probability("add_vertex", self.add_vertex)?;
        check_probability("reorder", self.reorder)?;
        check_probability("jitter_vertex", self.jitter_vertex)?;
        check_probability("jitter_polygon", self.jitter_polygon)?;
        check_probability("vertex_axis", self.vertex_axis)?;
        check_spread("color_sigma", self.color_sigma)?;
        check_spread("vertex_sigma", self.vertex_sigma)?;
        check_spread("vertex_radius", self.vertex_radius)?;
        Ok(())
    }
}

/// Context handed to every polygon genome operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenomeConfig {
    pub width: u32,
    pub height: u32,
    pub max_polygons: usize,
    pub initial_polygons: usize,
    pub mutation: MutationRates,
}

impl GenomeConfig {
    /// A canvas of `width` x `height` whose genomes start at, and are capped
    /// by, `max_polygons`.
    pub fn new(width: u32, height: u32, max_polygons: usize) -> Self {
        Self {
            width,
            height,
            max_polygons,
            initial_polygons: max_polygons,
            mutation: MutationRates::default(),
        }
    }

    /// Floor enforced by the remove-polygon operator.
    pub fn min_polygons(&self) -> usize {
        (self.max_polygons / 5).max(1)
    }

    pub fn validate(&self) -> Result<(), EvolveError> {
        if self.width == 0 || self.height == 0 {
            return Err(EvolveError::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_polygons == 0 {
            return Err(EvolveError::InvalidConfig(
                "max_polygons must be at least 1".into(),
            ));
        }
        if self.initial_polygons == 0 || self.initial_polygons > self.max_polygons {
            return Err(EvolveError::InvalidConfig(format!(
                "initial_polygons must be in [1, {}], got {}",
                self.max_polygons, self.initial_polygons
            )));
        }
        self.mutation.validate()
    }
}

/// Parameters of the generational loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionSettings {
    /// Individuals kept after each selection (μ).
    pub population_size: usize,
    /// Offspring produced per generation (λ).
    pub offspring: usize,
    pub crossover_prob: f64,
    pub mutation_prob: f64,
    pub tournament_size: usize,
    /// Evaluation threads. 0 uses the global rayon pool.
    pub workers: usize,
}

impl Default for EvolutionSettings {
    fn default() -> Self {
        Self {
            population_size: 256,
            offspring: 120,
            crossover_prob: 0.25,
            mutation_prob: 0.4,
            tournament_size: 16,
            workers: 0,
        }
    }
}

impl EvolutionSettings {
    pub fn validate(&self) -> Result<(), EvolveError> {
        check_probability("crossover_prob", self.crossover_prob)?;
        check_probability("mutation_prob", self.mutation_prob)?;
        if self.crossover_prob + self.mutation_prob > 1.0 {
            return Err(EvolveError::InvalidConfig(format!(
                "crossover_prob + mutation_prob must not exceed 1, got {} + {}",
                self.crossover_prob, self.mutation_prob
            )));
        }
        if self.population_size == 0 {
            return Err(EvolveError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.offspring == 0 {
            return Err(EvolveError::InvalidConfig(
                "offspring must be at least 1".into(),
            ));
        }
        if self.crossover_prob > 0.0 && self.population_size < 2 {
            return Err(EvolveError::InvalidConfig(
                "crossover needs a population of at least 2".into(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(EvolveError::InvalidConfig(
                "tournament_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
