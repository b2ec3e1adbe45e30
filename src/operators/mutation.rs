//! Mutation suite for the polygon genome.
//!
//! [`mutate`] rolls each micro-operator independently, in a fixed order, so
//! one call may apply anywhere from none to all of them. The operators are
//! public on their own so callers can apply a single one deterministically.

use crate::config::GenomeConfig;
use crate::genome::{Genome, Point, Polygon};
use rand::Rng;
use rand::prelude::{IteratorRandom, SliceRandom};
use rand_distr::StandardNormal;

/// `p` must lie in `[0, 1]`, which `GenomeConfig::validate` guarantees.
fn roll<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.random_bool(p)
}

fn gaussian<R: Rng>(rng: &mut R, sigma: f64) -> f64 {
    sigma * rng.sample::<f64, _>(StandardNormal)
}

fn jitter_channel<R: Rng>(value: u8, rng: &mut R, sigma: f64) -> u8 {
    (value as f64 + gaussian(rng, sigma)).round().clamp(0.0, 255.0) as u8
}

/// A uniformly chosen drawable polygon, if the genome has one.
fn pick_polygon<'a, R: Rng>(genome: &'a mut Genome, rng: &mut R) -> Option<&'a mut Polygon> {
    genome.polygons.iter_mut().filter(|p| p.is_valid()).choose(rng)
}

fn jitter_point<R: Rng>(point: &mut Point, rng: &mut R, ctx: &GenomeConfig) {
    let rates = &ctx.mutation;
    if roll(rng, rates.vertex_axis) {
        point.x = (point.x + gaussian(rng, rates.vertex_sigma)).clamp(0.0, ctx.width as f64);
    }
    if roll(rng, rates.vertex_axis) {
        point.y = (point.y + gaussian(rng, rates.vertex_sigma)).clamp(0.0, ctx.height as f64);
    }
}

/// Gaussian noise on the RGB channels of one polygon.
pub fn jitter_color<R: Rng>(genome: &mut Genome, rng: &mut R, ctx: &GenomeConfig) {
    let sigma = ctx.mutation.color_sigma;
    if let Some(poly) = pick_polygon(genome, rng) {
        poly.color.r = jitter_channel(poly.color.r, rng, sigma);
        poly.color.g = jitter_channel(poly.color.g, rng, sigma);
        poly.color.b = jitter_channel(poly.color.b, rng, sigma);
    }
}

/// Gaussian noise on the alpha channel of one polygon.
pub fn jitter_alpha<R: Rng>(genome: &mut Genome, rng: &mut R, ctx: &GenomeConfig) {
    let sigma = ctx.mutation.color_sigma;
    if let Some(poly) = pick_polygon(genome, rng) {
        poly.color.a = jitter_channel(poly.color.a, rng, sigma);
    }
}

pub fn add_polygon<R: Rng>(genome: &mut Genome, rng: &mut R, ctx: &GenomeConfig) {
    if genome.len() < ctx.max_polygons {
        genome.polygons.push(Polygon::random(
            rng,
            ctx.width,
            ctx.height,
            ctx.mutation.min_alpha,
        ));
    }
}

/// Drops one polygon unless the genome is already at the configured floor.
pub fn remove_polygon<R: Rng>(genome: &mut Genome, rng: &mut R, ctx: &GenomeConfig) {
    if genome.len() > ctx.min_polygons() {
        let idx = rng.random_range(0..genome.len());
        genome.polygons.remove(idx);
    }
}

/// Inserts a vertex near the centroid of one polygon, then restores the
/// angular ordering.
pub fn add_vertex<R: Rng>(genome: &mut Genome, rng: &mut R, ctx: &GenomeConfig) {
    let radius = ctx.mutation.vertex_radius;
    let Some(poly) = pick_polygon(genome, rng) else {
        return;
    };
    let Some(center) = poly.centroid() else {
        return;
    };
    let dx = (rng.random::<f64>() * 2.0 - 1.0) * radius;
    let dy = (rng.random::<f64>() * 2.0 - 1.0) * radius;
    let point = Point::new(center.x + dx, center.y + dy).clamped(ctx.width, ctx.height);
    poly.insert_vertex(point);
}

/// Shuffles the paint order.
pub fn reorder<R: Rng>(genome: &mut Genome, rng: &mut R, _ctx: &GenomeConfig) {
    genome.polygons.shuffle(rng);
}

/// Moves one vertex of one polygon.
pub fn jitter_vertex<R: Rng>(genome: &mut Genome, rng: &mut R, ctx: &GenomeConfig) {
    let Some(poly) = pick_polygon(genome, rng) else {
        return;
    };
    let idx = rng.random_range(0..poly.vertices.len());
    jitter_point(&mut poly.vertices[idx], rng, ctx);
}

/// Moves every vertex of one polygon.
pub fn jitter_polygon<R: Rng>(genome: &mut Genome, rng: &mut R, ctx: &GenomeConfig) {
    let Some(poly) = pick_polygon(genome, rng) else {
        return;
    };
    for vertex in &mut poly.vertices {
        jitter_point(vertex, rng, ctx);
    }
}

pub fn mutate<R: Rng>(genome: &mut Genome, rng: &mut R, ctx: &GenomeConfig) {
    let rates = &ctx.mutation;
    if roll(rng, rates.color) {
        jitter_color(genome, rng, ctx);
    }
    if roll(rng, rates.alpha) {
        jitter_alpha(genome, rng, ctx);
    }
    if roll(rng, rates.add_polygon) {
        add_polygon(genome, rng, ctx);
    }
    if roll(rng, rates.remove_polygon) {
        remove_polygon(genome, rng, ctx);
    }
    if roll(rng, rates.add_vertex) {
        add_vertex(genome, rng, ctx);
    }
    if roll(rng, rates.reorder) {
        reorder(genome, rng, ctx);
    }
    if roll(rng, rates.jitter_vertex) {
        jitter_vertex(genome, rng, ctx);
    }
    if roll(rng, rates.jitter_polygon) {
        jitter_polygon(genome, rng, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn jitter_channel_saturates() {
        let mut rng = Pcg64::seed_from_u64(7);
        // Huge noise must pile up on the bounds instead of wrapping around.
        let saturated = (0..1000)
            .map(|_| jitter_channel(128, &mut rng, 1000.0))
            .filter(|&v| v == 0 || v == 255)
            .count();
        assert!(saturated > 800, "only {saturated} draws saturated");
        assert_eq!(jitter_channel(128, &mut rng, 0.0), 128);
    }

    #[test]
    fn roll_respects_probability_bounds() {
        let mut rng = Pcg64::seed_from_u64(11);
        assert!((0..500).all(|_| !roll(&mut rng, 0.0)));
        assert!((0..500).all(|_| roll(&mut rng, 1.0)));
        let hits = (0..2000).filter(|_| roll(&mut rng, 0.3)).count();
        assert!((450..750).contains(&hits), "{hits} hits at p = 0.3");
    }

    #[test]
    fn pick_polygon_skips_degenerate_shapes() {
        let mut rng = Pcg64::seed_from_u64(3);
        let line = Polygon {
            color: crate::genome::Rgba::opaque(0, 0, 0),
            vertices: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        };
        let mut genome = Genome::new(vec![line]);
        assert!(pick_polygon(&mut genome, &mut rng).is_none());
    }
}
