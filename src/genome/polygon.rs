use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp into `[0, width] x [0, height]`.
    pub fn clamped(self, width: u32, height: u32) -> Self {
        Self {
            x: self.x.clamp(0.0, width as f64),
            y: self.y.clamp(0.0, height as f64),
        }
    }
}

/// Straight (non-premultiplied) 8-bit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Smallest vertex count a polygon needs to be drawn or mutated.
pub const MIN_VERTICES: usize = 3;

/// A filled polygon. Vertices are kept in angular order around their
/// centroid so the outline never crosses itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub color: Rgba,
    pub vertices: Vec<Point>,
}

impl Polygon {
    /// Builds a polygon and puts its vertices in angular order.
    pub fn new(color: Rgba, vertices: Vec<Point>) -> Self {
        let mut poly = Self { color, vertices };
        poly.repair_ordering();
        poly
    }

    /// A triangle with vertices uniform over the canvas, uniform RGB and
    /// alpha drawn from `[min_alpha, 255]`.
    pub fn random<R: Rng>(rng: &mut R, width: u32, height: u32, min_alpha: u8) -> Self {
        let color = Rgba {
            r: rng.random(),
            g: rng.random(),
            b: rng.random(),
            a: rng.random_range(min_alpha..=u8::MAX),
        };
        let vertices = (0..MIN_VERTICES)
            .map(|_| {
                Point::new(
                    rng.random::<f64>() * width as f64,
                    rng.random::<f64>() * height as f64,
                )
            })
            .collect();
        Self::new(color, vertices)
    }

    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= MIN_VERTICES
    }

    /// Arithmetic mean of the vertices, `None` for a polygon without any.
    pub fn centroid(&self) -> Option<Point> {
        if self.vertices.is_empty() {
            return None;
        }
        let n = self.vertices.len() as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }

    /// Stable sort of the vertices by their angle around the centroid,
    /// measured from the first vertex's direction. The first vertex stays in
    /// place and the resulting outline is star-shaped around the centroid,
    /// hence simple.
    pub fn repair_ordering(&mut self) {
        let Some(center) = self.centroid() else {
            return;
        };
        let base = (self.vertices[0].y - center.y).atan2(self.vertices[0].x - center.x);
        let angle = |p: &Point| ((p.y - center.y).atan2(p.x - center.x) - base).rem_euclid(TAU);
        self.vertices.sort_by(|a, b| angle(a).total_cmp(&angle(b)));
    }

    pub fn insert_vertex(&mut self, point: Point) {
        self.vertices.push(point);
        self.repair_ordering();
    }
}
