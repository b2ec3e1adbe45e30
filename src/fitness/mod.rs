//! Render-based fitness.
//!
//! A genome is rasterized, compared pixel by pixel against the [`Target`]
//! with luma-weighted channel deltas, and the total is normalized so that a
//! pixel-identical render scores exactly 1.0.

mod raster;
mod target;

pub use raster::{Rasterizer, SkiaRasterizer};
pub use target::Target;

use crate::genome::{Genome, Rgba};
use crate::{EvolveError, Evaluator};
use tiny_skia as sk;

/// Largest per-channel delta once 8-bit values are widened to 16 bits.
pub const CHANNEL_RANGE: f64 = 65535.0;

const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Luma-weighted sum of absolute RGB differences over two RGBA8 buffers.
/// Channels are widened to 16 bits (x257) first; alpha is not compared.
pub fn pixel_difference(a: &[u8], b: &[u8]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.chunks_exact(4)
        .zip(b.chunks_exact(4))
        .map(|(pa, pb)| {
            let delta = |i: usize| (pa[i] as f64 - pb[i] as f64).abs() * 257.0;
            delta(0) * LUMA_R + delta(1) * LUMA_G + delta(2) * LUMA_B
        })
        .sum()
}

/// Same as [`pixel_difference`] but refuses images of different sizes.
pub fn image_difference(a: &sk::Pixmap, b: &sk::Pixmap) -> Result<f64, EvolveError> {
    if (a.width(), a.height()) != (b.width(), b.height()) {
        return Err(EvolveError::SizeMismatch {
            got: (a.width(), a.height()),
            expected: (b.width(), b.height()),
        });
    }
    Ok(pixel_difference(a.data(), b.data()))
}

/// Maps a total difference over `width * height` pixels onto `[0, 1]`.
pub fn normalize(total_diff: f64, width: u32, height: u32) -> f64 {
    let max = CHANNEL_RANGE * width as f64 * height as f64;
    ((max - total_diff) / max).clamp(0.0, 1.0)
}

/// Scores polygon genomes against a target image.
pub struct ImageEvaluator<R: Rasterizer = SkiaRasterizer> {
    target: Target,
    rasterizer: R,
    background: Rgba,
}

impl<R: Rasterizer> ImageEvaluator<R> {
    pub fn new(target: Target, rasterizer: R, background: Rgba) -> Self {
        Self {
            target,
            rasterizer,
            background,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn render(&self, genome: &Genome) -> Result<sk::Pixmap, EvolveError> {
        self.rasterizer.render(
            genome,
            self.target.width(),
            self.target.height(),
            self.background,
        )
    }
}

impl<R: Rasterizer> Evaluator<Genome> for ImageEvaluator<R> {
    fn evaluate(&self, genome: &Genome) -> Result<f64, EvolveError> {
        let canvas = self.render(genome)?;
        let diff = image_difference(&canvas, self.target.pixmap())?;
        Ok(normalize(diff, self.target.width(), self.target.height()))
    }
}
