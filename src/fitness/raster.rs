use crate::EvolveError;
use crate::genome::{Genome, Polygon, Rgba};
use tiny_skia as sk;

/// Turns a genome into pixels. Implementations must be pure functions of
/// their inputs; they are called concurrently from evaluation workers.
pub trait Rasterizer: Send + Sync {
    fn render(
        &self,
        genome: &Genome,
        width: u32,
        height: u32,
        background: Rgba,
    ) -> Result<sk::Pixmap, EvolveError>;
}

/// CPU rasterizer on tiny-skia. Paints an opaque background, then each
/// polygon as a closed path in stored vertex order with its own alpha.
#[derive(Clone, Copy, Debug)]
pub struct SkiaRasterizer {
    pub anti_alias: bool,
}

impl Default for SkiaRasterizer {
    fn default() -> Self {
        Self { anti_alias: true }
    }
}

impl Rasterizer for SkiaRasterizer {
    fn render(
        &self,
        genome: &Genome,
        width: u32,
        height: u32,
        background: Rgba,
    ) -> Result<sk::Pixmap, EvolveError> {
        let mut pix = sk::Pixmap::new(width, height).ok_or_else(|| {
            EvolveError::Render(format!("cannot allocate a {width}x{height} canvas"))
        })?;
        pix.fill(sk::Color::from_rgba8(
            background.r,
            background.g,
            background.b,
            u8::MAX,
        ));
        for poly in &genome.polygons {
            self.draw_polygon(&mut pix, poly);
        }
        Ok(pix)
    }
}

impl SkiaRasterizer {
    fn draw_polygon(&self, pix: &mut sk::Pixmap, poly: &Polygon) {
        if !poly.is_valid() {
            return;
        }
        let mut pb = sk::PathBuilder::new();
        pb.move_to(poly.vertices[0].x as f32, poly.vertices[0].y as f32);
        for v in &poly.vertices[1..] {
            pb.line_to(v.x as f32, v.y as f32);
        }
        pb.close();
        // Collapsed outlines (all vertices on one spot) have no path and no pixels.
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = sk::Paint::default();
        paint.set_color_rgba8(poly.color.r, poly.color.g, poly.color.b, poly.color.a);
        paint.anti_alias = self.anti_alias;
        pix.fill_path(
            &path,
            &paint,
            sk::FillRule::Winding,
            sk::Transform::identity(),
            None,
        );
    }
}
