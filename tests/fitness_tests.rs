use polyevo::config::GenomeConfig;
use polyevo::fitness::{
    ImageEvaluator, Rasterizer, SkiaRasterizer, Target, image_difference, normalize,
    pixel_difference,
};
use polyevo::genome::{Genome, Point, Polygon, Rgba};
use polyevo::{EvolveError, Evaluator, Genotype};
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;
use tiny_skia::Pixmap;

const WHITE: Rgba = Rgba::opaque(255, 255, 255);

fn solid_target(width: u32, height: u32, color: Rgba) -> Target {
    let rgba: Vec<u8> = (0..width * height)
        .flat_map(|_| [color.r, color.g, color.b, color.a])
        .collect();
    Target::from_rgba(width, height, &rgba).unwrap()
}

fn rendered_target(genome: &Genome, width: u32, height: u32) -> Target {
    let pix = SkiaRasterizer::default()
        .render(genome, width, height, WHITE)
        .unwrap();
    Target::from_pixmap(pix)
}

// ============================================================================
// Pixel difference
// ============================================================================

#[test]
fn test_pixel_difference_weights_and_ignores_alpha() {
    let a = [0u8, 0, 0, 255];
    let red = [1u8, 0, 0, 0];
    let green = [0u8, 1, 0, 255];
    let blue = [0u8, 0, 1, 17];
    assert!((pixel_difference(&a, &red) - 0.299 * 257.0).abs() < 1e-9);
    assert!((pixel_difference(&a, &green) - 0.587 * 257.0).abs() < 1e-9);
    assert!((pixel_difference(&a, &blue) - 0.114 * 257.0).abs() < 1e-9);
    assert_eq!(pixel_difference(&[9, 9, 9, 0], &[9, 9, 9, 255]), 0.0);
}

#[test]
fn test_black_against_white_scores_zero() {
    let black = solid_target(8, 8, Rgba::opaque(0, 0, 0));
    let white = solid_target(8, 8, WHITE);
    let diff = image_difference(black.pixmap(), white.pixmap()).unwrap();
    assert!(normalize(diff, 8, 8).abs() < 1e-9);
}

#[test]
fn test_size_mismatch_is_an_error() {
    let a = Pixmap::new(4, 4).unwrap();
    let b = Pixmap::new(4, 5).unwrap();
    assert!(matches!(
        image_difference(&a, &b),
        Err(EvolveError::SizeMismatch { .. })
    ));
}

// ============================================================================
// Evaluator
// ============================================================================

#[test]
fn test_exact_render_scores_one() {
    let mut rng = Pcg64::seed_from_u64(42);
    let ctx = GenomeConfig::new(32, 24, 8);
    let genome = Genome::random(&mut rng, &ctx);
    let evaluator = ImageEvaluator::new(
        rendered_target(&genome, 32, 24),
        SkiaRasterizer::default(),
        WHITE,
    );
    assert_eq!(evaluator.evaluate(&genome).unwrap(), 1.0);
}

#[test]
fn test_evaluator_exposes_its_canvas() {
    let mut rng = Pcg64::seed_from_u64(5);
    let ctx = GenomeConfig::new(20, 12, 4);
    let genome = Genome::random(&mut rng, &ctx);
    let background = Rgba::opaque(10, 200, 30);
    let evaluator = ImageEvaluator::new(
        solid_target(20, 12, background),
        SkiaRasterizer { anti_alias: false },
        background,
    );

    assert_eq!((evaluator.target().width(), evaluator.target().height()), (20, 12));
    assert_eq!(evaluator.background(), background);
    assert!(!evaluator.rasterizer().anti_alias);

    // Rendering through the accessors reproduces what the evaluator scores.
    let direct = evaluator
        .rasterizer()
        .render(&genome, 20, 12, evaluator.background())
        .unwrap();
    assert_eq!(evaluator.render(&genome).unwrap().data(), direct.data());
}

#[test]
fn test_evaluation_is_deterministic_and_bounded() {
    let mut rng = Pcg64::seed_from_u64(7);
    let ctx = GenomeConfig::new(32, 32, 10);
    let target = rendered_target(&Genome::random(&mut rng, &ctx), 32, 32);
    let evaluator = ImageEvaluator::new(target, SkiaRasterizer::default(), WHITE);

    for _ in 0..20 {
        let genome = Genome::random(&mut rng, &ctx);
        let first = evaluator.evaluate(&genome).unwrap();
        let second = evaluator.evaluate(&genome).unwrap();
        assert_eq!(first, second);
        assert!((0.0..1.0).contains(&first), "score {first} out of range");
    }
}

#[test]
fn test_closer_render_scores_higher() {
    let square = Polygon::new(
        Rgba::opaque(200, 0, 0),
        vec![
            Point::new(4.0, 4.0),
            Point::new(12.0, 4.0),
            Point::new(12.0, 12.0),
            Point::new(4.0, 12.0),
        ],
    );
    let target_genome = Genome::new(vec![square.clone()]);
    let evaluator = ImageEvaluator::new(
        rendered_target(&target_genome, 16, 16),
        SkiaRasterizer::default(),
        WHITE,
    );

    let mut faint = square.clone();
    faint.color.a = 90;
    let blank = evaluator.evaluate(&Genome::default()).unwrap();
    let partial = evaluator.evaluate(&Genome::new(vec![faint])).unwrap();
    let exact = evaluator.evaluate(&target_genome).unwrap();
    assert!(blank < partial && partial < exact);
    assert_eq!(exact, 1.0);
}

#[test]
fn test_degenerate_polygons_are_not_drawn() {
    let line = Polygon {
        color: Rgba::opaque(0, 0, 0),
        vertices: vec![Point::new(0.0, 0.0), Point::new(8.0, 8.0)],
    };
    let dot = Polygon::new(
        Rgba::opaque(0, 0, 0),
        vec![Point::new(3.0, 3.0); 3],
    );
    let evaluator = ImageEvaluator::new(
        solid_target(8, 8, WHITE),
        SkiaRasterizer::default(),
        WHITE,
    );
    assert_eq!(evaluator.evaluate(&Genome::new(vec![line, dot])).unwrap(), 1.0);
}

struct BrokenRasterizer;
impl Rasterizer for BrokenRasterizer {
    fn render(&self, _: &Genome, _: u32, _: u32, _: Rgba) -> Result<Pixmap, EvolveError> {
        Err(EvolveError::Render("device lost".into()))
    }
}

#[test]
fn test_render_failure_propagates() {
    let evaluator = ImageEvaluator::new(solid_target(4, 4, WHITE), BrokenRasterizer, WHITE);
    assert!(matches!(
        evaluator.evaluate(&Genome::default()),
        Err(EvolveError::Render(_))
    ));
}

// ============================================================================
// Target
// ============================================================================

#[test]
fn test_target_rejects_bad_buffers() {
    assert!(Target::from_rgba(0, 4, &[]).is_err());
    assert!(Target::from_rgba(2, 2, &[0; 15]).is_err());
    assert!(Target::from_rgba(2, 2, &[0; 16]).is_ok());
}

#[test]
fn test_missing_png_is_a_load_error() {
    let result = Target::load_png("/definitely/not/here.png");
    assert!(matches!(result, Err(EvolveError::ImageLoad { .. })));
}

#[test]
fn test_dominant_color_picks_majority() {
    // 12 bluish pixels, 4 red ones.
    let mut rgba = Vec::new();
    for i in 0..16u8 {
        if i < 12 {
            rgba.extend_from_slice(&[10, 20, 200 + (i % 2), 255]);
        } else {
            rgba.extend_from_slice(&[250, 0, 0, 255]);
        }
    }
    let target = Target::from_rgba(4, 4, &rgba).unwrap();
    let bg = target.dominant_color();
    assert_eq!((bg.r, bg.g), (10, 20));
    assert!(bg.b == 200 || bg.b == 201);
    assert_eq!(bg.a, 255);
}
