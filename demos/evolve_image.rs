//! Approximates a PNG with semi-transparent polygons.
//!
//! ```text
//! cargo run --release --example evolve_image -- target.png [MAX_POLYGONS] [GENERATIONS]
//! ```
//!
//! Prints `generation<TAB>best fitness<TAB>polygons` once per generation and
//! keeps `solution.png` updated with the current best. Set `RUST_LOG=debug`
//! for evaluation counts.

use clap::Parser;
use polyevo::algorithms::mu_comma_lambda::MuCommaLambda;
use polyevo::config::{EvolutionSettings, GenomeConfig};
use polyevo::fitness::{ImageEvaluator, SkiaRasterizer, Target};
use polyevo::genome::Genome;
use polyevo::snapshot::SnapshotWriter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Evolves a polygon approximation of a target image.
#[derive(Parser, Clone, Debug)]
#[command(name = "evolve_image")]
struct Args {
    /// PNG image to approximate
    target: PathBuf,

    /// Upper bound on polygons per genome
    #[arg(default_value_t = 100)]
    max_polygons: usize,

    /// Number of generations to run
    #[arg(default_value_t = 1000)]
    generations: usize,

    /// Individuals kept after each selection (μ)
    #[arg(short, long, default_value_t = 256)]
    population: usize,

    /// Offspring produced per generation (λ)
    #[arg(long, default_value_t = 120)]
    offspring: usize,

    /// Contestants drawn per tournament
    #[arg(short, long, default_value_t = 16)]
    tournament_size: usize,

    /// Evaluation threads, 0 for the rayon default
    #[arg(short, long, default_value_t = 0)]
    workers: usize,

    /// RNG seed, random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where the best render is written each generation
    #[arg(short, long, default_value = "solution.png")]
    output: PathBuf,
}

impl Args {
    fn settings(&self) -> EvolutionSettings {
        EvolutionSettings {
            population_size: self.population,
            offspring: self.offspring,
            tournament_size: self.tournament_size,
            workers: self.workers,
            ..EvolutionSettings::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let target = Target::load_png(&args.target)?;
    let background = target.dominant_color();
    let context = GenomeConfig::new(target.width(), target.height(), args.max_polygons);
    let evaluator = ImageEvaluator::new(target, SkiaRasterizer::default(), background);
    let snapshots = SnapshotWriter::new(
        &args.output,
        *evaluator.rasterizer(),
        evaluator.target().width(),
        evaluator.target().height(),
        evaluator.background(),
    );

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut engine = MuCommaLambda::<Genome>::random(args.settings(), context, seed)?;
    let best = engine.run(args.generations, &evaluator, |report, best| {
        println!("{report}");
        snapshots.record(&best.genome);
    })?;

    println!(
        "\nFinal: fitness {:.6} with {} polygons ({} vertices), snapshot at {:?}",
        best.fitness.unwrap_or_default(),
        best.genome.len(),
        best.genome.vertex_count(),
        snapshots.path()
    );
    Ok(())
}
