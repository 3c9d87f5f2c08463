//! Replay a k-means session from a .npy point file
//!
//! Reads an `(n, 2)` f64 array, seeds `k` centroids, prints the first assign
//! and update steps, then runs to convergence. The final centroids are
//! optionally written to another .npy file.
//!
//! Usage: `replay-steps <input.npy> <k> <strategy> <seed> [output.npy]`
//!
//! `strategy` is one of `random`, `random-points`, `farthest`, `kmeans++`.

use kmeans_stepper::{KMeansConfig, KMeansSession, Seeding, Step, StepKind};
use ndarray::Array2;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use std::env;
use std::fs::File;
use std::io::BufReader;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn parse_strategy(name: &str) -> Option<Seeding> {
    match name {
        "random" => Some(Seeding::RandomInSpace),
        "random-points" => Some(Seeding::RandomFromPoints),
        "farthest" => Some(Seeding::FarthestFirst),
        "kmeans++" => Some(Seeding::KMeansPlusPlus),
        _ => None,
    }
}

fn print_step(label: &str, step: &Step) {
    println!("{} ({:?}):", label, step.kind);
    for (i, centroid) in step.centroids.iter().enumerate() {
        let size = step.clusters.bucket(i).map_or(0, |bucket| bucket.len());
        println!(
            "  Centroid {}: ({:.4}, {:.4}) with {} points",
            i, centroid.x, centroid.y, size
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 5 && args.len() != 6 {
        eprintln!(
            "Usage: {} <input.npy> <k> <strategy> <seed> [output.npy]",
            args[0]
        );
        std::process::exit(1);
    }

    let input_path = &args[1];
    let k: usize = args[2].parse()?;
    let strategy =
        parse_strategy(&args[3]).ok_or_else(|| format!("Unknown strategy: {}", args[3]))?;
    let seed: u64 = args[4].parse()?;

    let reader = BufReader::new(File::open(input_path)?);
    let data: Array2<f64> = Array2::read_npy(reader)?;
    tracing::info!(n_points = data.nrows(), k, ?strategy, seed, "Loaded dataset");

    let mut session = KMeansSession::new(KMeansConfig::default().with_seed(seed));
    session.load_array(&data.view())?;
    session.initialize(k, strategy)?;

    print_step("First step", &session.request_step()?);
    print_step("Second step", &session.request_step()?);

    let result = session.run_to_convergence()?;
    println!("Converged after {} iterations", result.iterations);

    let final_step = Step {
        kind: StepKind::Updated,
        clusters: result.clusters,
        centroids: result.centroids,
    };
    print_step("Final", &final_step);

    if let Some(output_path) = args.get(5) {
        let writer = File::create(output_path)?;
        final_step.centroid_array().write_npy(writer)?;
        tracing::info!(path = %output_path, "Saved centroids");
    }

    Ok(())
}
