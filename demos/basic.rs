//! Step through k-means on three synthetic blobs
//!
//! Run with: cargo run --example basic

use kmeans_stepper::{KMeansConfig, KMeansSession, Point, Seeding};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() {
    println!("=== kmeans-stepper example ===\n");

    let n_samples = 90;
    let centers = [[150.0f64, 150.0], [400.0, 450.0], [650.0, 150.0]];

    let noise = Array2::random((n_samples, 2), Uniform::new(-40.0f64, 40.0));
    let points: Vec<Point> = (0..n_samples)
        .map(|i| {
            let center = centers[i % centers.len()];
            Point::new(center[0] + noise[[i, 0]], center[1] + noise[[i, 1]])
        })
        .collect();

    let mut session = KMeansSession::new(KMeansConfig::default().with_seed(42));
    session.load_points(points);
    session
        .initialize(3, Seeding::FarthestFirst)
        .expect("Seeding failed");

    println!("Initial centroids:");
    for (i, c) in session.centroids().iter().enumerate() {
        println!("  Centroid {}: ({:.2}, {:.2})", i, c.x, c.y);
    }
    println!();

    for _ in 0..4 {
        let step = session.request_step().expect("Step failed");
        println!("{:?} step, state now {:?}", step.kind, session.state());
        for (i, c) in step.centroids.iter().enumerate() {
            let size = step.clusters.bucket(i).map_or(0, |bucket| bucket.len());
            println!("  Centroid {}: ({:.2}, {:.2}) - {} points", i, c.x, c.y, size);
        }
    }
    println!();

    let result = session
        .run_to_convergence()
        .expect("Convergence failed");
    println!("Converged after {} more iterations:", result.iterations);
    for (i, c) in result.centroids.iter().enumerate() {
        println!("  Centroid {}: ({:.2}, {:.2})", i, c.x, c.y);
    }

    println!("\n=== Done! ===");
}
