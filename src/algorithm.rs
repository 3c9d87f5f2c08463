use crate::error::KMeansError;
use crate::geometry::{centroid_shift, centroids_equal, nearest_index, Centroid, Point};
use crate::step::ClusterAssignment;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Point count above which nearest-centroid labels are computed in parallel
const PARALLEL_THRESHOLD: usize = 4_096;

/// Result of running the assign/update loop until centroids stop moving
#[derive(Debug, Clone, PartialEq)]
pub struct Convergence {
    pub clusters: ClusterAssignment,
    pub centroids: Vec<Centroid>,
    /// Assign+update pairs performed, counting the final pair that confirmed
    /// the centroids no longer move. A run whose first pair already lands
    /// on the fixed point therefore reports 2, not 1.
    pub iterations: usize,
}

/// Partition `points` by nearest centroid.
///
/// Exact ties go to the lowest centroid index. Each bucket keeps the input
/// order of its points.
pub fn assign(points: &[Point], centroids: &[Centroid]) -> Result<ClusterAssignment, KMeansError> {
    if centroids.is_empty() {
        return Err(KMeansError::NotInitialized);
    }

    let labels: Vec<usize> = if points.len() >= PARALLEL_THRESHOLD {
        points
            .par_iter()
            .map(|p| nearest_index(p, centroids))
            .collect()
    } else {
        points.iter().map(|p| nearest_index(p, centroids)).collect()
    };

    Ok(ClusterAssignment::from_labels(
        points,
        labels,
        centroids.len(),
    ))
}

/// Mean of each bucket, per axis.
///
/// An empty bucket yields a centroid at the origin rather than keeping the
/// previous one.
pub fn update(clusters: &ClusterAssignment) -> Vec<Centroid> {
    clusters
        .buckets()
        .iter()
        .map(|bucket| {
            if bucket.is_empty() {
                return Point::ORIGIN;
            }

            let (sum_x, sum_y) = bucket
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            let count = bucket.len() as f64;
            Point::new(sum_x / count, sum_y / count)
        })
        .collect()
}

/// One assign phase followed by one update phase
pub fn iterate(
    points: &[Point],
    centroids: &[Centroid],
) -> Result<(ClusterAssignment, Vec<Centroid>), KMeansError> {
    let clusters = assign(points, centroids)?;
    let updated = update(&clusters);
    Ok((clusters, updated))
}

/// Repeat assign+update pairs until one pair leaves the centroids unchanged.
///
/// `max_iters` bounds the number of pairs (`None` for no bound) and `cancel`
/// is checked before each pair. `DidNotConverge` carries the centroids of the
/// last pair that ran.
pub fn run_until_stable(
    points: &[Point],
    initial: &[Centroid],
    max_iters: Option<usize>,
    cancel: Option<&AtomicBool>,
) -> Result<Convergence, KMeansError> {
    if initial.is_empty() {
        return Err(KMeansError::NotInitialized);
    }

    let mut centroids = initial.to_vec();
    let mut iterations = 0;

    loop {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            warn!(iterations, "Convergence cancelled");
            return Err(KMeansError::Cancelled { iterations });
        }

        let (clusters, updated) = iterate(points, &centroids)?;
        iterations += 1;

        let stable = centroids_equal(&centroids, &updated);
        debug!(
            iteration = iterations,
            shift = centroid_shift(&centroids, &updated),
            stable,
            "Assign+update pair finished"
        );
        centroids = updated;

        if stable {
            info!(iterations, k = centroids.len(), "Centroids converged");
            return Ok(Convergence {
                clusters,
                centroids,
                iterations,
            });
        }

        if max_iters.is_some_and(|cap| iterations >= cap) {
            warn!(iterations, "Iteration cap reached before convergence");
            return Err(KMeansError::DidNotConverge {
                iterations,
                centroids,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn four_points() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(11.0, 10.0),
        ]
    }

    #[test]
    fn test_assign_basic() {
        let points = four_points();
        let centroids = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];

        let clusters = assign(&points, &centroids).unwrap();

        assert_eq!(clusters.bucket(0).unwrap(), &points[..2]);
        assert_eq!(clusters.bucket(1).unwrap(), &points[2..]);
    }

    #[test]
    fn test_assign_records_labels_in_input_order() {
        // Duplicate coordinates still get their own label
        let points = [
            Point::new(9.0, 9.0),
            Point::new(1.0, 1.0),
            Point::new(9.0, 9.0),
            Point::new(1.0, 1.0),
        ];
        let centroids = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];

        let clusters = assign(&points, &centroids).unwrap();

        assert_eq!(clusters.labels().to_vec(), vec![1, 0, 1, 0]);
        assert_eq!(clusters.label(2), Some(1));
    }

    #[test]
    fn test_assign_requires_centroids() {
        let result = assign(&four_points(), &[]);
        assert_eq!(result, Err(KMeansError::NotInitialized));
    }

    #[test]
    fn test_assign_tie_goes_to_lowest_index() {
        let points = [Point::new(5.0, 0.0)];
        let centroids = [Point::new(10.0, 0.0), Point::new(0.0, 0.0)];

        let clusters = assign(&points, &centroids).unwrap();
        assert_eq!(clusters.bucket(0).unwrap().len(), 1);
        assert!(clusters.bucket(1).unwrap().is_empty());
    }

    #[test]
    fn test_assign_parallel_path_keeps_order() {
        let points: Vec<Point> = (0..PARALLEL_THRESHOLD + 10)
            .map(|i| Point::new(i as f64, (i % 7) as f64))
            .collect();
        let centroids = [Point::new(0.0, 0.0), Point::new(5_000.0, 0.0)];

        let clusters = assign(&points, &centroids).unwrap();

        assert_eq!(clusters.point_count(), points.len());
        let rejoined: Vec<Point> = clusters.buckets().concat();
        assert_eq!(rejoined, points);
    }

    #[test]
    fn test_update_means() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 4.0),
            Point::new(6.0, 3.0),
        ];
        let clusters = ClusterAssignment::from_labels(&points, vec![0, 1, 0, 1, 1], 2);

        let centroids = update(&clusters);

        assert_relative_eq!(centroids[0].x, 0.5);
        assert_relative_eq!(centroids[0].y, 0.0);
        assert_relative_eq!(centroids[1].x, 3.0);
        assert_relative_eq!(centroids[1].y, 3.0);
    }

    #[test]
    fn test_update_empty_bucket_collapses_to_origin() {
        let clusters = ClusterAssignment::from_labels(&[Point::new(4.0, 4.0)], vec![0], 2);

        let centroids = update(&clusters);
        assert_eq!(centroids[1], Point::ORIGIN);
    }

    #[test]
    fn test_run_until_stable_scenario() {
        let points = four_points();
        let initial = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];

        let result = run_until_stable(&points, &initial, Some(10), None).unwrap();

        assert_eq!(result.iterations, 2);
        assert_eq!(
            result.centroids,
            vec![Point::new(0.5, 0.0), Point::new(10.5, 10.0)]
        );
    }

    #[test]
    fn test_run_until_stable_reports_cap() {
        let points = four_points();
        let initial = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];

        let result = run_until_stable(&points, &initial, Some(1), None);

        assert_eq!(
            result,
            Err(KMeansError::DidNotConverge {
                iterations: 1,
                centroids: vec![Point::new(0.5, 0.0), Point::new(10.5, 10.0)],
            })
        );
    }

    #[test]
    fn test_run_until_stable_cancelled() {
        let cancel = AtomicBool::new(true);
        let initial = [Point::new(0.0, 0.0)];

        let result = run_until_stable(&four_points(), &initial, None, Some(&cancel));
        assert_eq!(result, Err(KMeansError::Cancelled { iterations: 0 }));
    }
}
