use crate::geometry::Centroid;
use thiserror::Error;

/// Error types for the k-means stepper
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// Seeding was attempted on a session without points
    #[error("Cannot seed centroids from an empty dataset")]
    EmptyDataset,

    /// The number of clusters k is invalid (must be > 0, and no larger than
    /// the number of points for point-sampling strategies)
    #[error("Invalid cluster count: {0}")]
    InvalidClusterCount(String),

    /// Centroids have not been fully seeded yet
    #[error("Centroids are not initialized. Seed all k centroids first.")]
    NotInitialized,

    /// Input array is not shaped (n_points, 2)
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// The iteration cap was reached before centroids stabilized.
    /// `centroids` holds the result of the last pair that ran.
    #[error("Centroids did not converge after {iterations} iterations")]
    DidNotConverge {
        iterations: usize,
        centroids: Vec<Centroid>,
    },

    /// The convergence loop observed its cancellation token
    #[error("Convergence cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },
}
