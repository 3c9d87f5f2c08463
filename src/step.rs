use crate::geometry::{Centroid, Point};
use ndarray::{Array1, Array2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Partition of the point set into `k` ordered buckets.
///
/// Bucket `i` holds the points assigned to centroid `i`, in dataset order.
/// Buckets may be empty.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterAssignment {
    buckets: Vec<Vec<Point>>,
    /// Bucket index of each input point, in input order
    labels: Vec<usize>,
}

impl ClusterAssignment {
    /// Group `points` into `k` buckets by their labels
    pub(crate) fn from_labels(points: &[Point], labels: Vec<usize>, k: usize) -> Self {
        let mut buckets = vec![Vec::new(); k];
        for (point, &label) in points.iter().zip(&labels) {
            buckets[label].push(*point);
        }

        Self { buckets, labels }
    }

    /// Number of buckets (equals the number of centroids used to assign)
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Points in bucket `index`
    pub fn bucket(&self, index: usize) -> Option<&[Point]> {
        self.buckets.get(index).map(Vec::as_slice)
    }

    pub fn buckets(&self) -> &[Vec<Point>] {
        &self.buckets
    }

    /// Total number of assigned points
    pub fn point_count(&self) -> usize {
        self.labels.len()
    }

    /// Bucket index of the `index`-th input point
    pub fn label(&self, index: usize) -> Option<usize> {
        self.labels.get(index).copied()
    }

    /// Bucket index of every input point, in input order
    pub fn labels(&self) -> Array1<usize> {
        Array1::from(self.labels.clone())
    }
}

/// Phase a [`Step`] was captured after
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Clusters are new; centroids are the ones used to produce them
    Assigned,
    /// Centroids are the new means; clusters are carried forward
    Updated,
}

/// An owned snapshot of clusters and centroids.
///
/// Steps share nothing with the live session, so later iterations never
/// alter a step that was already handed out.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub kind: StepKind,
    pub clusters: ClusterAssignment,
    pub centroids: Vec<Centroid>,
}

impl Step {
    /// Centroids as a `(k, 2)` array
    pub fn centroid_array(&self) -> Array2<f64> {
        points_to_array(&self.centroids)
    }
}

/// Pack points into a `(n, 2)` array
pub fn points_to_array(points: &[Point]) -> Array2<f64> {
    let mut array = Array2::zeros((points.len(), 2));
    for (mut row, p) in array.outer_iter_mut().zip(points) {
        row[0] = p.x;
        row[1] = p.y;
    }
    array
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClusterAssignment {
        let points = [
            Point::new(10.0, 10.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        ];
        ClusterAssignment::from_labels(&points, vec![2, 0, 0], 3)
    }

    #[test]
    fn test_bucket_access() {
        let clusters = sample();

        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters.point_count(), 3);
        assert_eq!(
            clusters.bucket(0),
            Some(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)][..])
        );
        assert_eq!(clusters.bucket(1), Some(&[][..]));
        assert_eq!(clusters.bucket(2).map(|b| b.len()), Some(1));
        assert!(clusters.bucket(3).is_none());
    }

    #[test]
    fn test_labels() {
        let clusters = sample();

        assert_eq!(clusters.labels().to_vec(), vec![2, 0, 0]);
        assert_eq!(clusters.label(0), Some(2));
        assert_eq!(clusters.label(3), None);
    }

    #[test]
    fn test_centroid_array() {
        let step = Step {
            kind: StepKind::Updated,
            clusters: sample(),
            centroids: vec![Point::new(0.5, 0.0), Point::ORIGIN, Point::new(10.0, 10.0)],
        };

        let array = step.centroid_array();
        assert_eq!(array.shape(), &[3, 2]);
        assert_eq!(array[[0, 0]], 0.5);
        assert_eq!(array[[2, 1]], 10.0);
    }
}
