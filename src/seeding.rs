use crate::config::Bounds;
use crate::error::KMeansError;
use crate::geometry::{distance, min_distance, nan_min, nearest_index, Centroid, Point};
use rand::Rng;

/// Strategy used to produce the initial centroids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeding {
    /// `k` coordinates drawn uniformly over the configured bounds
    RandomInSpace,
    /// `k` distinct points drawn uniformly without replacement
    RandomFromPoints,
    /// Random first point, then repeatedly the point farthest from its
    /// nearest chosen centroid
    FarthestFirst,
    /// Same arg-max selection rule as [`Seeding::FarthestFirst`]
    KMeansPlusPlus,
    /// Centroids are supplied one pick at a time
    Manual(PickMode),
}

impl Seeding {
    /// Whether the strategy selects existing points, which caps `k` at the
    /// number of points
    pub fn samples_points(&self) -> bool {
        matches!(
            self,
            Seeding::RandomFromPoints | Seeding::FarthestFirst | Seeding::KMeansPlusPlus
        )
    }
}

/// How manual picks become centroids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    /// Replace the pick with the closest existing point
    Snap,
    /// Use the picked coordinate verbatim
    Free,
}

/// Check the shared seeding preconditions
pub fn validate(points: &[Point], k: usize, samples_points: bool) -> Result<(), KMeansError> {
    if points.is_empty() {
        return Err(KMeansError::EmptyDataset);
    }

    if k == 0 {
        return Err(KMeansError::InvalidClusterCount(
            "k must be greater than 0".to_string(),
        ));
    }

    if samples_points && k > points.len() {
        return Err(KMeansError::InvalidClusterCount(format!(
            "k ({}) exceeds the number of points ({})",
            k,
            points.len()
        )));
    }

    Ok(())
}

/// Draw `k` coordinates uniformly over `bounds`, ignoring where the points are
pub fn random_in_space<R: Rng + ?Sized>(
    rng: &mut R,
    points: &[Point],
    k: usize,
    bounds: &Bounds,
) -> Result<Vec<Centroid>, KMeansError> {
    validate(points, k, false)?;

    Ok((0..k)
        .map(|_| {
            Point::new(
                bounds.min_x + rng.gen::<f64>() * bounds.width(),
                bounds.min_y + rng.gen::<f64>() * bounds.height(),
            )
        })
        .collect())
}

/// Draw `k` distinct points uniformly without replacement.
///
/// Duplicate index draws are rejected and redrawn.
pub fn random_from_points<R: Rng + ?Sized>(
    rng: &mut R,
    points: &[Point],
    k: usize,
) -> Result<Vec<Centroid>, KMeansError> {
    validate(points, k, true)?;

    let mut taken = vec![false; points.len()];
    let mut centroids = Vec::with_capacity(k);
    while centroids.len() < k {
        let idx = rng.gen_range(0..points.len());
        if !taken[idx] {
            taken[idx] = true;
            centroids.push(points[idx]);
        }
    }

    Ok(centroids)
}

/// Farthest-first traversal seeded with one uniformly random point
pub fn farthest_first<R: Rng + ?Sized>(
    rng: &mut R,
    points: &[Point],
    k: usize,
) -> Result<Vec<Centroid>, KMeansError> {
    validate(points, k, true)?;

    let first = points[rng.gen_range(0..points.len())];
    Ok(extend_farthest(points, vec![first], k))
}

/// k-means++ style seeding.
///
/// Selection after the first random point takes the arg-max of the
/// nearest-centroid distance instead of sampling proportionally to the
/// squared distance, which makes it behave exactly like [`farthest_first`].
pub fn kmeans_plus_plus<R: Rng + ?Sized>(
    rng: &mut R,
    points: &[Point],
    k: usize,
) -> Result<Vec<Centroid>, KMeansError> {
    farthest_first(rng, points, k)
}

/// Append points until there are `k` centroids, each time taking the point
/// whose nearest chosen centroid is farthest away. The first maximizer in
/// point order wins ties. Points with a NaN distance are never chosen while
/// any other point is left.
fn extend_farthest(points: &[Point], mut centroids: Vec<Centroid>, k: usize) -> Vec<Centroid> {
    // Nearest-centroid distance per point, refreshed only against the newest centroid
    let mut nearest: Vec<f64> = points.iter().map(|p| min_distance(p, &centroids)).collect();

    while centroids.len() < k {
        let mut best = 0;
        let mut best_dist = f64::NEG_INFINITY;
        for (i, &dist) in nearest.iter().enumerate() {
            if dist > best_dist {
                best_dist = dist;
                best = i;
            }
        }

        let chosen = points[best];
        centroids.push(chosen);
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = nan_min(*d, distance(p, &chosen));
        }
    }

    centroids
}

/// Outcome of one manual pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualPick {
    /// The pick was appended as a centroid
    pub accepted: bool,
    /// All `k` centroids are now present
    pub completed: bool,
    /// Index of the point the pick snapped to, in [`PickMode::Snap`]
    pub snapped: Option<usize>,
}

/// Incremental manual seeding: one centroid per pick until `k` are present.
#[derive(Debug, Clone)]
pub struct ManualSeeder {
    k: usize,
    mode: PickMode,
    centroids: Vec<Centroid>,
}

impl ManualSeeder {
    pub fn new(k: usize, mode: PickMode) -> Self {
        Self {
            k,
            mode,
            centroids: Vec::with_capacity(k),
        }
    }

    /// Submit one pick. Picks after completion are ignored.
    pub fn submit(&mut self, pick: Point, points: &[Point]) -> ManualPick {
        if self.is_complete() {
            return ManualPick {
                accepted: false,
                completed: true,
                snapped: None,
            };
        }

        let (centroid, snapped) = match self.mode {
            PickMode::Snap if !points.is_empty() => {
                let idx = nearest_index(&pick, points);
                (points[idx], Some(idx))
            }
            _ => (pick, None),
        };
        self.centroids.push(centroid);

        ManualPick {
            accepted: true,
            completed: self.is_complete(),
            snapped,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.centroids.len() >= self.k
    }

    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    pub fn into_centroids(self) -> Vec<Centroid> {
        self.centroids
    }
}
