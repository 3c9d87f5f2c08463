#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in the plane
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A computed cluster representative. Structurally identical to [`Point`].
pub type Centroid = Point;

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Index of the centroid closest to `point`.
///
/// Scans left to right with a strict comparison, so exact ties go to the
/// lowest index. Returns 0 when `centroids` is empty or every distance is NaN.
#[inline]
pub fn nearest_index(point: &Point, centroids: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;

    for (i, centroid) in centroids.iter().enumerate() {
        let dist = distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }

    best
}

/// Minimum of two distances where NaN wins, unlike [`f64::min`]
#[inline]
pub(crate) fn nan_min(acc: f64, d: f64) -> f64 {
    if d.is_nan() || d < acc {
        d
    } else {
        acc
    }
}

/// Distance from `point` to its nearest centroid (infinity if there are
/// none). NaN if any distance is NaN.
#[inline]
pub fn min_distance(point: &Point, centroids: &[Centroid]) -> f64 {
    centroids
        .iter()
        .map(|c| distance(point, c))
        .fold(f64::INFINITY, nan_min)
}

/// Sum of distances each centroid moved between two iterations
pub fn centroid_shift(old: &[Centroid], new: &[Centroid]) -> f64 {
    old.iter().zip(new).map(|(a, b)| distance(a, b)).sum()
}

/// Exact value equality of two centroid sequences.
///
/// NaN coordinates compare equal to NaN so a degenerate run can still be
/// observed as stable.
pub fn centroids_equal(a: &[Centroid], b: &[Centroid]) -> bool {
    fn same(u: f64, v: f64) -> bool {
        u == v || (u.is_nan() && v.is_nan())
    }

    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(p, q)| same(p.x, q.x) && same(p.y, q.y))
}
