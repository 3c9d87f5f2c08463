#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle that uniform-random-in-space seeding draws from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of a `width` x `height` canvas anchored at the origin
    pub fn canvas(width: f64, height: f64) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: width,
            max_y: height,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::canvas(800.0, 600.0)
    }
}

/// Configuration for a k-means session
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Maximum number of assign+update pairs `run_to_convergence` performs
    /// before giving up. Set to 0 to disable the cap.
    pub max_iters: usize,

    /// Seed for the session's random source
    pub seed: u64,

    /// Domain used by uniform-random-in-space seeding
    pub bounds: Bounds,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iters: 300,
            seed: 0,
            bounds: Bounds::default(),
        }
    }
}

impl KMeansConfig {
    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the seeding domain
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Iteration cap, `None` when disabled
    pub(crate) fn iteration_cap(&self) -> Option<usize> {
        (self.max_iters > 0).then_some(self.max_iters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KMeansConfig::default();
        assert_eq!(config.max_iters, 300);
        assert_eq!(config.iteration_cap(), Some(300));
        assert_eq!(config.bounds.width(), 800.0);
        assert_eq!(config.bounds.height(), 600.0);
    }

    #[test]
    fn test_zero_max_iters_disables_cap() {
        let config = KMeansConfig::default().with_max_iters(0).with_seed(7);
        assert_eq!(config.iteration_cap(), None);
        assert_eq!(config.seed, 7);
    }
}
