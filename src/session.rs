use crate::algorithm::{assign, iterate, run_until_stable, update, Convergence};
use crate::config::KMeansConfig;
use crate::error::KMeansError;
use crate::geometry::{centroids_equal, Centroid, Point};
use crate::seeding::{self, ManualPick, ManualSeeder, Seeding};
use crate::step::{ClusterAssignment, Step, StepKind};
use ndarray::ArrayView2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use tracing::debug;

/// Coarse lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Centroids are not (fully) seeded
    Empty,
    /// Centroids are seeded, nothing has been assigned yet
    Seeded,
    /// Iterating, possibly with steps waiting to be delivered
    Stepping,
    /// The last assign+update pair left centroids unchanged and every step
    /// has been delivered
    Converged,
}

/// A stepwise k-means session over one 2-D point set.
///
/// The session owns the points, the centroids, the latest cluster assignment
/// and a FIFO of pending [`Step`]s. Each session is independent; run several
/// sessions side by side by creating several instances.
///
/// # Example
///
/// ```
/// use kmeans_stepper::{KMeansConfig, KMeansSession, Point, Seeding};
///
/// let mut session = KMeansSession::new(KMeansConfig::default().with_seed(42));
/// session.load_points(vec![
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(11.0, 10.0),
/// ]);
/// session.initialize(2, Seeding::FarthestFirst).unwrap();
///
/// let assigned = session.request_step().unwrap();
/// let updated = session.request_step().unwrap();
/// assert_eq!(assigned.clusters, updated.clusters);
///
/// let result = session.run_to_convergence().unwrap();
/// assert_eq!(result.clusters.len(), 2);
/// ```
#[derive(Debug)]
pub struct KMeansSession<R = ChaCha8Rng> {
    config: KMeansConfig,
    rng: R,
    points: Vec<Point>,
    k: usize,
    centroids: Vec<Centroid>,
    clusters: Option<ClusterAssignment>,
    pending: VecDeque<Step>,
    manual: Option<ManualSeeder>,
    converged: bool,
}

impl KMeansSession<ChaCha8Rng> {
    /// Create an empty session whose random source is seeded from
    /// `config.seed`.
    pub fn new(config: KMeansConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> KMeansSession<R> {
    /// Create an empty session drawing from the given random source
    pub fn with_rng(config: KMeansConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            points: Vec::new(),
            k: 0,
            centroids: Vec::new(),
            clusters: None,
            pending: VecDeque::new(),
            manual: None,
            converged: false,
        }
    }

    /// Replace the dataset. Everything derived from the previous points is
    /// discarded.
    pub fn load_points(&mut self, points: Vec<Point>) {
        self.reset();
        debug!(n_points = points.len(), "Loaded points");
        self.points = points;
    }

    /// Replace the dataset from an `(n_points, 2)` array
    pub fn load_array(&mut self, data: &ArrayView2<f64>) -> Result<(), KMeansError> {
        if data.ncols() != 2 {
            return Err(KMeansError::InvalidDimensions(format!(
                "Expected 2 columns, got {}",
                data.ncols()
            )));
        }

        let points = data
            .outer_iter()
            .map(|row| Point::new(row[0], row[1]))
            .collect();
        self.load_points(points);
        Ok(())
    }

    /// Seed `k` centroids with the given strategy.
    ///
    /// Any previous centroids, clusters and pending steps are discarded. For
    /// [`Seeding::Manual`] the centroids start empty and are filled through
    /// [`KMeansSession::submit_manual_pick`].
    ///
    /// # Errors
    ///
    /// - [`KMeansError::EmptyDataset`] if no points are loaded
    /// - [`KMeansError::InvalidClusterCount`] if `k == 0`, or `k` exceeds the
    ///   number of points for a point-sampling strategy
    ///
    /// The session is left untouched on error.
    pub fn initialize(&mut self, k: usize, strategy: Seeding) -> Result<(), KMeansError> {
        seeding::validate(&self.points, k, strategy.samples_points())?;

        let (centroids, manual) = match strategy {
            Seeding::RandomInSpace => (
                seeding::random_in_space(&mut self.rng, &self.points, k, &self.config.bounds)?,
                None,
            ),
            Seeding::RandomFromPoints => (
                seeding::random_from_points(&mut self.rng, &self.points, k)?,
                None,
            ),
            Seeding::FarthestFirst => (
                seeding::farthest_first(&mut self.rng, &self.points, k)?,
                None,
            ),
            Seeding::KMeansPlusPlus => (
                seeding::kmeans_plus_plus(&mut self.rng, &self.points, k)?,
                None,
            ),
            Seeding::Manual(mode) => (Vec::new(), Some(ManualSeeder::new(k, mode))),
        };

        debug!(k, ?strategy, seeded = centroids.len(), "Initialized centroids");

        self.k = k;
        self.centroids = centroids;
        self.manual = manual;
        self.clusters = None;
        self.pending.clear();
        self.converged = false;
        Ok(())
    }

    /// Feed one manual pick into an in-progress manual seeding.
    ///
    /// Picks are ignored (not accepted) when no manual seeding is in
    /// progress or all `k` centroids are already present.
    pub fn submit_manual_pick(&mut self, pick: Point) -> ManualPick {
        let Some(seeder) = self.manual.as_mut() else {
            return ManualPick {
                accepted: false,
                completed: self.is_seeded(),
                snapped: None,
            };
        };

        let outcome = seeder.submit(pick, &self.points);
        self.centroids = seeder.centroids().to_vec();

        if outcome.completed {
            debug!(k = self.k, "Manual seeding complete");
            self.manual = None;
        }

        outcome
    }

    /// Deliver the next step.
    ///
    /// With an empty queue this runs one assign phase and one update phase,
    /// queueing the assign step and then the update step. The oldest queued
    /// step is returned.
    ///
    /// # Errors
    ///
    /// [`KMeansError::NotInitialized`] if the centroids are not fully seeded.
    /// Nothing is mutated in that case.
    pub fn request_step(&mut self) -> Result<Step, KMeansError> {
        self.ensure_seeded()?;

        if self.pending.is_empty() {
            self.advance()?;
        }

        self.pending.pop_front().ok_or(KMeansError::NotInitialized)
    }

    /// Run assign+update pairs until centroids stop changing.
    ///
    /// Pending steps are neither consumed nor added to; do not interleave
    /// this with [`KMeansSession::request_step`] without a reset or
    /// re-initialization in between.
    ///
    /// # Errors
    ///
    /// - [`KMeansError::NotInitialized`] if the centroids are not fully seeded
    /// - [`KMeansError::DidNotConverge`] if `max_iters` pairs ran without
    ///   reaching a fixed point. The error carries the last centroids; the
    ///   session itself is left as it was before the call.
    ///
    /// On any error the session's centroids, clusters and state are
    /// unchanged.
    pub fn run_to_convergence(&mut self) -> Result<Convergence, KMeansError> {
        self.converge(None)
    }

    /// Like [`KMeansSession::run_to_convergence`], but stops with
    /// [`KMeansError::Cancelled`] once `cancel` is set.
    pub fn run_to_convergence_until(
        &mut self,
        cancel: &AtomicBool,
    ) -> Result<Convergence, KMeansError> {
        self.converge(Some(cancel))
    }

    /// Clear points, centroids, clusters and pending steps
    pub fn reset(&mut self) {
        self.points.clear();
        self.k = 0;
        self.centroids.clear();
        self.clusters = None;
        self.pending.clear();
        self.manual = None;
        self.converged = false;
    }

    pub fn state(&self) -> SessionState {
        if !self.is_seeded() {
            SessionState::Empty
        } else if self.clusters.is_none() {
            SessionState::Seeded
        } else if self.converged && self.pending.is_empty() {
            SessionState::Converged
        } else {
            SessionState::Stepping
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    /// Latest cluster assignment, if an assign phase has run
    pub fn clusters(&self) -> Option<&ClusterAssignment> {
        self.clusters.as_ref()
    }

    /// Number of clusters requested at initialization (0 before)
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn pending_steps(&self) -> usize {
        self.pending.len()
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    fn is_seeded(&self) -> bool {
        self.k > 0 && self.manual.is_none() && self.centroids.len() == self.k
    }

    fn ensure_seeded(&self) -> Result<(), KMeansError> {
        if self.is_seeded() {
            Ok(())
        } else {
            Err(KMeansError::NotInitialized)
        }
    }

    /// One assign+update pair, queueing a snapshot after each phase
    fn advance(&mut self) -> Result<(), KMeansError> {
        let clusters = assign(&self.points, &self.centroids)?;
        let assigned = Step {
            kind: StepKind::Assigned,
            clusters: clusters.clone(),
            centroids: self.centroids.clone(),
        };

        let centroids = update(&clusters);
        let updated = Step {
            kind: StepKind::Updated,
            clusters: clusters.clone(),
            centroids: centroids.clone(),
        };

        self.converged = centroids_equal(&self.centroids, &centroids);
        debug!(
            k = self.k,
            converged = self.converged,
            "Queued assign and update steps"
        );

        self.pending.push_back(assigned);
        self.pending.push_back(updated);
        self.centroids = centroids;
        self.clusters = Some(clusters);
        Ok(())
    }

    fn converge(&mut self, cancel: Option<&AtomicBool>) -> Result<Convergence, KMeansError> {
        self.ensure_seeded()?;

        let convergence = run_until_stable(
            &self.points,
            &self.centroids,
            self.config.iteration_cap(),
            cancel,
        )?;

        self.centroids = convergence.centroids.clone();
        self.clusters = Some(convergence.clusters.clone());
        self.converged = true;
        Ok(convergence)
    }

    /// Run one assign+update pair directly, without touching the step queue
    pub fn iterate(&mut self) -> Result<(), KMeansError> {
        self.ensure_seeded()?;
        let (clusters, centroids) = iterate(&self.points, &self.centroids)?;
        self.converged = centroids_equal(&self.centroids, &centroids);
        self.centroids = centroids;
        self.clusters = Some(clusters);
        Ok(())
    }
}
