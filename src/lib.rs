//! # kmeans-stepper
//!
//! Two-dimensional k-means clustering exposed as a replayable sequence of
//! discrete steps, for visualizers and teaching tools that want to show the
//! algorithm one phase at a time.
//!
//! ## Features
//!
//! - **Stepwise delivery**: every assign phase and every update phase is
//!   captured as an owned [`Step`] snapshot and handed out in FIFO order
//! - **Run to convergence**: drive assign/update pairs until centroids stop
//!   moving, with an iteration cap and an optional cancellation flag
//! - **Seeding strategies**: uniform random in space, uniform random points,
//!   farthest-first, k-means++ (arg-max variant) and incremental manual picks
//! - **ndarray compatible**: load `(n, 2)` arrays and export centroids as arrays
//!
//! ## Example
//!
//! ```rust
//! use kmeans_stepper::{KMeansConfig, KMeansSession, Point, Seeding, StepKind};
//!
//! let mut session = KMeansSession::new(KMeansConfig::default().with_seed(7));
//! session.load_points(vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(1.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(11.0, 10.0),
//! ]);
//! session.initialize(2, Seeding::RandomFromPoints).unwrap();
//!
//! // Assign step first, then the update step that was queued with it
//! assert_eq!(session.request_step().unwrap().kind, StepKind::Assigned);
//! assert_eq!(session.request_step().unwrap().kind, StepKind::Updated);
//! ```
//!
//! ## Manual Seeding
//!
//! ```rust
//! use kmeans_stepper::{KMeansConfig, KMeansSession, PickMode, Point, Seeding};
//!
//! let mut session = KMeansSession::new(KMeansConfig::default());
//! session.load_points(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
//! session.initialize(2, Seeding::Manual(PickMode::Snap)).unwrap();
//!
//! assert!(!session.submit_manual_pick(Point::new(1.0, 1.0)).completed);
//! assert!(session.submit_manual_pick(Point::new(9.0, 9.0)).completed);
//!
//! let result = session.run_to_convergence().unwrap();
//! assert_eq!(result.centroids, vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
//! ```

mod algorithm;
mod config;
mod error;
mod geometry;
mod seeding;
mod session;
mod step;

pub use algorithm::{assign, iterate, run_until_stable, update, Convergence};
pub use config::{Bounds, KMeansConfig};
pub use error::KMeansError;
pub use geometry::{centroids_equal, distance, nearest_index, Centroid, Point};
pub use seeding::{
    farthest_first, kmeans_plus_plus, random_from_points, random_in_space, ManualPick,
    ManualSeeder, PickMode, Seeding,
};
pub use session::{KMeansSession, SessionState};
pub use step::{points_to_array, ClusterAssignment, Step, StepKind};
