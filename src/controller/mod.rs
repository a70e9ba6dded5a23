//! Controller trait and implementations for choosing the next location.
//!
//! A controller proposes the next point to evaluate and ingests completed
//! evaluations. The optimizer calls it only from its own loop, so a
//! controller never sees concurrent calls; strategies that want to use the
//! time between calls run their own background thread (see
//! [`AsyncFarthestPointController`]).
//!
//! | Controller | Strategy | Cost of `next` |
//! |------------|----------|----------------|
//! | [`RandomController`] | Independent standard normal draws | O(D) |
//! | [`FarthestPointController`] | Best of `num_guess` draws, farthest from history | O(`num_guess` · history) |
//! | [`AsyncFarthestPointController`] | Continuous background farthest-point search | O(D) hand-off |

pub mod async_farthest;
pub mod farthest;
pub mod random;

pub use async_farthest::AsyncFarthestPointController;
pub use farthest::{FarthestPointBuilder, FarthestPointController};
pub use random::RandomController;

/// Strategy for proposing locations and consuming results.
///
/// [`next`](Controller::next) and [`add`](Controller::add) are required;
/// [`init`](Controller::init) and [`finish`](Controller::finish) are
/// optional and default to no-ops.
pub trait Controller: Send {
    /// Prepare for a run over `dimensions`-dimensional locations.
    ///
    /// Called once by the optimizer before the first [`next`](Controller::next).
    fn init(&mut self, _dimensions: usize) {}

    /// Write the next location to evaluate into `location`.
    ///
    /// `location` has exactly the run's dimensionality. Its previous contents
    /// are unspecified: the optimizer reuses buffers of finished evaluations.
    fn next(&mut self, location: &mut [f64]);

    /// Feed a completed evaluation back into the controller.
    fn add(&mut self, location: &[f64], value: f64);

    /// Called once by the optimizer when a run ends, whether it completed
    /// or was aborted. Controllers with background work stop it here.
    fn finish(&mut self) {}
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn init(&mut self, dimensions: usize) {
        (**self).init(dimensions);
    }

    fn next(&mut self, location: &mut [f64]) {
        (**self).next(location);
    }

    fn add(&mut self, location: &[f64], value: f64) {
        (**self).add(location, value);
    }

    fn finish(&mut self) {
        (**self).finish();
    }
}

/// Squared Euclidean distance between two locations of equal length.
pub(crate) fn squared_distance(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "location length mismatch");
    x.iter().zip(y).map(|(a, b)| (a - b) * (a - b)).sum()
}

/// Minimum squared distance from `x` to any location in `history`.
///
/// Returns `+inf` for an empty history.
pub(crate) fn min_squared_distance(x: &[f64], history: &[Vec<f64>]) -> f64 {
    history
        .iter()
        .map(|h| squared_distance(x, h))
        .fold(f64::INFINITY, f64::min)
}
