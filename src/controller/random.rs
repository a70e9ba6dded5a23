//! Random controller implementation.

use crate::controller::Controller;
use crate::rng_util;

/// A controller that proposes independent standard normal locations.
///
/// It ignores all results and serves as a baseline.
///
/// # Examples
///
/// ```
/// use async_optimize::controller::{Controller, RandomController};
///
/// let mut controller = RandomController::with_seed(42);
/// let mut x = [0.0; 3];
/// controller.next(&mut x);
/// assert!(x.iter().all(|v| v.is_finite()));
/// ```
pub struct RandomController {
    rng: fastrand::Rng,
}

impl RandomController {
    /// Creates a new random controller with a default random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Creates a new random controller with a fixed seed for reproducibility.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for RandomController {
    fn next(&mut self, location: &mut [f64]) {
        rng_util::fill_standard_normal(&mut self.rng, location);
    }

    fn add(&mut self, _location: &[f64], _value: f64) {}
}
