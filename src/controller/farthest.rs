//! Synchronous farthest-point controller.
//!
//! Every call to [`next`](Controller::next) draws `num_guess` standard
//! normal candidates and keeps the one whose nearest previously proposed
//! location is farthest away. This spreads evaluations over the search
//! space without looking at objective values.
//!
//! The work happens inside the optimizer's loop and grows linearly with the
//! number of proposed locations; [`AsyncFarthestPointController`](super::AsyncFarthestPointController)
//! moves the same search onto a background thread.

use crate::controller::{Controller, min_squared_distance};
use crate::error::{Error, Result};
use crate::rng_util;

/// Default number of candidates drawn per call to `next`.
pub const DEFAULT_NUM_GUESS: usize = 100;

/// Proposes the best of `num_guess` random candidates, scored by distance to
/// the nearest previously proposed location.
///
/// # Examples
///
/// ```
/// use async_optimize::controller::{Controller, FarthestPointController};
///
/// let mut controller = FarthestPointController::builder()
///     .num_guess(50)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let mut x = [0.0; 2];
/// controller.next(&mut x);
/// controller.next(&mut x);
/// assert_eq!(controller.history().len(), 2);
/// ```
pub struct FarthestPointController {
    num_guess: usize,
    rng: fastrand::Rng,
    history: Vec<Vec<f64>>,
}

impl FarthestPointController {
    /// Creates a controller with [`DEFAULT_NUM_GUESS`] candidates per call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            num_guess: DEFAULT_NUM_GUESS,
            rng: fastrand::Rng::new(),
            history: Vec::new(),
        }
    }

    /// Creates a seeded controller with [`DEFAULT_NUM_GUESS`] candidates per call.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            ..Self::new()
        }
    }

    /// Return a [`FarthestPointBuilder`] for custom configuration.
    #[must_use]
    pub fn builder() -> FarthestPointBuilder {
        FarthestPointBuilder::new()
    }

    /// Number of candidates drawn per call to `next`.
    #[must_use]
    pub fn num_guess(&self) -> usize {
        self.num_guess
    }

    /// Every location proposed so far, in proposal order.
    #[must_use]
    pub fn history(&self) -> &[Vec<f64>] {
        &self.history
    }
}

impl Default for FarthestPointController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for FarthestPointController {
    /// Forget the locations proposed in previous runs.
    fn init(&mut self, _dimensions: usize) {
        self.history.clear();
    }

    fn next(&mut self, location: &mut [f64]) {
        let mut candidate = vec![0.0; location.len()];
        let mut best = vec![0.0; location.len()];
        let mut best_score = f64::NEG_INFINITY;

        for _ in 0..self.num_guess {
            rng_util::fill_standard_normal(&mut self.rng, &mut candidate);
            if self.history.is_empty() {
                best.copy_from_slice(&candidate);
                break;
            }

            let score = min_squared_distance(&candidate, &self.history);
            if score > best_score {
                best_score = score;
                best.copy_from_slice(&candidate);
            }
        }

        location.copy_from_slice(&best);
        self.history.push(best);
    }

    fn add(&mut self, _location: &[f64], _value: f64) {}
}

/// Builder for [`FarthestPointController`].
///
/// Defaults: `num_guess` = [`DEFAULT_NUM_GUESS`], seed from OS entropy.
#[derive(Clone, Debug)]
pub struct FarthestPointBuilder {
    num_guess: usize,
    seed: Option<u64>,
}

impl FarthestPointBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            num_guess: DEFAULT_NUM_GUESS,
            seed: None,
        }
    }

    /// Sets the number of candidates drawn per call.
    #[must_use]
    pub fn num_guess(mut self, num_guess: usize) -> Self {
        self.num_guess = num_guess;
        self
    }

    /// Sets a fixed seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the controller.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidGuessCount` if `num_guess` is zero.
    pub fn build(self) -> Result<FarthestPointController> {
        if self.num_guess == 0 {
            return Err(Error::InvalidGuessCount);
        }
        Ok(FarthestPointController {
            num_guess: self.num_guess,
            rng: rng_util::rng_from(self.seed),
            history: Vec::new(),
        })
    }
}

impl Default for FarthestPointBuilder {
    fn default() -> Self {
        Self::new()
    }
}
