//! Reference objective functions.
//!
//! [`Wavy`] is a cheap multimodal test function. [`Delayed`] wraps any
//! evaluator and adds a random delay to every call, which makes workers
//! finish out of order and shows the benefit of the pipelined optimizer
//! over a batch barrier.

use core::convert::Infallible;
use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::evaluator::Evaluator;
use crate::rng_util;

/// `Σ (2·x·sin x + x·cos 2x) · exp(-|x| / 5)` over all components.
///
/// # Examples
///
/// ```
/// use async_optimize::functions::Wavy;
///
/// assert_eq!(Wavy.value(&[0.0, 0.0]), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wavy;

impl Wavy {
    /// The objective value at `x`.
    #[must_use]
    pub fn value(self, x: &[f64]) -> f64 {
        x.iter()
            .map(|&xi| {
                let inc = 2.0 * xi * xi.sin() + xi * (2.0 * xi).cos();
                inc * (-xi.abs() / 5.0).exp()
            })
            .sum()
    }
}

impl Evaluator for Wavy {
    type Error = Infallible;

    fn evaluate(&mut self, location: &[f64]) -> Result<f64, Infallible> {
        Ok(self.value(location))
    }
}

/// An evaluator whose runtime is stochastic.
///
/// Every call sleeps for `fixed` plus a uniformly random duration in
/// `[0, varied)`, then delegates to the inner evaluator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Delayed<O> {
    /// The wrapped evaluator.
    pub inner: O,
    /// Delay applied to every call.
    pub fixed: Duration,
    /// Upper bound of the random extra delay.
    pub varied: Duration,
    #[cfg_attr(feature = "serde", serde(skip, default = "fastrand::Rng::new"))]
    rng: fastrand::Rng,
}

impl<O> Delayed<O> {
    /// Wrap `inner` with a delay of `fixed + U[0, varied)`.
    #[must_use]
    pub fn new(inner: O, fixed: Duration, varied: Duration) -> Self {
        Self {
            inner,
            fixed,
            varied,
            rng: fastrand::Rng::new(),
        }
    }

    /// Use a fixed seed for the random part of the delay.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    fn delay(&mut self) -> Duration {
        self.fixed + self.varied.mul_f64(rng_util::f64_range(&mut self.rng, 0.0, 1.0))
    }
}

impl<O: Evaluator> Evaluator for Delayed<O> {
    type Error = O::Error;

    fn evaluate(&mut self, location: &[f64]) -> Result<f64, O::Error> {
        std::thread::sleep(self.delay());
        self.inner.evaluate(location)
    }
}
