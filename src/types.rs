//! Core types for the optimizer library.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A location together with its objective value.
///
/// Workers produce exactly one `Evaluation` per dispatched location and hand
/// ownership to the optimizer through the response channel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evaluation {
    /// The evaluated location.
    pub location: Vec<f64>,
    /// The objective value at `location`.
    pub value: f64,
}

impl Evaluation {
    /// Creates a new evaluation.
    #[must_use]
    pub fn new(location: Vec<f64>, value: f64) -> Self {
        Self { location, value }
    }

    /// The starting point of a minimization: a zero vector with value `+inf`.
    #[must_use]
    pub fn worst(dimensions: usize) -> Self {
        Self {
            location: vec![0.0; dimensions],
            value: f64::INFINITY,
        }
    }

    /// Fold `other` into `self` if it is strictly better.
    ///
    /// Ties keep the earlier location. Returns `true` when `self` changed.
    pub(crate) fn fold(&mut self, other: &Evaluation) -> bool {
        if other.value < self.value {
            self.value = other.value;
            self.location.clone_from(&other.location);
            true
        } else {
            false
        }
    }
}
