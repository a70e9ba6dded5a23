//! Asynchronous worker-pool optimizer.
//!
//! The optimizer keeps every worker busy: it seeds one location per worker,
//! then hands out a new location as soon as any worker returns a result,
//! without waiting for the rest of the pool. Once the evaluation budget is
//! dispatched it drains the in-flight evaluations and stops the workers.

use core::time::Duration;

use crate::error::{Error, Result};
use crate::types::Evaluation;

#[cfg(feature = "async")]
mod async_impl;
mod builder;
mod optimize;
#[cfg(feature = "remote")]
mod remote_impl;
mod worker;

pub use builder::OptimizerBuilder;

/// Run configuration for an [`Optimizer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Dimensionality of every location.
    pub dimensions: usize,
    /// Total number of evaluations to perform.
    pub max_evaluations: usize,
    /// Log worker lifecycle events at `info` instead of `debug` level.
    pub verbose: bool,
}

impl OptimizerConfig {
    /// Check the run preconditions.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimensions` if `dimensions` is zero,
    /// `Error::InvalidMaxEvaluations` if `max_evaluations` is zero, and
    /// `Error::NoWorkers` if `workers` is zero, checked in that order.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            return Err(Error::InvalidDimensions);
        }
        if self.max_evaluations == 0 {
            return Err(Error::InvalidMaxEvaluations);
        }
        if self.workers == 0 {
            return Err(Error::NoWorkers);
        }
        Ok(())
    }

    /// Number of workers actually used: never more than the budget.
    #[must_use]
    pub fn pipeline_width(&self) -> usize {
        self.workers.min(self.max_evaluations)
    }
}

/// Summary of a finished run.
#[derive(Clone, Debug)]
pub struct OptimizationReport {
    /// The best evaluation found.
    pub best: Evaluation,
    /// Number of evaluations completed.
    pub evaluations: usize,
    /// Number of evaluations completed by each worker, by worker index.
    pub per_worker: Vec<usize>,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

/// Minimizes an objective with a fixed pool of concurrent workers.
///
/// # Examples
///
/// ```
/// use async_optimize::prelude::*;
///
/// let optimizer = Optimizer::builder()
///     .workers(4)
///     .dimensions(2)
///     .max_evaluations(100)
///     .build();
///
/// let mut controller = FarthestPointController::with_seed(42);
/// let best = optimizer
///     .optimize(|_| Ok(Wavy), &mut controller)
///     .unwrap();
///
/// assert_eq!(best.location.len(), 2);
/// assert_eq!(controller.history().len(), 100);
/// ```
#[derive(Clone, Debug)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    /// Create an optimizer from a configuration.
    ///
    /// The configuration is validated when a run starts.
    #[must_use]
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Return an [`OptimizerBuilder`] for constructing an optimizer with a fluent API.
    #[must_use]
    pub fn builder() -> OptimizerBuilder {
        OptimizerBuilder::new()
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}
