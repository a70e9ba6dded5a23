use core::num::NonZeroUsize;

use super::{Optimizer, OptimizerConfig};

/// A builder for constructing [`Optimizer`] instances with a fluent API.
///
/// Created via [`Optimizer::builder()`].
///
/// # Defaults
///
/// - Workers: the available parallelism of the machine (at least 1)
/// - Verbose: `false`
///
/// `dimensions` and `max_evaluations` have no meaningful default and start
/// at zero; a run with either left unset fails with a configuration error.
///
/// # Examples
///
/// ```
/// use async_optimize::Optimizer;
///
/// let optimizer = Optimizer::builder()
///     .workers(3)
///     .dimensions(2)
///     .max_evaluations(25)
///     .verbose(true)
///     .build();
///
/// assert_eq!(optimizer.config().workers, 3);
/// ```
#[derive(Clone, Debug)]
pub struct OptimizerBuilder {
    config: OptimizerConfig,
}

impl OptimizerBuilder {
    /// Create a new builder with default settings.
    pub(super) fn new() -> Self {
        let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Self {
            config: OptimizerConfig {
                workers,
                dimensions: 0,
                max_evaluations: 0,
                verbose: false,
            },
        }
    }

    /// Set the number of concurrent workers.
    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the dimensionality of the search space.
    #[must_use]
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.config.dimensions = dimensions;
        self
    }

    /// Set the total number of evaluations.
    #[must_use]
    pub fn max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.config.max_evaluations = max_evaluations;
        self
    }

    /// Log worker lifecycle events at `info` level.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Build the optimizer.
    #[must_use]
    pub fn build(self) -> Optimizer {
        Optimizer::new(self.config)
    }
}

impl Default for OptimizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
