//! The [`Evaluator`] trait defines what gets optimized.
//!
//! Each worker owns one evaluator instance, built by the factory passed to
//! [`Optimizer::optimize`](crate::Optimizer::optimize). Plain closures work
//! directly:
//!
//! ```
//! use async_optimize::prelude::*;
//!
//! let optimizer = Optimizer::builder()
//!     .workers(2)
//!     .dimensions(3)
//!     .max_evaluations(20)
//!     .build();
//!
//! let best = optimizer
//!     .optimize(
//!         |_worker| Ok(|x: &[f64]| Ok::<f64, String>(x.iter().map(|v| v * v).sum())),
//!         &mut RandomController::with_seed(1),
//!     )
//!     .unwrap();
//! assert_eq!(best.location.len(), 3);
//! ```
//!
//! Implement [`Evaluator`] on a struct when the evaluator holds resources,
//! such as a connection to a remote process. The worker drops its evaluator
//! when it stops, which releases those resources.

/// An objective function evaluated by a worker.
///
/// `evaluate` may block for an arbitrary amount of time and may perform I/O.
/// The optimizer never calls one instance from two threads: every worker
/// gets its own evaluator, so implementations only need to be [`Send`].
pub trait Evaluator: Send {
    /// The error type returned by [`evaluate`](Evaluator::evaluate).
    type Error: ToString + 'static;

    /// Evaluate the objective at `location`.
    ///
    /// # Errors
    ///
    /// Any error whose type implements `ToString`. An error ends the run:
    /// the optimizer stops every worker and returns
    /// [`Error::Evaluation`](crate::Error::Evaluation).
    fn evaluate(&mut self, location: &[f64]) -> Result<f64, Self::Error>;
}

impl<F, E> Evaluator for F
where
    F: FnMut(&[f64]) -> Result<f64, E> + Send,
    E: ToString + 'static,
{
    type Error = E;

    fn evaluate(&mut self, location: &[f64]) -> Result<f64, E> {
        self(location)
    }
}
