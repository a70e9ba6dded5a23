#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Asynchronous black-box minimization with a fixed pool of concurrent
//! evaluators. The optimizer never waits for a whole batch: as soon as one
//! worker returns a result, the next location is chosen and sent to it.
//! Where the next location comes from is a pluggable [`Controller`]
//! strategy, including one that keeps searching on a background thread
//! while the workers evaluate.
//!
//! # Getting Started
//!
//! ```
//! use async_optimize::prelude::*;
//!
//! let optimizer = Optimizer::builder()
//!     .workers(4)
//!     .dimensions(2)
//!     .max_evaluations(200)
//!     .build();
//!
//! let mut controller = AsyncFarthestPointController::with_seed(42);
//! let best = optimizer.optimize(|_worker| Ok(Wavy), &mut controller).unwrap();
//!
//! println!("x = {:?}, f(x) = {:.4}", best.location, best.value);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Optimizer`] | Run the worker pool: seed, pipeline, drain, stop. |
//! | [`Evaluator`] | The objective; one instance per worker. Closures work directly. |
//! | [`Controller`] | Strategy for choosing the next location to evaluate. |
//! | [`Evaluation`] | A location together with its objective value. |
//!
//! # Controllers
//!
//! | Controller | Strategy |
//! |------------|----------|
//! | [`RandomController`](controller::RandomController) | Independent standard normal draws |
//! | [`FarthestPointController`](controller::FarthestPointController) | Best of N draws, farthest from everything proposed so far |
//! | [`AsyncFarthestPointController`](controller::AsyncFarthestPointController) | The same score, searched continuously on a background thread |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `async` | `Optimizer::optimize_async` on tokio's blocking pool | off |
//! | `serde` | `Serialize`/`Deserialize` on [`Evaluation`] and the reference objectives | off |
//! | `remote` | `remote` evaluation over TCP (enables `serde`) | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod controller;
mod error;
mod evaluator;
pub mod functions;
mod optimizer;
#[cfg(feature = "remote")]
pub mod remote;
mod rng_util;
mod types;

pub use controller::Controller;
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use optimizer::{OptimizationReport, Optimizer, OptimizerBuilder, OptimizerConfig};
pub use types::Evaluation;

/// Convenient wildcard import for the most common types.
///
/// ```
/// use async_optimize::prelude::*;
/// ```
pub mod prelude {
    pub use crate::controller::{
        AsyncFarthestPointController, Controller, FarthestPointController, RandomController,
    };
    pub use crate::error::{Error, Result};
    pub use crate::evaluator::Evaluator;
    pub use crate::functions::{Delayed, Wavy};
    pub use crate::optimizer::{OptimizationReport, Optimizer, OptimizerConfig};
    #[cfg(feature = "remote")]
    pub use crate::remote::{RemoteEvaluator, RemoteReceiver};
    pub use crate::types::Evaluation;
}
