use crate::types::Evaluation;

/// Errors returned by optimizers, controllers and remote evaluators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the problem dimension is zero.
    #[error("invalid dimensions: the problem must have at least one dimension")]
    InvalidDimensions,

    /// Returned when the evaluation budget is zero.
    #[error("invalid evaluation budget: max_evaluations must be positive")]
    InvalidMaxEvaluations,

    /// Returned when the optimizer has no workers (or no remote endpoints).
    #[error("no workers: at least one worker is required")]
    NoWorkers,

    /// Returned when a farthest-point controller is built with zero guesses.
    #[error("invalid guess count: num_guess must be positive")]
    InvalidGuessCount,

    /// Returned when an evaluator fails during a run.
    ///
    /// The run is stopped and every worker is shut down. `best` carries the
    /// best evaluation folded before the failure, if any.
    #[error("evaluation failed on worker {worker}: {message}")]
    Evaluation {
        /// Index of the worker whose evaluator failed.
        worker: usize,
        /// The evaluator's error message.
        message: String,
        /// Best evaluation completed before the failure.
        best: Option<Evaluation>,
    },

    /// Returned when a worker thread panics.
    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    /// Returned when a thread cannot be spawned.
    #[error("failed to spawn thread: {0}")]
    Spawn(String),

    /// Returned when a remote connection fails.
    #[cfg(feature = "remote")]
    #[error("i/o error: {0}")]
    Io(String),

    /// Returned when a remote receiver reports an evaluation failure.
    #[cfg(feature = "remote")]
    #[error("remote evaluation failed: {0}")]
    Remote(String),

    /// Returned when a remote peer sends malformed or truncated data.
    #[cfg(feature = "remote")]
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Returned when an async task fails.
    #[cfg(feature = "async")]
    #[error("async task error: {0}")]
    TaskError(String),
}

impl Error {
    /// Returns `true` for errors detected before any work was started.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidDimensions
                | Error::InvalidMaxEvaluations
                | Error::NoWorkers
                | Error::InvalidGuessCount
        )
    }

    /// The best evaluation completed before an evaluation failure.
    #[must_use]
    pub fn partial_best(&self) -> Option<&Evaluation> {
        match self {
            Error::Evaluation { best, .. } => best.as_ref(),
            _ => None,
        }
    }
}

#[cfg(feature = "remote")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
