use super::{OptimizationReport, Optimizer};
use crate::controller::Controller;
use crate::evaluator::Evaluator;
use crate::types::Evaluation;

impl Optimizer {
    /// Run [`optimize`](Self::optimize) from async code.
    ///
    /// The whole run is moved onto tokio's blocking pool with
    /// [`spawn_blocking`](tokio::task::spawn_blocking), keeping the async
    /// runtime responsive while the workers evaluate. The controller is
    /// consumed; pass a `Box<dyn Controller>` to choose one at runtime.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`optimize`](Self::optimize), and
    /// `Error::TaskError` if the blocking task panics or is cancelled.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_optimize::prelude::*;
    ///
    /// # #[cfg(feature = "async")]
    /// # async fn example() -> async_optimize::Result<()> {
    /// let optimizer = Optimizer::builder()
    ///     .workers(2)
    ///     .dimensions(2)
    ///     .max_evaluations(20)
    ///     .build();
    ///
    /// let best = optimizer
    ///     .optimize_async(|_| Ok(Wavy), AsyncFarthestPointController::with_seed(1))
    ///     .await?;
    /// assert_eq!(best.location.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn optimize_async<F, E, C>(
        &self,
        make_evaluator: F,
        controller: C,
    ) -> crate::Result<Evaluation>
    where
        F: FnMut(usize) -> crate::Result<E> + Send + 'static,
        E: Evaluator + 'static,
        C: Controller + 'static,
    {
        self.optimize_async_with_stats(make_evaluator, controller)
            .await
            .map(|report| report.best)
    }

    /// Like [`optimize_async`](Self::optimize_async), but returns run statistics as well.
    ///
    /// # Errors
    ///
    /// Same as [`optimize_async`](Self::optimize_async).
    pub async fn optimize_async_with_stats<F, E, C>(
        &self,
        make_evaluator: F,
        mut controller: C,
    ) -> crate::Result<OptimizationReport>
    where
        F: FnMut(usize) -> crate::Result<E> + Send + 'static,
        E: Evaluator + 'static,
        C: Controller + 'static,
    {
        // Fail fast without touching the blocking pool.
        self.config.validate()?;

        let optimizer = self.clone();
        tokio::task::spawn_blocking(move || {
            optimizer.optimize_with_stats(make_evaluator, &mut controller)
        })
        .await
        .map_err(|e| crate::Error::TaskError(e.to_string()))?
    }
}
