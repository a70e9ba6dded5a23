use std::net::ToSocketAddrs;

use serde::Serialize;

use super::{OptimizationReport, Optimizer, OptimizerConfig};
use crate::controller::Controller;
use crate::remote::RemoteEvaluator;
use crate::types::Evaluation;

impl Optimizer {
    /// Minimize `objective` on remote receivers, one worker per endpoint.
    ///
    /// The configured worker count is replaced by `endpoints.len()`. Each
    /// worker connects to its endpoint, sends `objective` once, and closes
    /// the connection when the run ends.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoWorkers` if `endpoints` is empty, the other
    /// configuration errors of [`optimize`](Self::optimize), `Error::Io` if a
    /// connection cannot be established, and `Error::Evaluation` if a remote
    /// evaluation or the connection fails mid-run.
    pub fn optimize_remote<A, O, C>(
        &self,
        endpoints: &[A],
        objective: &O,
        controller: &mut C,
    ) -> crate::Result<Evaluation>
    where
        A: ToSocketAddrs,
        O: Serialize + ?Sized,
        C: Controller + ?Sized,
    {
        self.optimize_remote_with_stats(endpoints, objective, controller)
            .map(|report| report.best)
    }

    /// Like [`optimize_remote`](Self::optimize_remote), but returns run statistics as well.
    ///
    /// # Errors
    ///
    /// Same as [`optimize_remote`](Self::optimize_remote).
    pub fn optimize_remote_with_stats<A, O, C>(
        &self,
        endpoints: &[A],
        objective: &O,
        controller: &mut C,
    ) -> crate::Result<OptimizationReport>
    where
        A: ToSocketAddrs,
        O: Serialize + ?Sized,
        C: Controller + ?Sized,
    {
        let optimizer = Optimizer::new(OptimizerConfig {
            workers: endpoints.len(),
            ..self.config
        });
        optimizer.optimize_with_stats(
            |worker| RemoteEvaluator::connect(&endpoints[worker], objective),
            controller,
        )
    }
}
