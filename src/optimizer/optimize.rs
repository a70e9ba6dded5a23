use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};

use super::worker::{Worker, WorkerMessage};
use super::{OptimizationReport, Optimizer};
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::types::Evaluation;

/// Why a run stopped before its budget was folded.
enum Abort {
    Failed { worker: usize, message: String },
    /// Every worker hung up without reporting a failure.
    WorkersGone,
}

/// Run state owned by the optimizer loop.
struct RunState {
    best: Evaluation,
    dispatched: usize,
    completed: usize,
}

impl Optimizer {
    /// Minimize with one evaluator per worker.
    ///
    /// `make_evaluator` is called with each worker index (`0..workers`)
    /// before any thread starts; every worker owns the evaluator it gets
    /// and drops it when the run ends.
    ///
    /// Exactly `max_evaluations` locations are evaluated. If `workers`
    /// exceeds `max_evaluations`, only `max_evaluations` workers are used.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimensions`, `Error::InvalidMaxEvaluations` or
    /// `Error::NoWorkers` for an invalid configuration, without calling
    /// `make_evaluator`. Returns any error from `make_evaluator`.
    /// Returns `Error::Evaluation` if an evaluator fails or panics; the run
    /// is stopped and the error carries the best evaluation found so far.
    /// Returns `Error::WorkerPanicked` if a worker thread dies.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_optimize::prelude::*;
    ///
    /// let optimizer = Optimizer::builder()
    ///     .workers(2)
    ///     .dimensions(1)
    ///     .max_evaluations(10)
    ///     .build();
    ///
    /// let best = optimizer
    ///     .optimize(
    ///         |_| Ok(|x: &[f64]| Ok::<_, String>((x[0] - 1.0).abs())),
    ///         &mut RandomController::with_seed(3),
    ///     )
    ///     .unwrap();
    /// assert!(best.value >= 0.0);
    /// ```
    pub fn optimize<F, E, C>(&self, make_evaluator: F, controller: &mut C) -> Result<Evaluation>
    where
        F: FnMut(usize) -> Result<E>,
        E: Evaluator,
        C: Controller + ?Sized,
    {
        self.optimize_with_stats(make_evaluator, controller)
            .map(|report| report.best)
    }

    /// Like [`optimize`](Self::optimize), but returns run statistics as well.
    ///
    /// # Errors
    ///
    /// Same as [`optimize`](Self::optimize).
    pub fn optimize_with_stats<F, E, C>(
        &self,
        make_evaluator: F,
        controller: &mut C,
    ) -> Result<OptimizationReport>
    where
        F: FnMut(usize) -> Result<E>,
        E: Evaluator,
        C: Controller + ?Sized,
    {
        self.config.validate()?;
        let evaluators = (0..self.config.pipeline_width())
            .map(make_evaluator)
            .collect::<Result<Vec<E>>>()?;
        self.run(evaluators, controller)
    }

    #[allow(clippy::too_many_lines)]
    fn run<E, C>(&self, evaluators: Vec<E>, controller: &mut C) -> Result<OptimizationReport>
    where
        E: Evaluator,
        C: Controller + ?Sized,
    {
        let config = self.config;

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "optimize",
            workers = evaluators.len(),
            dimensions = config.dimensions,
            max_evaluations = config.max_evaluations
        )
        .entered();

        let started = Instant::now();
        let mut state = RunState {
            best: Evaluation::worst(config.dimensions),
            dispatched: 0,
            completed: 0,
        };

        thread::scope(|scope| {
            let (request_tx, request_rx) = crossbeam_channel::bounded::<Vec<f64>>(0);
            let (response_tx, response_rx) = crossbeam_channel::bounded::<WorkerMessage>(0);
            let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);

            let mut handles: Vec<ScopedJoinHandle<'_, usize>> = Vec::with_capacity(evaluators.len());
            let mut spawn_error = None;
            for (id, evaluator) in evaluators.into_iter().enumerate() {
                let worker = Worker::new(
                    id,
                    evaluator,
                    request_rx.clone(),
                    response_tx.clone(),
                    stop_rx.clone(),
                    config.verbose,
                );
                match thread::Builder::new()
                    .name(format!("worker-{id}"))
                    .spawn_scoped(scope, move || worker.run())
                {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        spawn_error = Some(Error::Spawn(e.to_string()));
                        break;
                    }
                }
            }
            // Only workers hold these now, so a dead pool shows up as a
            // disconnected channel instead of a hang.
            drop(request_rx);
            drop(response_tx);
            drop(stop_rx);

            let outcome = match spawn_error {
                Some(e) => Err(e),
                None => {
                    trace_info!(workers = handles.len(), "optimization started");
                    let pipeline = Pipeline {
                        width: handles.len(),
                        max_evaluations: config.max_evaluations,
                        requests: &request_tx,
                        responses: &response_rx,
                    };
                    let driven = pipeline.drive(&mut state, controller);
                    controller.finish();
                    Ok(driven)
                }
            };

            // Broadcast stop. Dropping the response receiver also releases
            // workers blocked on sending a result nobody will fold.
            drop(stop_tx);
            drop(request_tx);
            drop(response_rx);

            let mut per_worker = Vec::with_capacity(handles.len());
            let mut panicked = None;
            for (id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(evaluated) => per_worker.push(evaluated),
                    Err(_) => {
                        per_worker.push(0);
                        panicked.get_or_insert(id);
                    }
                }
            }

            match outcome? {
                Ok(()) => {}
                Err(Abort::Failed { worker, message }) => {
                    trace_debug!(worker, %message, "evaluation failed, run stopped");
                    return Err(Error::Evaluation {
                        worker,
                        message,
                        best: (state.completed > 0).then(|| state.best.clone()),
                    });
                }
                Err(Abort::WorkersGone) => {
                    return Err(Error::WorkerPanicked(panicked.unwrap_or(0)));
                }
            }
            if let Some(id) = panicked {
                return Err(Error::WorkerPanicked(id));
            }

            trace_info!(
                evaluations = state.completed,
                best_value = state.best.value,
                "optimization finished"
            );
            Ok(OptimizationReport {
                best: state.best.clone(),
                evaluations: state.completed,
                per_worker,
                elapsed: started.elapsed(),
            })
        })
    }
}

/// The optimizer's ends of the worker channels.
struct Pipeline<'a> {
    width: usize,
    max_evaluations: usize,
    requests: &'a Sender<Vec<f64>>,
    responses: &'a Receiver<WorkerMessage>,
}

impl Pipeline<'_> {
    /// Seed, steady-state and drain phases of a run.
    fn drive<C: Controller + ?Sized>(
        &self,
        state: &mut RunState,
        controller: &mut C,
    ) -> core::result::Result<(), Abort> {
        let dimensions = state.best.location.len();
        controller.init(dimensions);

        // Seed: one location per worker so the whole pool starts at once.
        for _ in 0..self.width {
            let mut location = vec![0.0; dimensions];
            controller.next(&mut location);
            self.dispatch(state, location)?;
        }

        // Steady state: every returned result buys exactly one new dispatch.
        while state.dispatched < self.max_evaluations {
            let evaluation = self.fold_next(state, controller)?;
            let mut location = evaluation.location;
            controller.next(&mut location);
            self.dispatch(state, location)?;
        }

        // Drain whatever is still in flight.
        while state.completed < state.dispatched {
            self.fold_next(state, controller)?;
        }
        Ok(())
    }

    fn dispatch(&self, state: &mut RunState, location: Vec<f64>) -> core::result::Result<(), Abort> {
        self.requests
            .send(location)
            .map_err(|_| Abort::WorkersGone)?;
        state.dispatched += 1;
        Ok(())
    }

    /// Receive one worker message and fold it into the run.
    fn fold_next<C: Controller + ?Sized>(
        &self,
        state: &mut RunState,
        controller: &mut C,
    ) -> core::result::Result<Evaluation, Abort> {
        match self.responses.recv().map_err(|_| Abort::WorkersGone)? {
            WorkerMessage::Completed {
                worker: _worker,
                evaluation,
            } => {
                state.completed += 1;
                if state.best.fold(&evaluation) {
                    trace_debug!(
                        worker = _worker,
                        value = evaluation.value,
                        "new best value found"
                    );
                }
                controller.add(&evaluation.location, evaluation.value);
                Ok(evaluation)
            }
            WorkerMessage::Failed { worker, message } => Err(Abort::Failed { worker, message }),
        }
    }
}
