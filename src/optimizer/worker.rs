use core::panic::AssertUnwindSafe;
use std::panic;

use crossbeam_channel::{Receiver, Sender};

use crate::evaluator::Evaluator;
use crate::types::Evaluation;

/// What a worker sends back for each location it received.
#[derive(Debug)]
pub(super) enum WorkerMessage {
    Completed {
        worker: usize,
        evaluation: Evaluation,
    },
    Failed {
        worker: usize,
        message: String,
    },
}

/// A worker thread bound to one evaluator.
///
/// Pulls locations from the shared request channel and pushes one message per
/// location to the shared response channel until the stop channel is
/// disconnected. Both data channels are rendezvous channels, so a worker
/// never holds more than one location.
pub(super) struct Worker<E> {
    id: usize,
    evaluator: E,
    requests: Receiver<Vec<f64>>,
    responses: Sender<WorkerMessage>,
    stop: Receiver<()>,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    verbose: bool,
}

impl<E: Evaluator> Worker<E> {
    pub(super) fn new(
        id: usize,
        evaluator: E,
        requests: Receiver<Vec<f64>>,
        responses: Sender<WorkerMessage>,
        stop: Receiver<()>,
        verbose: bool,
    ) -> Self {
        Self {
            id,
            evaluator,
            requests,
            responses,
            stop,
            verbose,
        }
    }

    /// Run until stopped. Returns the number of locations evaluated.
    ///
    /// The evaluator is dropped when this returns.
    pub(super) fn run(mut self) -> usize {
        self.event("worker launched");
        let mut evaluated = 0;

        loop {
            crossbeam_channel::select! {
                recv(self.requests) -> location => {
                    let Ok(location) = location else { break };
                    let message = self.evaluate(location);
                    evaluated += 1;
                    if self.responses.send(message).is_err() {
                        // The optimizer gave up on this run.
                        break;
                    }
                    self.event("worker finished running");
                }
                recv(self.stop) -> _ => break,
            }
        }

        self.event("worker quit");
        evaluated
    }

    fn evaluate(&mut self, location: Vec<f64>) -> WorkerMessage {
        let worker = self.id;
        let evaluator = &mut self.evaluator;
        match panic::catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(&location))) {
            Ok(Ok(value)) => WorkerMessage::Completed {
                worker,
                evaluation: Evaluation::new(location, value),
            },
            Ok(Err(e)) => WorkerMessage::Failed {
                worker,
                message: e.to_string(),
            },
            Err(_) => WorkerMessage::Failed {
                worker,
                message: "evaluator panicked".to_string(),
            },
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(clippy::unused_self))]
    fn event(&self, _event: &'static str) {
        #[cfg(feature = "tracing")]
        if self.verbose {
            tracing::info!(worker = self.id, "{_event}");
        } else {
            tracing::debug!(worker = self.id, "{_event}");
        }
    }
}
