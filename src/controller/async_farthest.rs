//! Asynchronous farthest-point controller.
//!
//! Uses the same scoring rule as [`FarthestPointController`](super::FarthestPointController)
//! (maximize the distance to the nearest accepted location) but searches
//! continuously on a background thread. Between two calls to
//! [`next`](Controller::next) the thread keeps drawing candidates and keeps
//! the best one, so `next` only has to pick up the current winner.
//!
//! # History hand-off
//!
//! The search thread owns its own copy of the accepted history. A call to
//! `next` is a rendezvous on the request channel followed by one on the
//! response channel; while handing out a candidate the thread appends it to
//! its copy, and the caller appends the received candidate to
//! [`history`](AsyncFarthestPointController::history). Both copies change
//! only at that rendezvous, so no memory is shared between the threads.

use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::controller::{Controller, min_squared_distance};
use crate::rng_util;

/// Farthest-point controller that searches on a background thread.
///
/// The thread is started by [`init`](Controller::init) (or lazily by the
/// first `next`) and stopped by [`finish`](Controller::finish) at the end of
/// a run, by [`shutdown`](Self::shutdown), or on drop.
///
/// Seeding fixes the sequence of candidates the thread draws, but how many
/// of them it scores between two calls depends on timing, so proposals are
/// not reproducible across runs.
///
/// # Examples
///
/// ```
/// use async_optimize::controller::{AsyncFarthestPointController, Controller};
///
/// let mut controller = AsyncFarthestPointController::with_seed(7);
/// controller.init(2);
///
/// let mut x = [0.0; 2];
/// controller.next(&mut x);
/// controller.next(&mut x);
/// assert_eq!(controller.history().len(), 2);
///
/// controller.shutdown();
/// ```
pub struct AsyncFarthestPointController {
    seed: Option<u64>,
    history: Vec<Vec<f64>>,
    search: Option<SearchHandle>,
}

struct SearchHandle {
    dimensions: usize,
    requests: Sender<()>,
    responses: Receiver<Vec<f64>>,
    stop: Sender<()>,
    thread: JoinHandle<Search>,
}

impl AsyncFarthestPointController {
    /// Creates a controller with a default random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seed: None,
            history: Vec::new(),
            search: None,
        }
    }

    /// Creates a controller whose search thread draws from a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            history: Vec::new(),
            search: None,
        }
    }

    /// Every location handed out so far, in hand-out order.
    #[must_use]
    pub fn history(&self) -> &[Vec<f64>] {
        &self.history
    }

    /// Returns `true` while the background search thread is running.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Stop the background search and wait for the thread to exit.
    ///
    /// The thread checks for the stop signal before every search unit, so
    /// this returns after at most one candidate evaluation. Returns the number
    /// of search units the thread performed, or `None` if it was not running.
    /// Calling `shutdown` twice is a no-op.
    pub fn shutdown(&mut self) -> Option<u64> {
        self.stop_search().map(|search| search.units)
    }

    fn stop_search(&mut self) -> Option<Search> {
        let SearchHandle {
            requests,
            responses,
            stop,
            thread,
            ..
        } = self.search.take()?;

        // Disconnecting the stop channel is the broadcast.
        drop(stop);
        drop(requests);
        drop(responses);

        let search = thread.join().ok()?;
        trace_debug!(units = search.units, "farthest-point search stopped");
        Some(search)
    }

    fn start_search(&mut self, dimensions: usize) {
        self.stop_search();

        let (request_tx, request_rx) = crossbeam_channel::bounded(0);
        let (response_tx, response_rx) = crossbeam_channel::bounded(0);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(0);

        let search = Search::new(dimensions, self.seed, self.history.clone());
        let spawned = std::thread::Builder::new()
            .name("farthest-point-search".into())
            .spawn(move || search.run(&request_rx, &response_tx, &stop_rx));
        let thread = match spawned {
            Ok(thread) => thread,
            Err(_e) => {
                trace_debug!(error = %_e, "failed to spawn farthest-point search");
                return;
            }
        };

        trace_debug!(dimensions, "farthest-point search started");
        self.search = Some(SearchHandle {
            dimensions,
            requests: request_tx,
            responses: response_rx,
            stop: stop_tx,
            thread,
        });
    }

    /// Ask the search thread for its current best candidate.
    fn request(&self) -> Option<Vec<f64>> {
        let search = self.search.as_ref()?;
        search.requests.send(()).ok()?;
        search.responses.recv().ok()
    }
}

impl Default for AsyncFarthestPointController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AsyncFarthestPointController {
    fn drop(&mut self) {
        self.stop_search();
    }
}

impl Controller for AsyncFarthestPointController {
    /// Start (or restart) the background search with an empty history.
    fn init(&mut self, dimensions: usize) {
        self.stop_search();
        self.history.clear();
        self.start_search(dimensions);
    }

    fn next(&mut self, location: &mut [f64]) {
        match self.search.as_ref().map(|s| s.dimensions) {
            Some(dimensions) if dimensions != location.len() => self.init(location.len()),
            Some(_) => {}
            None => self.start_search(location.len()),
        }

        let candidate = match self.request() {
            Some(candidate) => candidate,
            None => {
                // The thread is gone; restart it from the accepted history.
                self.start_search(location.len());
                self.request().unwrap_or_else(|| {
                    // No thread at all: score one draw in place.
                    let seed = self.seed.map(|s| s.wrapping_add(self.history.len() as u64));
                    Search::new(location.len(), seed, self.history.clone()).hand_out()
                })
            }
        };

        location.copy_from_slice(&candidate);
        self.history.push(candidate);
    }

    fn add(&mut self, _location: &[f64], _value: f64) {}

    /// Stop the background search. The history is kept; a later `next`
    /// resumes the search from it.
    fn finish(&mut self) {
        self.stop_search();
    }
}

/// State owned by the background search thread.
struct Search {
    rng: fastrand::Rng,
    accepted: Vec<Vec<f64>>,
    candidate: Vec<f64>,
    best: Vec<f64>,
    best_score: f64,
    units: u64,
}

impl Search {
    fn new(dimensions: usize, seed: Option<u64>, accepted: Vec<Vec<f64>>) -> Self {
        Self {
            rng: rng_util::rng_from(seed),
            accepted,
            candidate: vec![0.0; dimensions],
            best: vec![0.0; dimensions],
            best_score: f64::NEG_INFINITY,
            units: 0,
        }
    }

    /// Serve requests first, then check for stop, then search one unit.
    fn run(
        mut self,
        requests: &Receiver<()>,
        responses: &Sender<Vec<f64>>,
        stop: &Receiver<()>,
    ) -> Self {
        loop {
            match requests.try_recv() {
                Ok(()) => {
                    let candidate = self.hand_out();
                    if responses.send(candidate).is_err() {
                        break;
                    }
                    continue;
                }
                Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }

            if !matches!(stop.try_recv(), Err(TryRecvError::Empty)) {
                break;
            }

            self.search_unit();
        }
        self
    }

    /// Draw one candidate and keep it if it beats the current best.
    fn search_unit(&mut self) {
        rng_util::fill_standard_normal(&mut self.rng, &mut self.candidate);
        let score = min_squared_distance(&self.candidate, &self.accepted);
        if score > self.best_score {
            self.best_score = score;
            self.best.copy_from_slice(&self.candidate);
        }
        self.units += 1;
    }

    /// Accept the current best and start the next search from scratch.
    fn hand_out(&mut self) -> Vec<f64> {
        // Scores are never negative, so this means nothing was drawn yet.
        if self.best_score < 0.0 {
            self.search_unit();
        }
        let candidate = self.best.clone();
        self.accepted.push(candidate.clone());
        self.best_score = f64::NEG_INFINITY;
        candidate
    }
}
