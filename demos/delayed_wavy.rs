//! Pipelined optimization of an objective with stochastic runtime.
//!
//! Every evaluation sleeps for a random time, so workers finish out of
//! order. The optimizer hands a new location to whichever worker finishes
//! first while the background farthest-point search keeps looking for the
//! next one.
//!
//! Run with: `cargo run --example delayed_wavy`

use std::time::{Duration, Instant};

use async_optimize::prelude::*;

fn main() -> async_optimize::Result<()> {
    let workers = std::thread::available_parallelism()
        .map_or(2, |n| n.get().saturating_sub(1).max(1));

    let optimizer = Optimizer::builder()
        .workers(workers)
        .dimensions(2)
        .max_evaluations(25)
        .verbose(true)
        .build();

    let objective = Delayed::new(Wavy, Duration::from_millis(100), Duration::from_millis(350));
    let mut controller = AsyncFarthestPointController::new();

    let started = Instant::now();
    // The background search stops by itself when the run ends.
    let report = optimizer.optimize_with_stats(|_| Ok(objective.clone()), &mut controller)?;

    println!("Optimization finished in {:.2?}", started.elapsed());
    println!("Best location: {:?}", report.best.location);
    println!("Best value:    {:.6}", report.best.value);
    println!("Evaluations per worker: {:?}", report.per_worker);
    Ok(())
}
