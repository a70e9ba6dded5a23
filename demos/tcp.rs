//! Remote evaluation over TCP.
//!
//! Starts three receivers on localhost ports 2000-2002, each on its own
//! thread, and runs one worker per receiver. In a real deployment the
//! receivers run on other machines:
//!
//! ```text
//! let receiver = RemoteReceiver::bind("0.0.0.0:2000")?;
//! receiver.serve_one::<Delayed<Wavy>>()?;
//! ```
//!
//! Run with: `cargo run --example tcp --features remote`

use std::thread;
use std::time::Duration;

use async_optimize::prelude::*;

fn main() -> async_optimize::Result<()> {
    let endpoints: Vec<String> = (0..3).map(|i| format!("127.0.0.1:{}", 2000 + i)).collect();

    let mut receivers = Vec::with_capacity(endpoints.len());
    for endpoint in &endpoints {
        let receiver = RemoteReceiver::bind(endpoint.as_str())?;
        receivers.push(thread::spawn(move || receiver.serve_one::<Delayed<Wavy>>()));
    }

    let optimizer = Optimizer::builder()
        .dimensions(2)
        .max_evaluations(25)
        .build();
    let objective = Delayed::new(Wavy, Duration::from_millis(50), Duration::from_millis(150));

    let report = optimizer.optimize_remote_with_stats(
        &endpoints,
        &objective,
        &mut AsyncFarthestPointController::new(),
    )?;

    for (i, receiver) in receivers.into_iter().enumerate() {
        match receiver.join() {
            Ok(served) => println!("receiver {i} served {} evaluations", served?),
            Err(_) => eprintln!("receiver {i} panicked"),
        }
    }

    println!("Best location: {:?}", report.best.location);
    println!("Best value:    {:.6}", report.best.value);
    Ok(())
}
