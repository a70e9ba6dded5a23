use std::time::{Duration, Instant};

use async_optimize::controller::{
    AsyncFarthestPointController, FarthestPointController, RandomController,
};
use async_optimize::{Controller, Error};

fn min_distance(x: &[f64], others: &[Vec<f64>]) -> f64 {
    others
        .iter()
        .map(|o| x.iter().zip(o).map(|(a, b)| (a - b).powi(2)).sum::<f64>())
        .fold(f64::INFINITY, f64::min)
}

#[test]
fn test_random_controller_seeded_sequence_repeats() {
    let mut a = RandomController::with_seed(42);
    let mut b = RandomController::with_seed(42);
    a.init(3);
    b.init(3);

    let mut xa = [0.0; 3];
    let mut xb = [0.0; 3];
    for _ in 0..10 {
        a.next(&mut xa);
        b.next(&mut xb);
        assert_eq!(xa, xb);
        assert!(xa.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_farthest_point_builder_rejects_zero_guesses() {
    let result = FarthestPointController::builder().num_guess(0).build();
    assert!(matches!(result, Err(Error::InvalidGuessCount)));
}

#[test]
fn test_farthest_point_spreads_better_than_random() {
    let mut farthest = FarthestPointController::builder()
        .num_guess(200)
        .seed(1)
        .build()
        .unwrap();
    let mut random = RandomController::with_seed(1);

    let mut x = [0.0; 2];
    let mut random_points = Vec::new();
    for _ in 0..30 {
        farthest.next(&mut x);
        random.next(&mut x);
        random_points.push(x.to_vec());
    }

    let closest_pair = |points: &[Vec<f64>]| {
        (1..points.len())
            .map(|i| min_distance(&points[i], &points[..i]))
            .fold(f64::INFINITY, f64::min)
    };
    assert!(closest_pair(farthest.history()) > closest_pair(random_points.as_slice()));
}

#[test]
fn test_async_farthest_point_shutdown_is_prompt() {
    let mut controller = AsyncFarthestPointController::with_seed(3);
    controller.init(8);

    let mut x = [0.0; 8];
    for _ in 0..20 {
        controller.next(&mut x);
    }

    let started = Instant::now();
    let units = controller.shutdown();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(units.is_some_and(|n| n >= 20));
    assert!(!controller.is_searching());
    assert_eq!(controller.history().len(), 20);
}

#[test]
fn test_async_farthest_point_handles_dimension_change() {
    let mut controller = AsyncFarthestPointController::with_seed(4);
    controller.init(2);

    let mut x2 = [0.0; 2];
    controller.next(&mut x2);

    let mut x5 = [0.0; 5];
    controller.next(&mut x5);

    assert_eq!(controller.history().len(), 1);
    assert_eq!(controller.history()[0].len(), 5);
}

#[test]
fn test_async_farthest_point_drop_stops_thread() {
    let mut controller = AsyncFarthestPointController::new();
    controller.init(3);
    let mut x = [0.0; 3];
    controller.next(&mut x);

    let started = Instant::now();
    drop(controller);
    assert!(started.elapsed() < Duration::from_secs(1));
}
