use std::time::Duration;

use async_optimize::controller::{AsyncFarthestPointController, FarthestPointController};
use async_optimize::functions::{Delayed, Wavy};
use async_optimize::{Controller, Optimizer};

use crate::common::{Counter, RecordingController, TaggingController};

fn optimizer(workers: usize, dimensions: usize, max_evaluations: usize) -> Optimizer {
    Optimizer::builder()
        .workers(workers)
        .dimensions(dimensions)
        .max_evaluations(max_evaluations)
        .build()
}

#[test]
fn test_exact_evaluation_count() {
    let counter = Counter::default();
    let mut controller = RecordingController::seeded(1);

    let report = optimizer(3, 2, 50)
        .optimize_with_stats(
            |_| {
                let counter = counter.clone();
                Ok(move |x: &[f64]| {
                    counter.bump();
                    Ok::<f64, String>(Wavy.value(x))
                })
            },
            &mut controller,
        )
        .unwrap();

    assert_eq!(counter.get(), 50);
    assert_eq!(report.evaluations, 50);
    assert_eq!(report.per_worker.len(), 3);
    assert_eq!(report.per_worker.iter().sum::<usize>(), 50);
    assert_eq!(controller.init_calls, vec![2]);
    assert_eq!(controller.proposed.len(), 50);
    assert_eq!(controller.added.len(), 50);
}

#[test]
fn test_best_is_minimum_of_all_evaluations() {
    let mut controller = RecordingController::seeded(2);

    let best = optimizer(4, 3, 80)
        .optimize(|_| Ok(Wavy), &mut controller)
        .unwrap();

    assert_eq!(best.location.len(), 3);
    for (location, value) in &controller.added {
        assert!(best.value <= *value);
        assert_eq!(location.len(), 3);
    }
    let min = controller
        .added
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::INFINITY, f64::min);
    assert!((best.value - min).abs() < f64::EPSILON);
    assert!((Wavy.value(&best.location) - best.value).abs() < 1e-12);
}

#[test]
fn test_liveness_first_component_objective() {
    let mut controller = RecordingController::seeded(3);

    let best = optimizer(4, 2, 100)
        .optimize(
            |_| Ok(|x: &[f64]| Ok::<f64, String>(x[0])),
            &mut controller,
        )
        .unwrap();

    assert_eq!(controller.proposed.len(), 100);
    let min = controller
        .proposed
        .iter()
        .map(|x| x[0])
        .fold(f64::INFINITY, f64::min);
    assert!((best.value - min).abs() < f64::EPSILON);
    assert!((best.location[0] - min).abs() < f64::EPSILON);
}

#[test]
fn test_every_location_folded_exactly_once() {
    let mut controller = TaggingController::default();

    optimizer(5, 2, 200)
        .optimize(
            |_| Ok(Delayed::new(Wavy, Duration::ZERO, Duration::from_micros(200))),
            &mut controller,
        )
        .unwrap();

    assert_eq!(controller.issued, 200);
    let mut tags = controller.added.clone();
    tags.sort_by(f64::total_cmp);
    let expected: Vec<f64> = (0..200).map(|i| i as f64).collect();
    assert_eq!(tags, expected);
}

#[test]
fn test_workers_clamped_to_budget() {
    let counter = Counter::default();
    let mut built = Vec::new();
    let mut controller = RecordingController::seeded(4);

    let report = optimizer(8, 1, 3)
        .optimize_with_stats(
            |worker| {
                built.push(worker);
                let counter = counter.clone();
                Ok(move |x: &[f64]| {
                    counter.bump();
                    Ok::<f64, String>(x[0] * x[0])
                })
            },
            &mut controller,
        )
        .unwrap();

    assert_eq!(counter.get(), 3);
    assert_eq!(report.evaluations, 3);
    assert_eq!(built, vec![0, 1, 2]);
    assert_eq!(report.per_worker.len(), 3);
}

#[test]
fn test_single_worker_single_evaluation() {
    let mut controller = RecordingController::seeded(5);

    let best = optimizer(1, 4, 1)
        .optimize(|_| Ok(Wavy), &mut controller)
        .unwrap();

    assert_eq!(controller.proposed, vec![best.location.clone()]);
    assert!(best.value.is_finite());
}

#[test]
fn test_slow_workers_share_the_load() {
    let report = optimizer(4, 2, 40)
        .optimize_with_stats(
            |worker| {
                Ok(Delayed::new(Wavy, Duration::from_millis(1), Duration::from_millis(2))
                    .with_seed(worker as u64))
            },
            &mut RecordingController::seeded(6),
        )
        .unwrap();

    assert_eq!(report.per_worker.iter().sum::<usize>(), 40);
    assert!(
        report.per_worker.iter().all(|&n| n > 0),
        "every worker should get work: {:?}",
        report.per_worker
    );
}

#[test]
fn test_farthest_point_controller_in_optimizer() {
    let mut controller = FarthestPointController::with_seed(7);

    let best = optimizer(3, 2, 60)
        .optimize(|_| Ok(Wavy), &mut controller)
        .unwrap();

    assert_eq!(controller.history().len(), 60);
    assert!(controller.history().contains(&best.location));
}

#[test]
fn test_async_farthest_point_controller_in_optimizer() {
    let mut controller = RecordingController::new(AsyncFarthestPointController::with_seed(8));

    let best = optimizer(4, 2, 60)
        .optimize(
            |_| Ok(Delayed::new(Wavy, Duration::ZERO, Duration::from_micros(500))),
            &mut controller,
        )
        .unwrap();

    assert_eq!(controller.inner.history(), controller.proposed.as_slice());
    assert!(controller.proposed.contains(&best.location));
    assert_eq!(controller.finish_calls, 1);
    assert!(!controller.inner.is_searching());
    assert_eq!(controller.inner.shutdown(), None);
}

#[test]
fn test_constant_objective_keeps_first_seeded_location() {
    let mut controller = RecordingController::seeded(12);

    let best = optimizer(3, 2, 30)
        .optimize(|_| Ok(|_: &[f64]| Ok::<f64, String>(1.5)), &mut controller)
        .unwrap();

    assert!((best.value - 1.5).abs() < f64::EPSILON);
    // The optimizer is alone in folding, so the earliest arrival is a seed and
    // every later tie is ignored.
    let first_folded = &controller.added[0].0;
    assert_eq!(&best.location, first_folded);
    assert!(controller.proposed[..3].contains(&best.location));
}

#[test]
fn test_boxed_controller() {
    let mut controller: Box<dyn Controller> = Box::new(FarthestPointController::with_seed(9));

    let best = optimizer(2, 2, 10)
        .optimize(|_| Ok(Wavy), &mut controller)
        .unwrap();

    assert_eq!(best.location.len(), 2);
}

#[test]
fn test_optimizer_is_reusable() {
    let optimizer = optimizer(2, 2, 15);
    let mut controller = RecordingController::new(FarthestPointController::with_seed(10));

    optimizer.optimize(|_| Ok(Wavy), &mut controller).unwrap();
    optimizer.optimize(|_| Ok(Wavy), &mut controller).unwrap();

    assert_eq!(controller.init_calls, vec![2, 2]);
    assert_eq!(controller.finish_calls, 2);
    assert_eq!(controller.proposed.len(), 30);
}
