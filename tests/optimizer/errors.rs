use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_optimize::controller::AsyncFarthestPointController;
use async_optimize::functions::Wavy;
use async_optimize::{Error, Optimizer, OptimizerConfig};

use crate::common::{Counter, RecordingController};

fn assert_rejected(config: OptimizerConfig, check: impl Fn(&Error) -> bool) {
    let factory_calls = Counter::default();
    let evaluations = Counter::default();
    let mut controller = RecordingController::seeded(0);

    let result = Optimizer::new(config).optimize(
        |_| {
            factory_calls.bump();
            let evaluations = evaluations.clone();
            Ok(move |x: &[f64]| {
                evaluations.bump();
                Ok::<f64, String>(x.iter().sum())
            })
        },
        &mut controller,
    );

    let err = result.unwrap_err();
    assert!(check(&err), "unexpected error: {err}");
    assert!(err.is_configuration());
    assert_eq!(factory_calls.get(), 0);
    assert_eq!(evaluations.get(), 0);
    assert!(controller.init_calls.is_empty());
    assert_eq!(controller.finish_calls, 0);
}

#[test]
fn test_zero_dimensions_rejected() {
    assert_rejected(
        OptimizerConfig {
            workers: 2,
            dimensions: 0,
            max_evaluations: 10,
            verbose: false,
        },
        |e| matches!(e, Error::InvalidDimensions),
    );
}

#[test]
fn test_zero_budget_rejected() {
    assert_rejected(
        OptimizerConfig {
            workers: 2,
            dimensions: 2,
            max_evaluations: 0,
            verbose: false,
        },
        |e| matches!(e, Error::InvalidMaxEvaluations),
    );
}

#[test]
fn test_zero_workers_rejected() {
    assert_rejected(
        OptimizerConfig {
            workers: 0,
            dimensions: 2,
            max_evaluations: 10,
            verbose: false,
        },
        |e| matches!(e, Error::NoWorkers),
    );
}

#[test]
fn test_unset_builder_fields_rejected() {
    let optimizer = Optimizer::builder().workers(2).build();
    let result = optimizer.optimize(|_| Ok(Wavy), &mut RecordingController::seeded(0));
    assert!(matches!(result, Err(Error::InvalidDimensions)));
}

#[test]
fn test_factory_error_is_returned() {
    let result = Optimizer::builder()
        .workers(3)
        .dimensions(1)
        .max_evaluations(10)
        .build()
        .optimize(
            |worker| {
                if worker == 1 {
                    Err(Error::Spawn("no evaluator for worker 1".to_string()))
                } else {
                    Ok(Wavy)
                }
            },
            &mut RecordingController::seeded(0),
        );
    assert!(matches!(result, Err(Error::Spawn(_))));
}

#[test]
fn test_evaluation_error_returns_partial_best() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dropped = Arc::new(AtomicUsize::new(0));
    let mut controller = RecordingController::seeded(11);

    struct Guard(Arc<AtomicUsize>);
    impl Drop for Guard {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    let result = Optimizer::builder()
        .workers(4)
        .dimensions(2)
        .max_evaluations(100)
        .build()
        .optimize(
            |_| {
                let calls = Arc::clone(&calls);
                let guard = Guard(Arc::clone(&dropped));
                Ok(move |x: &[f64]| {
                    let _ = &guard;
                    if calls.fetch_add(1, Ordering::SeqCst) == 20 {
                        Err("objective diverged".to_string())
                    } else {
                        Ok(Wavy.value(x))
                    }
                })
            },
            &mut controller,
        );

    let (message, best) = match result {
        Err(Error::Evaluation { message, best, .. }) => (message, best),
        other => panic!("expected an evaluation error, got {other:?}"),
    };
    assert_eq!(message, "objective diverged");

    // The run stopped early and every worker released its evaluator.
    assert!(calls.load(Ordering::SeqCst) < 100);
    assert_eq!(dropped.load(Ordering::SeqCst), 4);

    let best = best.expect("twenty evaluations completed before the failure");
    for (_, value) in &controller.added {
        assert!(best.value <= *value);
    }
    assert_eq!(controller.finish_calls, 1);
}

#[test]
fn test_failed_run_stops_background_search() {
    let mut controller = RecordingController::new(AsyncFarthestPointController::with_seed(13));

    let result = Optimizer::builder()
        .workers(2)
        .dimensions(2)
        .max_evaluations(50)
        .build()
        .optimize(
            |_| Ok(|_: &[f64]| Err::<f64, _>("unavailable")),
            &mut controller,
        );

    assert!(matches!(result, Err(Error::Evaluation { .. })));
    assert_eq!(controller.finish_calls, 1);
    assert!(!controller.inner.is_searching());
}

#[test]
fn test_first_evaluation_error_has_no_partial_best() {
    let result = Optimizer::builder()
        .workers(1)
        .dimensions(1)
        .max_evaluations(5)
        .build()
        .optimize(
            |_| Ok(|_: &[f64]| Err::<f64, _>("unavailable")),
            &mut RecordingController::seeded(0),
        );

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Evaluation { worker: 0, .. }));
    assert!(err.partial_best().is_none());
    assert!(!err.is_configuration());
}

#[test]
fn test_evaluator_panic_is_reported() {
    let panicked = Arc::new(AtomicBool::new(false));
    let result = Optimizer::builder()
        .workers(2)
        .dimensions(1)
        .max_evaluations(10)
        .build()
        .optimize(
            |_| {
                let panicked = Arc::clone(&panicked);
                Ok(move |x: &[f64]| -> Result<f64, String> {
                    if !panicked.swap(true, Ordering::SeqCst) {
                        panic!("evaluator bug");
                    }
                    Ok(x[0])
                })
            },
            &mut RecordingController::seeded(0),
        );

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Evaluation { ref message, .. } if message.contains("panicked")));
}

#[test]
fn test_evaluators_dropped_after_success() {
    let live = Arc::new(Mutex::new(0_usize));

    struct Tracked(Arc<Mutex<usize>>);
    impl Drop for Tracked {
        fn drop(&mut self) {
            *self.0.lock().unwrap() -= 1;
        }
    }

    Optimizer::builder()
        .workers(3)
        .dimensions(1)
        .max_evaluations(9)
        .build()
        .optimize(
            |_| {
                *live.lock().unwrap() += 1;
                let tracked = Tracked(Arc::clone(&live));
                Ok(move |x: &[f64]| {
                    let _ = &tracked;
                    Ok::<f64, String>(x[0])
                })
            },
            &mut RecordingController::seeded(0),
        )
        .unwrap();

    assert_eq!(*live.lock().unwrap(), 0);
}
