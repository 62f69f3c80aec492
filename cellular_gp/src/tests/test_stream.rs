use super::common::constant_problem;
use crate::engine::{CellularEngine, Parallelism};
use crate::phenotype::Optimize;
use crate::stream::EvolutionStreamExt;
use crate::topology;

fn engine() -> CellularEngine<f64, crate::problem::Regression<f64>> {
    CellularEngine::builder(constant_problem())
        .topology(topology::grid(16))
        .minimizing()
        .seed(42)
        .parallelism(Parallelism::Sequential)
        .build()
        .unwrap()
}

#[test]
fn take_limits_the_generation_count() {
    let engine = engine();
    let results: Vec<_> = engine.stream().take(5).collect();
    assert_eq!(results.len(), 5);
    let generations: Vec<u64> = results.iter().map(|r| r.generation).collect();
    assert_eq!(generations, vec![1, 2, 3, 4, 5]);
}

#[test]
fn best_fitness_is_monotone_across_the_stream() {
    let engine = engine();
    let mut last = f64::INFINITY;
    for result in engine.stream().take(30) {
        let best = result.best_fitness();
        assert!(best <= last, "best-so-far worsened: {last} -> {best}");
        last = best;
    }
}

#[test]
fn threshold_limit_stops_after_the_first_crossing() {
    let engine = engine();
    // Every constant-problem tree evaluates finitely, so the very first
    // generation crosses an infinite threshold.
    let results: Vec<_> = engine
        .stream()
        .take(50)
        .limit_by_fitness_threshold(f64::INFINITY)
        .collect();
    assert_eq!(results.len(), 1);

    // An unreachable threshold never truncates; take() is the only limit.
    let engine = self::engine();
    let results: Vec<_> = engine
        .stream()
        .take(5)
        .limit_by_fitness_threshold(-1.0)
        .collect();
    assert_eq!(results.len(), 5);
}

#[test]
fn to_best_result_folds_to_the_optimal_generation() {
    let engine = engine();
    let results: Vec<_> = engine.stream().take(20).collect();
    let expected = results
        .iter()
        .map(|r| r.best_fitness())
        .fold(f64::INFINITY, f64::min);
    let best = results.into_iter().to_best_result().unwrap();
    assert_eq!(best.best_fitness(), expected);
    assert_eq!(best.optimize, Optimize::Minimum);
}
