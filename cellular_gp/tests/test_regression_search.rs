use std::sync::Arc;

use cellular_gp::{
    topology, CellularEngine, Codec, Dataset, EvolutionStreamExt, Parallelism, Problem,
    Regression, SingleNodeCrossover, SubtreeMutator,
};
use program_trees::{string_tree, Op, OpSet, Terminal};

fn quadratic_problem() -> Regression<f64> {
    let ops = Arc::new(
        OpSet::new()
            .op(Op::add())
            .op(Op::sub())
            .op(Op::mul())
            .vars(["x"])
            .terminal(Terminal::constant(1.0)),
    );
    // y = x^2 + 1 over a handful of points.
    let xs = [-2.0, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0];
    let samples: Vec<(Vec<f64>, f64)> = xs.iter().map(|&x| (vec![x], x * x + 1.0)).collect();
    Regression::with_mse(Codec::new(ops, 6, 40), Dataset::from_samples(&samples))
}

#[test]
fn cellular_search_makes_progress_on_a_quadratic() {
    let engine = CellularEngine::builder(quadratic_problem())
        .topology(topology::watts_strogatz(
            &mut fastrand::Rng::with_seed(42),
            36,
            4,
            0.1,
        ))
        .minimizing()
        .alterer(SingleNodeCrossover::new(0.8))
        .alterer(SubtreeMutator::new(0.2))
        .seed(42)
        .parallelism(Parallelism::Sequential)
        .build()
        .unwrap();

    let results: Vec<_> = engine.stream().take(60).collect();
    assert!(results.iter().all(|r| r.population.len() == 36));

    let first = results.first().unwrap().best_fitness();
    let best = results
        .iter()
        .map(|r| r.best_fitness())
        .fold(f64::INFINITY, f64::min);
    assert!(best <= first, "search never improved on generation 1");

    // The baseline constant model (the mean of y) scores ~2.4 on this data;
    // sixty generations over 36 cells reliably beat it.
    assert!(
        best < 1.0,
        "expected clear progress on x^2 + 1, best was {best}"
    );

    let winner = results.into_iter().to_best_phenotype().unwrap();
    let rendered = string_tree(&winner.tree, engine.problem().codec().ops());
    assert!(!rendered.is_empty());
}
