use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use cellular_gp::{topology, CellularEngine, Codec, Dataset, Parallelism, Regression};
use program_trees::{Op, OpSet, Terminal};

fn bench_problem() -> Regression<f64> {
    let ops = Arc::new(
        OpSet::new()
            .op(Op::add())
            .op(Op::sub())
            .op(Op::mul())
            .op(Op::div())
            .vars(["x"])
            .terminal(Terminal::ephemeral("c", |rng| rng.f64() * 10.0)),
    );
    let xs: Vec<f64> = (0..64).map(|i| i as f64 / 8.0).collect();
    let samples: Vec<(Vec<f64>, f64)> = xs.iter().map(|&x| (vec![x], x * x - x)).collect();
    Regression::with_mse(Codec::new(ops, 5, 50), Dataset::from_samples(&samples))
}

fn bench_evolve(c: &mut Criterion) {
    for (label, parallelism) in [
        ("sequential", Parallelism::Sequential),
        ("pooled", Parallelism::Auto),
    ] {
        let engine = CellularEngine::builder(bench_problem())
            .topology(topology::grid(64))
            .minimizing()
            .seed(42)
            .parallelism(parallelism)
            .build()
            .unwrap();
        let start = engine.start();
        c.bench_function(&format!("evolve_grid64_{label}"), |b| {
            b.iter(|| engine.evolve(start.clone()))
        });
    }
}

criterion_group!(benches, bench_evolve);
criterion_main!(benches);
