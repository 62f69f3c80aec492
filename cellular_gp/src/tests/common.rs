use std::sync::Arc;

use program_trees::{Op, OpSet, Terminal};

use crate::codec::Codec;
use crate::dataset::Dataset;
use crate::problem::Regression;

/// The constant-fit problem: y = 5 everywhere, terminals `{x, 5}`.
/// A lone `5` leaf is a perfect model.
pub fn constant_problem() -> Regression<f64> {
    let ops = Arc::new(
        OpSet::new()
            .op(Op::add())
            .op(Op::sub())
            .op(Op::mul())
            .vars(["x"])
            .terminal(Terminal::constant(5.0)),
    );
    let dataset = Dataset::from_samples(&[
        (vec![0.0], 5.0),
        (vec![1.0], 5.0),
        (vec![2.0], 5.0),
        (vec![3.0], 5.0),
    ]);
    Regression::with_mse(Codec::new(ops, 5, 50), dataset)
}

/// The linear-fit problem: y = 2x + 1 over five points in [-1, 1],
/// terminals `{x, 1, 2}` so the exact model is reachable without constant
/// tuning.
pub fn linear_problem() -> Regression<f64> {
    let ops = Arc::new(
        OpSet::new()
            .op(Op::add())
            .op(Op::sub())
            .op(Op::mul())
            .vars(["x"])
            .terminal(Terminal::constant(1.0))
            .terminal(Terminal::constant(2.0)),
    );
    let xs = [-1.0, -0.5, 0.0, 0.5, 1.0];
    let samples: Vec<(Vec<f64>, f64)> = xs.iter().map(|&x| (vec![x], 2.0 * x + 1.0)).collect();
    Regression::with_mse(Codec::new(ops, 5, 50), Dataset::from_samples(&samples))
}
