use num_traits::Float;
use program_trees::{eval_rows_into, ProgramTree};

use crate::codec::Codec;
use crate::dataset::Dataset;
use crate::loss::{mse, LossObject};

/// What the engine needs from an application: a genotype space and a total,
/// deterministic scoring function. Pathological evaluations must come back
/// as a worst-value scalar (`+inf` for minimization), never as an error.
pub trait Problem<T: Float>: Send + Sync {
    fn codec(&self) -> &Codec<T>;

    fn fitness(&self, tree: &ProgramTree<T>) -> T;
}

/// Symbolic regression: score a tree by a loss between its per-row
/// predictions and the dataset targets. Any non-finite prediction or loss
/// collapses to `+inf`, isolating pathological trees so minimization
/// naturally discards them.
pub struct Regression<T: Float> {
    codec: Codec<T>,
    dataset: Dataset<T>,
    loss: LossObject<T>,
}

impl<T: Float> Regression<T> {
    pub fn new(codec: Codec<T>, dataset: Dataset<T>, loss: LossObject<T>) -> Self {
        Self {
            codec,
            dataset,
            loss,
        }
    }

    pub fn with_mse(codec: Codec<T>, dataset: Dataset<T>) -> Self {
        Self::new(codec, dataset, mse())
    }

    pub fn dataset(&self) -> &Dataset<T> {
        &self.dataset
    }
}

impl<T: Float + Send + Sync> Problem<T> for Regression<T> {
    fn codec(&self) -> &Codec<T> {
        &self.codec
    }

    fn fitness(&self, tree: &ProgramTree<T>) -> T {
        let mut yhat = vec![T::zero(); self.dataset.n_rows];
        if !eval_rows_into(&mut yhat, tree, self.codec.ops(), self.dataset.x.view()) {
            return T::infinity();
        }
        let loss = self.loss.loss(&yhat, self.dataset.y_slice());
        if loss.is_finite() {
            loss
        } else {
            T::infinity()
        }
    }
}
