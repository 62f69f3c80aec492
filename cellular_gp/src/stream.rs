use num_traits::Float;

use crate::engine::{CellularEngine, EvolutionResult, EvolutionStart};
use crate::phenotype::Phenotype;
use crate::problem::Problem;

/// A lazy, unbounded sequence of generations. Each `next()` runs one
/// `evolve` step; termination is the consumer's job (`take`, the threshold
/// adaptor, or any other iterator combinator).
pub struct EvolutionStream<'e, T: Float, P: Problem<T>> {
    engine: &'e CellularEngine<T, P>,
    next_start: Option<EvolutionStart<T>>,
}

impl<'e, T, P> EvolutionStream<'e, T, P>
where
    T: Float + Send + Sync,
    P: Problem<T>,
{
    pub(crate) fn new(engine: &'e CellularEngine<T, P>, start: EvolutionStart<T>) -> Self {
        Self {
            engine,
            next_start: Some(start),
        }
    }
}

impl<'e, T, P> Iterator for EvolutionStream<'e, T, P>
where
    T: Float + Send + Sync,
    P: Problem<T>,
{
    type Item = EvolutionResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start.take()?;
        let result = self.engine.evolve(start);
        self.next_start = Some(result.to_start());
        Some(result)
    }
}

/// Yields results up to and including the first whose best fitness is
/// strictly better than `threshold` in the result's optimize direction.
pub struct LimitByFitnessThreshold<T, I> {
    inner: I,
    threshold: T,
    done: bool,
}

impl<T, I> Iterator for LimitByFitnessThreshold<T, I>
where
    T: Float,
    I: Iterator<Item = EvolutionResult<T>>,
{
    type Item = EvolutionResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.inner.next()?;
        if result.optimize.is_better(result.best_fitness(), self.threshold) {
            self.done = true;
        }
        Some(result)
    }
}

/// Fold and limit combinators over evolution-result iterators.
pub trait EvolutionStreamExt<T: Float>: Iterator<Item = EvolutionResult<T>> + Sized {
    fn limit_by_fitness_threshold(self, threshold: T) -> LimitByFitnessThreshold<T, Self> {
        LimitByFitnessThreshold {
            inner: self,
            threshold,
            done: false,
        }
    }

    /// The result whose best phenotype is optimal across the consumed
    /// stream; earlier generations win ties.
    fn to_best_result(self) -> Option<EvolutionResult<T>> {
        self.reduce(|best, r| {
            if r.optimize.is_better(r.best_fitness(), best.best_fitness()) {
                r
            } else {
                best
            }
        })
    }

    fn to_best_phenotype(self) -> Option<Phenotype<T>> {
        self.to_best_result().map(|r| r.best_phenotype().clone())
    }
}

impl<T: Float, I: Iterator<Item = EvolutionResult<T>>> EvolutionStreamExt<T> for I {}
