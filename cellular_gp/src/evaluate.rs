use num_traits::Float;
use rayon::prelude::*;

use crate::phenotype::{Phenotype, Population};
use crate::problem::Problem;

/// Fills in missing fitnesses. Already-evaluated members pass through
/// untouched, so evaluation is idempotent, and results are collected by
/// index, so the node-id ↔ slot mapping never changes. Fitness is a pure
/// function of the genotype, which is what makes the parallel path safe.
pub struct FitnessEvaluator<'a, T: Float, P: Problem<T>> {
    problem: &'a P,
    pool: Option<&'a rayon::ThreadPool>,
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T, P> FitnessEvaluator<'a, T, P>
where
    T: Float + Send + Sync,
    P: Problem<T>,
{
    pub fn new(problem: &'a P, pool: Option<&'a rayon::ThreadPool>) -> Self {
        Self {
            problem,
            pool,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn eval(&self, population: Population<T>) -> Population<T> {
        let members = population.members;
        let evaluated = match self.pool {
            None => members.into_iter().map(|ph| self.eval_one(ph)).collect(),
            Some(pool) => pool.install(|| {
                members
                    .into_par_iter()
                    .map(|ph| self.eval_one(ph))
                    .collect()
            }),
        };
        Population::new(evaluated)
    }

    fn eval_one(&self, phenotype: Phenotype<T>) -> Phenotype<T> {
        if phenotype.is_evaluated() {
            return phenotype;
        }
        let fitness = self.problem.fitness(&phenotype.tree);
        Phenotype {
            fitness: Some(fitness),
            ..phenotype
        }
    }
}
