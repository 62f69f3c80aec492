use fastrand::Rng;
use num_traits::Float;

use crate::phenotype::{Optimize, Phenotype};

pub trait Selector<T: Float>: Send + Sync {
    /// Draw `count` individuals from `pool`. The pool is a neighborhood view
    /// into the population, so duplicates in it are meaningful (they weight
    /// the draw).
    fn select(
        &self,
        rng: &mut Rng,
        pool: &[&Phenotype<T>],
        count: usize,
        optimize: Optimize,
    ) -> Vec<Phenotype<T>>;
}

/// Each winner is the best of `k` uniform draws with replacement. Ties keep
/// the earliest draw; missing or NaN fitness compares worst.
#[derive(Copy, Clone, Debug)]
pub struct TournamentSelector {
    pub k: usize,
}

impl TournamentSelector {
    pub fn new(k: usize) -> Self {
        assert!(k >= 1, "tournament size must be >= 1");
        Self { k }
    }
}

impl Default for TournamentSelector {
    fn default() -> Self {
        Self { k: 3 }
    }
}

impl<T: Float> Selector<T> for TournamentSelector {
    fn select(
        &self,
        rng: &mut Rng,
        pool: &[&Phenotype<T>],
        count: usize,
        optimize: Optimize,
    ) -> Vec<Phenotype<T>> {
        assert!(!pool.is_empty(), "selection pool must be non-empty");
        (0..count)
            .map(|_| {
                let mut best = rng.usize(0..pool.len());
                for _ in 1..self.k {
                    let challenger = rng.usize(0..pool.len());
                    if fitness_is_better(
                        pool[challenger].fitness,
                        pool[best].fitness,
                        optimize,
                    ) {
                        best = challenger;
                    }
                }
                pool[best].clone()
            })
            .collect()
    }
}

fn fitness_is_better<T: Float>(a: Option<T>, b: Option<T>, optimize: Optimize) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => optimize.is_better(a, b),
        (Some(_), None) => true,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use program_trees::{ProgramTree, TreeNode};

    use super::*;

    fn ph(fitness: f64) -> Phenotype<f64> {
        Phenotype::evaluated(
            ProgramTree::new(vec![TreeNode::Var { feature: 0 }], vec![]),
            0,
            fitness,
        )
    }

    #[test]
    fn full_coverage_tournament_always_returns_the_best() {
        let members: Vec<Phenotype<f64>> = [5.0, 2.0, 9.0].into_iter().map(ph).collect();
        let pool: Vec<&Phenotype<f64>> = members.iter().collect();
        // A huge k makes missing the best astronomically unlikely.
        let selector = TournamentSelector::new(64);
        let mut rng = Rng::with_seed(42);
        for _ in 0..20 {
            let picked = selector.select(&mut rng, &pool, 2, Optimize::Minimum);
            assert_eq!(picked.len(), 2);
            assert!(picked.iter().all(|p| p.fitness == Some(2.0)));
            let picked = selector.select(&mut rng, &pool, 1, Optimize::Maximum);
            assert_eq!(picked[0].fitness, Some(9.0));
        }
    }

    #[test]
    fn nan_always_loses_the_tournament() {
        let members = vec![ph(f64::NAN), ph(1.0)];
        let pool: Vec<&Phenotype<f64>> = members.iter().collect();
        let selector = TournamentSelector::new(16);
        let mut rng = Rng::with_seed(1);
        for _ in 0..20 {
            let picked = selector.select(&mut rng, &pool, 1, Optimize::Minimum);
            assert_eq!(picked[0].fitness, Some(1.0));
        }
    }

    #[test]
    fn single_member_pool_is_its_own_winner() {
        let members = vec![ph(3.0)];
        let pool: Vec<&Phenotype<f64>> = members.iter().collect();
        let selector = TournamentSelector::default();
        let mut rng = Rng::with_seed(1);
        let picked = selector.select(&mut rng, &pool, 2, Optimize::Minimum);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].fitness, Some(3.0));
    }
}
