use num_traits::Float;
use program_trees::ProgramTree;

/// Direction of the search. NaN fitnesses compare worst in both directions,
/// so pathological individuals lose to any finite competitor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Optimize {
    Minimum,
    #[default]
    Maximum,
}

impl Optimize {
    /// Whether `a` is strictly better than `b`.
    pub fn is_better<T: Float>(self, a: T, b: T) -> bool {
        if a.is_nan() {
            return false;
        }
        if b.is_nan() {
            return true;
        }
        match self {
            Optimize::Minimum => a < b,
            Optimize::Maximum => a > b,
        }
    }
}

/// An individual: a tree, the generation it was born in, and its fitness
/// once the evaluator has filled it in. Fitness is assigned exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct Phenotype<T: Float> {
    pub tree: ProgramTree<T>,
    pub generation: u64,
    pub fitness: Option<T>,
}

impl<T: Float> Phenotype<T> {
    pub fn of_tree(tree: ProgramTree<T>, generation: u64) -> Self {
        Self {
            tree,
            generation,
            fitness: None,
        }
    }

    pub fn evaluated(tree: ProgramTree<T>, generation: u64, fitness: T) -> Self {
        Self {
            tree,
            generation,
            fitness: Some(fitness),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn age(&self, at_generation: u64) -> u64 {
        at_generation.saturating_sub(self.generation)
    }
}

/// A population indexed by topology node id: index `i` IS node `i`, and no
/// operation may reorder the members.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Population<T: Float> {
    pub members: Vec<Phenotype<T>>,
}

impl<T: Float> Population<T> {
    pub fn new(members: Vec<Phenotype<T>>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Phenotype<T>> {
        self.members.iter()
    }

    /// Index of the best evaluated member, `None` when nothing is evaluated.
    /// Ties keep the lowest index.
    pub fn best_index(&self, optimize: Optimize) -> Option<usize> {
        let mut best: Option<(usize, T)> = None;
        for (i, ph) in self.members.iter().enumerate() {
            let Some(f) = ph.fitness else { continue };
            match best {
                None => best = Some((i, f)),
                Some((_, bf)) if optimize.is_better(f, bf) => best = Some((i, f)),
                _ => {}
            }
        }
        best.map(|(i, _)| i)
    }
}

impl<T: Float> From<Vec<Phenotype<T>>> for Population<T> {
    fn from(members: Vec<Phenotype<T>>) -> Self {
        Self::new(members)
    }
}
