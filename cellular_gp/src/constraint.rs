use fastrand::Rng;
use num_traits::Float;

use crate::codec::Codec;
use crate::phenotype::Phenotype;

pub trait Constraint<T: Float>: Send + Sync {
    fn is_valid(&self, codec: &Codec<T>, phenotype: &Phenotype<T>) -> bool;

    fn repair(
        &self,
        codec: &Codec<T>,
        rng: &mut Rng,
        phenotype: &Phenotype<T>,
        generation: u64,
    ) -> Phenotype<T>;
}

/// The default constraint: a phenotype is valid iff its tree satisfies the
/// codec caps; repair discards it for a fresh random phenotype born at the
/// current generation.
#[derive(Copy, Clone, Debug, Default)]
pub struct RetryConstraint;

impl<T: Float> Constraint<T> for RetryConstraint {
    fn is_valid(&self, codec: &Codec<T>, phenotype: &Phenotype<T>) -> bool {
        codec.is_valid(&phenotype.tree)
    }

    fn repair(
        &self,
        codec: &Codec<T>,
        rng: &mut Rng,
        _phenotype: &Phenotype<T>,
        generation: u64,
    ) -> Phenotype<T> {
        Phenotype::of_tree(codec.new_tree(rng), generation)
    }
}
