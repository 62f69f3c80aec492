use fastrand::Rng;
use num_traits::Float;
use program_trees::{grow, node_depths, ProgramTree};

use crate::codec::{Codec, MAX_GENERATE_ATTEMPTS};
use crate::phenotype::Phenotype;

pub trait Alterer<T: Float>: Send + Sync {
    /// Rework `members` in place, returning the number of altered
    /// individuals. Altered members are reborn at `generation` with their
    /// fitness cleared. Alterers compose: the engine threads the same vec
    /// through its chain in declared order.
    fn alter(
        &self,
        rng: &mut Rng,
        codec: &Codec<T>,
        members: &mut Vec<Phenotype<T>>,
        generation: u64,
    ) -> usize;
}

/// Swap one randomly chosen subtree between consecutive pairs, each pair
/// recombining with probability `prob`.
#[derive(Copy, Clone, Debug)]
pub struct SingleNodeCrossover {
    pub prob: f64,
}

impl SingleNodeCrossover {
    pub fn new(prob: f64) -> Self {
        Self { prob }
    }
}

impl<T: Float> Alterer<T> for SingleNodeCrossover {
    fn alter(
        &self,
        rng: &mut Rng,
        _codec: &Codec<T>,
        members: &mut Vec<Phenotype<T>>,
        generation: u64,
    ) -> usize {
        let mut altered = 0;
        let mut i = 0;
        while i + 1 < members.len() {
            if rng.f64() < self.prob {
                let pos_a = rng.usize(0..members[i].tree.size());
                let pos_b = rng.usize(0..members[i + 1].tree.size());
                let (child_a, child_b) =
                    ProgramTree::swap_subtrees(&members[i].tree, pos_a, &members[i + 1].tree, pos_b);
                members[i] = Phenotype::of_tree(child_a, generation);
                members[i + 1] = Phenotype::of_tree(child_b, generation);
                altered += 2;
            }
            i += 2;
        }
        altered
    }
}

/// Replace one randomly chosen subtree per member (with probability `prob`)
/// by a freshly grown tree whose depth cap is the remaining budget at that
/// position. The spliced result must pass the codec's size predicate; the
/// subtree is regrown until it does, falling back to the unchanged member.
#[derive(Copy, Clone, Debug)]
pub struct SubtreeMutator {
    pub prob: f64,
}

impl SubtreeMutator {
    pub fn new(prob: f64) -> Self {
        Self { prob }
    }
}

impl<T: Float> Alterer<T> for SubtreeMutator {
    fn alter(
        &self,
        rng: &mut Rng,
        codec: &Codec<T>,
        members: &mut Vec<Phenotype<T>>,
        generation: u64,
    ) -> usize {
        let mut altered = 0;
        for member in members.iter_mut() {
            if rng.f64() >= self.prob {
                continue;
            }
            let pos = rng.usize(0..member.tree.size());
            let budget = codec
                .max_depth()
                .saturating_sub(node_depths(&member.tree.nodes)[pos]);
            for _ in 0..MAX_GENERATE_ATTEMPTS {
                let sub = grow(rng, codec.ops(), budget, 0.5);
                let mut tree = member.tree.clone();
                tree.replace_subtree(pos, &sub);
                if codec.is_valid(&tree) {
                    *member = Phenotype::of_tree(tree, generation);
                    altered += 1;
                    break;
                }
            }
        }
        altered
    }
}
