use std::sync::Arc;

use fastrand::Rng;
use num_traits::Float;
use program_trees::{ramped_half_and_half, OpSet, ProgramTree};

/// Retry cap for random tree generation; exhausting it means the depth and
/// size caps are mutually unsatisfiable for the given operator set, which the
/// engine rejects at build time.
pub const MAX_GENERATE_ATTEMPTS: usize = 100;

/// The genotype space: which operators and terminals trees may contain, and
/// the depth and size caps every tree must satisfy.
#[derive(Clone, Debug)]
pub struct Codec<T: Float> {
    ops: Arc<OpSet<T>>,
    max_depth: usize,
    max_size: usize,
}

impl<T: Float> Codec<T> {
    pub fn new(ops: Arc<OpSet<T>>, max_depth: usize, max_size: usize) -> Self {
        assert!(max_size >= 1, "max_size must allow at least a single leaf");
        Self {
            ops,
            max_depth,
            max_size,
        }
    }

    pub fn ops(&self) -> &OpSet<T> {
        &self.ops
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn is_valid(&self, tree: &ProgramTree<T>) -> bool {
        tree.size() <= self.max_size && tree.depth() <= self.max_depth
    }

    /// Ramped-half-and-half generation retried until the caps hold.
    pub fn try_new_tree(&self, rng: &mut Rng) -> Option<ProgramTree<T>> {
        for attempt in 0..MAX_GENERATE_ATTEMPTS {
            let tree = ramped_half_and_half(rng, &self.ops, self.max_depth, attempt);
            if self.is_valid(&tree) {
                return Some(tree);
            }
        }
        None
    }

    /// Like [`try_new_tree`](Self::try_new_tree) but panics on exhaustion.
    /// The engine validates satisfiability at build time, so this only fires
    /// for codecs that were never run through an engine builder.
    pub fn new_tree(&self, rng: &mut Rng) -> ProgramTree<T> {
        self.try_new_tree(rng).unwrap_or_else(|| {
            panic!("could not generate a valid random tree in {MAX_GENERATE_ATTEMPTS} attempts")
        })
    }
}

#[cfg(test)]
mod tests {
    use program_trees::{Op, OpSet, Terminal};

    use super::*;

    #[test]
    fn generated_trees_satisfy_both_caps() {
        let ops = Arc::new(
            OpSet::new()
                .op(Op::add())
                .op(Op::mul())
                .vars(["x"])
                .terminal(Terminal::constant(1.0)),
        );
        let codec = Codec::new(ops, 5, 20);
        let mut rng = Rng::with_seed(11);
        for _ in 0..200 {
            let t = codec.new_tree(&mut rng);
            assert!(t.size() <= 20);
            assert!(t.depth() <= 5);
        }
    }

    #[test]
    fn tight_size_cap_still_generates_leaves() {
        let ops = Arc::new(OpSet::<f64>::new().op(Op::add()).vars(["x"]));
        let codec = Codec::new(ops, 4, 1);
        let mut rng = Rng::with_seed(11);
        // Only a lone terminal fits; the grow half of the ramp finds it.
        let t = codec.new_tree(&mut rng);
        assert_eq!(t.size(), 1);
    }
}
