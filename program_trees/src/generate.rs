use fastrand::Rng;
use num_traits::Float;

use crate::node::TreeNode;
use crate::ops::{OpSet, Terminal};
use crate::tree::ProgramTree;

/// Grow method: at every step below the depth cap a biased coin decides
/// between a terminal and an operator. `p_terminal` is the terminal bias.
pub fn grow<T: Float>(
    rng: &mut Rng,
    ops: &OpSet<T>,
    max_depth: usize,
    p_terminal: f64,
) -> ProgramTree<T> {
    let mut nodes = Vec::new();
    let mut consts = Vec::new();
    grow_into(rng, ops, 0, max_depth, p_terminal, &mut nodes, &mut consts);
    ProgramTree::new(nodes, consts)
}

/// Full method: operators everywhere, terminals only at the depth cap.
pub fn full<T: Float>(rng: &mut Rng, ops: &OpSet<T>, max_depth: usize) -> ProgramTree<T> {
    let mut nodes = Vec::new();
    let mut consts = Vec::new();
    grow_into(rng, ops, 0, max_depth, 0.0, &mut nodes, &mut consts);
    ProgramTree::new(nodes, consts)
}

/// Ramped half-and-half: the depth cap cycles over `[min(2, max_depth),
/// max_depth]` and the method alternates between grow and full, driven by
/// `attempt` so retries explore different shapes.
pub fn ramped_half_and_half<T: Float>(
    rng: &mut Rng,
    ops: &OpSet<T>,
    max_depth: usize,
    attempt: usize,
) -> ProgramTree<T> {
    let min_depth = max_depth.min(2);
    let span = max_depth - min_depth + 1;
    let depth = min_depth + (attempt / 2) % span;
    if attempt % 2 == 0 {
        grow(rng, ops, depth, 0.5)
    } else {
        full(rng, ops, depth)
    }
}

fn grow_into<T: Float>(
    rng: &mut Rng,
    ops: &OpSet<T>,
    depth: usize,
    max_depth: usize,
    p_terminal: f64,
    nodes: &mut Vec<TreeNode>,
    consts: &mut Vec<T>,
) {
    let pick_terminal =
        depth >= max_depth || ops.ops_table().is_empty() || rng.f64() < p_terminal;
    if pick_terminal {
        push_terminal(rng, ops, nodes, consts);
        return;
    }
    let id = rng.usize(0..ops.ops_table().len());
    let arity = ops.ops_table()[id].arity();
    for _ in 0..arity {
        grow_into(rng, ops, depth + 1, max_depth, p_terminal, nodes, consts);
    }
    nodes.push(TreeNode::Op {
        id: id as u16,
        arity,
    });
}

fn push_terminal<T: Float>(
    rng: &mut Rng,
    ops: &OpSet<T>,
    nodes: &mut Vec<TreeNode>,
    consts: &mut Vec<T>,
) {
    let terminals = ops.terminals();
    assert!(!terminals.is_empty(), "operator set has no terminals");
    match &terminals[rng.usize(0..terminals.len())] {
        Terminal::Var { index, .. } => nodes.push(TreeNode::Var { feature: *index }),
        Terminal::Const { value } => nodes.push(intern_const(consts, *value)),
        // The sampled value is frozen into the pool; re-evaluating the tree
        // never re-samples.
        Terminal::Ephemeral { sampler, .. } => {
            let value = sampler(rng);
            nodes.push(intern_const(consts, value));
        }
    }
}

fn intern_const<T>(consts: &mut Vec<T>, value: T) -> TreeNode {
    let idx = u16::try_from(consts.len()).expect("too many constants to index in u16");
    consts.push(value);
    TreeNode::Const { idx }
}
