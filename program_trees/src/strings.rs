use std::fmt::Display;

use num_traits::Float;

use crate::node::TreeNode;
use crate::ops::OpSet;
use crate::tree::ProgramTree;

/// Render a tree as an infix expression against its operator set. Binary
/// operators with symbolic names print infix, everything else call-style.
pub fn string_tree<T: Float + Display>(tree: &ProgramTree<T>, ops: &OpSet<T>) -> String {
    let mut stack: Vec<String> = Vec::with_capacity(tree.nodes.len());
    for n in &tree.nodes {
        match *n {
            TreeNode::Var { feature } => {
                let name = ops
                    .var_name(feature)
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("x{feature}"));
                stack.push(name);
            }
            TreeNode::Const { idx } => stack.push(format!("{}", tree.consts[idx as usize])),
            TreeNode::Op { id, arity } => {
                let op = ops.get(id);
                let start = stack
                    .len()
                    .checked_sub(arity as usize)
                    .expect("invalid postfix (stack underflow)");
                let rendered = if arity == 2 && is_symbolic(op.name()) {
                    format!("({} {} {})", stack[start], op.name(), stack[start + 1])
                } else {
                    format!("{}({})", op.name(), stack[start..].join(", "))
                };
                stack.truncate(start);
                stack.push(rendered);
            }
        }
    }
    assert_eq!(stack.len(), 1, "invalid postfix (did not reduce to one root)");
    stack.pop().expect("non-empty stack")
}

fn is_symbolic(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| "+-*/%^".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Op;

    #[test]
    fn renders_infix_and_call_style() {
        let ops = OpSet::new().op(Op::add()).op(Op::sqrt()).vars(["x"]);
        let t = ProgramTree::new(
            vec![
                TreeNode::Var { feature: 0 },
                TreeNode::Const { idx: 0 },
                TreeNode::Op { id: 0, arity: 2 },
                TreeNode::Op { id: 1, arity: 1 },
            ],
            vec![2.5],
        );
        assert_eq!(string_tree(&t, &ops), "sqrt((x + 2.5))");
    }

    #[test]
    fn unknown_features_fall_back_to_positional_names() {
        let ops = OpSet::<f64>::new().op(Op::add());
        let t = ProgramTree::new(vec![TreeNode::Var { feature: 3 }], vec![]);
        assert_eq!(string_tree(&t, &ops), "x3");
    }
}
