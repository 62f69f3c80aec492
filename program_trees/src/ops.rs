use std::fmt;
use std::sync::Arc;

use num_traits::Float;

pub type OpFn<T> = Arc<dyn Fn(&[T]) -> T + Send + Sync>;
pub type SamplerFn<T> = Arc<dyn Fn(&mut fastrand::Rng) -> T + Send + Sync>;

/// A named operator with fixed arity and a pure evaluator. The evaluator must
/// not depend on any state beyond its arguments.
#[derive(Clone)]
pub struct Op<T> {
    name: String,
    arity: u8,
    eval: OpFn<T>,
}

impl<T> fmt::Debug for Op<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Op")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl<T: Float> Op<T> {
    pub fn new(
        name: impl Into<String>,
        arity: u8,
        eval: impl Fn(&[T]) -> T + Send + Sync + 'static,
    ) -> Self {
        assert!(arity >= 1, "operators must have arity >= 1");
        Self {
            name: name.into(),
            arity,
            eval: Arc::new(eval),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> u8 {
        self.arity
    }

    pub fn apply(&self, args: &[T]) -> T {
        debug_assert_eq!(args.len(), self.arity as usize);
        (self.eval)(args)
    }

    pub fn add() -> Self {
        Self::new("+", 2, |a| a[0] + a[1])
    }

    pub fn sub() -> Self {
        Self::new("-", 2, |a| a[0] - a[1])
    }

    pub fn mul() -> Self {
        Self::new("*", 2, |a| a[0] * a[1])
    }

    /// Plain IEEE division: division by zero yields `inf`/`NaN`, which the
    /// fitness layer maps to a worst-value score.
    pub fn div() -> Self {
        Self::new("/", 2, |a| a[0] / a[1])
    }

    pub fn neg() -> Self {
        Self::new("neg", 1, |a| -a[0])
    }

    pub fn sqrt() -> Self {
        Self::new("sqrt", 1, |a| a[0].sqrt())
    }

    pub fn exp() -> Self {
        Self::new("exp", 1, |a| a[0].exp())
    }

    pub fn log() -> Self {
        Self::new("log", 1, |a| a[0].ln())
    }

    pub fn sin() -> Self {
        Self::new("sin", 1, |a| a[0].sin())
    }

    pub fn cos() -> Self {
        Self::new("cos", 1, |a| a[0].cos())
    }
}

/// A leaf producer. `Var` reads a sample column; `Const` is a fixed value;
/// `Ephemeral` draws a value once when instantiated into a tree, after which
/// the drawn value is frozen in that tree's constant pool.
#[derive(Clone)]
pub enum Terminal<T> {
    Var { name: String, index: u16 },
    Const { value: T },
    Ephemeral { name: String, sampler: SamplerFn<T> },
}

impl<T: fmt::Debug> fmt::Debug for Terminal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Var { name, index } => {
                f.debug_struct("Var").field("name", name).field("index", index).finish()
            }
            Terminal::Const { value } => f.debug_struct("Const").field("value", value).finish(),
            Terminal::Ephemeral { name, .. } => {
                f.debug_struct("Ephemeral").field("name", name).finish_non_exhaustive()
            }
        }
    }
}

impl<T: Float> Terminal<T> {
    pub fn var(name: impl Into<String>, index: u16) -> Self {
        Terminal::Var {
            name: name.into(),
            index,
        }
    }

    pub fn constant(value: T) -> Self {
        Terminal::Const { value }
    }

    pub fn ephemeral(
        name: impl Into<String>,
        sampler: impl Fn(&mut fastrand::Rng) -> T + Send + Sync + 'static,
    ) -> Self {
        Terminal::Ephemeral {
            name: name.into(),
            sampler: Arc::new(sampler),
        }
    }
}

/// The operator and terminal tables trees are built from. Operator ids stored
/// in tree nodes are indices into the operator table, so an `OpSet` must not
/// be reordered once trees referencing it exist.
#[derive(Clone, Debug, Default)]
pub struct OpSet<T> {
    ops: Vec<Op<T>>,
    terminals: Vec<Terminal<T>>,
}

impl<T: Float> OpSet<T> {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            terminals: Vec::new(),
        }
    }

    pub fn op(mut self, op: Op<T>) -> Self {
        assert!(self.ops.len() < usize::from(u16::MAX), "too many operators");
        self.ops.push(op);
        self
    }

    pub fn terminal(mut self, terminal: Terminal<T>) -> Self {
        self.terminals.push(terminal);
        self
    }

    /// One `Var` terminal per name, indexed by position.
    pub fn vars<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        for (i, name) in names.into_iter().enumerate() {
            let index = u16::try_from(i).expect("too many variables to index in u16");
            self.terminals.push(Terminal::var(name, index));
        }
        self
    }

    pub fn ops_table(&self) -> &[Op<T>] {
        &self.ops
    }

    pub fn terminals(&self) -> &[Terminal<T>] {
        &self.terminals
    }

    pub fn get(&self, id: u16) -> &Op<T> {
        &self.ops[id as usize]
    }

    pub fn has_terminals(&self) -> bool {
        !self.terminals.is_empty()
    }

    /// Variable name for a feature index, if the set declares one.
    pub fn var_name(&self, feature: u16) -> Option<&str> {
        self.terminals.iter().find_map(|t| match t {
            Terminal::Var { name, index } if *index == feature => Some(name.as_str()),
            _ => None,
        })
    }
}
