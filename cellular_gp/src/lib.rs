pub(crate) mod alter;
pub(crate) mod codec;
pub(crate) mod constraint;
pub(crate) mod dataset;
pub(crate) mod engine;
pub(crate) mod error;
pub(crate) mod evaluate;
pub(crate) mod graph;
pub(crate) mod loss;
pub(crate) mod phenotype;
pub(crate) mod problem;
pub(crate) mod select;
pub(crate) mod stream;
pub mod topology;

#[cfg(feature = "cli")]
pub mod cli;

pub use alter::{Alterer, SingleNodeCrossover, SubtreeMutator};
pub use codec::{Codec, MAX_GENERATE_ATTEMPTS};
pub use constraint::{Constraint, RetryConstraint};
pub use dataset::Dataset;
pub use engine::{
    CellularEngine, EngineBuilder, EvolutionDurations, EvolutionResult, EvolutionStart,
    Parallelism,
};
pub use error::EngineError;
pub use evaluate::FitnessEvaluator;
pub use graph::GraphMap;
pub use loss::{mae, mse, rmse, LossFn, LossObject};
pub use phenotype::{Optimize, Phenotype, Population};
pub use problem::{Problem, Regression};
pub use select::{Selector, TournamentSelector};
pub use stream::{EvolutionStream, EvolutionStreamExt, LimitByFitnessThreshold};

#[cfg(test)]
mod tests;
