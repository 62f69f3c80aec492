use thiserror::Error;

use crate::codec::MAX_GENERATE_ATTEMPTS;

/// Configuration failures surfaced at engine construction. These are fatal:
/// nothing about a running engine can repair them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("topology `{name}` has no nodes")]
    EmptyTopology { name: String },

    #[error("topology `{name}`: node {node} references neighbor {neighbor} outside [0, {size})")]
    NeighborOutOfRange {
        name: String,
        node: usize,
        neighbor: usize,
        size: usize,
    },

    #[error("operator set has no terminals; trees cannot be generated")]
    NoTerminals,

    #[error(
        "codec cannot produce a valid random tree in {MAX_GENERATE_ATTEMPTS} attempts \
         (depth cap {max_depth}, size cap {max_size})"
    )]
    UnsatisfiableCodec { max_depth: usize, max_size: usize },

    #[error("worker pool construction failed")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
