use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "cgp")]
#[command(about = "Cellular GP symbolic regression over gzip-compressed TSV datasets")]
pub struct Cli {
    /// Directory of gzip-compressed tab-separated datasets (header row of
    /// variable names, last column is the target).
    pub data_dir: PathBuf,

    /// Directory for per-dataset text reports.
    #[arg(long, default_value = "outputs")]
    pub out_dir: PathBuf,

    /// Population size, i.e. the node count of every topology.
    #[arg(long, default_value_t = 100)]
    pub population: usize,

    /// Generations per run.
    #[arg(long, default_value_t = 50)]
    pub generations: usize,

    /// Independent repetitions per topology.
    #[arg(long, default_value_t = 10)]
    pub repetitions: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Depth cap for generated trees.
    #[arg(long, default_value_t = 5)]
    pub max_depth: usize,

    /// Size cap for generated trees.
    #[arg(long, default_value_t = 50)]
    pub max_size: usize,

    /// Worker threads per engine (0 uses all cores).
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}
