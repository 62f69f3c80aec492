mod args;
mod io;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use program_trees::{string_tree, Op, OpSet, Terminal};

use crate::codec::Codec;
use crate::dataset::Dataset;
use crate::engine::{CellularEngine, Parallelism};
use crate::graph::GraphMap;
use crate::phenotype::Phenotype;
use crate::problem::Regression;
use crate::stream::EvolutionStreamExt;
use crate::topology;

pub use args::Cli;
pub use io::load_dataset;

pub fn run() -> anyhow::Result<()> {
    run_with(Cli::parse())
}

pub fn run_with(cli: Cli) -> anyhow::Result<()> {
    let mut datasets: Vec<_> = fs::read_dir(&cli.data_dir)
        .with_context(|| format!("failed to read {}", cli.data_dir.display()))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "gz"))
        .collect();
    datasets.sort();
    anyhow::ensure!(
        !datasets.is_empty(),
        "no .gz datasets found under {}",
        cli.data_dir.display()
    );
    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;

    for path in datasets {
        eprintln!("dataset {}", path.display());
        let report = run_dataset(&cli, &path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("dataset");
        let out_path = cli.out_dir.join(format!("{name}.txt"));
        fs::write(&out_path, report)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        eprintln!("  report -> {}", out_path.display());
    }
    Ok(())
}

fn run_dataset(cli: &Cli, path: &Path) -> anyhow::Result<String> {
    let dataset = io::load_dataset(path)?;
    let ops = Arc::new(build_ops(&dataset));

    let n = cli.population;
    let mut topo_rng = fastrand::Rng::with_seed(cli.seed);
    let topologies = vec![
        topology::grid(n),
        topology::barabasi_albert(&mut topo_rng, n, 5),
        topology::multiple_in_and_out(&mut topo_rng, n, 0.3, 0.3, 5),
        topology::erdos_renyi(&mut topo_rng, n, 0.1),
        topology::watts_strogatz(&mut topo_rng, n, 4, 0.1),
        // Panmictic baseline: the whole population is one interaction pool.
        topology::complete(n),
    ];

    let mut report = String::new();
    for graph in topologies {
        let summary = run_topology(cli, &dataset, &ops, graph)?;
        let _ = write!(report, "{summary}\n\n");
    }
    Ok(report)
}

fn run_topology(
    cli: &Cli,
    dataset: &Dataset<f64>,
    ops: &Arc<OpSet<f64>>,
    graph: GraphMap,
) -> anyhow::Result<String> {
    let parallelism = match cli.threads {
        0 => Parallelism::Auto,
        t => Parallelism::Threads(t),
    };

    let mut best: Option<Phenotype<f64>> = None;
    let mut fitness_sum = 0.0;
    for rep in 0..cli.repetitions {
        let codec = Codec::new(Arc::clone(ops), cli.max_depth, cli.max_size);
        let problem = Regression::with_mse(codec, dataset.clone());
        let engine = CellularEngine::builder(problem)
            .topology(graph.clone())
            .minimizing()
            .seed(cli.seed.wrapping_add(rep as u64))
            .parallelism(parallelism)
            .build()?;
        let winner = engine
            .stream()
            .take(cli.generations)
            .to_best_phenotype()
            .context("generation count must be > 0")?;
        let fitness = winner.fitness.expect("stream results are evaluated");
        fitness_sum += fitness;
        let better = best
            .as_ref()
            .and_then(|b| b.fitness)
            .map_or(true, |bf| fitness < bf);
        if better {
            best = Some(winner);
        }
    }

    let best = best.expect("at least one repetition ran");
    eprintln!(
        "  {}: best {:.5}",
        graph,
        best.fitness.expect("evaluated")
    );
    Ok(format!(
        "Structure: {}\n\nBest fitness: {:.5}\nAverage fitness: {:.5}\nBest individual: {}",
        graph,
        best.fitness.expect("evaluated"),
        fitness_sum / cli.repetitions as f64,
        string_tree(&best.tree, ops),
    ))
}

fn build_ops(dataset: &Dataset<f64>) -> OpSet<f64> {
    let names: Vec<String> = if dataset.variable_names.is_empty() {
        (0..dataset.n_features).map(|i| format!("x{i}")).collect()
    } else {
        dataset.variable_names.clone()
    };
    OpSet::new()
        .op(Op::add())
        .op(Op::sub())
        .op(Op::mul())
        .op(Op::div())
        .op(Op::sqrt())
        .op(Op::exp())
        .vars(names)
        .terminal(Terminal::ephemeral("c", |rng| rng.f64() * 10.0))
}
