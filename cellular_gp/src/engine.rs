use std::time::{Duration, Instant};

use fastrand::Rng;
use num_traits::Float;
use rayon::prelude::*;

use crate::alter::{Alterer, SingleNodeCrossover, SubtreeMutator};
use crate::constraint::{Constraint, RetryConstraint};
use crate::error::EngineError;
use crate::evaluate::FitnessEvaluator;
use crate::graph::GraphMap;
use crate::phenotype::{Optimize, Phenotype, Population};
use crate::problem::Problem;
use crate::select::{Selector, TournamentSelector};
use crate::stream::EvolutionStream;
use crate::topology;

pub const DEFAULT_MAX_PHENOTYPE_AGE: u64 = 70;

/// Input of one generation step.
#[derive(Clone, Debug)]
pub struct EvolutionStart<T: Float> {
    pub population: Population<T>,
    pub generation: u64,
}

impl<T: Float> EvolutionStart<T> {
    pub fn new(population: Population<T>, generation: u64) -> Self {
        Self {
            population,
            generation,
        }
    }
}

/// Wall-clock accounting for the phases of one generation step.
#[derive(Copy, Clone, Debug, Default)]
pub struct EvolutionDurations {
    pub filter: Duration,
    pub evaluation: Duration,
    pub offspring: Duration,
    pub total: Duration,
}

/// Output of one generation step: the successor population (every member
/// evaluated), the next generation number, and the step's counters.
#[derive(Clone, Debug)]
pub struct EvolutionResult<T: Float> {
    pub optimize: Optimize,
    pub population: Population<T>,
    pub generation: u64,
    pub durations: EvolutionDurations,
    /// Members discarded for exceeding the phenotype age cap.
    pub kill_count: usize,
    /// Members repaired by the constraint.
    pub invalid_count: usize,
    /// Cells whose offspring won the elitist replacement.
    pub alter_count: usize,
}

impl<T: Float> EvolutionResult<T> {
    pub fn best_phenotype(&self) -> &Phenotype<T> {
        let idx = self
            .population
            .best_index(self.optimize)
            .expect("evolve leaves every member evaluated");
        &self.population.members[idx]
    }

    pub fn best_fitness(&self) -> T {
        self.best_phenotype()
            .fitness
            .expect("best phenotype is evaluated")
    }

    pub fn to_start(&self) -> EvolutionStart<T> {
        EvolutionStart::new(self.population.clone(), self.generation)
    }

    pub fn into_start(self) -> EvolutionStart<T> {
        EvolutionStart::new(self.population, self.generation)
    }
}

/// How the engine schedules its two embarrassingly parallel phases.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Parallelism {
    /// Everything inline on the calling thread. Exists so that
    /// reproducibility can be checked against the pooled mode.
    Sequential,
    /// An engine-owned pool with the given number of threads.
    Threads(usize),
    /// An engine-owned pool sized by hardware parallelism.
    #[default]
    Auto,
}

pub struct CellularEngine<T: Float, P: Problem<T>> {
    problem: P,
    graph: GraphMap,
    selector: Box<dyn Selector<T>>,
    alterers: Vec<Box<dyn Alterer<T>>>,
    constraint: Box<dyn Constraint<T>>,
    optimize: Optimize,
    max_phenotype_age: u64,
    seed: u64,
    pool: Option<rayon::ThreadPool>,
}

impl<T: Float, P: Problem<T>> std::fmt::Debug for CellularEngine<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellularEngine").finish_non_exhaustive()
    }
}

impl<T, P> CellularEngine<T, P>
where
    T: Float + Send + Sync,
    P: Problem<T>,
{
    pub fn builder(problem: P) -> EngineBuilder<T, P> {
        EngineBuilder {
            problem,
            topology: None,
            selector: Box::new(TournamentSelector::default()),
            alterers: Vec::new(),
            constraint: Box::new(RetryConstraint),
            optimize: Optimize::default(),
            max_phenotype_age: DEFAULT_MAX_PHENOTYPE_AGE,
            seed: 0,
            parallelism: Parallelism::default(),
        }
    }

    pub fn graph(&self) -> &GraphMap {
        &self.graph
    }

    pub fn optimize(&self) -> Optimize {
        self.optimize
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// A fresh random start: one unevaluated phenotype per topology node,
    /// born at generation 0.
    pub fn start(&self) -> EvolutionStart<T> {
        let codec = self.problem.codec();
        let mut rng = Rng::with_seed(derive_seed(self.seed, 0, INIT_STREAM));
        let members = (0..self.graph.size())
            .map(|_| Phenotype::of_tree(codec.new_tree(&mut rng), 0))
            .collect();
        EvolutionStart::new(Population::new(members), 0)
    }

    pub fn stream(&self) -> EvolutionStream<'_, T, P> {
        EvolutionStream::new(self, self.start())
    }

    pub fn stream_from(&self, start: EvolutionStart<T>) -> EvolutionStream<'_, T, P> {
        EvolutionStream::new(self, start)
    }

    /// One generation: filter → evaluate → per-cell evolve → evaluate
    /// offspring → local elitist replacement. Pure in its input: the same
    /// start, seed, and configuration give bit-identical output for any
    /// worker count, because each cell draws from its own RNG sub-stream.
    pub fn evolve(&self, start: EvolutionStart<T>) -> EvolutionResult<T> {
        let total_timer = Instant::now();
        let EvolutionStart {
            mut population,
            generation,
        } = start;
        let codec = self.problem.codec();
        let n = self.graph.size();

        // Filter: repair invalid members, replace the overaged, and bring
        // the population to topology size.
        let filter_timer = Instant::now();
        let mut rng = Rng::with_seed(derive_seed(self.seed, generation, FILTER_STREAM));
        population.members.truncate(n);
        while population.members.len() < n {
            population
                .members
                .push(Phenotype::of_tree(codec.new_tree(&mut rng), generation));
        }
        let mut invalid_count = 0;
        let mut kill_count = 0;
        for ph in &mut population.members {
            if !self.constraint.is_valid(codec, ph) {
                *ph = self.constraint.repair(codec, &mut rng, ph, generation);
                invalid_count += 1;
            } else if ph.age(generation) > self.max_phenotype_age {
                *ph = Phenotype::of_tree(codec.new_tree(&mut rng), generation);
                kill_count += 1;
            }
        }
        let filter = filter_timer.elapsed();

        // Evaluate the filtered population so every cell has a comparable
        // incumbent.
        let eval_timer = Instant::now();
        let evaluator = FitnessEvaluator::new(&self.problem, self.pool.as_ref());
        let parents = evaluator.eval(population);
        let evaluation = eval_timer.elapsed();

        // Per-cell evolution over the read-only snapshot.
        let offspring_timer = Instant::now();
        let candidates: Vec<Phenotype<T>> = match &self.pool {
            None => (0..n)
                .map(|i| self.evolve_cell(&parents, i, generation))
                .collect(),
            Some(pool) => pool.install(|| {
                (0..n)
                    .into_par_iter()
                    .map(|i| self.evolve_cell(&parents, i, generation))
                    .collect()
            }),
        };
        let offspring_pop = evaluator.eval(Population::new(candidates));
        let offspring = offspring_timer.elapsed();

        // Local elitist replacement: a candidate takes its slot only when
        // strictly better; ties keep the incumbent.
        let mut alter_count = 0;
        let mut members = Vec::with_capacity(n);
        for (incumbent, candidate) in parents
            .members
            .into_iter()
            .zip(offspring_pop.members.into_iter())
        {
            let pf = incumbent.fitness.expect("parents are evaluated");
            let cf = candidate.fitness.expect("offspring are evaluated");
            if self.optimize.is_better(cf, pf) {
                members.push(candidate);
                alter_count += 1;
            } else {
                members.push(incumbent);
            }
        }

        EvolutionResult {
            optimize: self.optimize,
            population: Population::new(members),
            generation: generation + 1,
            durations: EvolutionDurations {
                filter,
                evaluation,
                offspring,
                total: total_timer.elapsed(),
            },
            kill_count,
            invalid_count,
            alter_count,
        }
    }

    /// One cell: local selection over the neighborhood, the alterer chain on
    /// the two parents, first child is the cell's sole candidate.
    fn evolve_cell(&self, parents: &Population<T>, cell: usize, generation: u64) -> Phenotype<T> {
        let mut rng = Rng::with_seed(derive_seed(self.seed, generation, cell as u64));
        let codec = self.problem.codec();

        let mut pool: Vec<&Phenotype<T>> = self
            .graph
            .neighbors(cell)
            .iter()
            .map(|&j| &parents.members[j])
            .collect();
        if pool.is_empty() {
            pool.push(&parents.members[cell]);
        }

        let mut pair = self.selector.select(&mut rng, &pool, 2, self.optimize);
        for alterer in &self.alterers {
            alterer.alter(&mut rng, codec, &mut pair, generation);
        }
        pair.into_iter()
            .next()
            .expect("selection yields two parents and alterers preserve arity")
    }
}

pub struct EngineBuilder<T: Float, P: Problem<T>> {
    problem: P,
    topology: Option<GraphMap>,
    selector: Box<dyn Selector<T>>,
    alterers: Vec<Box<dyn Alterer<T>>>,
    constraint: Box<dyn Constraint<T>>,
    optimize: Optimize,
    max_phenotype_age: u64,
    seed: u64,
    parallelism: Parallelism,
}

impl<T, P> EngineBuilder<T, P>
where
    T: Float + Send + Sync,
    P: Problem<T>,
{
    pub fn topology(mut self, graph: GraphMap) -> Self {
        self.topology = Some(graph);
        self
    }

    pub fn selector(mut self, selector: impl Selector<T> + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Append an alterer to the chain; chain order is declaration order.
    pub fn alterer(mut self, alterer: impl Alterer<T> + 'static) -> Self {
        self.alterers.push(Box::new(alterer));
        self
    }

    pub fn constraint(mut self, constraint: impl Constraint<T> + 'static) -> Self {
        self.constraint = Box::new(constraint);
        self
    }

    pub fn optimize(mut self, optimize: Optimize) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn minimizing(self) -> Self {
        self.optimize(Optimize::Minimum)
    }

    pub fn maximizing(self) -> Self {
        self.optimize(Optimize::Maximum)
    }

    pub fn max_phenotype_age(mut self, age: u64) -> Self {
        self.max_phenotype_age = age;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn build(self) -> Result<CellularEngine<T, P>, EngineError> {
        let graph = self.topology.unwrap_or_else(|| topology::grid(100));
        if graph.size() == 0 {
            return Err(EngineError::EmptyTopology {
                name: graph.name().to_owned(),
            });
        }
        for node in 0..graph.size() {
            if let Some(&neighbor) = graph.neighbors(node).iter().find(|&&j| j >= graph.size()) {
                return Err(EngineError::NeighborOutOfRange {
                    name: graph.name().to_owned(),
                    node,
                    neighbor,
                    size: graph.size(),
                });
            }
        }

        let codec = self.problem.codec();
        if !codec.ops().has_terminals() {
            return Err(EngineError::NoTerminals);
        }
        let mut probe = Rng::with_seed(derive_seed(self.seed, 0, PROBE_STREAM));
        if codec.try_new_tree(&mut probe).is_none() {
            return Err(EngineError::UnsatisfiableCodec {
                max_depth: codec.max_depth(),
                max_size: codec.max_size(),
            });
        }

        let mut alterers = self.alterers;
        if alterers.is_empty() {
            alterers.push(Box::new(SingleNodeCrossover::new(0.1)));
            alterers.push(Box::new(SubtreeMutator::new(1.0 / graph.size() as f64)));
        }

        let pool = match self.parallelism {
            Parallelism::Sequential => None,
            Parallelism::Threads(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?,
            ),
            Parallelism::Auto => Some(rayon::ThreadPoolBuilder::new().build()?),
        };

        Ok(CellularEngine {
            problem: self.problem,
            graph,
            selector: self.selector,
            alterers,
            constraint: self.constraint,
            optimize: self.optimize,
            max_phenotype_age: self.max_phenotype_age,
            seed: self.seed,
            pool,
        })
    }
}

// Reserved sub-stream tags; cell streams use the cell index directly, which
// stays far below these.
const FILTER_STREAM: u64 = u64::MAX;
const INIT_STREAM: u64 = u64::MAX - 1;
const PROBE_STREAM: u64 = u64::MAX - 2;

/// SplitMix64-style seed derivation: every `(seed, generation, stream)`
/// triple gets an independent, reproducible RNG sub-stream, which is what
/// makes results identical across worker counts.
pub(crate) fn derive_seed(seed: u64, generation: u64, stream: u64) -> u64 {
    splitmix64(
        seed ^ splitmix64(generation.wrapping_mul(0xa076_1d64_78bd_642f) ^ splitmix64(stream)),
    )
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
