//! Topology generators. Every generator is deterministic given the state of
//! the supplied RNG and produces neighbor ids in `[0, size)`.

use std::collections::BTreeSet;

use fastrand::Rng;

use crate::graph::GraphMap;

/// 2D toroidal grid with 4 neighbors per node (right, left, down, up), side
/// length `⌊√n⌋`. Works for non-square `n` too; the wrap rules below are the
/// whole definition.
pub fn grid(n: usize) -> GraphMap {
    assert!(n > 0, "grid needs at least one node");
    let side = (n as f64).sqrt().floor() as usize;
    let adjacency = (0..n)
        .map(|i| {
            vec![
                (i + 1) % n,
                if i == 0 { n - 1 } else { i - 1 },
                (i + side) % n,
                if i < side { n - side + i } else { i - side },
            ]
        })
        .collect();
    GraphMap::new("grid", adjacency)
}

/// G(n, p): every directed edge `i -> j`, `i != j`, exists independently
/// with probability `p`.
pub fn erdos_renyi(rng: &mut Rng, n: usize, p: f64) -> GraphMap {
    let adjacency = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i && rng.f64() < p)
                .collect::<Vec<_>>()
        })
        .collect();
    GraphMap::new("erdos-renyi", adjacency)
}

/// Small-world graph: a forward ring lattice (`i -> i+1 ..= i+k/2`, wrapped)
/// whose edges are individually rewired with probability `beta` to a target
/// that is neither `i` nor already an out-neighbor of `i`. `beta = 0` yields
/// exactly the ring lattice.
pub fn watts_strogatz(rng: &mut Rng, n: usize, k: usize, beta: f64) -> GraphMap {
    assert!(k % 2 == 0, "watts_strogatz requires an even k");
    assert!(k < n, "watts_strogatz requires k < n");
    let mut adjacency: Vec<Vec<usize>> = (0..n)
        .map(|i| (1..=k / 2).map(|j| (i + j) % n).collect())
        .collect();

    for i in 0..n {
        for idx in 0..adjacency[i].len() {
            if rng.f64() < beta {
                let target = loop {
                    let t = rng.usize(0..n);
                    if t != i && !adjacency[i].contains(&t) {
                        break t;
                    }
                };
                adjacency[i][idx] = target;
            }
        }
    }
    GraphMap::new("watts-strogatz", adjacency)
}

/// Scale-free graph by preferential attachment. A seed block of
/// `m0 ∈ [m, 2m)` nodes is fully connected with both directions added per
/// ordered pair, so each seed edge appears twice in the lists and acts as a
/// selection-weight boost downstream. Every later node
/// attaches `m` times to nodes drawn proportionally to their current
/// adjacency-list length, adding both directions and updating weights after
/// each draw. With `m0 > m` this deviates from textbook Barabási–Albert.
pub fn barabasi_albert(rng: &mut Rng, n: usize, m: usize) -> GraphMap {
    assert!(m >= 1, "barabasi_albert requires m >= 1");
    let m0 = (m + rng.usize(0..m)).min(n);
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..m0 {
        for j in 0..m0 {
            if i != j {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }
    }

    let mut degrees: Vec<usize> = adjacency.iter().map(Vec::len).collect();
    let mut total: usize = degrees.iter().sum();

    for v in m0..n {
        for _ in 0..m {
            let u = if total == 0 {
                // Degenerate seed (m0 == 1): nothing carries weight yet.
                rng.usize(0..v)
            } else {
                weighted_pick(rng, &degrees, total)
            };
            adjacency[u].push(v);
            adjacency[v].push(u);
            degrees[u] += 1;
            degrees[v] += 1;
            total += 2;
        }
    }
    GraphMap::new("barabasi-albert", adjacency)
}

/// `layers` layers of `nodes_per_layer` nodes; edges run from layer `l` to
/// `l + 1` only, each existing with probability `p`. Acyclic by construction;
/// the last layer has no out-edges, so those cells evolve against themselves.
pub fn layered_dag(rng: &mut Rng, layers: usize, nodes_per_layer: usize, p: f64) -> GraphMap {
    let total = layers * nodes_per_layer;
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); total];
    for l in 0..layers.saturating_sub(1) {
        for i in l * nodes_per_layer..(l + 1) * nodes_per_layer {
            for j in (l + 1) * nodes_per_layer..(l + 2) * nodes_per_layer {
                if rng.f64() < p {
                    adjacency[i].push(j);
                }
            }
        }
    }
    GraphMap::new("layered-dag", adjacency)
}

/// Asymmetric hub graph: `⌊n·f_in⌋` in-hubs and `⌊n·f_out⌋` out-hubs drawn
/// uniformly. Out-hubs emit `d²` edges instead of `d`; in-hubs additionally
/// receive `d²` edges. A draw that lands on the node itself is skipped
/// without redraw, so realized degrees can undershoot. Duplicate edges are
/// kept.
pub fn multiple_in_and_out(rng: &mut Rng, n: usize, f_in: f64, f_out: f64, d: usize) -> GraphMap {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];

    let in_hubs = pick_random_set(rng, n, (n as f64 * f_in) as usize);
    let out_hubs = pick_random_set(rng, n, (n as f64 * f_out) as usize);

    for from in 0..n {
        let degree = if out_hubs.contains(&from) { d * d } else { d };
        for _ in 0..degree {
            let to = rng.usize(0..n);
            if to == from {
                continue;
            }
            adjacency[from].push(to);
        }
    }

    for &hub in &in_hubs {
        for _ in 0..d * d {
            let from = rng.usize(0..n);
            if from == hub {
                continue;
            }
            adjacency[from].push(hub);
        }
    }
    GraphMap::new("multiple-in-out", adjacency)
}

/// Every node neighbors every other node: the panmictic baseline, where the
/// whole population is one interaction pool.
pub fn complete(n: usize) -> GraphMap {
    let adjacency = (0..n)
        .map(|i| (0..n).filter(|&j| j != i).collect())
        .collect();
    GraphMap::new("complete", adjacency)
}

/// Uniform draws without replacement until the set reaches `count`.
fn pick_random_set(rng: &mut Rng, max: usize, count: usize) -> BTreeSet<usize> {
    assert!(count <= max, "cannot pick {count} distinct values below {max}");
    let mut set = BTreeSet::new();
    while set.len() < count {
        set.insert(rng.usize(0..max));
    }
    set
}

/// Roulette draw proportional to integer weights; `total` is their sum.
fn weighted_pick(rng: &mut Rng, weights: &[usize], total: usize) -> usize {
    debug_assert!(total > 0);
    let mut target = rng.f64() * total as f64;
    for (idx, &w) in weights.iter().enumerate() {
        if w == 0 {
            continue;
        }
        if target < w as f64 {
            return idx;
        }
        target -= w as f64;
    }
    weights.len() - 1
}
