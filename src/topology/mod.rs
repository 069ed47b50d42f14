//! # Random Topology Generators
//!
//! Erdős–Rényi, Watts–Strogatz, and Barabási–Albert constructors. Pure
//! graph builders with no dynamics logic: each takes an explicit randomness
//! source and produces a [`WeightedGraph`] whose edges all carry weight 1.0
//! and which satisfies the substrate invariants (mirrored entries when
//! undirected, no self-loops).
//!
//! The simulation core accepts any graph satisfying those invariants
//! regardless of how it was generated — these are conveniences, not a
//! required entry point.

use rand::{Rng, RngCore};

use crate::graph::WeightedGraph;
use crate::{Error, Result};

/// Erdős–Rényi G(n, p): every candidate pair gains an edge with
/// probability `p`.
pub fn erdos_renyi(
    n: usize,
    p: f32,
    directed: bool,
    rng: &mut dyn RngCore,
) -> Result<WeightedGraph> {
    let mut g = WeightedGraph::new(n, directed)?;
    for u in 0..n {
        let v_start = if directed { 0 } else { u + 1 };
        for v in v_start..n {
            if u != v && rng.r#gen::<f32>() < p {
                g.add_edge(u, v, 1.0)?;
            }
        }
    }
    Ok(g)
}

/// Watts–Strogatz small world: a ring lattice of even degree `k`, then each
/// lattice edge rewires with probability `beta` to a uniformly chosen
/// non-neighbor.
pub fn watts_strogatz(
    n: usize,
    k: usize,
    beta: f32,
    directed: bool,
    rng: &mut dyn RngCore,
) -> Result<WeightedGraph> {
    if k % 2 != 0 {
        return Err(Error::InvalidParameter(format!(
            "ring lattice degree k must be even, got {k}"
        )));
    }
    if k >= n {
        return Err(Error::InvalidParameter(format!(
            "ring lattice degree k={k} must be below node count n={n}"
        )));
    }
    let mut g = WeightedGraph::new(n, directed)?;
    let half_k = k / 2;

    // Ring lattice
    for u in 0..n {
        for i in 1..=half_k {
            g.add_edge(u, (u + i) % n, 1.0)?;
        }
    }

    // Rewiring
    for u in 0..n {
        for i in 1..=half_k {
            let v = (u + i) % n;
            if g.is_connected(u, v)? && rng.r#gen::<f32>() < beta {
                g.remove_edge(u, v)?;
                let mut candidates = Vec::new();
                for w in 0..n {
                    if w != u && !g.is_connected(u, w)? {
                        candidates.push(w);
                    }
                }
                match candidates.as_slice() {
                    // u already adjacent to everything else: keep the
                    // lattice edge instead of spinning forever
                    [] => g.add_edge(u, v, 1.0)?,
                    _ => {
                        let new_v = candidates[rng.gen_range(0..candidates.len())];
                        g.add_edge(u, new_v, 1.0)?;
                    }
                }
            }
        }
    }
    Ok(g)
}

/// Barabási–Albert preferential attachment: a complete seed of `m + 1`
/// nodes, then every new node attaches to `m` distinct existing nodes with
/// probability proportional to their degree.
pub fn barabasi_albert(
    n: usize,
    m: usize,
    directed: bool,
    rng: &mut dyn RngCore,
) -> Result<WeightedGraph> {
    if m < 1 || m >= n {
        return Err(Error::InvalidParameter(format!(
            "attachment count m={m} must satisfy 1 <= m < n={n}"
        )));
    }
    let mut g = WeightedGraph::new(n, directed)?;
    let m0 = m + 1;

    // Fully connected seed
    for u in 0..m0 {
        for v in (u + 1)..m0 {
            g.add_edge(u, v, 1.0)?;
        }
    }

    // Preferential attachment
    for new_node in m0..n {
        let degrees: Vec<usize> = (0..new_node)
            .map(|u| g.degree(u))
            .collect::<Result<_>>()?;
        let total_degree: usize = degrees.iter().sum();

        let mut targets: Vec<usize> = Vec::with_capacity(m);
        while targets.len() < m {
            let r = rng.gen_range(0..total_degree);
            let mut cumulative = 0;
            for (candidate, &degree) in degrees.iter().enumerate() {
                cumulative += degree;
                if cumulative > r {
                    if !targets.contains(&candidate) {
                        targets.push(candidate);
                    }
                    break;
                }
            }
        }

        for &target in &targets {
            g.add_edge(new_node, target, 1.0)?;
        }
    }
    Ok(g)
}

// ============================================================================
// Tests
// ============================================================================
