//! Topology co-evolution: homophily-driven bond reinforcement, natural
//! decay, and stochastic edge creation.
//!
//! Everything here works on "bond strength" = `1 − edgeWeight`, the
//! social-impact model's tie convention. Three passes per invocation, all
//! O(n²), in a fixed order that is part of the contract:
//!
//! 1. homophily — reinforce similar pairs, weaken dissimilar ones
//! 2. decay — every bond fades a little
//! 3. creation — non-adjacent pairs may gain a fresh edge
//!
//! Reordering the passes changes emergent network structure and must not be
//! done silently. The creation pass gates on the distance matrix computed at
//! the start of the caller's step: it does not see the effect of passes 1–2
//! on distances within the same step.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::graph::{DistanceMatrix, WeightedGraph, UNREACHABLE};
use crate::opinion::{Opinion, OpinionSpace};
use crate::{Error, Result};

/// Width of the similarity kernel in the edge-creation boost.
const SIGMA: f32 = 0.2;

// ============================================================================
// Parameters
// ============================================================================

/// Knobs for the three co-evolution passes. Serializable so experiment
/// scripts can record and replay a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoEvolutionParams {
    /// Opinion distance below which an existing bond is reinforced.
    pub similarity_threshold: f32,
    /// Gain of the reinforcement step, scaled by remaining headroom.
    pub reinforcement_rate: f32,
    /// Gain of the weakening step, scaled by opinion distance.
    pub weakening_rate: f32,
    /// Per-step multiplicative fade applied to every bond.
    pub decay_rate: f32,
    /// Bonds below this strength are zeroed and their edge removed.
    pub minimum_bond_strength: f32,
    /// Baseline probability of a fresh edge between non-adjacent nodes.
    pub base_probability: f32,
    /// Scale of the proximity boost `1/(1+dist)` on the creation draw.
    pub distance_factor_scale: f32,
    /// Scale of the similarity kernel on the creation draw.
    pub similarity_factor: f32,
    /// Bond strength a freshly created edge starts with.
    pub initial_bond_strength: f32,
}

impl Default for CoEvolutionParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.3,
            reinforcement_rate: 0.1,
            weakening_rate: 0.1,
            decay_rate: 0.01,
            minimum_bond_strength: 0.05,
            base_probability: 0.001,
            distance_factor_scale: 10.0,
            similarity_factor: 1.0,
            initial_bond_strength: 0.5,
        }
    }
}

// ============================================================================
// Evolution passes
// ============================================================================

/// Run one full co-evolution invocation over the graph: homophily, decay,
/// creation, in that order.
///
/// `distances` must come from the topology as it stood at the start of the
/// caller's step; the creation pass deliberately gates on that snapshot.
pub fn evolve<T: Opinion>(
    network: &mut WeightedGraph,
    opinions: &OpinionSpace<T>,
    distances: &DistanceMatrix,
    params: &CoEvolutionParams,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let n = network.num_nodes();
    if opinions.len() != n {
        return Err(Error::AgentCountMismatch {
            agents: opinions.len(),
            nodes: n,
        });
    }
    if distances.num_nodes() != n {
        return Err(Error::InvalidParameter(format!(
            "distance matrix covers {} nodes, network has {n}",
            distances.num_nodes()
        )));
    }

    homophily_pass(network, opinions, params)?;
    decay_pass(network, params)?;
    creation_pass(network, opinions, distances, params, rng)
}

/// Reinforce bonds between similar pairs, weaken the rest. Clamps every
/// touched bond to [0, 1] and removes edges that fall below the minimum.
fn homophily_pass<T: Opinion>(
    network: &mut WeightedGraph,
    opinions: &OpinionSpace<T>,
    params: &CoEvolutionParams,
) -> Result<()> {
    let n = network.num_nodes();
    for (u, v) in edge_pairs(n, network.is_directed()) {
        if !network.is_connected(u, v)? {
            continue;
        }
        let diff = opinions.distance(u, v)?;
        let mut bond = 1.0 - network.weight(u, v)?;
        if diff < params.similarity_threshold {
            bond += params.reinforcement_rate * (1.0 - diff) * (1.0 - bond);
        } else {
            bond -= params.weakening_rate * diff * bond;
        }
        write_bond(network, u, v, bond.clamp(0.0, 1.0), params)?;
    }
    Ok(())
}

/// Multiply every remaining bond by `1 − decay_rate`.
fn decay_pass(network: &mut WeightedGraph, params: &CoEvolutionParams) -> Result<()> {
    let n = network.num_nodes();
    for (u, v) in edge_pairs(n, network.is_directed()) {
        if !network.is_connected(u, v)? {
            continue;
        }
        let bond = (1.0 - network.weight(u, v)?) * (1.0 - params.decay_rate);
        write_bond(network, u, v, bond, params)?;
    }
    Ok(())
}

/// Stochastically create edges between non-adjacent ordered pairs. The draw
/// probability starts at the baseline and is boosted by network proximity
/// and opinion similarity when a finite path already exists.
fn creation_pass<T: Opinion>(
    network: &mut WeightedGraph,
    opinions: &OpinionSpace<T>,
    distances: &DistanceMatrix,
    params: &CoEvolutionParams,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let n = network.num_nodes();
    for u in 0..n {
        for v in 0..n {
            if u == v || network.is_connected(u, v)? {
                continue;
            }
            let mut probability = params.base_probability;
            let dist = distances.get(u, v);
            if dist < UNREACHABLE {
                let diff = opinions.distance(u, v)?;
                let similarity = (-(diff * diff) / (SIGMA * SIGMA)).exp();
                probability += params.base_probability
                    * params.distance_factor_scale
                    * (1.0 / (1.0 + dist))
                    * params.similarity_factor
                    * similarity;
            }
            if rng.r#gen::<f32>() < probability {
                network.add_edge(u, v, 1.0 - params.initial_bond_strength)?;
            }
        }
    }
    Ok(())
}

/// Store a bond back as an edge weight, removing the edge when the bond has
/// dropped below the configured minimum.
fn write_bond(
    network: &mut WeightedGraph,
    u: usize,
    v: usize,
    bond: f32,
    params: &CoEvolutionParams,
) -> Result<()> {
    if bond < params.minimum_bond_strength {
        network.remove_edge(u, v)
    } else {
        network.add_edge(u, v, 1.0 - bond)
    }
}

/// Pairs to visit when adjusting existing edges: unordered for undirected
/// graphs (mutation mirrors), ordered for directed ones.
fn edge_pairs(n: usize, directed: bool) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |u| {
        let start = if directed { 0 } else { u + 1 };
        (start..n).filter_map(move |v| (u != v).then_some((u, v)))
    })
}

// ============================================================================
// Tests
// ============================================================================
