//! # Opinion Clusters
//!
//! Groups nodes that are close in the network *and* close in opinion:
//! a cluster grows by BFS from a seed, admitting a node only when it is
//! within a shortest-path distance budget of the seed, directly connected
//! to the frontier, and within an opinion tolerance of *every* member
//! already admitted.
//!
//! Output-only analysis over a `(graph, opinions)` pair — typically a
//! persisted snapshot. The simulation core never consumes cluster results;
//! downstream visualization does.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::graph::{DistanceMatrix, WeightedGraph};
use crate::opinion::{Opinion, OpinionSpace};
use crate::{Error, Result};

// ============================================================================
// Results
// ============================================================================

/// One cluster: its member node indices and their average opinion
/// (scalar projection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionCluster {
    pub members: Vec<usize>,
    pub avg_opinion: f32,
}

impl OpinionCluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// A partition (disjoint) or cover (overlapping) of node indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    pub clusters: Vec<OpinionCluster>,
}

impl ClusterResult {
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

// ============================================================================
// Cluster discovery
// ============================================================================

/// Disjoint maximal opinion clusters: every node lands in exactly one
/// cluster (singletons allowed).
pub fn find_disjoint_clusters<T: Opinion>(
    network: &WeightedGraph,
    opinions: &OpinionSpace<T>,
    max_distance: f32,
    max_opinion_diff: f32,
) -> Result<ClusterResult> {
    let n = check_sizes(network, opinions)?;
    let distances = network.all_pairs_shortest_paths();
    let mut visited = vec![false; n];
    let mut result = ClusterResult::default();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let members = grow_cluster(
            network,
            opinions,
            &distances,
            start,
            max_distance,
            max_opinion_diff,
            &mut visited,
        )?;
        result.clusters.push(finish_cluster(members, opinions));
    }

    Ok(result)
}

/// Overlapping maximal opinion clusters: one BFS per seed with per-seed
/// membership, so a node may appear in many clusters. Clusters of size 1
/// are discarded.
pub fn find_overlapping_clusters<T: Opinion>(
    network: &WeightedGraph,
    opinions: &OpinionSpace<T>,
    max_distance: f32,
    max_opinion_diff: f32,
) -> Result<ClusterResult> {
    let n = check_sizes(network, opinions)?;
    let distances = network.all_pairs_shortest_paths();
    let mut result = ClusterResult::default();

    for start in 0..n {
        let mut in_cluster = vec![false; n];
        let members = grow_cluster(
            network,
            opinions,
            &distances,
            start,
            max_distance,
            max_opinion_diff,
            &mut in_cluster,
        )?;
        if members.len() > 1 {
            result.clusters.push(finish_cluster(members, opinions));
        }
    }

    Ok(result)
}

/// BFS from `start`, marking membership in `visited`. Admission requires
/// distance-from-seed, direct adjacency to the current node, and opinion
/// tolerance against every admitted member.
fn grow_cluster<T: Opinion>(
    network: &WeightedGraph,
    opinions: &OpinionSpace<T>,
    distances: &DistanceMatrix,
    start: usize,
    max_distance: f32,
    max_opinion_diff: f32,
    visited: &mut [bool],
) -> Result<Vec<usize>> {
    let n = network.num_nodes();
    let mut members = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if visited[current] {
            continue;
        }
        visited[current] = true;
        members.push(current);

        for neighbor in 0..n {
            if visited[neighbor] {
                continue;
            }
            if distances.get(start, neighbor) <= max_distance
                && network.is_connected(current, neighbor)?
                && opinion_fits(opinions, &members, neighbor, max_opinion_diff)?
            {
                queue.push_back(neighbor);
            }
        }
    }

    Ok(members)
}

/// Whether `node`'s opinion is within tolerance of every current member.
fn opinion_fits<T: Opinion>(
    opinions: &OpinionSpace<T>,
    members: &[usize],
    node: usize,
    max_opinion_diff: f32,
) -> Result<bool> {
    for &member in members {
        if opinions.distance(member, node)? > max_opinion_diff {
            return Ok(false);
        }
    }
    Ok(true)
}

fn finish_cluster<T: Opinion>(members: Vec<usize>, opinions: &OpinionSpace<T>) -> OpinionCluster {
    let sum: f32 = members
        .iter()
        .filter_map(|&i| opinions.get(i).map(Opinion::scalar))
        .sum();
    let avg_opinion = if members.is_empty() {
        0.0
    } else {
        sum / members.len() as f32
    };
    OpinionCluster {
        members,
        avg_opinion,
    }
}

fn check_sizes<T: Opinion>(network: &WeightedGraph, opinions: &OpinionSpace<T>) -> Result<usize> {
    let n = network.num_nodes();
    if opinions.len() != n {
        return Err(Error::AgentCountMismatch {
            agents: opinions.len(),
            nodes: n,
        });
    }
    Ok(n)
}

// ============================================================================
// Tests
// ============================================================================
