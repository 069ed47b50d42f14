//! # Opinion Model
//!
//! Binds one [`WeightedGraph`], one [`OpinionSpace`], and one update rule
//! into a single simulatable unit. The model owns all three exclusively for
//! its lifetime and drops them together; [`OpinionModel::into_parts`] hands
//! them back when a caller wants to inspect or reuse them.
//!
//! [`UpdateRule`] is this system's one deliberate point of polymorphism:
//! one trait, one method — "advance state by one step". Swapping the rule
//! changes simulation semantics without altering the driver.

use rand::RngCore;

use crate::graph::WeightedGraph;
use crate::opinion::{Opinion, OpinionSpace};
use crate::{Error, Result};

// ============================================================================
// UpdateRule trait
// ============================================================================

/// Advance the bound state by one simulation step.
///
/// The rule may read and write both the network and the opinions; all of its
/// randomness must come from the passed source, so a seeded stream replays
/// the exact same trajectory.
pub trait UpdateRule<T: Opinion = f32> {
    fn advance(
        &mut self,
        network: &mut WeightedGraph,
        opinions: &mut OpinionSpace<T>,
        rng: &mut dyn RngCore,
    ) -> Result<()>;
}

// ============================================================================
// OpinionModel
// ============================================================================

/// A simulatable unit: network + opinions + update rule.
#[derive(Debug)]
pub struct OpinionModel<U, T = f32>
where
    T: Opinion,
    U: UpdateRule<T>,
{
    network: WeightedGraph,
    opinions: OpinionSpace<T>,
    rule: U,
}

impl<U, T> OpinionModel<U, T>
where
    T: Opinion,
    U: UpdateRule<T>,
{
    /// Bind a network, an opinion space, and a rule. Fails when the space
    /// and the network disagree on the agent count.
    pub fn new(network: WeightedGraph, opinions: OpinionSpace<T>, rule: U) -> Result<Self> {
        if opinions.len() != network.num_nodes() {
            return Err(Error::AgentCountMismatch {
                agents: opinions.len(),
                nodes: network.num_nodes(),
            });
        }
        Ok(Self {
            network,
            opinions,
            rule,
        })
    }

    /// Invoke the update rule once.
    pub fn step(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        self.rule
            .advance(&mut self.network, &mut self.opinions, rng)
    }

    pub fn network(&self) -> &WeightedGraph {
        &self.network
    }

    pub fn opinions(&self) -> &OpinionSpace<T> {
        &self.opinions
    }

    pub fn rule(&self) -> &U {
        &self.rule
    }

    /// Release the network, opinions, and rule back to the caller.
    pub fn into_parts(self) -> (WeightedGraph, OpinionSpace<T>, U) {
        (self.network, self.opinions, self.rule)
    }
}

// ============================================================================
// Tests
// ============================================================================
