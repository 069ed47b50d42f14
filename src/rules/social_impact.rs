//! Social-impact update rules.
//!
//! The impact an agent feels is the sum of every other agent's persuasive
//! force (pushing the pair apart when they agree) and supportive force
//! (pulling them together), both attenuated by shortest-path distance raised
//! to a decay exponent. The updated opinion saturates through `tanh`, so it
//! always lands back in [-1, 1].
//!
//! Exactly one agent updates per step, chosen independently and uniformly at
//! random — there is no round-robin guarantee and no guarantee every agent
//! is ever selected within a finite horizon. That is a property of the
//! asynchronous design, not a defect.

use rand::{Rng, RngCore};

use crate::graph::{DistanceMatrix, WeightedGraph, UNREACHABLE};
use crate::model::{OpinionModel, UpdateRule};
use crate::opinion::OpinionSpace;
use crate::{Error, Result};
use super::coevolution::{self, CoEvolutionParams};

/// Distances below this floor are clamped before exponentiation, so a
/// zero-weight path cannot blow up the division.
const DISTANCE_FLOOR: f32 = 1e-6;

// ============================================================================
// SocialImpactRule (static topology)
// ============================================================================

/// The static social-impact rule: asynchronous opinion updates on a fixed
/// topology. Shortest-path distances are computed once at construction.
///
/// Per-agent persuasiveness and support are sampled uniformly from [-1, 1]
/// at construction and held fixed for the rule's lifetime.
#[derive(Debug, Clone)]
pub struct SocialImpactRule {
    alpha: f32,
    beta: f32,
    distances: DistanceMatrix,
    persuasiveness: Vec<f32>,
    support: Vec<f32>,
}

impl SocialImpactRule {
    /// Build a rule for the given network with distance-decay exponent
    /// `alpha` (must be positive) and saturation gain `beta`.
    pub fn new(
        network: &WeightedGraph,
        alpha: f32,
        beta: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        if alpha <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "alpha must be positive, got {alpha}"
            )));
        }
        let n = network.num_nodes();
        Ok(Self {
            alpha,
            beta,
            distances: network.all_pairs_shortest_paths(),
            persuasiveness: sample_unit_interval(n, rng),
            support: sample_unit_interval(n, rng),
        })
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }

    /// Social impact on agent `i`: persuasive and supportive contributions
    /// of every other agent, attenuated by `d(i,j)^alpha`. Unreachable
    /// agents contribute nothing.
    fn impact_of(&self, i: usize, opinions: &[f32]) -> f32 {
        let oi = opinions[i];
        let mut impact = 0.0;
        for (j, &oj) in opinions.iter().enumerate() {
            if j == i {
                continue;
            }
            let d = self.distances.get(i, j);
            if d >= UNREACHABLE {
                continue;
            }
            let d_alpha = d.max(DISTANCE_FLOOR).powf(self.alpha);
            let cross = oi * oj;
            impact += self.persuasiveness[j] / d_alpha * (1.0 - cross)
                - self.support[j] / d_alpha * (1.0 + cross);
        }
        impact
    }

    /// Pick one agent uniformly at random and recompute its opinion as
    /// `tanh(beta * opinion * impact)`. Returns the selected index.
    fn update_random_agent(
        &self,
        opinions: &mut OpinionSpace,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        let n = opinions.len();
        if n != self.persuasiveness.len() {
            return Err(Error::AgentCountMismatch {
                agents: n,
                nodes: self.persuasiveness.len(),
            });
        }
        let i = rng.gen_range(0..n);
        let slice = opinions.as_slice();
        let impact = self.impact_of(i, slice);
        let updated = (self.beta * slice[i] * impact).tanh();
        opinions.set(i, updated)?;
        Ok(i)
    }
}

impl UpdateRule for SocialImpactRule {
    fn advance(
        &mut self,
        _network: &mut WeightedGraph,
        opinions: &mut OpinionSpace,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        self.update_random_agent(opinions, rng)?;
        Ok(())
    }
}

// ============================================================================
// TemporalSocialImpactRule (co-evolving topology)
// ============================================================================

/// The temporal variant: the same asynchronous opinion update, followed by a
/// fresh all-pairs distance computation and one invocation of the topology
/// co-evolution passes.
///
/// Ordering contract: the co-evolution's edge-creation gating sees the
/// distances recomputed at the start of this step's topology phase, and the
/// *next* step's impact computation sees distances that already reflect this
/// step's topology changes.
#[derive(Debug, Clone)]
pub struct TemporalSocialImpactRule {
    impact: SocialImpactRule,
    coevolution: CoEvolutionParams,
}

impl TemporalSocialImpactRule {
    pub fn new(
        network: &WeightedGraph,
        alpha: f32,
        beta: f32,
        coevolution: CoEvolutionParams,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        Ok(Self {
            impact: SocialImpactRule::new(network, alpha, beta, rng)?,
            coevolution,
        })
    }

    pub fn coevolution(&self) -> &CoEvolutionParams {
        &self.coevolution
    }
}

impl UpdateRule for TemporalSocialImpactRule {
    fn advance(
        &mut self,
        network: &mut WeightedGraph,
        opinions: &mut OpinionSpace,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        self.impact.update_random_agent(opinions, rng)?;

        // Refresh distances from the current topology; the co-evolution's
        // passes mutate edges but deliberately keep gating on this snapshot.
        self.impact.distances = network.all_pairs_shortest_paths();
        coevolution::evolve(
            network,
            opinions,
            &self.impact.distances,
            &self.coevolution,
            rng,
        )
    }
}

// ============================================================================
// Model constructors
// ============================================================================

impl OpinionModel<SocialImpactRule> {
    /// A static social-impact model over `network`, with opinions,
    /// persuasiveness, and support all sampled uniformly from [-1, 1].
    pub fn social_impact(
        network: WeightedGraph,
        alpha: f32,
        beta: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        let opinions = OpinionSpace::uniform(network.num_nodes(), rng);
        let rule = SocialImpactRule::new(&network, alpha, beta, rng)?;
        OpinionModel::new(network, opinions, rule)
    }
}

impl OpinionModel<TemporalSocialImpactRule> {
    /// A temporal social-impact model over `network`; the topology
    /// co-evolves under `coevolution` each step.
    pub fn social_impact_temporal(
        network: WeightedGraph,
        alpha: f32,
        beta: f32,
        coevolution: CoEvolutionParams,
        rng: &mut dyn RngCore,
    ) -> Result<Self> {
        let opinions = OpinionSpace::uniform(network.num_nodes(), rng);
        let rule = TemporalSocialImpactRule::new(&network, alpha, beta, coevolution, rng)?;
        OpinionModel::new(network, opinions, rule)
    }
}

fn sample_unit_interval(n: usize, rng: &mut dyn RngCore) -> Vec<f32> {
    (0..n).map(|_| rng.gen_range(-1.0f32..=1.0)).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ring3() -> WeightedGraph {
        let mut g = WeightedGraph::new(3, false).unwrap();
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(1, 2, 1.0).unwrap();
        g.add_edge(2, 0, 1.0).unwrap();
        g
    }

    #[test]
    fn alpha_must_be_positive() {
        let g = ring3();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(SocialImpactRule::new(&g, 0.0, 1.0, &mut rng).is_err());
        assert!(SocialImpactRule::new(&g, -2.0, 1.0, &mut rng).is_err());
    }

    #[test]
    fn one_step_changes_at_most_one_agent_and_saturates() {
        let mut network = ring3();
        let before = vec![-0.9f32, 0.0, 0.9];
        let mut opinions = OpinionSpace::from_opinions(before.clone());

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut rule = SocialImpactRule::new(&network, 2.0, 1.0, &mut rng).unwrap();
        rule.advance(&mut network, &mut opinions, &mut rng).unwrap();

        let after = opinions.as_slice();
        let changed: Vec<usize> = (0..3).filter(|&i| after[i] != before[i]).collect();
        assert!(changed.len() <= 1, "asynchronous update touched {changed:?}");
        assert!(after.iter().all(|o| (-1.0..=1.0).contains(o)));
        // Topology untouched by the static rule
        assert_eq!(network.edge_count(), 3);
    }

    #[test]
    fn unreachable_agents_contribute_no_impact() {
        // No edges at all: every impact sum is empty, so the selected
        // agent's opinion collapses to tanh(0) = 0.
        let mut network = WeightedGraph::new(2, false).unwrap();
        let mut opinions = OpinionSpace::from_opinions(vec![0.5f32, -0.5]);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut rule = SocialImpactRule::new(&network, 2.0, 1.0, &mut rng).unwrap();
        rule.advance(&mut network, &mut opinions, &mut rng).unwrap();

        let after = opinions.as_slice();
        assert!(after.contains(&0.0));
        assert!(after.contains(&0.5) || after.contains(&-0.5));
    }

    #[test]
    fn zero_weight_edges_are_clamped_not_divided_by_zero() {
        let mut network = WeightedGraph::new(2, false).unwrap();
        network.add_edge(0, 1, 0.0).unwrap();
        let mut opinions = OpinionSpace::from_opinions(vec![0.4f32, -0.7]);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut rule = SocialImpactRule::new(&network, 2.0, 1.0, &mut rng).unwrap();
        rule.advance(&mut network, &mut opinions, &mut rng).unwrap();

        assert!(opinions.as_slice().iter().all(|o| o.is_finite()));
        assert!(opinions.as_slice().iter().all(|o| (-1.0..=1.0).contains(o)));
    }

    #[test]
    fn seeded_streams_replay_identical_trajectories() {
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut network = ring3();
            let mut opinions = OpinionSpace::from_opinions(vec![-0.9f32, 0.0, 0.9]);
            let mut rule = SocialImpactRule::new(&network, 2.0, 1.0, &mut rng).unwrap();
            for _ in 0..50 {
                rule.advance(&mut network, &mut opinions, &mut rng).unwrap();
            }
            opinions.as_slice().to_vec()
        };

        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
    }

    #[test]
    fn rule_rejects_a_mismatched_opinion_space() {
        let mut network = ring3();
        let mut opinions: OpinionSpace = OpinionSpace::new(4);

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut rule = SocialImpactRule::new(&network, 2.0, 1.0, &mut rng).unwrap();
        let err = rule.advance(&mut network, &mut opinions, &mut rng);
        assert!(matches!(err, Err(Error::AgentCountMismatch { .. })));
    }

    #[test]
    fn temporal_rule_keeps_weights_and_opinions_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut g = WeightedGraph::new(6, false).unwrap();
        for u in 0..6 {
            g.add_edge(u, (u + 1) % 6, 1.0).unwrap();
        }
        let mut model = OpinionModel::social_impact_temporal(
            g,
            2.0,
            1.0,
            CoEvolutionParams::default(),
            &mut rng,
        )
        .unwrap();

        for _ in 0..25 {
            model.step(&mut rng).unwrap();
        }

        assert!(model
            .opinions()
            .as_slice()
            .iter()
            .all(|o| (-1.0..=1.0).contains(o)));
        for (u, v, w) in model.network().edge_list() {
            assert!((0.0..=1.0).contains(&w), "edge ({u},{v}) weight {w}");
            assert!(model.network().is_connected(v, u).unwrap());
            assert_eq!(model.network().weight(v, u).unwrap(), w);
        }
    }
}
