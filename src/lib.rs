//! # opinion-net — Opinion Dynamics on Co-Evolving Weighted Networks
//!
//! A simulation engine for opinion dynamics under the social-impact model:
//! agents hold scalar opinions, influence each other through persuasive and
//! supportive forces scaled by network distance, and the network itself can
//! rewire over time in response to opinion similarity (homophily).
//!
//! ## Design Principles
//!
//! 1. **One polymorphism point**: `UpdateRule` is the contract between the
//!    simulation driver and the dynamics — one trait, one method
//! 2. **Explicit randomness**: every stochastic operation takes a
//!    `&mut dyn RngCore`, so experiments are reproducible by seeding
//! 3. **Exclusive ownership**: `OpinionModel` owns its network, opinion
//!    space, and rule together — no split-ownership cleanup hazards
//! 4. **Checked indices everywhere**: out-of-range access is a recoverable
//!    `Error::InvalidIndex`, uniformly across graph and opinion space
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use opinion_net::{CoEvolutionParams, OpinionModel, SimulationConfig};
//! use rand::SeedableRng;
//!
//! # fn example() -> opinion_net::Result<()> {
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! // A random topology, then a temporal social-impact model on top of it
//! let network = opinion_net::topology::erdos_renyi(30, 0.3, false, &mut rng)?;
//! let mut model = OpinionModel::social_impact_temporal(
//!     network, 2.0, 1.0, CoEvolutionParams::default(), &mut rng,
//! )?;
//!
//! // Run to convergence or the step budget
//! let config = SimulationConfig { max_steps: 10_000, convergence_threshold: 0.001 };
//! let report = opinion_net::sim::run(&mut model, &config, None, &mut rng)?;
//! println!("{:?} at step {}", report.outcome, report.last_step);
//! # Ok(())
//! # }
//! ```
//!
//! ## Update Rules
//!
//! | Rule | Topology | Description |
//! |------|----------|-------------|
//! | `SocialImpactRule` | fixed | Asynchronous opinion updates, distances computed once |
//! | `TemporalSocialImpactRule` | co-evolving | Opinion updates plus homophily-driven rewiring |

// ============================================================================
// Modules
// ============================================================================

pub mod graph;
pub mod opinion;
pub mod model;
pub mod rules;
pub mod topology;
pub mod cluster;
pub mod sim;

// ============================================================================
// Re-exports: Graph substrate
// ============================================================================

pub use graph::{WeightedGraph, DistanceMatrix, UNREACHABLE};

// ============================================================================
// Re-exports: Opinions and models
// ============================================================================

pub use opinion::{Opinion, OpinionSpace};
pub use model::{OpinionModel, UpdateRule};

// ============================================================================
// Re-exports: Update rules
// ============================================================================

pub use rules::{SocialImpactRule, TemporalSocialImpactRule, CoEvolutionParams};

// ============================================================================
// Re-exports: Simulation driver
// ============================================================================

pub use sim::{SimulationConfig, RunReport, Outcome};

// ============================================================================
// Re-exports: Analysis
// ============================================================================

pub use cluster::{ClusterResult, OpinionCluster};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Index {index} out of range for {what} of size {len}")]
    InvalidIndex {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Self-loop rejected at node {0}")]
    SelfLoop(usize),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Opinion space has {agents} agents but network has {nodes} nodes")]
    AgentCountMismatch { agents: usize, nodes: usize },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
