//! # Simulation Driver
//!
//! A tight synchronous loop: invoke the model's update rule once per step,
//! test convergence on the opinion spread, optionally persist a snapshot of
//! the current state. Terminal states are `Converged` (spread dropped below
//! the threshold) and `Exhausted` (step budget spent) — non-convergence is
//! an outcome, not an error.
//!
//! Snapshot failures are reported through `tracing` and never abort an
//! in-progress run; in-memory state is unaffected.

pub mod snapshot;

use std::path::Path;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{OpinionModel, UpdateRule};
use crate::opinion::Opinion;
use crate::{Error, Result};

// ============================================================================
// Configuration and report
// ============================================================================

/// Driver knobs. Serializable so experiment scripts can record a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Step budget; the run ends `Exhausted` when it is spent.
    pub max_steps: usize,
    /// The run ends `Converged` once `max − min` opinion drops below this.
    pub convergence_threshold: f32,
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Converged,
    Exhausted,
}

/// What a run ended as, and where.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Index of the last executed step (0-based).
    pub last_step: usize,
    pub outcome: Outcome,
    /// Opinion spread after the last executed step.
    pub final_spread: f32,
}

// ============================================================================
// Driver
// ============================================================================

/// Run the model for up to `max_steps` steps.
///
/// Each step: advance the model once, then (if `snapshot_dir` is given)
/// persist `{step}.opinions` and `{step}.graph` there, then test
/// convergence — so a converging step's snapshot is still written before
/// the run stops.
pub fn run<U, T>(
    model: &mut OpinionModel<U, T>,
    config: &SimulationConfig,
    snapshot_dir: Option<&Path>,
    rng: &mut dyn RngCore,
) -> Result<RunReport>
where
    T: Opinion,
    U: UpdateRule<T>,
{
    if config.max_steps == 0 {
        return Err(Error::InvalidParameter(
            "max_steps must be at least 1".into(),
        ));
    }

    for step in 0..config.max_steps {
        model.step(rng)?;
        let spread = model.opinions().spread();

        if let Some(dir) = snapshot_dir {
            if let Err(err) = snapshot::write_state(dir, step, model.network(), model.opinions()) {
                warn!(step, %err, "snapshot write failed; run continues");
            }
        }

        if spread < config.convergence_threshold {
            debug!(step, spread, "opinion spread converged");
            return Ok(RunReport {
                last_step: step,
                outcome: Outcome::Converged,
                final_spread: spread,
            });
        }
    }

    let final_spread = model.opinions().spread();
    debug!(
        max_steps = config.max_steps,
        final_spread, "step budget exhausted without convergence"
    );
    Ok(RunReport {
        last_step: config.max_steps - 1,
        outcome: Outcome::Exhausted,
        final_spread,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::graph::WeightedGraph;
    use crate::opinion::OpinionSpace;

    /// Leaves everything untouched — spread never shrinks.
    struct Frozen;

    impl UpdateRule for Frozen {
        fn advance(
            &mut self,
            _network: &mut WeightedGraph,
            _opinions: &mut OpinionSpace,
            _rng: &mut dyn RngCore,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn frozen_model() -> OpinionModel<Frozen> {
        let network = WeightedGraph::new(3, false).unwrap();
        let opinions = OpinionSpace::from_opinions(vec![-0.5f32, 0.0, 0.5]);
        OpinionModel::new(network, opinions, Frozen).unwrap()
    }

    #[test]
    fn infinite_threshold_converges_after_exactly_one_step() {
        let mut model = frozen_model();
        let config = SimulationConfig {
            max_steps: 1000,
            convergence_threshold: f32::INFINITY,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let report = run(&mut model, &config, None, &mut rng).unwrap();
        assert_eq!(report.outcome, Outcome::Converged);
        assert_eq!(report.last_step, 0);
    }

    #[test]
    fn non_convergence_exhausts_the_budget() {
        let mut model = frozen_model();
        let config = SimulationConfig {
            max_steps: 17,
            convergence_threshold: 0.001,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let report = run(&mut model, &config, None, &mut rng).unwrap();
        assert_eq!(report.outcome, Outcome::Exhausted);
        assert_eq!(report.last_step, 16);
        assert_eq!(report.final_spread, 1.0);
    }

    #[test]
    fn zero_step_budget_is_invalid() {
        let mut model = frozen_model();
        let config = SimulationConfig {
            max_steps: 0,
            convergence_threshold: 0.001,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert!(run(&mut model, &config, None, &mut rng).is_err());
    }

    #[test]
    fn snapshot_failure_does_not_abort_the_run() {
        let mut model = frozen_model();
        let config = SimulationConfig {
            max_steps: 3,
            convergence_threshold: 0.001,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        // A directory that cannot exist: below a regular file
        let bogus = Path::new("/dev/null/no-such-dir");
        let report = run(&mut model, &config, Some(bogus), &mut rng).unwrap();
        assert_eq!(report.outcome, Outcome::Exhausted);
        assert_eq!(report.last_step, 2);
    }
}
