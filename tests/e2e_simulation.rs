//! End-to-end driver scenarios: model construction, asynchronous updates,
//! convergence semantics, and deterministic replay through the public API.

use opinion_net::{
    CoEvolutionParams, OpinionModel, OpinionSpace, Outcome, SimulationConfig, SocialImpactRule,
    WeightedGraph,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn ring3() -> WeightedGraph {
    let mut g = WeightedGraph::new(3, false).unwrap();
    g.add_edge(0, 1, 1.0).unwrap();
    g.add_edge(1, 2, 1.0).unwrap();
    g.add_edge(2, 0, 1.0).unwrap();
    g
}

// ============================================================================
// 1. One static step on a 3-ring: saturation + asynchronicity
// ============================================================================

#[test]
fn static_step_on_ring_updates_one_saturated_opinion() {
    let before = vec![-0.9f32, 0.0, 0.9];
    let network = ring3();
    let opinions = OpinionSpace::from_opinions(before.clone());

    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let rule = SocialImpactRule::new(&network, 2.0, 1.0, &mut rng).unwrap();
    let mut model = OpinionModel::new(network, opinions, rule).unwrap();

    let config = SimulationConfig {
        max_steps: 1,
        convergence_threshold: 0.0,
    };
    let report = opinion_net::sim::run(&mut model, &config, None, &mut rng).unwrap();
    assert_eq!(report.last_step, 0);

    let after = model.opinions().as_slice();
    assert!(after.iter().all(|o| (-1.0..=1.0).contains(o)));

    let unchanged = (0..3).filter(|&i| after[i] == before[i]).count();
    assert!(unchanged >= 2, "more than one agent moved in a single step");
}

// ============================================================================
// 2. Convergence contract
// ============================================================================

#[test]
fn infinite_threshold_means_converged_at_step_zero() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut model = OpinionModel::social_impact(ring3(), 2.0, 1.0, &mut rng).unwrap();

    let config = SimulationConfig {
        max_steps: 500,
        convergence_threshold: f32::INFINITY,
    };
    let report = opinion_net::sim::run(&mut model, &config, None, &mut rng).unwrap();

    assert_eq!(report.outcome, Outcome::Converged);
    assert_eq!(report.last_step, 0);
}

#[test]
fn exhausted_runs_report_the_full_budget() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    // A zero threshold can never be undercut (spread >= 0), so the budget
    // is always spent in full.
    let mut model = OpinionModel::social_impact(ring3(), 2.0, 1.0, &mut rng).unwrap();

    let config = SimulationConfig {
        max_steps: 40,
        convergence_threshold: 0.0,
    };
    let report = opinion_net::sim::run(&mut model, &config, None, &mut rng).unwrap();

    assert_eq!(report.outcome, Outcome::Exhausted);
    assert_eq!(report.last_step, 39);
}

// ============================================================================
// 3. Temporal model end to end
// ============================================================================

#[test]
fn temporal_run_terminates_with_sane_state() {
    let mut rng = ChaCha8Rng::seed_from_u64(40);
    let network = opinion_net::topology::watts_strogatz(12, 4, 0.1, false, &mut rng).unwrap();
    let mut model = OpinionModel::social_impact_temporal(
        network,
        2.0,
        1.0,
        CoEvolutionParams::default(),
        &mut rng,
    )
    .unwrap();

    let config = SimulationConfig {
        max_steps: 200,
        convergence_threshold: 0.001,
    };
    let report = opinion_net::sim::run(&mut model, &config, None, &mut rng).unwrap();

    assert!(report.last_step < 200);
    assert!(model
        .opinions()
        .as_slice()
        .iter()
        .all(|o| (-1.0..=1.0).contains(o)));
    for (u, v, w) in model.network().edge_list() {
        assert!((0.0..=1.0).contains(&w), "edge ({u},{v}) weight {w}");
    }
}

// ============================================================================
// 4. Deterministic replay
// ============================================================================

#[test]
fn seeded_runs_replay_exactly() {
    let run_once = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let network = opinion_net::topology::erdos_renyi(15, 0.3, false, &mut rng).unwrap();
        let mut model = OpinionModel::social_impact_temporal(
            network,
            2.0,
            1.0,
            CoEvolutionParams::default(),
            &mut rng,
        )
        .unwrap();
        let config = SimulationConfig {
            max_steps: 100,
            convergence_threshold: 0.001,
        };
        let report = opinion_net::sim::run(&mut model, &config, None, &mut rng).unwrap();
        (
            report,
            model.opinions().as_slice().to_vec(),
            model.network().edge_list(),
        )
    };

    assert_eq!(run_once(99), run_once(99));
}

// ============================================================================
// 5. Independent simulations share nothing
// ============================================================================

#[test]
fn parameter_sweep_instances_are_isolated() {
    let build = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let network = ring3();
        OpinionModel::social_impact(network, 2.0, 1.0, &mut rng).unwrap()
    };

    let mut a = build(1);
    let mut b = build(2);
    let mut rng_a = ChaCha8Rng::seed_from_u64(10);
    let mut rng_b = ChaCha8Rng::seed_from_u64(20);

    let config = SimulationConfig {
        max_steps: 50,
        convergence_threshold: 1e-9,
    };
    let before_b = b.opinions().as_slice().to_vec();
    opinion_net::sim::run(&mut a, &config, None, &mut rng_a).unwrap();

    // Running `a` cannot have touched `b`
    assert_eq!(b.opinions().as_slice(), before_b.as_slice());
    opinion_net::sim::run(&mut b, &config, None, &mut rng_b).unwrap();
}
