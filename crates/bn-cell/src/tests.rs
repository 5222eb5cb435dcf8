//! Unit tests for bn-cell.

use std::collections::HashSet;

use bn_core::{CellId, CellRng, NodeIndex, UniformSource};
use bn_engine::{EngineResult, NetworkEngine, NetworkSource, NodeStates};

use crate::{CellCycleNetwork, CellNetworkError};

// ── Helpers ───────────────────────────────────────────────────────────────────

const NAMES: [&str; 5] = ["Oxygen", "Growth", "Migration", "Signal", "Proliferation"];
const BASE_PERIOD: f64 = 10.0;

/// Deterministic engine: every node copies its predecessor, node 0 takes the
/// negation of the last node.  Records every input it is stepped from.
#[derive(Clone, Debug)]
struct MockEngine {
    period:  f64,
    initial: NodeStates,
    inputs:  Vec<NodeStates>,
    /// Length of the vector `step` returns; `None` for a well-behaved engine.
    broken_len: Option<usize>,
}

impl MockEngine {
    fn new() -> Self {
        Self {
            period:     BASE_PERIOD,
            initial:    NodeStates::from_vec(vec![true, false, false, false, false]),
            inputs:     Vec::new(),
            broken_len: None,
        }
    }
}

impl NetworkEngine for MockEngine {
    fn init(_topology: &NetworkSource, _config: &NetworkSource) -> EngineResult<Self> {
        Ok(Self::new())
    }

    fn node_count(&self) -> usize {
        NAMES.len()
    }

    fn initial_state(&self) -> NodeStates {
        self.initial.clone()
    }

    fn step(&mut self, state: &NodeStates) -> NodeStates {
        self.inputs.push(state.clone());
        if let Some(len) = self.broken_len {
            return NodeStates::new(len);
        }
        let s = state.as_slice();
        (0..s.len())
            .map(|i| if i == 0 { !s[s.len() - 1] } else { s[i - 1] })
            .collect()
    }

    fn node_index(&self, name: &str) -> Option<NodeIndex> {
        NAMES.iter().position(|&n| n == name).map(|i| NodeIndex(i as u32))
    }

    fn node_name(&self, index: NodeIndex) -> Option<&str> {
        NAMES.get(index.index()).copied()
    }

    fn update_time_step(&self) -> f64 {
        self.period
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
struct Scripted {
    draws: Vec<f64>,
    next:  usize,
}

impl Scripted {
    fn new(draws: &[f64]) -> Self {
        Self { draws: draws.to_vec(), next: 0 }
    }
}

impl UniformSource for Scripted {
    fn uniform_11(&mut self) -> f64 {
        let v = self.draws[self.next % self.draws.len()];
        self.next += 1;
        v
    }
}

fn mock_network() -> CellCycleNetwork<MockEngine> {
    CellCycleNetwork::initialize_boolean_network(
        &NetworkSource::inline(""),
        &NetworkSource::inline(""),
    )
    .unwrap()
}

// ── Initialisation & restart ──────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn initialised_network_is_due_immediately() {
        let net = mock_network();
        assert_eq!(net.get_nodes().len(), NAMES.len());
        assert_eq!(net.get_time_to_update(), 0.0);
        assert!(net.is_due());
        assert_eq!(net.base_update_period(), BASE_PERIOD);
    }

    #[test]
    fn restart_keeps_length_and_bounds_countdown() {
        let mut net = mock_network();
        let mut rng = CellRng::new(7, CellId(0));
        for _ in 0..1000 {
            net.restart_nodes(&mut rng);
            assert_eq!(net.get_nodes().len(), net.engine().node_count());
            let t = net.get_time_to_update();
            assert!(
                (0.5 * BASE_PERIOD..=1.5 * BASE_PERIOD).contains(&t),
                "countdown {t} outside jitter window"
            );
        }
    }

    #[test]
    fn countdown_formula_at_extremes() {
        let mut net = mock_network();
        let mut rng = Scripted::new(&[-1.0, 0.0, 1.0]);
        net.restart_nodes(&mut rng);
        assert_eq!(net.get_time_to_update(), 5.0);
        net.restart_nodes(&mut rng);
        assert_eq!(net.get_time_to_update(), 10.0);
        net.restart_nodes(&mut rng);
        assert_eq!(net.get_time_to_update(), 15.0);
    }

    #[test]
    fn out_of_range_draw_is_clamped() {
        let mut net = mock_network();
        net.restart_nodes(&mut Scripted::new(&[3.0]));
        assert_eq!(net.get_time_to_update(), 1.5 * BASE_PERIOD);
    }

    #[test]
    fn restart_discards_drift() {
        let mut net = mock_network();
        let mut rng = Scripted::new(&[0.0]);
        net.set_node_value(NodeIndex(3), true).unwrap();
        net.run_maboss(&mut rng).unwrap();
        assert_ne!(net.get_nodes(), &net.engine().initial_state());
        net.restart_nodes(&mut rng);
        assert_eq!(net.get_nodes(), &net.engine().initial_state());
    }

    #[test]
    fn restart_countdowns_depend_only_on_draws() {
        let draws = [0.25, -0.75, 0.5, -0.1];

        let mut a = mock_network();
        let mut rng_a = Scripted::new(&draws);
        let seq_a: Vec<f64> = (0..8)
            .map(|_| {
                a.restart_nodes(&mut rng_a);
                a.get_time_to_update()
            })
            .collect();

        // Same draws, but with the network driven somewhere else in between.
        let mut b = mock_network();
        let mut rng_b = Scripted::new(&draws);
        let mut noise = Scripted::new(&[0.9]);
        let seq_b: Vec<f64> = (0..8)
            .map(|_| {
                b.set_node_value(NodeIndex(2), true).unwrap();
                b.run_maboss(&mut noise).unwrap();
                b.restart_nodes(&mut rng_b);
                b.get_time_to_update()
            })
            .collect();

        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn engine_config_error_propagates() {
        let result = CellCycleNetwork::<bn_engine::LogicEngine>::initialize_boolean_network(
            &NetworkSource::inline("node,initial,rule\nA,0,B\n"),
            &NetworkSource::inline("key,value\ntime_step,6\n"),
        );
        assert!(matches!(result, Err(CellNetworkError::Engine(_))));
    }

    #[test]
    fn non_positive_period_rejected() {
        let mut engine = MockEngine::new();
        engine.period = 0.0;
        assert!(matches!(
            CellCycleNetwork::from_engine(engine),
            Err(CellNetworkError::Engine(_))
        ));
    }
}

// ── Stepping ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stepping {
    use super::*;

    fn run_n(n: usize) -> NodeStates {
        let mut net = mock_network();
        let mut rng = CellRng::new(1, CellId(0));
        net.restart_nodes(&mut rng);
        for _ in 0..n {
            net.run_maboss(&mut rng).unwrap();
        }
        net.get_nodes().clone()
    }

    #[test]
    fn repeated_runs_are_reproducible() {
        let first = run_n(17);
        for _ in 0..5 {
            assert_eq!(run_n(17), first);
        }
    }

    #[test]
    fn run_is_not_idempotent() {
        let mut net = mock_network();
        let mut rng = Scripted::new(&[0.0]);
        net.run_maboss(&mut rng).unwrap();
        let once = net.get_nodes().clone();
        net.run_maboss(&mut rng).unwrap();
        assert_ne!(net.get_nodes(), &once);
        assert_eq!(net.engine().inputs.len(), 2);
    }

    #[test]
    fn run_redraws_countdown() {
        let mut net = mock_network();
        net.run_maboss(&mut Scripted::new(&[0.5])).unwrap();
        assert_eq!(net.get_time_to_update(), 12.5);
        assert!(!net.is_due());
    }

    #[test]
    fn written_value_is_next_engine_input() {
        let mut net = mock_network();
        let mut rng = Scripted::new(&[0.0]);
        net.run_maboss(&mut rng).unwrap();

        net.set_node_value(NodeIndex(3), true).unwrap();
        net.run_maboss(&mut rng).unwrap();

        let seen = &net.engine().inputs[1];
        assert_eq!(seen.get(NodeIndex(3)), Some(true));
        // The mock shifts values up by one node.
        assert_eq!(net.node_value(NodeIndex(4)), Some(true));
    }

    #[test]
    fn engine_length_violation_is_an_error() {
        let mut engine = MockEngine::new();
        engine.broken_len = Some(3);
        let mut net = CellCycleNetwork::from_engine(engine).unwrap();
        let before = net.get_nodes().clone();
        let err = net.run_maboss(&mut Scripted::new(&[0.0])).unwrap_err();
        assert!(matches!(
            err,
            CellNetworkError::StateLengthChanged { expected: 5, got: 3 }
        ));
        assert_eq!(net.get_nodes(), &before);
    }
}

// ── Scheduling ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduling {
    use super::*;

    #[test]
    fn elapse_counts_down_and_clamps() {
        let mut net = mock_network();
        net.restart_nodes(&mut Scripted::new(&[0.0])); // 10.0
        assert!(!net.elapse(4.0));
        assert_eq!(net.get_time_to_update(), 6.0);
        assert!(net.elapse(8.0));
        assert_eq!(net.get_time_to_update(), 0.0);
        assert!(net.elapse(1.0));
        assert_eq!(net.get_time_to_update(), 0.0);
    }

    #[test]
    fn decrement_and_fire_cadence() {
        let mut net = mock_network();
        let mut rng = Scripted::new(&[0.0]);
        net.restart_nodes(&mut rng);

        let mut fired = 0;
        for _ in 0..100 {
            if net.elapse(1.0) {
                net.run_maboss(&mut rng).unwrap();
                fired += 1;
            }
        }
        // Period 10, step 1: fires at steps 10, 20, ..., 100.
        assert_eq!(fired, 10);
    }

    #[test]
    fn independent_cells_desynchronise() {
        let mut seen = HashSet::new();
        let mut collisions = 0;
        for i in 0..1000 {
            let mut net = mock_network();
            let mut rng = CellRng::new(42, CellId(i));
            net.restart_nodes(&mut rng);
            if !seen.insert(net.get_time_to_update().to_bits()) {
                collisions += 1;
            }
        }
        assert!(collisions < 5, "{collisions} identical countdowns out of 1000");
    }
}

// ── Node access ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod node_access {
    use super::*;

    #[test]
    fn lookup_present_and_absent() {
        let net = mock_network();
        assert_eq!(net.get_maboss_node_index("Proliferation"), Some(NodeIndex(4)));
        assert_eq!(net.get_maboss_node_index("Apoptosis"), None);
    }

    #[test]
    fn read_by_name() {
        let net = mock_network();
        assert_eq!(net.node_value_by_name("Oxygen"), Some(true));
        assert_eq!(net.node_value_by_name("Migration"), Some(false));
        assert_eq!(net.node_value_by_name("Apoptosis"), None);
    }

    #[test]
    fn out_of_range_write_fails_loudly() {
        let mut net = mock_network();
        let err = net.set_node_value(NodeIndex(5), true).unwrap_err();
        assert!(matches!(
            err,
            CellNetworkError::NodeIndexOutOfRange { index: NodeIndex(5), len: 5 }
        ));
        assert!(net.set_node_value(NodeIndex::INVALID, true).is_err());
        assert_eq!(net.node_count(), 5);
    }

    #[test]
    fn write_by_name() {
        let mut net = mock_network();
        net.set_node_by_name("Migration", true).unwrap();
        assert_eq!(net.node_value(NodeIndex(2)), Some(true));
        assert!(matches!(
            net.set_node_by_name("Apoptosis", true),
            Err(CellNetworkError::UnknownNode(name)) if name == "Apoptosis"
        ));
    }

    #[test]
    fn display_lists_name_value_pairs() {
        let net = mock_network();
        assert_eq!(
            net.display_nodes().to_string(),
            "Oxygen = 1\nGrowth = 0\nMigration = 0\nSignal = 0\nProliferation = 0\n"
        );
    }
}
