//! `CellCycleNetwork`: a cell's regulatory network, its cached node values,
//! and the countdown to its next update.

use std::fmt;

use bn_core::{NodeIndex, UniformSource};
use bn_engine::{EngineError, NetworkEngine, NetworkSource, NodeStates};

use crate::{CellNetworkError, CellNetworkResult};

/// Regulatory state of one cell.
///
/// The cell exclusively owns its engine `E`, the node values the engine is
/// stepped from, and a randomized countdown to the next update.  A value of
/// this type only exists once the engine has been initialised, so there is no
/// way to step or query an uninitialised network.
///
/// Inputs from the environment are written with
/// [`set_node_value`](Self::set_node_value) between updates; outputs are read
/// back with [`node_value`](Self::node_value) using indices from
/// [`get_maboss_node_index`](Self::get_maboss_node_index).
///
/// `CellCycleNetwork` holds no shared state.  Hosts that process cells on
/// several threads hand each instance, together with its own random source,
/// to exactly one worker at a time.
#[derive(Clone, Debug)]
pub struct CellCycleNetwork<E: NetworkEngine> {
    engine:         E,
    nodes:          NodeStates,
    time_to_update: f64,
}

impl<E: NetworkEngine> CellCycleNetwork<E> {
    // ── Construction ──────────────────────────────────────────────────────

    /// Build the engine from its topology and configuration sources.
    ///
    /// The cached nodes start at the engine's initial state and the countdown
    /// at zero, so the network is due on the first step unless
    /// [`restart_nodes`](Self::restart_nodes) draws a countdown first.
    ///
    /// Any failure here is a configuration error: the caller should abort the
    /// cell's regulatory setup rather than continue with a partial network.
    pub fn initialize_boolean_network(
        topology: &NetworkSource,
        config:   &NetworkSource,
    ) -> CellNetworkResult<Self> {
        Self::from_engine(E::init(topology, config)?)
    }

    /// Wrap an engine that was built elsewhere (e.g. cloned from a template).
    pub fn from_engine(engine: E) -> CellNetworkResult<Self> {
        let period = engine.update_time_step();
        if !period.is_finite() || period <= 0.0 {
            return Err(CellNetworkError::Engine(EngineError::Config(format!(
                "update time step must be finite and positive, got {period}"
            ))));
        }

        let nodes = engine.initial_state();
        check_len(engine.node_count(), &nodes)?;

        Ok(Self { engine, nodes, time_to_update: 0.0 })
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Reset the nodes to the engine's initial state and draw a new countdown.
    ///
    /// Used after structural events such as division; the configuration is
    /// not re-read.
    pub fn restart_nodes<R: UniformSource + ?Sized>(&mut self, rng: &mut R) {
        self.nodes = self.engine.initial_state();
        self.set_time_to_update(rng);
    }

    /// Step the network once from the cached nodes and draw a new countdown.
    ///
    /// Whatever the host wrote into the nodes since the last update is the
    /// engine's input.  Each call advances the network again; it is not
    /// idempotent.  The decision whether the network is due belongs to the
    /// caller (see [`elapse`](Self::elapse)).
    pub fn run_maboss<R: UniformSource + ?Sized>(&mut self, rng: &mut R) -> CellNetworkResult<()> {
        let next = self.engine.step(&self.nodes);
        check_len(self.nodes.len(), &next)?;
        self.nodes = next;
        self.set_time_to_update(rng);
        tracing::trace!(
            active = self.nodes.count_active(),
            next_update = self.time_to_update,
            "network updated"
        );
        Ok(())
    }

    /// Count `dt` off the countdown, stopping at zero.
    ///
    /// Returns `true` once the network is due for [`run_maboss`](Self::run_maboss).
    pub fn elapse(&mut self, dt: f64) -> bool {
        self.time_to_update = (self.time_to_update - dt).max(0.0);
        self.is_due()
    }

    #[inline]
    pub fn is_due(&self) -> bool {
        self.time_to_update <= 0.0
    }

    /// `(1 + 0.5 * U) * base_period` with `U` drawn from `[-1, 1]`.
    fn set_time_to_update<R: UniformSource + ?Sized>(&mut self, rng: &mut R) {
        let u = rng.uniform_11().clamp(-1.0, 1.0);
        self.time_to_update = (1.0 + 0.5 * u) * self.engine.update_time_step();
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Live node values as of the last update or write.
    #[inline]
    pub fn get_nodes(&self) -> &NodeStates {
        &self.nodes
    }

    #[inline]
    pub fn get_time_to_update(&self) -> f64 {
        self.time_to_update
    }

    /// Resolve a node name.  `None` means the network has no such node,
    /// which is the caller's to judge, not an error.
    #[inline]
    pub fn get_maboss_node_index(&self, name: &str) -> Option<NodeIndex> {
        self.engine.node_index(name)
    }

    #[inline]
    pub fn node_value(&self, index: NodeIndex) -> Option<bool> {
        self.nodes.get(index)
    }

    pub fn node_value_by_name(&self, name: &str) -> Option<bool> {
        self.get_maboss_node_index(name).and_then(|i| self.nodes.get(i))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn base_update_period(&self) -> f64 {
        self.engine.update_time_step()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    // ── Input injection ───────────────────────────────────────────────────

    /// Write one node's value ahead of the next update.
    ///
    /// An index outside the network is an error; the vector is never grown.
    pub fn set_node_value(&mut self, index: NodeIndex, value: bool) -> CellNetworkResult<()> {
        let len = self.nodes.len();
        let slot = self
            .nodes
            .get_mut(index)
            .ok_or(CellNetworkError::NodeIndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Name-based form of [`set_node_value`](Self::set_node_value).
    pub fn set_node_by_name(&mut self, name: &str, value: bool) -> CellNetworkResult<()> {
        let index = self
            .get_maboss_node_index(name)
            .ok_or_else(|| CellNetworkError::UnknownNode(name.to_string()))?;
        self.set_node_value(index, value)
    }

    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Print every node as `name = 0|1` to stdout.
    pub fn print_nodes(&self) {
        print!("{}", self.display_nodes());
    }

    /// The text [`print_nodes`](Self::print_nodes) writes.
    pub fn display_nodes(&self) -> NodesDisplay<'_, E> {
        NodesDisplay { engine: &self.engine, nodes: &self.nodes }
    }
}

/// `Display` adapter returned by [`CellCycleNetwork::display_nodes`].
pub struct NodesDisplay<'a, E> {
    engine: &'a E,
    nodes:  &'a NodeStates,
}

impl<E: NetworkEngine> fmt::Display for NodesDisplay<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.engine.write_nodes(self.nodes, f)
    }
}

fn check_len(expected: usize, states: &NodeStates) -> CellNetworkResult<()> {
    if states.len() != expected {
        return Err(CellNetworkError::StateLengthChanged { expected, got: states.len() });
    }
    Ok(())
}
