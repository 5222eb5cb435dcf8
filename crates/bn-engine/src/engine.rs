//! The `NetworkEngine` trait, the seam between a cell and whatever steps
//! its Boolean network.

use std::fmt;

use bn_core::NodeIndex;

use crate::{EngineResult, NetworkSource, NodeStates};

/// A Boolean network that can be stepped from an externally held state.
///
/// An engine owns topology and configuration only.  The current node values
/// live with the caller (one `NodeStates` per cell), which is what lets the
/// host write environmental inputs into the vector between steps.
///
/// Every cell owns its own engine value; engines are never shared between
/// cells because trajectories diverge.
///
/// # Contract
///
/// - `node_count()` is fixed after `init`.
/// - `initial_state()` and `step()` return vectors of length `node_count()`.
/// - `node_index(name)` and `node_name(index)` are inverse lookups over the
///   same fixed node ordering.
/// - `update_time_step()` is finite and positive.
pub trait NetworkEngine: Sized + Send + 'static {
    /// Build the engine from a topology and a configuration source.
    ///
    /// Errors are configuration errors: the sources do not describe a valid,
    /// internally consistent network.
    fn init(topology: &NetworkSource, config: &NetworkSource) -> EngineResult<Self>;

    /// Number of nodes in the network.
    fn node_count(&self) -> usize;

    /// The reference state a cell is (re)started from.
    fn initial_state(&self) -> NodeStates;

    /// Advance the network by one update from `state`.
    ///
    /// `state.len()` must equal `node_count()`.
    fn step(&mut self, state: &NodeStates) -> NodeStates;

    /// Resolve a symbolic node name.  `None` if the network has no such node.
    fn node_index(&self, name: &str) -> Option<NodeIndex>;

    /// Name of the node at `index`, if in range.
    fn node_name(&self, index: NodeIndex) -> Option<&str>;

    /// Base period between two updates of one cell's network.
    fn update_time_step(&self) -> f64;

    /// Write one `name = value` line per node of `states`.
    fn write_nodes(&self, states: &NodeStates, out: &mut dyn fmt::Write) -> fmt::Result {
        for (i, value) in states.iter().enumerate() {
            let name = self.node_name(NodeIndex(i as u32)).unwrap_or("?");
            writeln!(out, "{name} = {}", u8::from(value))?;
        }
        Ok(())
    }
}
