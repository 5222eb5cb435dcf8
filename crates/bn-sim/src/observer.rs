//! Simulation observer trait for progress reporting and data collection.

use bn_core::CellId;
use bn_engine::NodeStates;

use crate::SimError;

/// Callbacks invoked by [`Population::run`][crate::Population::run] at key
/// points in the step loop.
///
/// All methods have default no-op implementations.
///
/// # Example: activity counter
///
/// ```rust,ignore
/// struct Proliferating { node: NodeIndex, count: usize }
///
/// impl SimObserver for Proliferating {
///     fn on_update(&mut self, _cell: CellId, nodes: &NodeStates) {
///         if nodes.get(self.node) == Some(true) {
///             self.count += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step.
    fn on_step_start(&mut self, _step: u64, _time: f64) {}

    /// Called once per network update, in ascending `CellId` order, with the
    /// node values the update produced.
    fn on_update(&mut self, _cell: CellId, _nodes: &NodeStates) {}

    /// Called, in the same order, for each due cell whose sensing or update
    /// failed.  The cell is retried on the next step.
    fn on_update_failed(&mut self, _cell: CellId, _error: &SimError) {}

    /// Called at the end of each step with the number of networks updated.
    fn on_step_end(&mut self, _step: u64, _fired: usize) {}

    /// Called every `config.output_interval_steps` steps with every cell's
    /// current node values (`None` for cells without a network).
    fn on_snapshot(&mut self, _step: u64, _states: &[Option<&NodeStates>]) {}

    /// Called once after the final step.
    fn on_sim_end(&mut self, _final_step: u64) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
