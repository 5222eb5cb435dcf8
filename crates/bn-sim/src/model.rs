//! The `RegulatoryModel` trait: how a host couples cells to their networks.

use bn_cell::{CellCycleNetwork, CellNetworkResult};
use bn_core::{CellId, CellRng};
use bn_engine::NetworkEngine;

/// Timing of the step being processed, shared by every model callback.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepContext {
    pub step: u64,
    /// Simulated time at the start of the step.
    pub time: f64,
    pub dt:   f64,
}

/// What a cell asks the population to do after its network updated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellIntent {
    /// Split into two cells that inherit the network and restart it.
    Divide,
    /// Leave the population; the network is dropped.
    Remove,
}

/// Pluggable coupling between a cell's environment and its network.
///
/// Both hooks run only for cells whose countdown reached zero this step,
/// around the network update.  Implementations must be `Send + Sync`
/// because the `parallel` feature calls them from Rayon workers; per-cell
/// state belongs in the network or the host, not the model.
pub trait RegulatoryModel<E: NetworkEngine>: Send + Sync {
    /// Write environmental inputs into the network before it updates.
    ///
    /// Default: leaves the nodes as they are.
    fn sense(
        &self,
        _cell:    CellId,
        _ctx:     &StepContext,
        _network: &mut CellCycleNetwork<E>,
        _rng:     &mut CellRng,
    ) -> CellNetworkResult<()> {
        Ok(())
    }

    /// Read the updated outputs and decide what the cell does.
    ///
    /// Default: no intents.
    fn respond(
        &self,
        _cell:    CellId,
        _ctx:     &StepContext,
        _network: &CellCycleNetwork<E>,
        _rng:     &mut CellRng,
    ) -> Vec<CellIntent> {
        vec![]
    }
}

/// A [`RegulatoryModel`] that neither senses nor responds.  Networks still
/// update on their own schedule.
pub struct NoopModel;

impl<E: NetworkEngine> RegulatoryModel<E> for NoopModel {}
