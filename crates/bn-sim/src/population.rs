//! The `Population` struct and its step loop.

use bn_cell::CellCycleNetwork;
use bn_core::{CellId, CellRng, SimClock, SimConfig};
use bn_engine::{NetworkEngine, NodeStates};

use crate::{CellIntent, RegulatoryModel, SimError, SimObserver, SimResult, StepContext};

/// Outcome of one cell's work in the per-cell phase: `Ok(None)` if its
/// network was not due, `Err` if sensing or the update failed.
type CellOutcome = SimResult<Option<Vec<CellIntent>>>;

/// Every cell's regulatory network plus the loop that advances them.
///
/// `networks[i]` and `rngs[i]` belong to `CellId(i)`.  A cell without a
/// network (never given one, or removed) keeps its slot so ids stay stable.
/// Ids are never recycled: both vectors grow by one slot per division and
/// never shrink, so memory follows the total number of cells ever born, not
/// the live count.
///
/// Create via [`PopulationBuilder`][crate::PopulationBuilder].
pub struct Population<E: NetworkEngine + Clone> {
    /// Global configuration (dt, total time, seed, …).
    pub config: SimConfig,

    /// Step counter; maps to simulated time via `config.dt`.
    pub clock: SimClock,

    /// Per-cell networks, indexed by `CellId`.
    pub networks: Vec<Option<CellCycleNetwork<E>>>,

    /// Per-cell deterministic RNGs, parallel to `networks`.
    pub rngs: Vec<CellRng>,

    /// Network updates performed since the population was built.
    pub total_updates: u64,

    /// Due cells whose sensing or update failed.  Such a cell keeps its
    /// nodes and stays due, so it is retried on the next step.
    pub failed_updates: u64,

    /// Dedicated pool when `config.num_threads` is set; otherwise Rayon's
    /// global pool is used.
    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<E: NetworkEngine + Clone> Population<E> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Number of cell slots, including cells without a network.
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Number of cells that currently own a network.
    pub fn live_count(&self) -> usize {
        self.networks.iter().filter(|n| n.is_some()).count()
    }

    pub fn network(&self, cell: CellId) -> SimResult<&CellCycleNetwork<E>> {
        let len = self.networks.len();
        self.networks
            .get(cell.index())
            .ok_or(SimError::CellOutOfRange { cell, len })?
            .as_ref()
            .ok_or(SimError::NoNetwork(cell))
    }

    pub fn network_mut(&mut self, cell: CellId) -> SimResult<&mut CellCycleNetwork<E>> {
        let len = self.networks.len();
        self.networks
            .get_mut(cell.index())
            .ok_or(SimError::CellOutOfRange { cell, len })?
            .as_mut()
            .ok_or(SimError::NoNetwork(cell))
    }

    /// Give `cell` a network (replacing any it had) and restart it with the
    /// cell's own RNG.
    pub fn attach(&mut self, cell: CellId, mut network: CellCycleNetwork<E>) -> SimResult<()> {
        let len = self.networks.len();
        if cell.index() >= len {
            return Err(SimError::CellOutOfRange { cell, len });
        }
        network.restart_nodes(&mut self.rngs[cell.index()]);
        self.networks[cell.index()] = Some(network);
        Ok(())
    }

    /// Drop `cell`'s network.  The slot stays so other ids are unaffected.
    pub fn remove(&mut self, cell: CellId) -> SimResult<()> {
        let slot = self.slot_mut(cell)?;
        if slot.take().is_none() {
            return Err(SimError::NoNetwork(cell));
        }
        tracing::debug!(%cell, "cell removed");
        Ok(())
    }

    /// Split `parent` in two.
    ///
    /// The daughter gets a copy of the parent's network and the next free
    /// `CellId`.  Both networks are restarted, each drawing its countdown from
    /// its own RNG, so the pair does not update in lockstep afterwards.
    pub fn divide(&mut self, parent: CellId) -> SimResult<CellId> {
        let daughter = CellId::try_from(self.networks.len())
            .map_err(|_| SimError::Config("population exceeds CellId range".to_string()))?;

        let mut child = self.network(parent)?.clone();
        let mut child_rng = CellRng::new(self.config.seed, daughter);
        child.restart_nodes(&mut child_rng);

        let rng = &mut self.rngs[parent.index()];
        if let Some(network) = self.networks[parent.index()].as_mut() {
            network.restart_nodes(rng);
        }

        self.networks.push(Some(child));
        self.rngs.push(child_rng);
        tracing::debug!(%parent, %daughter, "cell divided");
        Ok(daughter)
    }

    /// Run from the current step to `config.total_steps()`.
    pub fn run<M, O>(&mut self, model: &M, observer: &mut O)
    where
        M: RegulatoryModel<E>,
        O: SimObserver,
    {
        let end = self.config.total_steps();
        while self.clock.step < end {
            self.step(model, observer);
        }
        observer.on_sim_end(self.clock.step);
        tracing::info!(
            steps = self.clock.step,
            time = self.clock.current_time(),
            updates = self.total_updates,
            failed = self.failed_updates,
            live = self.live_count(),
            "run finished"
        );
    }

    /// Run exactly `n` steps from the current position (ignores `total_time`).
    pub fn run_steps<M, O>(&mut self, n: u64, model: &M, observer: &mut O)
    where
        M: RegulatoryModel<E>,
        O: SimObserver,
    {
        for _ in 0..n {
            self.step(model, observer);
        }
    }

    /// Process one step.  Returns the number of networks that updated.
    ///
    /// A cell whose sensing or update fails does not stop the step: every
    /// other cell still runs, the failure goes to
    /// [`SimObserver::on_update_failed`] and the clock advances as usual.
    pub fn step<M, O>(&mut self, model: &M, observer: &mut O) -> usize
    where
        M: RegulatoryModel<E>,
        O: SimObserver,
    {
        let ctx = StepContext {
            step: self.clock.step,
            time: self.clock.current_time(),
            dt:   self.clock.dt,
        };
        observer.on_step_start(ctx.step, ctx.time);

        // ── Phases ①–④: per cell, independent ─────────────────────────────
        let outcomes = self.update_cells(&ctx, model);

        // ── Report updates and failures in ascending CellId order ─────────
        let mut fired = 0;
        let mut intents = Vec::with_capacity(outcomes.len());
        for (i, outcome) in outcomes.into_iter().enumerate() {
            let cell = CellId(i as u32);
            match outcome {
                Ok(None) => {}
                Ok(Some(cell_intents)) => {
                    fired += 1;
                    if let Some(network) = &self.networks[i] {
                        observer.on_update(cell, network.get_nodes());
                    }
                    intents.push((cell, cell_intents));
                }
                Err(error) => {
                    self.failed_updates += 1;
                    tracing::warn!(%cell, %error, "network update failed");
                    observer.on_update_failed(cell, &error);
                }
            }
        }
        self.total_updates += fired as u64;

        // ── Phase ⑤: apply intents (sequential) ───────────────────────────
        for (cell, cell_intents) in intents {
            for intent in cell_intents {
                self.apply_intent(cell, intent);
            }
        }

        observer.on_step_end(ctx.step, fired);
        let interval = self.config.output_interval_steps;
        if interval > 0 && ctx.step.is_multiple_of(interval) {
            let states: Vec<Option<&NodeStates>> = self
                .networks
                .iter()
                .map(|n| n.as_ref().map(CellCycleNetwork::get_nodes))
                .collect();
            observer.on_snapshot(ctx.step, &states);
        }

        self.clock.advance();
        fired
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn update_cells<M>(&mut self, ctx: &StepContext, model: &M) -> Vec<CellOutcome>
    where
        M: RegulatoryModel<E>,
    {
        #[cfg(not(feature = "parallel"))]
        {
            self.networks
                .iter_mut()
                .zip(self.rngs.iter_mut())
                .enumerate()
                .map(|(i, (slot, rng))| update_cell(CellId(i as u32), slot, rng, ctx, model))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            // Explicit field borrows so the pool can be read while the
            // per-cell vectors are handed to the workers.
            let networks = &mut self.networks;
            let rngs     = &mut self.rngs;
            let mut work = || {
                networks
                    .par_iter_mut()
                    .zip(rngs.par_iter_mut())
                    .enumerate()
                    .map(|(i, (slot, rng))| update_cell(CellId(i as u32), slot, rng, ctx, model))
                    .collect::<Vec<CellOutcome>>()
            };
            match &self.pool {
                Some(pool) => pool.install(work),
                None => work(),
            }
        }
    }

    fn apply_intent(&mut self, cell: CellId, intent: CellIntent) {
        let result = match intent {
            CellIntent::Divide => self.divide(cell).map(|_| ()),
            CellIntent::Remove => self.remove(cell),
        };
        // A cell that removed itself earlier in its own intent list cannot
        // divide any more; that is the model's choice, not a fatal error.
        if let Err(error) = result {
            tracing::warn!(%cell, ?intent, %error, "intent ignored");
        }
    }

    fn slot_mut(&mut self, cell: CellId) -> SimResult<&mut Option<CellCycleNetwork<E>>> {
        let len = self.networks.len();
        self.networks
            .get_mut(cell.index())
            .ok_or(SimError::CellOutOfRange { cell, len })
    }
}

/// Countdown, and when due: sense, update, respond.
///
/// On failure the network is not stepped and its countdown stays at zero.
fn update_cell<E, M>(
    cell:  CellId,
    slot:  &mut Option<CellCycleNetwork<E>>,
    rng:   &mut CellRng,
    ctx:   &StepContext,
    model: &M,
) -> CellOutcome
where
    E: NetworkEngine,
    M: RegulatoryModel<E>,
{
    let Some(network) = slot.as_mut() else {
        return Ok(None);
    };
    if !network.elapse(ctx.dt) {
        return Ok(None);
    }

    let wrap = |source| SimError::Network { cell, source };
    model.sense(cell, ctx, network, rng).map_err(wrap)?;
    network.run_maboss(rng).map_err(wrap)?;
    Ok(Some(model.respond(cell, ctx, network, rng)))
}
