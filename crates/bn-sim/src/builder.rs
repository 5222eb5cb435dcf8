//! Fluent builder for constructing a [`Population`].

use std::marker::PhantomData;

use bn_cell::CellCycleNetwork;
use bn_core::{CellId, CellRng, SimConfig};
use bn_engine::{NetworkEngine, NetworkSource};

use crate::{Population, SimError, SimResult};

/// Fluent builder for [`Population<E>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: dt, total time, seed, …
/// - cell count
/// - topology and configuration [`NetworkSource`]s shared by every cell
///
/// # Optional inputs
///
/// | Method                  | Default                          |
/// |-------------------------|----------------------------------|
/// | `.without_network(c)`   | every cell gets a network        |
///
/// # Example
///
/// ```rust,ignore
/// let mut population = PopulationBuilder::<LogicEngine>::new(config, 1_000, topology, network_config)
///     .without_network(CellId(0))
///     .build()?;
/// population.run(&NoopModel, &mut NoopObserver);
/// ```
pub struct PopulationBuilder<E: NetworkEngine + Clone> {
    config:         SimConfig,
    cell_count:     usize,
    topology:       NetworkSource,
    network_config: NetworkSource,
    without:        Vec<CellId>,
    _engine:        PhantomData<E>,
}

impl<E: NetworkEngine + Clone> PopulationBuilder<E> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:         SimConfig,
        cell_count:     usize,
        topology:       NetworkSource,
        network_config: NetworkSource,
    ) -> Self {
        Self {
            config,
            cell_count,
            topology,
            network_config,
            without: Vec::new(),
            _engine: PhantomData,
        }
    }

    /// Leave `cell` without a regulatory network.  It can be given one later
    /// with [`Population::attach`].
    pub fn without_network(mut self, cell: CellId) -> Self {
        self.without.push(cell);
        self
    }

    /// Validate inputs, initialise the networks, and return a ready-to-run
    /// [`Population`].
    ///
    /// The sources are read once; every cell receives its own copy of the
    /// resulting engine and restarts it with its own RNG, so initial
    /// countdowns are spread over `[0.5, 1.5]` base periods.
    pub fn build(self) -> SimResult<Population<E>> {
        self.config.validate()?;

        let n = self.cell_count;
        if u32::try_from(n).is_err() {
            return Err(SimError::Config(format!("{n} cells exceed the CellId range")));
        }
        if let Some(&cell) = self.without.iter().find(|c| c.index() >= n) {
            return Err(SimError::CellOutOfRange { cell, len: n });
        }

        let template = CellCycleNetwork::<E>::initialize_boolean_network(
            &self.topology,
            &self.network_config,
        )
        .map_err(SimError::Template)?;

        let mut rngs: Vec<CellRng> = (0..n as u32)
            .map(|i| CellRng::new(self.config.seed, CellId(i)))
            .collect();

        let mut without = vec![false; n];
        for cell in &self.without {
            without[cell.index()] = true;
        }

        let networks: Vec<Option<CellCycleNetwork<E>>> = rngs
            .iter_mut()
            .zip(without)
            .map(|(rng, skip)| {
                (!skip).then(|| {
                    let mut network = template.clone();
                    network.restart_nodes(rng);
                    network
                })
            })
            .collect();

        tracing::info!(
            cells = n,
            with_network = networks.iter().filter(|slot| slot.is_some()).count(),
            nodes = template.node_count(),
            base_period = template.base_update_period(),
            topology = %self.topology,
            "population built"
        );

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| SimError::Config(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Population {
            clock:          self.config.make_clock(),
            config:         self.config,
            networks,
            rngs,
            total_updates:  0,
            failed_updates: 0,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
