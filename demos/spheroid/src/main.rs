//! spheroid — tumour spheroid growth driven by per-cell fate networks.
//!
//! Every cell carries a six-node Boolean network (Oxygen, Contact, Growth,
//! Apoptosis, Migration, Proliferation).  Oxygen and contact are sensed from
//! how crowded the spheroid is; proliferating cells divide and apoptotic
//! cells leave.  Each network updates on its own jittered countdown, so
//! cells seeded together drift apart in phase.
//!
//! Run with:
//!   cargo run -p spheroid --release [-- path/to/run.json]
//!
//! Set `RUST_LOG=debug` for per-step logging.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bn_cell::{CellCycleNetwork, CellNetworkResult};
use bn_core::{CellId, CellRng, NodeIndex, SimConfig};
use bn_engine::{LogicEngine, NetworkEngine, NetworkSource, NodeStates};
use bn_sim::{
    CellIntent, PopulationBuilder, RegulatoryModel, SimObserver, StepContext,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const INITIAL_CELLS: usize = 64;
const CAPACITY:      usize = 2_000;
const SEED:          u64   = 42;

const TOPOLOGY_CSV: &str = include_str!("../data/spheroid.csv");
const NETWORK_CFG:  &str = include_str!("../data/spheroid_config.csv");

// ── Model ─────────────────────────────────────────────────────────────────────

/// Node handles resolved once from the template network.  Missing outputs
/// are tolerated so the same model runs against trimmed-down networks.
struct SpheroidModel {
    oxygen:        Option<NodeIndex>,
    contact:       Option<NodeIndex>,
    apoptosis:     Option<NodeIndex>,
    proliferation: Option<NodeIndex>,
    /// Live cells / capacity, refreshed by the driver before each step.
    crowding: f64,
}

impl SpheroidModel {
    fn new(template: &CellCycleNetwork<LogicEngine>) -> Self {
        Self {
            oxygen:        template.get_maboss_node_index("Oxygen"),
            contact:       template.get_maboss_node_index("Contact"),
            apoptosis:     template.get_maboss_node_index("Apoptosis"),
            proliferation: template.get_maboss_node_index("Proliferation"),
            crowding:      0.0,
        }
    }

    fn active(network: &CellCycleNetwork<LogicEngine>, node: Option<NodeIndex>) -> bool {
        node.and_then(|idx| network.node_value(idx)).unwrap_or(false)
    }
}

impl RegulatoryModel<LogicEngine> for SpheroidModel {
    fn sense(
        &self,
        _cell:   CellId,
        _ctx:    &StepContext,
        network: &mut CellCycleNetwork<LogicEngine>,
        rng:     &mut CellRng,
    ) -> CellNetworkResult<()> {
        let crowding = self.crowding.clamp(0.0, 1.0);
        // The core goes hypoxic as the spheroid fills up.
        if let Some(idx) = self.oxygen {
            network.set_node_value(idx, rng.gen_bool(1.0 - 0.8 * crowding))?;
        }
        if let Some(idx) = self.contact {
            network.set_node_value(idx, rng.gen_bool(crowding))?;
        }
        Ok(())
    }

    fn respond(
        &self,
        _cell:   CellId,
        _ctx:    &StepContext,
        network: &CellCycleNetwork<LogicEngine>,
        _rng:    &mut CellRng,
    ) -> Vec<CellIntent> {
        if Self::active(network, self.apoptosis) {
            vec![CellIntent::Remove]
        } else if Self::active(network, self.proliferation) && self.crowding < 1.0 {
            vec![CellIntent::Divide]
        } else {
            vec![]
        }
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct GrowthObserver {
    updates:       u64,
    proliferating: u64,
    snapshots:     u64,
    prolif_idx:    Option<NodeIndex>,
}

impl SimObserver for GrowthObserver {
    fn on_update(&mut self, _cell: CellId, nodes: &NodeStates) {
        self.updates += 1;
        if self.prolif_idx.and_then(|idx| nodes.get(idx)).unwrap_or(false) {
            self.proliferating += 1;
        }
    }

    fn on_snapshot(&mut self, step: u64, states: &[Option<&NodeStates>]) {
        self.snapshots += 1;
        let live = states.iter().flatten().count();
        let active: usize = states.iter().flatten().map(|s| s.count_active()).sum();
        info!(step, live, active_nodes = active, "snapshot");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(SimConfig {
            dt:                    6.0,
            total_time:            4_320.0, // three days, in minutes
            seed:                  SEED,
            num_threads:           None,
            output_interval_steps: 60,
        }),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref().map(Path::new))?;
    println!("=== spheroid — per-cell fate networks ===");
    println!(
        "Cells: {INITIAL_CELLS}  |  Capacity: {CAPACITY}  |  dt: {}  |  Steps: {}",
        config.dt,
        config.total_steps()
    );
    println!();

    // 1. Template network, used to resolve node handles for the model.
    let topology = NetworkSource::inline(TOPOLOGY_CSV);
    let network_cfg = NetworkSource::inline(NETWORK_CFG);
    let template =
        CellCycleNetwork::<LogicEngine>::initialize_boolean_network(&topology, &network_cfg)?;
    let engine = template.engine();
    let inputs: Vec<&str> = (0..engine.node_count() as u32)
        .map(NodeIndex)
        .filter(|&idx| engine.is_input(idx))
        .filter_map(|idx| engine.node_name(idx))
        .collect();
    println!(
        "Network: {} nodes ({} update), period {}, inputs: {}",
        template.node_count(),
        engine.mode(),
        template.base_update_period(),
        inputs.join(", ")
    );

    // 2. Population, every cell with its own copy of the network.
    let mut population =
        PopulationBuilder::<LogicEngine>::new(config.clone(), INITIAL_CELLS, topology, network_cfg)
            .build()?;

    let mut model = SpheroidModel::new(&template);
    let mut obs = GrowthObserver {
        prolif_idx: model.proliferation,
        ..Default::default()
    };

    // 3. Run, refreshing crowding between steps.
    let t0 = Instant::now();
    let total = config.total_steps();
    while population.clock.step < total {
        model.crowding = population.live_count() as f64 / CAPACITY as f64;
        population.step(&model, &mut obs);
        if population.live_count() == 0 {
            info!(step = population.clock.step, "spheroid died out");
            break;
        }
    }
    obs.on_sim_end(population.clock.step);
    let elapsed = t0.elapsed();

    // 4. Summary.
    let engine_steps: u64 = population
        .networks
        .iter()
        .flatten()
        .map(|n| n.engine().steps_taken())
        .sum();
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  live cells      : {}", population.live_count());
    println!("  cell slots      : {}", population.len());
    println!("  network updates : {}", obs.updates);
    println!("  failed updates  : {}", population.failed_updates);
    println!("  engine steps    : {engine_steps} (live cells, incl. inherited)");
    println!("  proliferating   : {}", obs.proliferating);
    println!("  snapshots       : {}", obs.snapshots);
    println!();

    // 5. One surviving cell's nodes.
    let survivor = population
        .networks
        .iter()
        .position(Option::is_some)
        .map(|i| CellId(i as u32));
    if let Some(cell) = survivor {
        let network = population.network(cell)?;
        println!("{cell}, next update in {:.2}:", network.get_time_to_update());
        network.print_nodes();
    }

    Ok(())
}
