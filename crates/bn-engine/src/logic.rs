//! `LogicEngine`: a small deterministic Boolean network engine.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bn_core::NodeIndex;

use crate::{EngineError, EngineResult, Expr, NetworkEngine, NetworkSource, NodeStates};

// ── UpdateMode ────────────────────────────────────────────────────────────────

/// How one [`step`](NetworkEngine::step) applies the update rules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Every rule reads the state as it was before the step.
    #[default]
    Synchronous,
    /// Rules are applied in node order; later nodes see earlier updates.
    Sequential,
}

impl FromStr for UpdateMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "synchronous" => Ok(Self::Synchronous),
            "sequential" => Ok(Self::Sequential),
            other => Err(EngineError::Config(format!(
                "invalid update_mode {other:?}: expected \"synchronous\" or \"sequential\""
            ))),
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Synchronous => "synchronous",
            Self::Sequential => "sequential",
        };
        f.write_str(s)
    }
}

// ── LogicEngine ───────────────────────────────────────────────────────────────

/// Boolean network with one optional rule per node.
///
/// Nodes without a rule are inputs: a step leaves their value untouched, so
/// whatever the host wrote into the state vector carries through.
///
/// Build with [`load_logic_engine`][crate::load_logic_engine] or through
/// [`NetworkEngine::init`].
#[derive(Clone, Debug)]
pub struct LogicEngine {
    names:       Vec<String>,
    lookup:      HashMap<String, NodeIndex>,
    rules:       Vec<Option<Expr>>,
    initial:     NodeStates,
    time_step:   f64,
    mode:        UpdateMode,
    steps_taken: u64,
}

impl LogicEngine {
    /// Assemble an engine from already-validated parts.
    pub(crate) fn from_parts(
        names:     Vec<String>,
        rules:     Vec<Option<Expr>>,
        initial:   NodeStates,
        time_step: f64,
        mode:      UpdateMode,
    ) -> Self {
        let lookup = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), NodeIndex(i as u32)))
            .collect();
        Self { names, lookup, rules, initial, time_step, mode, steps_taken: 0 }
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// Number of steps this engine has performed.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// `true` if `index` names a node without an update rule.
    pub fn is_input(&self, index: NodeIndex) -> bool {
        index.index() < self.rules.len() && self.rules[index.index()].is_none()
    }
}

impl NetworkEngine for LogicEngine {
    fn init(topology: &NetworkSource, config: &NetworkSource) -> EngineResult<Self> {
        let engine = crate::loader::load_logic_engine(topology.open()?, config.open()?)?;
        tracing::debug!(
            %topology,
            %config,
            nodes = engine.node_count(),
            time_step = engine.time_step,
            mode = %engine.mode,
            "logic engine initialised"
        );
        Ok(engine)
    }

    fn node_count(&self) -> usize {
        self.names.len()
    }

    fn initial_state(&self) -> NodeStates {
        self.initial.clone()
    }

    fn step(&mut self, state: &NodeStates) -> NodeStates {
        debug_assert_eq!(state.len(), self.names.len(), "state vector length mismatch");
        self.steps_taken += 1;

        match self.mode {
            UpdateMode::Synchronous => {
                let old = state.as_slice();
                self.rules
                    .iter()
                    .enumerate()
                    .map(|(i, rule)| rule.as_ref().map_or(old[i], |r| r.eval(old)))
                    .collect()
            }
            UpdateMode::Sequential => {
                let mut next = state.as_slice().to_vec();
                for (i, rule) in self.rules.iter().enumerate() {
                    if let Some(rule) = rule {
                        next[i] = rule.eval(&next);
                    }
                }
                NodeStates::from_vec(next)
            }
        }
    }

    fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.lookup.get(name).copied()
    }

    fn node_name(&self, index: NodeIndex) -> Option<&str> {
        self.names.get(index.index()).map(String::as_str)
    }

    fn update_time_step(&self) -> f64 {
        self.time_step
    }
}
