//! CSV loaders for [`LogicEngine`].
//!
//! # Topology format
//!
//! One row per node.  Row order defines the node indices.  An empty or
//! missing `rule` marks an input node.  Lines starting with `#` are comments.
//!
//! ```csv
//! node,initial,rule
//! Oxygen,1,
//! Growth,0,Oxygen & !Apoptosis
//! Apoptosis,0,!Oxygen
//! Proliferation,0,Growth
//! ```
//!
//! # Configuration format
//!
//! ```csv
//! key,value
//! time_step,12
//! update_mode,sequential
//! Growth.istate,1
//! ```
//!
//! | Key             | Meaning                                               |
//! |-----------------|-------------------------------------------------------|
//! | `time_step`     | base period between updates (required, > 0)           |
//! | `update_mode`   | `synchronous` (default) or `sequential`               |
//! | `<Node>.istate` | `0`/`1`, overrides the node's `initial` column        |

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use bn_core::NodeIndex;

use crate::expr::RuleError;
use crate::{EngineError, EngineResult, Expr, LogicEngine, NodeStates, UpdateMode};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node:    String,
    initial: u8,
    #[serde(default)]
    rule:    String,
}

#[derive(Deserialize)]
struct ConfigRecord {
    key:   String,
    value: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Build a [`LogicEngine`] from a topology and a configuration reader.
pub fn load_logic_engine<T: Read, C: Read>(topology: T, config: C) -> EngineResult<LogicEngine> {
    let nodes = read_nodes(topology)?;
    if nodes.is_empty() {
        return Err(EngineError::Config("network defines no nodes".to_string()));
    }

    let mut lookup: HashMap<&str, NodeIndex> = HashMap::with_capacity(nodes.len());
    for (i, n) in nodes.iter().enumerate() {
        if lookup.insert(n.node.as_str(), NodeIndex(i as u32)).is_some() {
            return Err(EngineError::Config(format!("node {:?} defined twice", n.node)));
        }
    }

    let mut initial = Vec::with_capacity(nodes.len());
    for n in &nodes {
        initial.push(parse_bit(n.initial, &n.node)?);
    }

    let rules = nodes
        .iter()
        .map(|n| parse_rule(&n.node, &n.rule, &lookup))
        .collect::<EngineResult<Vec<_>>>()?;

    // ── Configuration ─────────────────────────────────────────────────────
    let mut time_step = None;
    let mut mode = UpdateMode::default();

    for row in read_config(config)? {
        match row.key.as_str() {
            "time_step" => time_step = Some(parse_time_step(&row.value)?),
            "update_mode" => mode = row.value.parse()?,
            key => match key.strip_suffix(".istate") {
                Some(name) => {
                    let index = lookup.get(name).ok_or_else(|| {
                        EngineError::Config(format!("istate for unknown node {name:?}"))
                    })?;
                    let bit = row.value.parse::<u8>().map_err(|_| {
                        EngineError::Config(format!(
                            "istate for {name:?} must be 0 or 1, got {:?}",
                            row.value
                        ))
                    })?;
                    initial[index.index()] = parse_bit(bit, name)?;
                }
                None => {
                    return Err(EngineError::Config(format!("unknown configuration key {key:?}")));
                }
            },
        }
    }

    let time_step = time_step
        .ok_or_else(|| EngineError::Config("missing required key \"time_step\"".to_string()))?;

    let names = nodes.iter().map(|n| n.node.clone()).collect();
    Ok(LogicEngine::from_parts(names, rules, NodeStates::from_vec(initial), time_step, mode))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(reader)
}

fn read_nodes<R: Read>(reader: R) -> EngineResult<Vec<NodeRecord>> {
    csv_reader(reader)
        .deserialize::<NodeRecord>()
        .map(|row| row.map_err(|e| EngineError::Parse(e.to_string())))
        .collect()
}

fn read_config<R: Read>(reader: R) -> EngineResult<Vec<ConfigRecord>> {
    csv_reader(reader)
        .deserialize::<ConfigRecord>()
        .map(|row| row.map_err(|e| EngineError::Parse(e.to_string())))
        .collect()
}

fn parse_bit(bit: u8, node: &str) -> EngineResult<bool> {
    match bit {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(EngineError::Config(format!(
            "initial value of {node:?} must be 0 or 1, got {other}"
        ))),
    }
}

fn parse_time_step(value: &str) -> EngineResult<f64> {
    match value.parse::<f64>() {
        Ok(t) if t.is_finite() && t > 0.0 => Ok(t),
        _ => Err(EngineError::Config(format!(
            "time_step must be a finite positive number, got {value:?}"
        ))),
    }
}

fn parse_rule(
    node:   &str,
    rule:   &str,
    lookup: &HashMap<&str, NodeIndex>,
) -> EngineResult<Option<Expr>> {
    if rule.is_empty() {
        return Ok(None);
    }
    Expr::parse(rule, |name| lookup.get(name).copied())
        .map(Some)
        .map_err(|e| match e {
            RuleError::Syntax(reason) => EngineError::Rule { node: node.to_string(), reason },
            RuleError::UnknownNode(regulator) => {
                EngineError::UnknownRegulator { node: node.to_string(), regulator }
            }
        })
}
