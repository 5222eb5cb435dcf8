use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("rule for node {node:?}: {reason}")]
    Rule {
        node:   String,
        reason: String,
    },

    #[error("rule for node {node:?} references unknown node {regulator:?}")]
    UnknownRegulator {
        node:      String,
        regulator: String,
    },

    #[error("network configuration error: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
