use bn_core::NodeIndex;
use bn_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CellNetworkError {
    #[error("network initialisation failed: {0}")]
    Engine(#[from] EngineError),

    #[error("node index {index} out of range for a network of {len} nodes")]
    NodeIndexOutOfRange {
        index: NodeIndex,
        len:   usize,
    },

    #[error("network has no node named {0:?}")]
    UnknownNode(String),

    #[error("engine returned {got} node values, expected {expected}")]
    StateLengthChanged {
        expected: usize,
        got:      usize,
    },
}

pub type CellNetworkResult<T> = Result<T, CellNetworkError>;
