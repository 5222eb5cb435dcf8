use bn_cell::CellNetworkError;
use bn_core::{CellId, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0} has no regulatory network")]
    NoNetwork(CellId),

    #[error("{cell} is outside a population of {len} cells")]
    CellOutOfRange {
        cell: CellId,
        len:  usize,
    },

    #[error("could not initialise the network shared by all cells: {0}")]
    Template(#[source] CellNetworkError),

    #[error("{cell}: {source}")]
    Network {
        cell:   CellId,
        #[source]
        source: CellNetworkError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
