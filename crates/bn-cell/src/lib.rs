//! `bn-cell` — one cell's regulatory network and its update schedule.
//!
//! # Crate layout
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`network`] | `CellCycleNetwork<E>`                                 |
//! | [`error`]   | `CellNetworkError`, `CellNetworkResult<T>`            |
//!
//! # Scheduling
//!
//! Every cell counts down its own `time_to_update`.  Each time the network
//! is restarted or fires, the countdown is redrawn as
//!
//! ```text
//! time_to_update = (1 + 0.5 * U) * base_period,   U ~ Uniform[-1, 1]
//! ```
//!
//! so a population's updates spread over `[0.5, 1.5] * base_period` instead
//! of landing on the same step.  The host decides when to fire: it calls
//! [`CellCycleNetwork::elapse`] each step and [`CellCycleNetwork::run_maboss`]
//! once the countdown reaches zero.

pub mod error;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{CellNetworkError, CellNetworkResult};
pub use network::{CellCycleNetwork, NodesDisplay};
