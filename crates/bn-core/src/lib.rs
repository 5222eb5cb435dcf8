//! `bn-core` — foundational types for the `bn-*` regulatory network workspace.
//!
//! This crate is a dependency of every other `bn-*` crate.  It has no `bn-*`
//! dependencies and only `rand` and `thiserror` externally, plus optional
//! `serde`.
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `CellId`, `NodeIndex`                                     |
//! | [`time`]  | `SimClock`, `SimConfig`                                   |
//! | [`rng`]   | `UniformSource`, `CellRng` (per-cell)                     |
//! | [`error`] | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{CellId, NodeIndex};
pub use rng::{CellRng, UniformSource};
pub use time::{SimClock, SimConfig};
