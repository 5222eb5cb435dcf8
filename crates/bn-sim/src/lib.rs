//! `bn-sim` — population step loop for per-cell regulatory networks.
//!
//! # Step loop
//!
//! ```text
//! for step in 0..config.total_steps():
//!   ① Countdown: every cell with a network calls elapse(dt).
//!   ② Sense:     for due cells, RegulatoryModel::sense writes inputs.
//!   ③ Update:    run_maboss steps the network and redraws its countdown.
//!   ④ Respond:   RegulatoryModel::respond reads outputs → CellIntents.
//!                 (①–④ run per cell, in parallel with the `parallel` feature)
//!   ⑤ Apply:     intents in ascending CellId order:
//!                   Divide → clone network, restart parent and daughter
//!                   Remove → drop the cell's network
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Run ①–④ on Rayon's thread pool                         |

pub mod builder;
pub mod error;
pub mod model;
pub mod observer;
pub mod population;


pub use builder::PopulationBuilder;
pub use error::{SimError, SimResult};
pub use model::{CellIntent, NoopModel, RegulatoryModel, StepContext};
pub use observer::{NoopObserver, SimObserver};
pub use population::Population;
