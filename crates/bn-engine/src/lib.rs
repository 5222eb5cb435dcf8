//! `bn-engine` — the Boolean network engine contract and a reference engine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`states`] | `NodeStates`, a fixed-length node value vector              |
//! | [`source`] | `NetworkSource`, a file path or inline text                   |
//! | [`engine`] | `NetworkEngine` trait                                         |
//! | [`expr`]   | `Expr`, Boolean update rules and their parser                |
//! | [`logic`]  | `LogicEngine`, `UpdateMode`                                   |
//! | [`loader`] | `load_logic_engine`, CSV formats for topology and config      |
//! | [`error`]  | `EngineError`, `EngineResult<T>`                              |
//!
//! Anything that can turn a topology plus a configuration into a stepping
//! network can sit behind [`NetworkEngine`].  [`LogicEngine`] is the small
//! deterministic implementation shipped with the workspace.

pub mod engine;
pub mod error;
pub mod expr;
pub mod loader;
pub mod logic;
pub mod source;
pub mod states;


pub use engine::NetworkEngine;
pub use error::{EngineError, EngineResult};
pub use expr::Expr;
pub use loader::load_logic_engine;
pub use logic::{LogicEngine, UpdateMode};
pub use source::NetworkSource;
pub use states::NodeStates;
