//! blockfall: a terminal falling-block puzzle game (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `blockfall::{core,input,term,types}` and ships the
//! `blockfall` binary.

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_term as term;
pub use blockfall_types as types;
