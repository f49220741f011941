//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `setup.rs` — list/init: variant discovery and session creation.
//! - `runtime.rs` — update/status/fill/amount against an existing session.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod runtime;
pub mod setup;

pub use runtime::handle_runtime_commands;
pub use setup::handle_setup_commands;
