//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep snapshot/report structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — snapshot, report and output structs.
//! - `constants.rs` — stable constants and named tunables.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and the on-disk
//! snapshot schema. Keep schema-impacting changes explicit.

pub mod constants;
pub mod models;
