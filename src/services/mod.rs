//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `semantics.rs` — field kinds, filled/checked predicates.
//! - `canonical.rs` — field-name normalization and canonicalization.
//! - `router.rs` — variant routing by weighted keyword scoring.
//! - `progress.rs` — completion tracking over priority groups.
//! - `render.rs` — placeholder substitution + alias/amount derivation.
//! - `amount.rs` — uppercase currency phrases.
//! - `storage.rs` — snapshot persistence + audit log.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod amount;
pub mod canonical;
pub mod output;
pub mod progress;
pub mod render;
pub mod router;
pub mod semantics;
pub mod storage;
