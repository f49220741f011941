//! Shared data model layer (structs only).
//!
//! Domain types are data-only: no filesystem side effects. Changes here
//! affect `--json` outputs and the on-disk snapshot schema; keep them
//! explicit and reviewable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// A raw field value as stored in the snapshot: free text or a checkbox
/// boolean. Untagged so the JSON shape stays `string|bool`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Flag(_) => None,
        }
    }

}

pub type FieldValues = BTreeMap<String, FieldValue>;

/// One priority-ordered bundle of related fields. The same shape serves
/// the static variant config and the per-session snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpec {
    pub description: String,
    pub priority: u32,
    pub ask: String,
    pub fields: Vec<String>,
}

/// Persisted session state. One session per snapshot file; the schema is
/// a stable external contract.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContractState {
    pub contract_type: String,
    pub contract_name: String,
    pub contract_code: String,
    pub template_path: String,
    pub total_placeholders: usize,
    pub checkbox_count: usize,
    pub text_count: usize,
    pub all_placeholders: Vec<String>,
    pub groups: BTreeMap<String, GroupSpec>,
    #[serde(default)]
    pub ungrouped: Vec<String>,
    #[serde(default)]
    pub field_values: FieldValues,
}

#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub selected: Option<String>,
    pub scores: BTreeMap<String, i64>,
    pub ambiguous: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GroupProgress {
    pub filled: usize,
    pub total: usize,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct ProgressReport {
    pub filled: usize,
    pub total: usize,
    pub percentage: f64,
    pub groups: BTreeMap<String, GroupProgress>,
}

/// Result of mapping user-supplied field names onto canonical ones.
/// `resolved` is only safe to commit when `unknown` is empty.
#[derive(Debug, Default)]
pub struct Canonicalization {
    pub resolved: FieldValues,
    pub unknown: Vec<String>,
    pub suggestions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct NextGroup {
    pub name: String,
    pub ask: String,
    pub unfilled: Vec<String>,
}

#[derive(Serialize)]
pub struct UpdateOutcome {
    pub updated: usize,
    pub progress: ProgressReport,
    pub unfilled_count: usize,
    pub next_group: Option<NextGroup>,
}

#[derive(Serialize)]
pub struct DeleteOutcome {
    pub deleted: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Serialize)]
pub struct StatusReport {
    pub contract_name: String,
    pub progress: ProgressReport,
    pub unfilled: Vec<String>,
    pub next_group: Option<NextGroup>,
}

#[derive(Serialize)]
pub struct CheckReport {
    pub complete: bool,
    pub unfilled: Vec<String>,
}

#[derive(Serialize)]
pub struct FillReport {
    pub output: String,
    pub replaced: usize,
    pub unresolved: Vec<String>,
    pub forced: bool,
}

/// Catalog entry summary for `list` output.
#[derive(Serialize)]
pub struct VariantInfo {
    pub key: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub parties: Vec<String>,
    pub articles: u32,
}
