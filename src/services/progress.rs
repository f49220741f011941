//! Completion tracking over a taxonomy's priority-ordered groups.

use crate::domain::models::{FieldValues, GroupProgress, GroupSpec, ProgressReport};
use crate::services::semantics::is_filled;
use std::collections::BTreeMap;

/// Groups in presentation order: ascending priority, name as tiebreak.
pub fn sorted_groups<'a>(
    groups: &'a BTreeMap<String, GroupSpec>,
) -> Vec<(&'a String, &'a GroupSpec)> {
    let mut out: Vec<_> = groups.iter().collect();
    out.sort_by_key(|(name, g)| (g.priority, name.as_str()));
    out
}

/// Flattened field list in taxonomy order. Callers rely on this order
/// for user-facing prompts.
pub fn all_fields(groups: &BTreeMap<String, GroupSpec>) -> Vec<String> {
    sorted_groups(groups)
        .into_iter()
        .flat_map(|(_, g)| g.fields.iter().cloned())
        .collect()
}

pub fn progress(values: &FieldValues, groups: &BTreeMap<String, GroupSpec>) -> ProgressReport {
    let fields = all_fields(groups);
    let total = fields.len();
    let filled = fields.iter().filter(|f| is_filled(f, values)).count();

    let mut per_group = BTreeMap::new();
    for (name, g) in groups {
        let g_total = g.fields.len();
        let g_filled = g.fields.iter().filter(|f| is_filled(f, values)).count();
        per_group.insert(
            name.clone(),
            GroupProgress {
                filled: g_filled,
                total: g_total,
                complete: g_filled == g_total,
            },
        );
    }

    let percentage = if total > 0 {
        (filled as f64 / total as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };
    ProgressReport {
        filled,
        total,
        percentage,
        groups: per_group,
    }
}

/// Unfilled fields in taxonomy order, optionally restricted to one group.
pub fn unfilled_fields(
    values: &FieldValues,
    groups: &BTreeMap<String, GroupSpec>,
    group: Option<&str>,
) -> Vec<String> {
    let fields = match group {
        Some(name) => groups
            .get(name)
            .map(|g| g.fields.clone())
            .unwrap_or_default(),
        None => all_fields(groups),
    };
    fields
        .into_iter()
        .filter(|f| !is_filled(f, values))
        .collect()
}

/// First group in ascending priority with any unfilled field. `None`
/// only when every group is complete, so callers get a stable "what to
/// ask next" signal even when fields arrive out of order.
pub fn next_unfilled_group(
    values: &FieldValues,
    groups: &BTreeMap<String, GroupSpec>,
) -> Option<String> {
    sorted_groups(groups)
        .into_iter()
        .find(|(_, g)| g.fields.iter().any(|f| !is_filled(f, values)))
        .map(|(name, _)| name.clone())
}
