//! Variant routing: score free-text intent against the catalog's
//! keyword/name/code tables.

use crate::catalog::Catalog;
use crate::domain::constants::{AMBIGUITY_SCORE_GAP, EXACT_MATCH_BONUS};
use crate::domain::models::RouteReport;
use crate::services::canonical::normalize_field_name;
use std::collections::BTreeMap;

/// Score the input against every variant and pick a winner.
///
/// An exact display-name, code or key mention earns a fixed bonus and
/// always resolves, even with a narrow margin over the runner-up. Without
/// an exact hit, a top-two gap within `AMBIGUITY_SCORE_GAP` is reported
/// as ambiguous with no selection. No scoring variant at all is the
/// distinct "unrecognized" outcome (`selected: None, ambiguous: false`).
pub fn route(user_text: &str, catalog: &Catalog) -> RouteReport {
    let lowered = user_text.to_lowercase();
    let normalized = normalize_field_name(user_text);

    // (key, score, exact-bonus fired), in catalog order.
    let mut scored: Vec<(&str, i64, bool)> = Vec::new();
    for v in catalog.variants() {
        let mut score = 0i64;
        let mut exact = false;
        if normalized.contains(&normalize_field_name(&v.name))
            || normalized.contains(&normalize_field_name(&v.code))
        {
            score += EXACT_MATCH_BONUS;
            exact = true;
        }
        if lowered.contains(&v.key) {
            score += EXACT_MATCH_BONUS;
            exact = true;
        }
        for kw in &v.keywords {
            let kw_norm = normalize_field_name(kw);
            if user_text.contains(kw.as_str())
                || (!kw_norm.is_empty() && normalized.contains(&kw_norm))
            {
                // Longer, more specific keywords contribute more.
                score += kw_norm.chars().count() as i64;
            }
        }
        if score > 0 {
            scored.push((&v.key, score, exact));
        }
    }

    let scores: BTreeMap<String, i64> = scored
        .iter()
        .map(|(k, s, _)| (k.to_string(), *s))
        .collect();

    if scored.is_empty() {
        return RouteReport {
            selected: None,
            scores,
            ambiguous: false,
        };
    }

    // First-in-catalog wins exact ties, keeping the result deterministic.
    let top = scored
        .iter()
        .copied()
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .unwrap_or(scored[0]);
    let runner_up = scored
        .iter()
        .filter(|(k, _, _)| *k != top.0)
        .map(|(_, s, _)| *s)
        .max();

    if let Some(second) = runner_up {
        if top.1 - second <= AMBIGUITY_SCORE_GAP && !top.2 {
            return RouteReport {
                selected: None,
                scores,
                ambiguous: true,
            };
        }
    }

    RouteReport {
        selected: Some(top.0.to_string()),
        scores,
        ambiguous: false,
    }
}
