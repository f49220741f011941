//! Field-name canonicalization: map user-supplied labels onto the exact
//! names declared by the active taxonomy, refusing to guess.

use crate::domain::constants::{FUZZY_SIMILARITY_FLOOR, MAX_SUGGESTIONS};
use crate::domain::models::{Canonicalization, FieldValues};
use std::collections::BTreeMap;

/// Normalize a field name for matching: trim, lowercase, and drop
/// whitespace, underscores, dashes and half/full-width punctuation.
pub fn normalize_field_name(name: &str) -> String {
    const STRIPPED: &[char] = &[
        '_', '-', '（', '）', '(', ')', '【', '】', '[', ']', '，', '。', '！', '？', '、', '；',
        '：', ',', '.', '!', '?', ';', ':',
    ];
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !STRIPPED.contains(c))
        .collect()
}

/// Resolve a batch of raw-name updates against the valid field set.
///
/// Exact names win immediately. Otherwise the normalized index decides:
/// one hit resolves, several hits are rejected as ambiguous with all
/// candidates surfaced, none falls through to ranked fuzzy suggestions.
/// Resolution is all-or-nothing per call: callers must not commit
/// `resolved` while `unknown` is non-empty.
pub fn canonicalize_updates(updates: &FieldValues, valid_fields: &[String]) -> Canonicalization {
    let mut normalized_index: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for f in valid_fields {
        normalized_index
            .entry(normalize_field_name(f))
            .or_default()
            .push(f);
    }

    let mut out = Canonicalization::default();

    for (raw_key, value) in updates {
        if valid_fields.iter().any(|f| f == raw_key) {
            out.resolved.insert(raw_key.clone(), value.clone());
            continue;
        }

        let candidates = normalized_index
            .get(&normalize_field_name(raw_key))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        match candidates {
            [single] => {
                out.resolved.insert((*single).to_string(), value.clone());
            }
            [] => {
                let similar = fuzzy_suggestions(raw_key, valid_fields);
                out.unknown.push(raw_key.clone());
                if !similar.is_empty() {
                    out.suggestions.insert(raw_key.clone(), similar);
                }
            }
            many => {
                // Ambiguous mapping: surface every candidate, never guess.
                out.unknown.push(raw_key.clone());
                out.suggestions.insert(
                    raw_key.clone(),
                    many.iter()
                        .take(MAX_SUGGESTIONS)
                        .map(|s| s.to_string())
                        .collect(),
                );
            }
        }
    }

    out
}

fn fuzzy_suggestions(raw: &str, valid_fields: &[String]) -> Vec<String> {
    let mut scored: Vec<(f64, &String)> = valid_fields
        .iter()
        .map(|f| (strsim::normalized_levenshtein(raw, f), f))
        .filter(|(sim, _)| *sim >= FUZZY_SIMILARITY_FLOOR)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, f)| f.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::FieldValue;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn updates(pairs: &[(&str, &str)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn exact_name_passes_through_unchanged() {
        let valid = fields(&["甲方名称", "乙方名称"]);
        let got = canonicalize_updates(&updates(&[("甲方名称", "公司A")]), &valid);
        assert!(got.unknown.is_empty());
        assert!(got.suggestions.is_empty());
        assert!(got.resolved.contains_key("甲方名称"));
    }

    #[test]
    fn punctuation_noise_resolves_to_canonical() {
        let valid = fields(&["甲方证件号码", "乙方证件号码"]);
        let got = canonicalize_updates(&updates(&[("甲方_证件号码", "911101X")]), &valid);
        assert!(got.unknown.is_empty());
        assert_eq!(
            got.resolved.keys().collect::<Vec<_>>(),
            vec!["甲方证件号码"]
        );

        let got = canonicalize_updates(&updates(&[("甲方（证件号码）", "911101X")]), &valid);
        assert!(got.resolved.contains_key("甲方证件号码"));
    }

    #[test]
    fn ambiguous_normalization_is_rejected_with_candidates() {
        // Both normalize to the same key once punctuation is stripped.
        let valid = fields(&["甲方名称", "甲方（名称）"]);
        let got = canonicalize_updates(&updates(&[("甲方 名称", "公司A")]), &valid);
        assert!(got.resolved.is_empty());
        assert_eq!(got.unknown, vec!["甲方 名称"]);
        let cands = &got.suggestions["甲方 名称"];
        assert!(cands.contains(&"甲方名称".to_string()));
        assert!(cands.contains(&"甲方（名称）".to_string()));
    }

    #[test]
    fn unknown_name_gets_fuzzy_suggestions_not_resolution() {
        let valid = fields(&["contract_amount", "contract_number"]);
        let got = canonicalize_updates(&updates(&[("contract_amuont", "500")]), &valid);
        assert_eq!(got.unknown, vec!["contract_amuont"]);
        assert!(got.resolved.is_empty());
        assert_eq!(got.suggestions["contract_amuont"][0], "contract_amount");
    }

    #[test]
    fn completely_foreign_name_has_no_suggestions() {
        let valid = fields(&["甲方名称"]);
        let got = canonicalize_updates(&updates(&[("zzz", "1")]), &valid);
        assert_eq!(got.unknown, vec!["zzz"]);
        assert!(got.suggestions.is_empty());
    }

    #[test]
    fn canonical_names_are_idempotent() {
        let valid = fields(&["☐含个人信息", "数据名称"]);
        let ups = updates(&[("☐含个人信息", "是"), ("数据名称", "订单数据")]);
        let got = canonicalize_updates(&ups, &valid);
        assert!(got.unknown.is_empty());
        assert_eq!(got.resolved, ups);
    }
}
