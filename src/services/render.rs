//! Placeholder substitution over the template's text-bearing paragraphs.

use crate::docx::Document;
use crate::domain::constants::{CHECKED_GLYPH, UNCHECKED_GLYPH};
use crate::domain::models::{FieldValue, FieldValues};
use crate::services::amount::{amount_to_words, is_money_phrase};
use crate::services::semantics::{field_kind, is_checked, is_filled, FieldKind};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

pub struct RenderReport {
    pub replaced: usize,
    /// Field names whose token existed in the template but had no
    /// resolvable filled value. Sorted, deduplicated, informational:
    /// refusing to render on incompleteness is the caller's policy.
    pub unresolved: Vec<String>,
}

pub fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(.+?)\}\}").expect("token pattern compiles"))
}

/// Replace every `{{field}}` token in a paragraph's concatenated text.
/// Unfilled checkboxes render as the unchecked glyph, unfilled text
/// fields as empty; no literal marker syntax survives.
fn substitute_text(
    text: &str,
    values: &FieldValues,
    unresolved: &mut BTreeSet<String>,
    replaced: &mut usize,
) -> String {
    token_pattern()
        .replace_all(text, |caps: &regex::Captures| {
            let key = &caps[1];
            match field_kind(key) {
                FieldKind::Checkbox => {
                    if is_filled(key, values) {
                        *replaced += 1;
                        let checked = values.get(key).map(is_checked).unwrap_or(false);
                        if checked {
                            CHECKED_GLYPH.to_string()
                        } else {
                            UNCHECKED_GLYPH.to_string()
                        }
                    } else {
                        unresolved.insert(key.to_string());
                        UNCHECKED_GLYPH.to_string()
                    }
                }
                FieldKind::Text => {
                    if is_filled(key, values) {
                        *replaced += 1;
                        match values.get(key) {
                            Some(FieldValue::Text(s)) => s.trim().to_string(),
                            _ => String::new(),
                        }
                    } else {
                        unresolved.insert(key.to_string());
                        String::new()
                    }
                }
            }
        })
        .into_owned()
}

/// Substitute tokens across every paragraph, including nested table
/// cells, keeping each rewritten paragraph's original run style.
pub fn render_document(doc: &mut Document, values: &FieldValues) -> RenderReport {
    let mut unresolved = BTreeSet::new();
    let mut replaced = 0;

    for para in doc.paragraphs_mut() {
        let text = para.text().to_string();
        if !text.contains("{{") {
            continue;
        }
        let new_text = substitute_text(&text, values, &mut unresolved, &mut replaced);
        if new_text != text {
            para.set_text(new_text);
        }
    }

    RenderReport {
        replaced,
        unresolved: unresolved.into_iter().collect(),
    }
}

/// Every distinct `{{field}}` token in the template, sorted.
pub fn extract_placeholders(doc: &Document) -> Vec<String> {
    let mut names = BTreeSet::new();
    for para in doc.paragraphs() {
        for caps in token_pattern().captures_iter(para.text()) {
            names.insert(caps[1].to_string());
        }
    }
    names.into_iter().collect()
}

fn truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Flag(b) => *b,
        FieldValue::Text(s) => !s.trim().is_empty(),
    }
}

/// Propagate each filled alias source onto its dependent fields, without
/// overwriting values the user already supplied.
pub fn apply_aliases(
    values: &FieldValues,
    aliases: &BTreeMap<String, Vec<String>>,
) -> FieldValues {
    let mut out = values.clone();
    for (source, targets) in aliases {
        let Some(src_value) = values.get(source).filter(|v| truthy(v)).cloned() else {
            continue;
        };
        for target in targets {
            let keep = out.get(target).map(truthy).unwrap_or(false);
            if !keep {
                out.insert(target.clone(), src_value.clone());
            }
        }
    }
    out
}

/// Derive uppercase-amount fields from their numeric sources. A source
/// that cannot be turned into a well-formed money phrase is an error
/// naming both fields, not a silent blank.
pub fn apply_amount_words(
    values: &mut FieldValues,
    amount_words: &BTreeMap<String, String>,
) -> anyhow::Result<()> {
    for (target, source) in amount_words {
        if is_filled(target, values) {
            continue;
        }
        let Some(raw) = values.get(source).and_then(|v| v.as_text()) else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }
        let phrase = amount_to_words(raw);
        if !is_money_phrase(&phrase) {
            anyhow::bail!(
                "cannot derive {} from {}: {:?} is not a convertible amount",
                target,
                source,
                raw
            );
        }
        values.insert(target.clone(), FieldValue::Text(phrase));
    }
    Ok(())
}
