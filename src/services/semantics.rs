//! Field kinds and the "filled" / "checked" predicates.

use crate::domain::constants::{
    CHECKBOX_CHECKED_VALUES, CHECKBOX_PREFIX, CHECKBOX_UNCHECKED_VALUES,
};
use crate::domain::models::{FieldValue, FieldValues};

/// Field kind, decided by the reserved leading glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Checkbox,
    Text,
}

pub fn field_kind(name: &str) -> FieldKind {
    if name.starts_with(CHECKBOX_PREFIX) {
        FieldKind::Checkbox
    } else {
        FieldKind::Text
    }
}

/// True iff `value` is a member of the canonical "checked" set. This is
/// an exact membership test, not truthiness: arbitrary text is not
/// checked even though it counts as filled.
pub fn is_checked(value: &FieldValue) -> bool {
    match value {
        FieldValue::Flag(b) => *b,
        FieldValue::Text(s) => CHECKBOX_CHECKED_VALUES.contains(&s.as_str()),
    }
}

fn is_canonical_checkbox_value(value: &FieldValue) -> bool {
    match value {
        FieldValue::Flag(_) => true,
        FieldValue::Text(s) => {
            CHECKBOX_CHECKED_VALUES.contains(&s.as_str())
                || CHECKBOX_UNCHECKED_VALUES.contains(&s.as_str())
        }
    }
}

/// Whether a field is properly filled.
///
/// Checkbox fields accept the canonical checked/unchecked vocabulary, or
/// any non-empty string (callers that write descriptive text instead of
/// true/false still count as an affirmative mark). Text fields must hold
/// a non-empty string; booleans never count — a boolean against a text
/// field is a caller bug and must not leak into rendering.
pub fn is_filled(name: &str, values: &FieldValues) -> bool {
    let Some(value) = values.get(name) else {
        return false;
    };
    match field_kind(name) {
        FieldKind::Checkbox => {
            if is_canonical_checkbox_value(value) {
                return true;
            }
            value.as_text().map(|s| !s.trim().is_empty()).unwrap_or(false)
        }
        FieldKind::Text => match value {
            FieldValue::Flag(_) => false,
            FieldValue::Text(s) => !s.trim().is_empty(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, FieldValue)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn kind_comes_from_leading_glyph() {
        assert_eq!(field_kind("☐含个人信息"), FieldKind::Checkbox);
        assert_eq!(field_kind("甲方名称"), FieldKind::Text);
    }

    #[test]
    fn checkbox_accepts_canonical_vocabulary() {
        for v in ["true", "☑", "是", "yes", "1", "false", "☐", "否", "no", "0"] {
            let vs = values(&[("☐含个人信息", FieldValue::Text(v.to_string()))]);
            assert!(is_filled("☐含个人信息", &vs), "value {v:?} should fill");
        }
        let vs = values(&[("☐含个人信息", FieldValue::Flag(false))]);
        assert!(is_filled("☐含个人信息", &vs));
    }

    #[test]
    fn checkbox_accepts_nonempty_free_text_but_not_blank() {
        let vs = values(&[("☐含个人信息", FieldValue::Text("需要".into()))]);
        assert!(is_filled("☐含个人信息", &vs));
        assert!(!is_checked(&FieldValue::Text("需要".into())));

        let vs = values(&[("☐含个人信息", FieldValue::Text("  ".into()))]);
        assert!(!is_filled("☐含个人信息", &vs));
        assert!(!is_filled("☐缺席字段", &vs));
    }

    #[test]
    fn text_field_rejects_booleans() {
        let vs = values(&[("甲方名称", FieldValue::Flag(true))]);
        assert!(!is_filled("甲方名称", &vs));
        let vs = values(&[("甲方名称", FieldValue::Flag(false))]);
        assert!(!is_filled("甲方名称", &vs));
    }

    #[test]
    fn text_field_requires_nonblank() {
        let vs = values(&[("甲方名称", FieldValue::Text("北京数据科技有限公司".into()))]);
        assert!(is_filled("甲方名称", &vs));
        let vs = values(&[("甲方名称", FieldValue::Text("   ".into()))]);
        assert!(!is_filled("甲方名称", &vs));
    }

    #[test]
    fn checked_is_membership_not_truthiness() {
        assert!(is_checked(&FieldValue::Flag(true)));
        assert!(is_checked(&FieldValue::Text("☑".into())));
        assert!(is_checked(&FieldValue::Text("选中".into())));
        assert!(!is_checked(&FieldValue::Flag(false)));
        assert!(!is_checked(&FieldValue::Text("TRUE".into())));
    }
}
