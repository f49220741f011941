//! Stable process-wide constants.
//!
//! Tunables here are deliberately named rather than inlined: the router
//! ambiguity gap and the fuzzy-match floor are tuned heuristics, not
//! derived values.

/// Leading glyph that marks a field name as a tri-state checkbox.
pub const CHECKBOX_PREFIX: char = '☐';

/// Glyph rendered for a checked checkbox.
pub const CHECKED_GLYPH: &str = "☑";

/// Glyph rendered for an unchecked or unfilled checkbox.
pub const UNCHECKED_GLYPH: &str = "☐";

/// Values accepted as "checked" for a checkbox field. Membership is exact.
pub const CHECKBOX_CHECKED_VALUES: &[&str] =
    &["true", "True", "☑", "checked", "是", "选中", "yes", "Yes", "YES", "1"];

/// Values accepted as "unchecked" for a checkbox field.
pub const CHECKBOX_UNCHECKED_VALUES: &[&str] =
    &["false", "False", "☐", "unchecked", "否", "不选", "no", "No", "NO", "0"];

/// Score bonus when the input names a variant exactly (display name, code,
/// or short key). An exact mention always out-scores generic keywords and
/// suppresses the ambiguity check for the leader.
pub const EXACT_MATCH_BONUS: i64 = 100;

/// Maximum gap between the top two router scores that still counts as a
/// tie when no exact bonus fired for the leader.
pub const AMBIGUITY_SCORE_GAP: i64 = 2;

/// Similarity floor for fuzzy field-name suggestions (normalized
/// Levenshtein, 0.0..=1.0).
pub const FUZZY_SIMILARITY_FLOOR: f64 = 0.6;

/// Maximum number of fuzzy suggestions surfaced per unresolved name.
pub const MAX_SUGGESTIONS: usize = 5;

/// Uppercase digits used in legal amount phrases, indexed 0..=9.
pub const AMOUNT_DIGITS: [char; 10] =
    ['零', '壹', '贰', '叁', '肆', '伍', '陆', '柒', '捌', '玖'];

/// Positional units within a four-digit section.
pub const AMOUNT_UNITS: [&str; 4] = ["", "拾", "佰", "仟"];

/// Section tier markers (every four digits).
pub const AMOUNT_BIG_UNITS: [&str; 4] = ["", "万", "亿", "兆"];

/// Fallback run font for rewritten paragraphs that had no styled run.
pub const DEFAULT_RUN_FONT: &str = "仿宋";

/// Fallback run size in half-points (14pt).
pub const DEFAULT_RUN_SIZE_HALF_POINTS: u32 = 28;
