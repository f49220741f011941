//! Chinese uppercase amount phrases for legal documents.

use crate::domain::constants::{AMOUNT_BIG_UNITS, AMOUNT_DIGITS, AMOUNT_UNITS};
use regex::Regex;
use std::sync::OnceLock;

/// Convert a numeric amount string into the uppercase currency phrase.
///
/// ```text
/// "500000"    -> 伍拾万元整
/// "123456.78" -> 壹拾贰万叁仟肆佰伍拾陆元柒角捌分
/// "50万"      -> 伍拾万元整
/// ```
///
/// Thousands separators and 元/整 suffixes are stripped; a trailing 万 or
/// 亿 multiplies. Unparsable input is returned cleaned, never an error —
/// callers decide via [`is_money_phrase`] whether the result is usable.
pub fn amount_to_words(raw: &str) -> String {
    let mut s: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '，' && *c != '元' && *c != '整')
        .collect();

    let mut multiplier = 1.0f64;
    if let Some(rest) = s.strip_suffix('万') {
        s = rest.to_string();
        multiplier = 10_000.0;
    } else if let Some(rest) = s.strip_suffix('亿') {
        s = rest.to_string();
        multiplier = 100_000_000.0;
    }

    let Ok(parsed) = s.trim().parse::<f64>() else {
        return s;
    };
    // Negative, NaN and infinite inputs must not collapse to 零元整.
    if !parsed.is_finite() || parsed < 0.0 {
        return s;
    }
    let amount = (parsed * multiplier * 100.0).round() / 100.0;
    let int_part = amount.trunc() as u64;
    let subunits = ((amount - int_part as f64) * 100.0).round() as u32;
    let jiao = (subunits / 10) as usize;
    let fen = (subunits % 10) as usize;

    let mut out = if int_part == 0 {
        "零".to_string()
    } else {
        int_to_words(int_part)
    };
    out.push('元');

    match (jiao, fen) {
        (0, 0) => out.push('整'),
        (0, f) => {
            out.push('零');
            out.push(AMOUNT_DIGITS[f]);
            out.push('分');
        }
        (j, 0) => {
            out.push(AMOUNT_DIGITS[j]);
            out.push('角');
        }
        (j, f) => {
            out.push(AMOUNT_DIGITS[j]);
            out.push('角');
            out.push(AMOUNT_DIGITS[f]);
            out.push('分');
        }
    }
    out
}

fn int_to_words(n: u64) -> String {
    if n == 0 {
        return "零".to_string();
    }
    let digits = n.to_string();
    let len = digits.len();
    let mut result = String::new();
    let mut zero_pending = false;

    for (i, ch) in digits.chars().enumerate() {
        let d = ch.to_digit(10).unwrap_or(0) as usize;
        let pos = len - 1 - i;
        let section = pos / 4;
        let pos_in_section = pos % 4;
        let big_unit = AMOUNT_BIG_UNITS.get(section).copied().unwrap_or("");

        if d == 0 {
            zero_pending = true;
            if pos_in_section == 0 && section > 0 {
                result.push_str(big_unit);
                zero_pending = false;
            }
        } else {
            if zero_pending {
                result.push('零');
                zero_pending = false;
            }
            result.push(AMOUNT_DIGITS[d]);
            result.push_str(AMOUNT_UNITS[pos_in_section]);
            if pos_in_section == 0 && section > 0 {
                result.push_str(big_unit);
            }
        }
    }
    result
}

/// Whether a string is a well-formed uppercase money phrase.
pub fn is_money_phrase(s: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(
            "^[零壹贰叁肆伍陆柒捌玖拾佰仟万亿兆]+元(整|[壹贰叁肆伍陆柒捌玖]角([壹贰叁肆伍陆柒捌玖]分)?|零[壹贰叁肆伍陆柒捌玖]分)$",
        )
        .expect("money phrase pattern compiles")
    });
    re.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_amounts_get_exact_suffix() {
        assert_eq!(amount_to_words("500000"), "伍拾万元整");
        assert_eq!(amount_to_words("1000"), "壹仟元整");
        assert_eq!(amount_to_words("0"), "零元整");
    }

    #[test]
    fn subunit_phrases() {
        assert_eq!(
            amount_to_words("123456.78"),
            "壹拾贰万叁仟肆佰伍拾陆元柒角捌分"
        );
        assert_eq!(amount_to_words("1.5"), "壹元伍角");
        // Zero jiao with nonzero fen takes an explicit zero filler.
        assert_eq!(amount_to_words("1.05"), "壹元零伍分");
    }

    #[test]
    fn interior_zeros_collapse_to_single_marker() {
        assert_eq!(amount_to_words("100001"), "壹拾万零壹元整");
        assert_eq!(amount_to_words("1002003"), "壹佰万贰仟零叁元整");
    }

    #[test]
    fn unit_suffix_multiplies() {
        assert_eq!(amount_to_words("50万"), "伍拾万元整");
        assert_eq!(amount_to_words("1.2亿"), "壹亿贰仟万元整");
    }

    #[test]
    fn separators_and_currency_words_are_stripped() {
        assert_eq!(amount_to_words("1,234,567元"), "壹佰贰拾叁万肆仟伍佰陆拾柒元整");
        assert_eq!(amount_to_words(" 500000元整 "), "伍拾万元整");
    }

    #[test]
    fn unparsable_input_is_returned_cleaned() {
        assert_eq!(amount_to_words("面议"), "面议");
        assert!(!is_money_phrase("面议"));
    }

    #[test]
    fn negative_and_non_finite_amounts_are_not_convertible() {
        for raw in ["-100", "-1.5万", "nan", "inf", "-inf"] {
            let phrase = amount_to_words(raw);
            assert!(!is_money_phrase(&phrase), "{raw} -> {phrase}");
        }
    }

    #[test]
    fn money_phrase_pattern_accepts_formatter_output() {
        for raw in ["500000", "123456.78", "1.05", "0.5", "99999999.99"] {
            let phrase = amount_to_words(raw);
            assert!(is_money_phrase(&phrase), "{raw} -> {phrase}");
        }
    }
}
