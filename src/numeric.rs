//! Extraction of decimal magnitudes from unit-suffixed page text.

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::model::RawNumber;

static DECIMAL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap());

/// Pulls the decimal magnitude out of a price or mileage field.
///
/// Numeric input passes through as-is. Text input loses thousands separators
/// and whitespace, then the leftmost decimal token wins: "15.8萬" -> 15.8,
/// "6萬公里" -> 6.0. Unit words are stripped, never scaled — whether 萬 should
/// multiply by 10,000 is a caller decision. Missing or tokenless input
/// defaults to 0.0 with a warning; this function never fails.
pub fn parse_unit_value(value: Option<&RawNumber>) -> f64 {
    match value {
        Some(RawNumber::Number(n)) => *n,
        Some(RawNumber::Text(text)) => {
            // NFKC folds full-width digits and punctuation (１５．８ -> 15.8)
            // so listings typed in full-width forms still parse.
            let folded: String = text.nfkc().collect();
            let cleaned = folded.replace(',', "");
            match DECIMAL_TOKEN
                .find(cleaned.trim())
                .and_then(|m| m.as_str().parse::<f64>().ok())
            {
                Some(n) => n,
                None => {
                    warn!("no numeric token in {text:?}, defaulting to 0.0");
                    0.0
                }
            }
        }
        None => {
            warn!("missing numeric field, defaulting to 0.0");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawNumber {
        RawNumber::Text(s.to_string())
    }

    #[test]
    fn strips_unit_suffixes_without_scaling() {
        assert_eq!(parse_unit_value(Some(&text("15.8萬"))), 15.8);
        assert_eq!(parse_unit_value(Some(&text("6萬公里"))), 6.0);
    }

    #[test]
    fn numeric_input_passes_through() {
        assert_eq!(parse_unit_value(Some(&RawNumber::Number(168000.0))), 168000.0);
    }

    #[test]
    fn strips_thousands_separators_and_whitespace() {
        assert_eq!(parse_unit_value(Some(&text(" 1,688,000 "))), 1688000.0);
    }

    #[test]
    fn folds_fullwidth_digits_before_extraction() {
        assert_eq!(parse_unit_value(Some(&text("１５.８萬"))), 15.8);
        assert_eq!(parse_unit_value(Some(&text("１５．８萬"))), 15.8);
    }

    #[test]
    fn leftmost_token_wins() {
        assert_eq!(parse_unit_value(Some(&text("65.8萬 (原價70萬)"))), 65.8);
    }

    #[test]
    fn tokenless_input_defaults_to_zero() {
        assert_eq!(parse_unit_value(Some(&text(""))), 0.0);
        assert_eq!(parse_unit_value(Some(&text("面議"))), 0.0);
    }

    #[test]
    fn missing_input_defaults_to_zero() {
        assert_eq!(parse_unit_value(None), 0.0);
    }
}
