use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref DATE_PATTERN: Regex = Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap();
}

/// Date-time layouts accepted besides RFC 3339 and plain `YYYY-MM-DD`
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parsed elements of a comma-separated value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArrayValues {
    Numbers(Vec<f64>),
    Booleans(Vec<bool>),
    Strings(Vec<String>),
}

impl ArrayValues {
    pub fn len(&self) -> usize {
        match self {
            ArrayValues::Numbers(values) => values.len(),
            ArrayValues::Booleans(values) => values.len(),
            ArrayValues::Strings(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classification of a single normalized value
///
/// Scalar flags are not mutually exclusive (a value can be both a number and a
/// date candidate); [`ParameterType`](super::ParameterType) resolves them by
/// precedence. Array and scalar flags never overlap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueAnalysis {
    pub original_value: String,
    pub is_number: bool,
    pub is_boolean: bool,
    pub is_date: bool,
    pub is_array: bool,
    pub is_numeric_array: bool,
    pub is_boolean_array: bool,
    pub numeric_value: Option<f64>,
    pub boolean_value: Option<bool>,
    pub array_values: Option<ArrayValues>,
}

impl ValueAnalysis {
    /// Classify a value. Total over all strings.
    pub fn analyze(value: &str) -> Self {
        if value.contains(',') {
            Self::analyze_array(value)
        } else {
            Self::analyze_scalar(value)
        }
    }

    fn analyze_scalar(value: &str) -> Self {
        let numeric_value = parse_number(value);
        let boolean_value = parse_boolean(value);

        Self {
            original_value: value.to_string(),
            is_number: numeric_value.is_some(),
            is_boolean: boolean_value.is_some(),
            is_date: is_date(value),
            is_array: false,
            is_numeric_array: false,
            is_boolean_array: false,
            numeric_value,
            boolean_value,
            array_values: None,
        }
    }

    fn analyze_array(value: &str) -> Self {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();

        let numbers: Option<Vec<f64>> = parts.iter().map(|p| parse_number(p)).collect();
        let booleans: Option<Vec<bool>> = parts.iter().map(|p| parse_boolean(p)).collect();
        let is_numeric_array = numbers.is_some();
        let is_boolean_array = booleans.is_some();

        let array_values = match (numbers, booleans) {
            (Some(numbers), _) => ArrayValues::Numbers(numbers),
            (None, Some(booleans)) => ArrayValues::Booleans(booleans),
            (None, None) => ArrayValues::Strings(parts.iter().map(|p| p.to_string()).collect()),
        };

        Self {
            original_value: value.to_string(),
            is_number: false,
            is_boolean: false,
            is_date: false,
            is_array: true,
            is_numeric_array,
            is_boolean_array,
            numeric_value: None,
            boolean_value: None,
            array_values: Some(array_values),
        }
    }
}

/// Parse a finite number; empty or whitespace-only input is never numeric
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `true`/`false` in any letter case
pub fn parse_boolean(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Requires both a `YYYY-MM-DD` substring and a valid calendar date/date-time
pub fn is_date(value: &str) -> bool {
    DATE_PATTERN.is_match(value) && parses_as_date(value.trim())
}

fn parses_as_date(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DATE_TIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_float() {
        let analysis = ValueAnalysis::analyze("42");
        assert!(analysis.is_number);
        assert_eq!(analysis.numeric_value, Some(42.0));
        assert!(!analysis.is_boolean);
        assert!(!analysis.is_array);

        let analysis = ValueAnalysis::analyze("-3.5e2");
        assert_eq!(analysis.numeric_value, Some(-350.0));
    }

    #[test]
    fn test_empty_string_is_not_a_number() {
        let analysis = ValueAnalysis::analyze("");
        assert!(!analysis.is_number);
        assert!(!analysis.is_boolean);
        assert!(!analysis.is_date);
        assert_eq!(analysis.numeric_value, None);

        assert_eq!(parse_number("   "), None);
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("Infinity"), None);
        assert_eq!(parse_number("1e400"), None);
    }

    #[test]
    fn test_partial_numbers_rejected() {
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn test_boolean_any_case() {
        let analysis = ValueAnalysis::analyze("TRUE");
        assert!(analysis.is_boolean);
        assert_eq!(analysis.boolean_value, Some(true));

        let analysis = ValueAnalysis::analyze("False");
        assert_eq!(analysis.boolean_value, Some(false));

        assert!(!ValueAnalysis::analyze("yes").is_boolean);
    }

    #[test]
    fn test_dates() {
        assert!(is_date("2024-01-15"));
        assert!(is_date("2024-01-15T10:30:00Z"));
        assert!(is_date("2024-01-15T10:30:00"));
        assert!(is_date("2024-01-15 10:30"));
        assert!(!is_date("2024-13-45"));
        assert!(!is_date("15/01/2024"));
        assert!(!is_date("20240115"));
    }

    #[test]
    fn test_date_is_not_a_number() {
        let analysis = ValueAnalysis::analyze("2024-01-15");
        assert!(analysis.is_date);
        assert!(!analysis.is_number);
    }

    #[test]
    fn test_numeric_array() {
        let analysis = ValueAnalysis::analyze("1,2,3");
        assert!(analysis.is_array);
        assert!(analysis.is_numeric_array);
        assert!(!analysis.is_boolean_array);
        assert!(!analysis.is_number);
        assert_eq!(
            analysis.array_values,
            Some(ArrayValues::Numbers(vec![1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn test_boolean_array() {
        let analysis = ValueAnalysis::analyze("true, FALSE");
        assert!(analysis.is_boolean_array);
        assert!(!analysis.is_numeric_array);
        assert_eq!(
            analysis.array_values,
            Some(ArrayValues::Booleans(vec![true, false]))
        );
    }

    #[test]
    fn test_generic_array_keeps_trimmed_parts() {
        let analysis = ValueAnalysis::analyze("a, b ,1");
        assert!(analysis.is_array);
        assert!(!analysis.is_numeric_array);
        assert!(!analysis.is_boolean_array);
        assert_eq!(
            analysis.array_values,
            Some(ArrayValues::Strings(vec![
                "a".to_string(),
                "b".to_string(),
                "1".to_string()
            ]))
        );
    }

    #[test]
    fn test_array_with_empty_part_is_not_numeric() {
        let analysis = ValueAnalysis::analyze("1,,2");
        assert!(analysis.is_array);
        assert!(!analysis.is_numeric_array);
    }

    #[test]
    fn test_classification_is_idempotent() {
        for value in ["42", "true", "2024-01-15", "1,2,3", "hello", ""] {
            assert_eq!(ValueAnalysis::analyze(value), ValueAnalysis::analyze(value));
        }
    }
}
