//! Coarse data type classification of textual cell values.
//!
//! The classifier is the homogeneity test of every inference step: two cells
//! "agree" when they classify to the same [`DataType`].
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;

/// Coarse data type inferred from a cell's textual value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    Number,
    Boolean,
    Date,
    String,
}

impl DataType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DataType::Number => "Number",
            DataType::Boolean => "Boolean",
            DataType::Date => "Date",
            DataType::String => "String",
        }
    }
}

/// Date patterns tried in order; all are parsed strictly (2024-02-30 is rejected).
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d", // 2024-11-24
    "%m/%d/%Y", // 11/24/2024
    "%d-%m-%Y", // 24-11-2024
    "%Y/%m/%d", // 2024/11/24
    "%m-%d-%Y", // 11-24-2024
    "%d/%m/%Y", // 24/11/2024
    "%Y.%m.%d", // 2024.11.24
    "%m.%d.%Y", // 11.24.2024
];

static DECIMAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("Hardcode regex pattern")
});

/// Classifies a value as Number, Boolean, Date or String, in that order of precedence.
pub fn detect_data_type(value: &str) -> DataType {
    if is_number(value) {
        DataType::Number
    } else if is_boolean(value) {
        DataType::Boolean
    } else if is_date(value) {
        DataType::Date
    } else {
        DataType::String
    }
}

/// Returns true if the value looks like data rather than a header label: any number,
/// boolean, single character or date.
pub fn check_data_type_row(value: &str) -> bool {
    is_number(value) || is_boolean(value) || is_character(value) || is_date(value)
}

/// Accepts 32/64-bit integers, 32/64-bit floats and plain decimal literals.
pub fn is_number(value: &str) -> bool {
    value.parse::<i32>().is_ok()
        || value.parse::<i64>().is_ok()
        || is_float::<f32>(value)
        || is_float::<f64>(value)
        || DECIMAL_PATTERN.is_match(value)
}

/// Floating point literal with optional surrounding whitespace and a trailing
/// `f`/`d` suffix. Only `NaN` and `Infinity` are accepted as non-numeric spellings.
fn is_float<F: FromStr>(value: &str) -> bool {
    let value = value.trim();
    let literal = value
        .strip_suffix(['f', 'F', 'd', 'D'])
        .filter(|it| it.ends_with(|c: char| c.is_ascii_digit() || c == '.'))
        .unwrap_or(value);
    let unsigned = literal.trim_start_matches(['+', '-']);
    if unsigned == "NaN" || unsigned == "Infinity" {
        return literal.len() - unsigned.len() <= 1;
    }
    literal.contains(|c: char| c.is_ascii_digit())
        && !literal.contains(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
        && literal.parse::<F>().is_ok()
}

pub fn is_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

pub fn is_character(value: &str) -> bool {
    value.chars().count() == 1
}

/// Matches any of the fixed date patterns at the start of the value.
///
/// Numeric fields never stop inside a digit run, so "2024-05-1001" is not a date
/// with a "01" remainder.
pub fn is_date(value: &str) -> bool {
    DATE_FORMATS.iter().any(|format| {
        matches!(
            NaiveDate::parse_and_remainder(value, format),
            Ok((_, rest)) if !rest.starts_with(|c: char| c.is_ascii_digit())
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_numbers() {
        for value in ["0", "-12", "+7", "9223372036854775807", "3.14", "1e5", "-2.5E-3", ".5", "5.", "1.5f", "2d", " 42 ", "NaN", "-Infinity", "123456789012345678901234567890"] {
            assert_eq!(detect_data_type(value), DataType::Number, "{value}");
        }
    }

    #[test]
    fn reject_number_lookalikes() {
        for value in ["inf", "infinity", "nan", "1,000", "12abc", "0x1F", "--1", "e5", "", "."] {
            assert!(!is_number(value), "{value}");
        }
    }

    #[test]
    fn detect_booleans() {
        assert_eq!(detect_data_type("true"), DataType::Boolean);
        assert_eq!(detect_data_type("FALSE"), DataType::Boolean);
        assert_eq!(detect_data_type("True"), DataType::Boolean);
        assert_eq!(detect_data_type("yes"), DataType::String);
    }

    #[test]
    fn detect_dates() {
        for value in ["2024-11-24", "11/24/2024", "24-11-2024", "2024/11/24", "11-24-2024", "24/11/2024", "2024.11.24", "11.24.2024", "2024-11-24 10:30"] {
            assert_eq!(detect_data_type(value), DataType::Date, "{value}");
        }
    }

    #[test]
    fn reject_invalid_dates() {
        assert_eq!(detect_data_type("2024-02-30"), DataType::String);
        assert_eq!(detect_data_type("13/13/2024"), DataType::String);
        assert_eq!(detect_data_type("Sun Nov 24 00:00:00 UTC 2024"), DataType::String);
        assert_eq!(detect_data_type("2024.11"), DataType::Number);
        assert_eq!(detect_data_type("2024-11-245"), DataType::String);
        assert_eq!(detect_data_type("24.11.2024"), DataType::String);
        assert_eq!(detect_data_type("2024-05-1001"), DataType::String);
        assert_eq!(detect_data_type("2024-11-24 10:30"), DataType::Date);
    }

    #[test]
    fn detect_strings() {
        assert_eq!(detect_data_type("Revenue"), DataType::String);
        assert_eq!(detect_data_type(""), DataType::String);
        assert_eq!(detect_data_type("   "), DataType::String);
    }

    #[test]
    fn check_data_type_row_rules() {
        assert!(check_data_type_row("12"));
        assert!(check_data_type_row("false"));
        assert!(check_data_type_row("x"));
        assert!(check_data_type_row("é"));
        assert!(check_data_type_row("01/02/2023"));
        assert!(!check_data_type_row("Region"));
        assert!(!check_data_type_row("2024-05-1001"));
        assert!(!check_data_type_row("Q1"));
        assert!(!check_data_type_row(""));
    }
}
