//! Per-type value checkers for cluster property assignments.
//!
//! Each checker accepts the raw string form of a value. A failed check is
//! never a hard blocker: the operator may be deliberately setting a value
//! this version's schema does not know, so every failure surfaces as a
//! forceable `INVALID_OPTION_VALUE` report.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::metadata::ParameterDefinition;
use crate::core::reports::{AllowedValues, ReportItem, ReportMessage};

pub const BOOLEAN_VALUES: [&str; 8] = ["0", "1", "false", "no", "off", "on", "true", "yes"];

pub const BOOLEAN_ALLOWED_DESC: &str =
    "a boolean value: '0', '1', 'false', 'no', 'off', 'on', 'true', 'yes'";
pub const INTEGER_ALLOWED_DESC: &str = "an integer or INFINITY or -INFINITY";
pub const PERCENTAGE_ALLOWED_DESC: &str =
    "a non-negative integer followed by '%' (e.g. 0%, 50%, 200%, ...)";
pub const TIME_INTERVAL_ALLOWED_DESC: &str = "time interval (e.g. 1, 2s, 3m, 4h, ...)";

fn percentage_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+%$").expect("valid percentage pattern"))
}

fn time_interval_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(\d+)(s|sec|m|min|h|hr)?$").expect("valid time pattern"))
}

/// The tool's general boolean grammar, case-insensitive.
pub fn is_boolean(value: &str) -> bool {
    BOOLEAN_VALUES.contains(&value.to_ascii_lowercase().as_str())
}

/// An optionally-signed decimal integer or an infinity token.
pub fn is_integer_or_infinity(value: &str) -> bool {
    matches!(value, "INFINITY" | "+INFINITY" | "-INFINITY") || value.parse::<i64>().is_ok()
}

pub fn is_percentage(value: &str) -> bool {
    percentage_re().is_match(value)
}

/// Parse a time interval (`90`, `2s`, `5min`, `1h`) to seconds. Bare numbers
/// are seconds. Returns `None` for anything outside the grammar.
pub fn timeout_to_seconds(value: &str) -> Option<u64> {
    let captures = time_interval_re().captures(value)?;
    let amount: u64 = captures.get(1)?.as_str().parse().ok()?;
    let multiplier = match captures
        .get(2)
        .map(|suffix| suffix.as_str().to_ascii_lowercase())
        .as_deref()
    {
        None | Some("s") | Some("sec") => 1,
        Some("m") | Some("min") => 60,
        Some("h") | Some("hr") => 3600,
        Some(_) => return None,
    };
    amount.checked_mul(multiplier)
}

/// Check one raw value against its declared parameter type. Returns the
/// failure report, or `None` when the value is acceptable or the declared
/// type has no checker.
pub fn validate_parameter_value(
    definition: &ParameterDefinition,
    value: &str,
) -> Option<ReportItem> {
    let allowed_values = match definition.param_type.as_str() {
        "boolean" => {
            if is_boolean(value) {
                return None;
            }
            AllowedValues::Description(BOOLEAN_ALLOWED_DESC.to_string())
        }
        "integer" => {
            if is_integer_or_infinity(value) {
                return None;
            }
            AllowedValues::Description(INTEGER_ALLOWED_DESC.to_string())
        }
        "percentage" => {
            if is_percentage(value) {
                return None;
            }
            AllowedValues::Description(PERCENTAGE_ALLOWED_DESC.to_string())
        }
        "time" => {
            if timeout_to_seconds(value).is_some() {
                return None;
            }
            AllowedValues::Description(TIME_INTERVAL_ALLOWED_DESC.to_string())
        }
        "select" => {
            let candidates = definition.enum_values.clone().unwrap_or_default();
            if candidates.iter().any(|candidate| candidate == value) {
                return None;
            }
            AllowedValues::List(candidates)
        }
        _ => return None,
    };
    Some(ReportItem::forceable(ReportMessage::InvalidOptionValue {
        option_name: definition.name.clone(),
        option_value: value.to_string(),
        allowed_values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, param_type: &str, enum_values: Option<&[&str]>) -> ParameterDefinition {
        ParameterDefinition {
            name: name.to_string(),
            param_type: param_type.to_string(),
            shortdesc: None,
            default: None,
            enum_values: enum_values
                .map(|values| values.iter().map(|value| value.to_string()).collect()),
            advanced: false,
            deprecated: false,
        }
    }

    #[test]
    fn test_boolean_grammar() {
        for value in ["true", "FALSE", "Yes", "no", "ON", "off", "1", "0"] {
            assert!(is_boolean(value), "{value} should be accepted");
        }
        for value in ["Falsch", "2", "", "y", "n"] {
            assert!(!is_boolean(value), "{value} should be rejected");
        }
    }

    #[test]
    fn test_integer_accepts_signs_and_infinity() {
        for value in ["0", "-3", "+42", "INFINITY", "+INFINITY", "-INFINITY"] {
            assert!(is_integer_or_infinity(value), "{value} should be accepted");
        }
        for value in ["3.14", "infinity", "1e3", ""] {
            assert!(!is_integer_or_infinity(value), "{value} should be rejected");
        }
    }

    #[test]
    fn test_percentage_requires_suffix() {
        assert!(is_percentage("0%"));
        assert!(is_percentage("200%"));
        assert!(!is_percentage("20"));
        assert!(!is_percentage("-5%"));
        assert!(!is_percentage("%"));
    }

    #[test]
    fn test_timeout_to_seconds() {
        assert_eq!(timeout_to_seconds("90"), Some(90));
        assert_eq!(timeout_to_seconds("2s"), Some(2));
        assert_eq!(timeout_to_seconds("10sec"), Some(10));
        assert_eq!(timeout_to_seconds("5min"), Some(300));
        assert_eq!(timeout_to_seconds("3M"), Some(180));
        assert_eq!(timeout_to_seconds("1h"), Some(3600));
        assert_eq!(timeout_to_seconds("2hr"), Some(7200));
        assert_eq!(timeout_to_seconds("10x"), None);
        assert_eq!(timeout_to_seconds("-1"), None);
        assert_eq!(timeout_to_seconds(""), None);
    }

    #[test]
    fn test_select_reports_candidate_list() {
        let definition = definition("select_param", "select", Some(&["s1", "s2", "s3"]));
        assert!(validate_parameter_value(&definition, "s2").is_none());

        let report = validate_parameter_value(&definition, "s9").expect("rejected value");
        match report.message {
            ReportMessage::InvalidOptionValue { allowed_values, .. } => {
                assert_eq!(
                    allowed_values,
                    AllowedValues::List(vec![
                        "s1".to_string(),
                        "s2".to_string(),
                        "s3".to_string()
                    ])
                );
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_type_is_not_checked() {
        let near_miss = definition("bool_param", "bool", None);
        assert!(validate_parameter_value(&near_miss, "Falsch").is_none());

        let plain = definition("name", "string", None);
        assert!(validate_parameter_value(&plain, "anything").is_none());
    }

    #[test]
    fn test_failure_reports_are_forceable() {
        let definition = definition("time_param", "time", None);
        let report = validate_parameter_value(&definition, "10x").expect("rejected value");
        assert!(report.force_code.is_some());
        assert!(report.is_error());
    }
}
