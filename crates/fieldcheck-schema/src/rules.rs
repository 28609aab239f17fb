//! # Validation Rules
//!
//! The uniform [`Rule`] interface and the four built-in rules.
//!
//! | Rule       | Parameter | Checks                                                        |
//! |------------|-----------|---------------------------------------------------------------|
//! | `required` | boolean   | value present and not the zero value of its kind              |
//! | `max`      | number    | string/list length ≤ param, number ≤ param                    |
//! | `min`      | number    | string/list length ≥ param, number ≥ param                    |
//! | `pattern`  | regex     | whole string matches; non-strings are not checked             |
//!
//! ## Failure Semantics
//!
//! Rules never panic. A value kind a rule cannot judge, or a parameter of
//! the wrong kind, is reported as an ordinary failure message so one bad
//! schema entry degrades that field only.
//!
//! Absent values are skipped by `max`, `min` and `pattern`, and so are
//! non-strings by `pattern`, before the parameter is looked at. Presence is
//! judged by `required` alone.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use fieldcheck_core::Value;
use parking_lot::RwLock;
use regex::Regex;

/// Name of the built-in presence rule.
pub const REQUIRED: &str = "required";
/// Name of the built-in upper-bound rule.
pub const MAX: &str = "max";
/// Name of the built-in lower-bound rule.
pub const MIN: &str = "min";
/// Name of the built-in regular-expression rule.
pub const PATTERN: &str = "pattern";

/// Upper bound on distinct patterns kept compiled by [`PatternRule`].
const MAX_CACHED_PATTERNS: usize = 256;

/// A named validation rule.
///
/// `evaluate` receives the field name, the field's value (absent when the
/// field is missing from the record) and the rule parameter from the
/// schema. It returns `None` on success or a human-readable failure message.
///
/// Any `Fn(&str, &Value, &Value) -> Option<String>` closure is a rule.
pub trait Rule: Send + Sync {
    fn evaluate(&self, field: &str, value: &Value, param: &Value) -> Option<String>;
}

impl<F> Rule for F
where
    F: Fn(&str, &Value, &Value) -> Option<String> + Send + Sync,
{
    fn evaluate(&self, field: &str, value: &Value, param: &Value) -> Option<String> {
        self(field, value, param)
    }
}

fn invalid_parameter(rule: &str, reason: impl std::fmt::Display) -> String {
    format!("has invalid parameter for '{rule}' validation: {reason}")
}

// -- required -----------------------------------------------------------------

/// `required: true` fails on absent and zero values. `required: false` never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredRule;

impl Rule for RequiredRule {
    fn evaluate(&self, _field: &str, value: &Value, param: &Value) -> Option<String> {
        let Some(required) = param.as_bool() else {
            return Some(invalid_parameter(REQUIRED, "expected a boolean"));
        };
        (required && value.is_zero()).then(|| "is required".to_string())
    }
}

// -- max / min ----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Max,
    Min,
}

impl Bound {
    fn rule_name(self) -> &'static str {
        match self {
            Self::Max => MAX,
            Self::Min => MIN,
        }
    }

    /// Whether `actual` compared to the limit breaks this bound.
    fn violated(self, ordering: Option<Ordering>) -> bool {
        matches!(
            (self, ordering),
            (Self::Max, Some(Ordering::Greater)) | (Self::Min, Some(Ordering::Less))
        )
    }

    fn message(self, measure: &str, param: &Value) -> String {
        match self {
            Self::Max => format!("exceeds maximum {measure} of {param}"),
            Self::Min => format!("is less than minimum {measure} of {param}"),
        }
    }
}

fn check_bound(bound: Bound, value: &Value, param: &Value) -> Option<String> {
    if value.is_absent() {
        return None;
    }
    let Some(limit) = param.as_f64() else {
        return Some(invalid_parameter(bound.rule_name(), "expected a number"));
    };

    let (ordering, measure) = match value {
        Value::Absent => return None,
        Value::String(s) => ((s.chars().count() as f64).partial_cmp(&limit), "length"),
        Value::List(items) => ((items.len() as f64).partial_cmp(&limit), "array length"),
        Value::Integer(n) => match param {
            Value::Integer(p) => (Some(n.cmp(p)), "value"),
            _ => ((*n as f64).partial_cmp(&limit), "value"),
        },
        Value::Float(x) => (x.partial_cmp(&limit), "value"),
        Value::Bool(_) | Value::Object(_) => {
            return Some(format!(
                "has unsupported type for '{}' validation",
                bound.rule_name()
            ))
        }
    };

    bound
        .violated(ordering)
        .then(|| bound.message(measure, param))
}

/// Upper bound on string/list length or numeric value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxRule;

impl Rule for MaxRule {
    fn evaluate(&self, _field: &str, value: &Value, param: &Value) -> Option<String> {
        check_bound(Bound::Max, value, param)
    }
}

/// Lower bound on string/list length or numeric value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinRule;

impl Rule for MinRule {
    fn evaluate(&self, _field: &str, value: &Value, param: &Value) -> Option<String> {
        check_bound(Bound::Min, value, param)
    }
}

// -- pattern ------------------------------------------------------------------

/// Whole-string regular expression match.
///
/// The pattern is anchored at both ends, so `"[a-z]+"` rejects `"abc1"`.
/// Compiled expressions are cached per pattern text.
#[derive(Debug, Default)]
pub struct PatternRule {
    cache: RwLock<HashMap<String, Arc<Regex>>>,
}

impl PatternRule {
    pub fn new() -> Self {
        Self::default()
    }

    fn compiled(&self, pattern: &str) -> Result<Arc<Regex>, regex::Error> {
        if let Some(re) = self.cache.read().get(pattern) {
            return Ok(Arc::clone(re));
        }

        let re = Arc::new(Regex::new(&format!(r"\A(?:{pattern})\z"))?);
        let mut cache = self.cache.write();
        if cache.len() < MAX_CACHED_PATTERNS {
            cache.insert(pattern.to_string(), Arc::clone(&re));
        }
        Ok(re)
    }

    /// Number of distinct patterns currently compiled.
    pub fn cached_patterns(&self) -> usize {
        self.cache.read().len()
    }
}

impl Rule for PatternRule {
    fn evaluate(&self, field: &str, value: &Value, param: &Value) -> Option<String> {
        let text = value.as_str()?;
        let Some(pattern) = param.as_str() else {
            return Some(invalid_parameter(PATTERN, "expected a regular expression string"));
        };

        match self.compiled(pattern) {
            Ok(re) if re.is_match(text) => None,
            Ok(_) => Some("does not match the required pattern".to_string()),
            Err(e) => {
                tracing::warn!(field, pattern, error = %e, "schema pattern does not compile");
                Some(invalid_parameter(PATTERN, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(rule: &dyn Rule, value: impl Into<Value>, param: impl Into<Value>) -> Option<String> {
        rule.evaluate("field", &value.into(), &param.into())
    }

    // -- required --

    #[test]
    fn required_rejects_zero_values() {
        for value in [
            Value::Absent,
            Value::from(""),
            Value::Integer(0),
            Value::Float(0.0),
            Value::Bool(false),
            Value::List(vec![]),
        ] {
            assert_eq!(
                eval(&RequiredRule, value.clone(), true).as_deref(),
                Some("is required"),
                "{value:?}"
            );
        }
    }

    #[test]
    fn required_accepts_present_values() {
        assert_eq!(eval(&RequiredRule, "u1", true), None);
        assert_eq!(eval(&RequiredRule, 7i64, true), None);
        assert_eq!(eval(&RequiredRule, true, true), None);
    }

    #[test]
    fn required_false_never_fails() {
        assert_eq!(eval(&RequiredRule, Value::Absent, false), None);
        assert_eq!(eval(&RequiredRule, "", false), None);
    }

    #[test]
    fn required_with_non_boolean_parameter() {
        let msg = eval(&RequiredRule, "x", "yes").unwrap();
        assert!(msg.contains("invalid parameter for 'required'"), "{msg}");
    }

    // -- max / min --

    #[test]
    fn max_on_number_uses_value_phrasing() {
        assert_eq!(
            eval(&MaxRule, 15i64, 10i64).as_deref(),
            Some("exceeds maximum value of 10")
        );
        assert_eq!(eval(&MaxRule, 10i64, 10i64), None);
        assert_eq!(
            eval(&MaxRule, 10.5, 10i64).as_deref(),
            Some("exceeds maximum value of 10")
        );
        assert_eq!(eval(&MaxRule, 9.5, 9.75), None);
    }

    #[test]
    fn max_on_string_uses_length_phrasing() {
        assert_eq!(
            eval(&MaxRule, "Alexandra", 7i64).as_deref(),
            Some("exceeds maximum length of 7")
        );
        assert_eq!(eval(&MaxRule, "Alexand", 7i64), None);
        // Multi-byte characters count once.
        assert_eq!(eval(&MaxRule, "Zoë", 3i64), None);
    }

    #[test]
    fn max_on_list_uses_array_length_phrasing() {
        let items = Value::List(vec![Value::from("a"), Value::from("b"), Value::from("c")]);
        assert_eq!(
            eval(&MaxRule, items.clone(), 2i64).as_deref(),
            Some("exceeds maximum array length of 2")
        );
        assert_eq!(eval(&MaxRule, items, 3i64), None);
    }

    #[test]
    fn min_phrasing() {
        assert_eq!(
            eval(&MinRule, "Al", 3i64).as_deref(),
            Some("is less than minimum length of 3")
        );
        assert_eq!(
            eval(&MinRule, -1i64, 0i64).as_deref(),
            Some("is less than minimum value of 0")
        );
        assert_eq!(
            eval(&MinRule, Value::List(vec![]), 1i64).as_deref(),
            Some("is less than minimum array length of 1")
        );
        assert_eq!(eval(&MinRule, "Ada", 3i64), None);
    }

    #[test]
    fn bounds_reject_unsupported_kinds() {
        assert_eq!(
            eval(&MaxRule, true, 1i64).as_deref(),
            Some("has unsupported type for 'max' validation")
        );
        let object = Value::from(serde_json::json!({"a": 1}));
        assert_eq!(
            eval(&MinRule, object, 1i64).as_deref(),
            Some("has unsupported type for 'min' validation")
        );
    }

    #[test]
    fn bounds_skip_absent_values() {
        assert_eq!(eval(&MaxRule, Value::Absent, 7i64), None);
        assert_eq!(eval(&MinRule, Value::Absent, 3i64), None);
    }

    #[test]
    fn bounds_skip_absent_values_before_checking_parameter() {
        assert_eq!(eval(&MaxRule, Value::Absent, "ten"), None);
        assert_eq!(eval(&MinRule, Value::Absent, true), None);
    }

    #[test]
    fn bounds_with_non_numeric_parameter() {
        let msg = eval(&MaxRule, 3i64, "ten").unwrap();
        assert!(msg.contains("invalid parameter for 'max'"), "{msg}");
    }

    #[test]
    fn integer_comparison_is_exact_for_large_values() {
        // Both sides lose precision as f64; the integer path must not.
        let limit = i64::MAX - 1;
        assert_eq!(
            eval(&MaxRule, i64::MAX, limit).as_deref(),
            Some(format!("exceeds maximum value of {limit}").as_str())
        );
    }

    // -- pattern --

    #[test]
    fn pattern_requires_full_match() {
        let rule = PatternRule::new();
        assert_eq!(eval(&rule, "abc", "[a-z]+"), None);
        assert_eq!(
            eval(&rule, "abc1", "[a-z]+").as_deref(),
            Some("does not match the required pattern")
        );
        assert_eq!(eval(&rule, "a@b.co", r"^[^\s@]+@[^\s@]+\.[^\s@]+$"), None);
    }

    #[test]
    fn pattern_ignores_non_strings() {
        let rule = PatternRule::new();
        assert_eq!(eval(&rule, 42i64, "[a-z]+"), None);
        assert_eq!(eval(&rule, Value::Absent, "[a-z]+"), None);
        assert_eq!(eval(&rule, Value::List(vec![Value::from("1")]), "[a-z]+"), None);
    }

    #[test]
    fn pattern_ignores_non_strings_whatever_the_parameter() {
        let rule = PatternRule::new();
        assert_eq!(eval(&rule, 42i64, 5i64), None);
        assert_eq!(eval(&rule, Value::Absent, 5i64), None);
        assert_eq!(eval(&rule, 42i64, "(unclosed"), None);
        let msg = eval(&rule, "abc", 5i64).unwrap();
        assert!(msg.contains("expected a regular expression string"), "{msg}");
    }

    #[test]
    fn pattern_with_invalid_regex() {
        let rule = PatternRule::new();
        let msg = eval(&rule, "abc", "(unclosed").unwrap();
        assert!(msg.starts_with("has invalid parameter for 'pattern' validation"), "{msg}");
    }

    #[test]
    fn pattern_caches_compiled_expressions() {
        let rule = PatternRule::new();
        eval(&rule, "a", "[a-z]");
        eval(&rule, "b", "[a-z]");
        eval(&rule, "1", "[0-9]");
        assert_eq!(rule.cached_patterns(), 2);
    }

    #[test]
    fn closures_are_rules() {
        let even = |_: &str, value: &Value, _: &Value| match value {
            Value::Integer(n) if n % 2 != 0 => Some("must be even".to_string()),
            _ => None,
        };
        assert_eq!(eval(&even, 3i64, true).as_deref(), Some("must be even"));
        assert_eq!(eval(&even, 4i64, true), None);
    }
}
