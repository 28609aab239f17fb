//! # Validation Dispatcher
//!
//! Applies a [`Schema`] to a [`Record`] in two passes:
//!
//! 1. **Unknown-field guard.** Every record key that the schema does not
//!    declare is reported as [`UNKNOWN_FIELD_MESSAGE`]. If there is at least
//!    one, validation stops here and only those errors are returned.
//! 2. **Rule dispatch.** For each schema field, each configured rule is
//!    looked up in the [`RuleRegistry`] by name and evaluated against the
//!    field's value. Every failure is collected. A rule name the registry
//!    does not know is itself a failure for that field.
//!
//! Rules run in rule-name order, so identical inputs always produce
//! identical reports.
//!
//! ## Absent Fields
//!
//! Under the default [`AbsencePolicy::VisitAll`], every schema field is
//! visited and a field missing from the record is evaluated as
//! [`Value::Absent`], so `required` fires on omission.
//! [`AbsencePolicy::PresentOnly`] only visits fields present in the record,
//! for callers that rely on omission never being flagged.

use std::collections::BTreeMap;
use std::sync::Arc;

use fieldcheck_core::{Record, Value};

use crate::registry::RuleRegistry;
use crate::report::ErrorReport;
use crate::schema::Schema;

/// Message recorded for a record key the schema does not declare.
pub const UNKNOWN_FIELD_MESSAGE: &str = "field not defined in schema";

static ABSENT: Value = Value::Absent;

/// Which schema fields the dispatcher visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbsencePolicy {
    /// Visit every schema field; missing fields are evaluated as absent.
    #[default]
    VisitAll,
    /// Visit only schema fields present in the record.
    PresentOnly,
}

/// A validation dispatcher bound to a frozen rule registry.
///
/// Cheap to clone and safe to share across threads: the registry is only
/// ever read.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
    absence: AbsencePolicy,
}

impl Validator {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            absence: AbsencePolicy::default(),
        }
    }

    pub fn with_absence_policy(mut self, absence: AbsencePolicy) -> Self {
        self.absence = absence;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn absence_policy(&self) -> AbsencePolicy {
        self.absence
    }

    /// Validate `record` against `schema`. An empty report means valid.
    pub fn validate(&self, record: &Record, schema: &Schema) -> ErrorReport {
        let unknown = check_unknown_fields(record, schema);
        if !unknown.is_empty() {
            tracing::debug!(
                unknown_fields = unknown.len(),
                "record rejected before rule dispatch"
            );
            return unknown;
        }

        let report = self.dispatch(record, schema);
        tracing::debug!(
            fields = schema.len(),
            failing_fields = report.len(),
            "record validated"
        );
        report
    }

    /// Rule dispatch without the unknown-field guard.
    pub fn dispatch(&self, record: &Record, schema: &Schema) -> ErrorReport {
        let mut report = ErrorReport::new();
        for (name, field) in schema {
            let value = match (record.get(name), self.absence) {
                (Some(value), _) => value,
                (None, AbsencePolicy::VisitAll) => &ABSENT,
                (None, AbsencePolicy::PresentOnly) => continue,
            };
            report.extend_field(name, self.apply_rules(name, value, field.validations()));
        }
        report
    }

    /// Evaluate every rule in `validations` against one value.
    pub fn apply_rules(
        &self,
        field: &str,
        value: &Value,
        validations: &BTreeMap<String, Value>,
    ) -> Vec<String> {
        validations
            .iter()
            .filter_map(|(rule_name, param)| match self.registry.lookup(rule_name) {
                Some(rule) => rule.evaluate(field, value, param),
                None => {
                    tracing::debug!(field, rule = %rule_name, "validation rule not registered");
                    Some(format!("validation '{rule_name}' not supported"))
                }
            })
            .collect()
    }
}

impl Default for Validator {
    /// A validator over the shared built-in registry.
    fn default() -> Self {
        Self::new(RuleRegistry::builtin())
    }
}

/// Report every record key that `schema` does not declare.
pub fn check_unknown_fields(record: &Record, schema: &Schema) -> ErrorReport {
    let mut report = ErrorReport::new();
    for key in record.keys().filter(|key| !schema.contains(key)) {
        report.push(key, UNKNOWN_FIELD_MESSAGE);
    }
    report
}

/// Validate `record` against `schema` with the built-in rules.
pub fn validate(record: &Record, schema: &Schema) -> ErrorReport {
    Validator::default().validate(record, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;
    use serde_json::json;

    fn record(json: serde_json::Value) -> Record {
        Record::from_json(json).unwrap()
    }

    fn users() -> Schema {
        Schema::from_fields([
            (
                "count",
                FieldSchema::new("integer", "count")
                    .with_rule("required", true)
                    .with_rule("max", 10i64),
            ),
            (
                "email",
                FieldSchema::new("string", "email")
                    .with_rule("pattern", r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
                    .with_rule("required", true),
            ),
            (
                "name",
                FieldSchema::new("string", "name")
                    .with_rule("max", 7i64)
                    .with_rule("min", 3i64),
            ),
            ("id", FieldSchema::new("string", "id").with_rule("required", true)),
        ])
    }

    #[test]
    fn valid_record_yields_empty_report() {
        let report = validate(
            &record(json!({"count": 3, "email": "ada@example.com", "name": "Ada", "id": "u1"})),
            &users(),
        );
        assert!(report.is_empty(), "{report}");
    }

    #[test]
    fn unknown_field_short_circuits_dispatch() {
        // count and email would fail their rules too.
        let report = validate(
            &record(json!({"count": 99, "email": "bad", "foo": 1})),
            &users(),
        );
        assert_eq!(report.fields().collect::<Vec<_>>(), vec!["foo"]);
        assert_eq!(report.message("foo").as_deref(), Some(UNKNOWN_FIELD_MESSAGE));
    }

    #[test]
    fn missing_required_field_is_flagged_by_default() {
        let report = validate(
            &record(json!({"count": 3, "email": "ada@example.com"})),
            &users(),
        );
        assert_eq!(report.fields().collect::<Vec<_>>(), vec!["id"]);
        assert_eq!(report.message("id").as_deref(), Some("is required"));
    }

    #[test]
    fn present_only_policy_skips_missing_fields() {
        let validator = Validator::default().with_absence_policy(AbsencePolicy::PresentOnly);
        let report = validator.validate(
            &record(json!({"count": 3, "email": "ada@example.com"})),
            &users(),
        );
        assert!(report.is_empty(), "{report}");

        // A present but empty value still fails.
        let report = validator.validate(&record(json!({"id": ""})), &users());
        assert_eq!(report.message("id").as_deref(), Some("is required"));
    }

    #[test]
    fn null_value_counts_as_absent() {
        let report = validate(
            &record(json!({"count": 3, "email": "ada@example.com", "id": null, "name": null})),
            &users(),
        );
        assert_eq!(report.fields().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn all_failures_for_a_field_are_reported() {
        let schema = Schema::from_fields([(
            "code",
            FieldSchema::new("string", "code")
                .with_rule("max", 3i64)
                .with_rule("pattern", "[0-9]+"),
        )]);
        let report = validate(&record(json!({"code": "abcdef"})), &schema);
        assert_eq!(
            report.messages("code").unwrap(),
            &[
                "exceeds maximum length of 3".to_string(),
                "does not match the required pattern".to_string(),
            ]
        );
    }

    #[test]
    fn unsupported_rule_fails_only_its_field() {
        let schema = Schema::from_fields([
            ("a", FieldSchema::new("string", "a").with_rule("unique", true)),
            ("b", FieldSchema::new("string", "b").with_rule("required", true)),
        ]);
        let report = validate(&record(json!({"a": "x", "b": "y"})), &schema);
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.message("a").as_deref(),
            Some("validation 'unique' not supported")
        );
    }

    #[test]
    fn custom_rule_is_dispatched_by_name() {
        let mut registry = RuleRegistry::with_builtins();
        registry.register("one_of", |_: &str, value: &Value, param: &Value| {
            let Value::List(allowed) = param else {
                return Some("has invalid parameter for 'one_of' validation".to_string());
            };
            (!value.is_absent() && !allowed.contains(value))
                .then(|| format!("must be one of {param}"))
        });
        let validator = Validator::new(Arc::new(registry));

        let schema = load_role_schema();
        assert!(validator.validate(&record(json!({"role": "admin"})), &schema).is_empty());
        let report = validator.validate(&record(json!({"role": "root"})), &schema);
        assert_eq!(
            report.message("role").as_deref(),
            Some(r#"must be one of ["admin","user"]"#)
        );
    }

    fn load_role_schema() -> Schema {
        crate::schema::load_schema(&json!({
            "role": {"type": "string", "validations": {"one_of": ["admin", "user"]}}
        }))
        .unwrap()
    }

    #[test]
    fn validation_does_not_mutate_inputs() {
        let schema = users();
        let input = record(json!({"count": 11, "email": "x"}));
        let (schema_before, input_before) = (schema.clone(), input.clone());
        let _ = validate(&input, &schema);
        assert_eq!(schema, schema_before);
        assert_eq!(input, input_before);
    }
}
