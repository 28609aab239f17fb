//! # Schema Model
//!
//! Passive description of the fields a record may carry and the named rules
//! each field must satisfy. No validation logic lives here.
//!
//! ## Source Format
//!
//! The flat form maps field names straight to field entries:
//!
//! ```json
//! {
//!   "email": {
//!     "type": "string",
//!     "label": "email",
//!     "validations": { "pattern": "^[^@]+@[^@]+$", "required": true }
//!   }
//! }
//! ```
//!
//! The JSON-Schema-like envelope nests the same map under `properties` and
//! may carry `title`, `description` and a `required` list:
//!
//! ```json
//! { "title": "member", "type": "object",
//!   "properties": { "email": { "type": "string", "validations": {} } },
//!   "required": ["email"] }
//! ```
//!
//! A top-level `properties` mapping selects the envelope form, so a field
//! literally named `properties` can only be declared inside an envelope.
//! Names in the envelope `required` list gain `required: true` unless the
//! field already declares a `required` rule.
//!
//! `validations` is the one bit-exact contract: a flat mapping of rule name
//! to parameter. Anything else is a [`SchemaParseError`].

use std::collections::btree_map;
use std::collections::BTreeMap;

use fieldcheck_core::{Record, SchemaParseError, Value};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// One schema entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FieldSchema {
    /// Semantic type tag. Informational only, never used to coerce values.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Display name.
    pub label: String,
    /// Rule name → rule parameter.
    pub validations: BTreeMap<String, Value>,
}

impl FieldSchema {
    pub fn new(field_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            label: label.into(),
            validations: BTreeMap::new(),
        }
    }

    /// Add (or replace) a rule.
    pub fn with_rule(mut self, rule: impl Into<String>, param: impl Into<Value>) -> Self {
        self.validations.insert(rule.into(), param.into());
        self
    }

    pub fn validations(&self) -> &BTreeMap<String, Value> {
        &self.validations
    }

    pub fn has_rule(&self, rule: &str) -> bool {
        self.validations.contains_key(rule)
    }

    /// The label, or `fallback` (normally the field name) when no label was given.
    pub fn display_label<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.label.is_empty() {
            fallback
        } else {
            &self.label
        }
    }
}

/// An immutable mapping from field name to [`FieldSchema`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "properties")]
    fields: BTreeMap<String, FieldSchema>,
}

impl Schema {
    /// Build a schema from `(name, field)` pairs.
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldSchema)>,
        K: Into<String>,
    {
        Self {
            title: None,
            description: None,
            fields: fields.into_iter().map(|(k, f)| (k.into(), f)).collect(),
        }
    }

    /// Parse a schema from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaParseError::Malformed`] if the text is not JSON, and
    /// any [`load_schema`] error for a structurally invalid description.
    pub fn from_json_str(source: &str) -> Result<Self, SchemaParseError> {
        let value: JsonValue =
            serde_json::from_str(source).map_err(|e| SchemaParseError::Malformed {
                reason: format!("invalid JSON: {e}"),
            })?;
        load_schema(&value)
    }

    /// Parse a schema from YAML text.
    pub fn from_yaml_str(source: &str) -> Result<Self, SchemaParseError> {
        let value = serde_yaml::from_str::<JsonValue>(source).map_err(|e| SchemaParseError::Malformed {
            reason: format!("invalid YAML: {e}"),
        })?;
        load_schema(&value)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&FieldSchema> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldSchema> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A blank record with every declared field set to the empty string.
    ///
    /// Used by read endpoints to advertise the column set of a table.
    pub fn blank_record(&self) -> Record {
        self.fields.keys().map(|name| (name.clone(), "")).collect()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a String, &'a FieldSchema);
    type IntoIter = btree_map::Iter<'a, String, FieldSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Load a schema from a pre-parsed source description.
///
/// # Errors
///
/// Returns a [`SchemaParseError`] if the root (or envelope `properties`) is
/// not a mapping, a field entry is not a mapping, a field's `validations`
/// is not a mapping, `type`/`label` are not strings, or the envelope
/// `required` list names undeclared fields.
pub fn load_schema(source: &JsonValue) -> Result<Schema, SchemaParseError> {
    let root = source
        .as_object()
        .ok_or(SchemaParseError::RootNotMapping {
            found: json_kind(source),
        })?;

    let Some(JsonValue::Object(properties)) = root.get("properties") else {
        return Ok(Schema {
            title: None,
            description: None,
            fields: parse_fields(root)?,
        });
    };

    let mut fields = parse_fields(properties)?;

    match root.get("required") {
        None | Some(JsonValue::Null) => {}
        Some(JsonValue::Array(names)) => {
            for name in names {
                let name = name.as_str().ok_or_else(|| SchemaParseError::InvalidRequiredList {
                    reason: format!("expected field names, found {}", json_kind(name)),
                })?;
                let field = fields.get_mut(name).ok_or_else(|| {
                    SchemaParseError::InvalidRequiredList {
                        reason: format!("'{name}' is not a declared property"),
                    }
                })?;
                field
                    .validations
                    .entry("required".to_string())
                    .or_insert(Value::Bool(true));
            }
        }
        Some(other) => {
            return Err(SchemaParseError::InvalidRequiredList {
                reason: format!("expected a list, found {}", json_kind(other)),
            })
        }
    }

    Ok(Schema {
        title: root.get("title").and_then(JsonValue::as_str).map(str::to_string),
        description: root
            .get("description")
            .and_then(JsonValue::as_str)
            .map(str::to_string),
        fields,
    })
}

fn parse_fields(
    entries: &serde_json::Map<String, JsonValue>,
) -> Result<BTreeMap<String, FieldSchema>, SchemaParseError> {
    entries
        .iter()
        .map(|(name, raw)| parse_field(name, raw).map(|field| (name.clone(), field)))
        .collect()
}

fn parse_field(name: &str, raw: &JsonValue) -> Result<FieldSchema, SchemaParseError> {
    let entry = raw.as_object().ok_or_else(|| SchemaParseError::FieldNotMapping {
        field: name.to_string(),
        found: json_kind(raw),
    })?;

    let validations = match entry.get("validations") {
        None | Some(JsonValue::Null) => BTreeMap::new(),
        Some(JsonValue::Object(rules)) => rules
            .iter()
            .map(|(rule, param)| (rule.clone(), Value::from(param)))
            .collect(),
        Some(other) => {
            return Err(SchemaParseError::ValidationsNotMapping {
                field: name.to_string(),
                found: json_kind(other),
            })
        }
    };

    Ok(FieldSchema {
        field_type: string_attribute(name, entry, "type")?,
        label: string_attribute(name, entry, "label")?,
        validations,
    })
}

fn string_attribute(
    field: &str,
    entry: &serde_json::Map<String, JsonValue>,
    attribute: &'static str,
) -> Result<String, SchemaParseError> {
    match entry.get(attribute) {
        None | Some(JsonValue::Null) => Ok(String::new()),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(_) => Err(SchemaParseError::AttributeNotString {
            field: field.to_string(),
            attribute,
        }),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "mapping",
    }
}
