//! Overlaying persisted override values onto catalog field schemas

use serde_json::{Number, Value};

use crate::catalog::ModuleMetadata;
use crate::overrides::OverrideDocument;

/// Shape of a raw override `value`.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue<'a> {
    Null,
    Bool(bool),
    Number(&'a Number),
    Text(&'a str),
    /// An array or object, kept as JSON
    Container(&'a Value),
}

impl<'a> From<&'a Value> for OverrideValue<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            Value::Array(_) | Value::Object(_) => Self::Container(value),
        }
    }
}

/// Render an override value as a field's string `configValue`.
///
/// Booleans become `"true"`/`"false"`, containers their compact JSON text with
/// non-ASCII characters left literal, numbers their decimal text and strings
/// pass through unchanged.
pub fn coerce_config_value(value: OverrideValue<'_>) -> String {
    match value {
        OverrideValue::Null => Value::Null.to_string(),
        OverrideValue::Bool(b) => b.to_string(),
        OverrideValue::Number(n) => n.to_string(),
        OverrideValue::Text(s) => s.to_string(),
        OverrideValue::Container(v) => v.to_string(),
    }
}

/// Apply `overrides` to a deep copy of `baseline`.
///
/// Only `configValue` changes. Field order is preserved, and modules or fields
/// that the baseline does not define are ignored.
pub fn merge_overrides(baseline: &ModuleMetadata, overrides: &OverrideDocument) -> ModuleMetadata {
    let mut merged = baseline.clone();

    for (module_code, fields) in merged.iter_mut() {
        let Some(values) = overrides.module(module_code) else {
            continue;
        };
        for field in fields.iter_mut() {
            if let Some(value) = values.get(&field.code) {
                field.config_value = coerce_config_value(value.into());
            }
        }
    }

    merged
}
