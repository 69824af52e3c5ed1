//! # Schema & Validation Engine
//!
//! A [`Schema`] is an ordered set of [`FieldSpec`]s describing one request
//! shape. Running it against raw JSON produces a [`ValidatedRequest`]: a
//! mapping from field name to parsed value plus the aggregated error list.
//!
//! ## Engine Invariants
//!
//! - Every field is visited; validation never stops at the first failure.
//! - A missing optional field is simply absent from the result.
//! - Empty-sentinel values are never parsed: they either error (field not
//!   nullable) or are skipped (field nullable).

use std::collections::HashMap;

use serde_json::Value;

use crate::field::{is_empty_sentinel, FieldSpec, FieldValue};

/// An ordered, immutable set of field descriptors for one request variant.
///
/// Built once per variant as a static; validation outcome does not depend
/// on registration order, only error ordering does.
#[derive(Debug)]
pub struct Schema {
    fields: &'static [FieldSpec],
}

impl Schema {
    /// Bind a schema to its field descriptors.
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// The field descriptors, in registration order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Run this schema against raw input.
    ///
    /// `raw` is usually a JSON object; any other shape behaves as an object
    /// with no keys, so every required field reports missing.
    pub fn validate(&self, raw: &Value) -> ValidatedRequest {
        let mut result = ValidatedRequest::new();
        for field in self.fields {
            let Some(value) = raw.get(field.name) else {
                if field.required {
                    result.push_error(format!("{}: field is required", field.name));
                }
                continue;
            };

            if is_empty_sentinel(value) {
                if !field.nullable {
                    result.push_error(format!("{}: field must not be empty", field.name));
                }
                continue;
            }

            match field.kind.parse(value) {
                Ok(parsed) => result.insert(field.name, parsed),
                Err(e) => result.push_error(format!("{}: {e}", field.name)),
            }
        }
        result
    }
}

/// The outcome of running a [`Schema`] against one raw input.
///
/// Owned by the call that produced it; either every accessor below is
/// usable (valid) or the caller surfaces [`ValidatedRequest::error_message`]
/// and discards it.
#[derive(Debug, Default)]
pub struct ValidatedRequest {
    values: HashMap<String, FieldValue>,
    supplied: Vec<String>,
    errors: Vec<String>,
}

impl ValidatedRequest {
    fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.supplied.push(name.to_owned());
        self.values.insert(name.to_owned(), value);
    }

    /// Append an error. Also used by cross-field constraints, which share
    /// the aggregated list with per-field errors.
    pub fn push_error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// True iff no violations were recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All recorded violations, in schema order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consume the result, yielding the violation list.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// The formatted error report: every violation joined with `", "`.
    pub fn error_message(&self) -> String {
        self.errors.join(", ")
    }

    /// Parsed value for a field, when it was supplied and parsed.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Remove and return a parsed value, for typed extraction.
    pub fn take(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    /// Names of the fields supplied with a non-empty, parsable value, in
    /// schema order.
    pub fn supplied_fields(&self) -> &[String] {
        &self.supplied
    }
}
