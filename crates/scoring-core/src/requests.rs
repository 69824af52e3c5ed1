//! # Request Variants
//!
//! The three concrete request shapes of the scoring API, each bound to a
//! static [`Schema`] and extracted into a typed struct once validation
//! passes:
//!
//! - [`MethodCall`] — the outer envelope carrying identity, method name and
//!   opaque arguments.
//! - [`OnlineScoreArgs`] — online-score arguments with the pairs
//!   cross-field constraint.
//! - [`ClientsInterestsArgs`] — clients-interests arguments.

use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::field::{FieldKind, FieldSpec, FieldValue, Gender};
use crate::schema::{Schema, ValidatedRequest};

/// The aggregated violations of one failed validation run.
///
/// Displays as the violations joined with `", "` — the wire error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<ValidatedRequest> for ValidationErrors {
    fn from(result: ValidatedRequest) -> Self {
        Self(result.into_errors())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

static ENVELOPE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "account",
        kind: FieldKind::Text,
        required: false,
        nullable: true,
    },
    FieldSpec {
        name: "login",
        kind: FieldKind::Text,
        required: true,
        nullable: true,
    },
    FieldSpec {
        name: "token",
        kind: FieldKind::Text,
        required: true,
        nullable: true,
    },
    FieldSpec {
        name: "arguments",
        kind: FieldKind::Arguments,
        required: true,
        nullable: true,
    },
    FieldSpec {
        name: "method",
        kind: FieldKind::Text,
        required: true,
        nullable: false,
    },
];

static ENVELOPE_SCHEMA: Schema = Schema::new(ENVELOPE_FIELDS);

/// A validated method-call envelope.
///
/// `login`, `token` and `arguments` are required but nullable on the wire:
/// an empty value passes validation and extracts to the empty default here,
/// so authentication and dispatch operate on concrete values either way.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub account: Option<String>,
    pub login: String,
    pub token: String,
    pub arguments: Map<String, Value>,
    pub method: String,
}

impl MethodCall {
    /// Validate a raw body against the envelope schema and extract it.
    pub fn from_value(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut result = ENVELOPE_SCHEMA.validate(raw);
        if !result.is_valid() {
            return Err(result.into());
        }
        Ok(Self {
            account: take_text(&mut result, "account"),
            login: take_text(&mut result, "login").unwrap_or_default(),
            token: take_text(&mut result, "token").unwrap_or_default(),
            arguments: match result.take("arguments") {
                Some(FieldValue::Map(m)) => m,
                _ => Map::new(),
            },
            method: take_text(&mut result, "method").unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Online score
// ---------------------------------------------------------------------------

static ONLINE_SCORE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "first_name",
        kind: FieldKind::Text,
        required: false,
        nullable: true,
    },
    FieldSpec {
        name: "last_name",
        kind: FieldKind::Text,
        required: false,
        nullable: true,
    },
    FieldSpec {
        name: "email",
        kind: FieldKind::Email,
        required: false,
        nullable: true,
    },
    FieldSpec {
        name: "phone",
        kind: FieldKind::Phone,
        required: false,
        nullable: true,
    },
    FieldSpec {
        name: "birthday",
        kind: FieldKind::Birthday,
        required: false,
        nullable: true,
    },
    FieldSpec {
        name: "gender",
        kind: FieldKind::Gender,
        required: false,
        nullable: true,
    },
];

static ONLINE_SCORE_SCHEMA: Schema = Schema::new(ONLINE_SCORE_FIELDS);

/// Attribute pairs of which at least one must be fully supplied for a
/// score to be computable: the subject must be identifiable one way.
pub const SCORE_PAIRS: [(&str, &str); 3] = [
    ("phone", "email"),
    ("first_name", "last_name"),
    ("gender", "birthday"),
];

/// Validated online-score arguments.
///
/// Every field is individually optional; the pairs constraint above is the
/// only structural requirement.
#[derive(Debug, Clone)]
pub struct OnlineScoreArgs {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<Gender>,
    /// Names of the supplied non-empty fields, in schema order. Recorded
    /// as an audit fact by the handler.
    pub supplied: Vec<String>,
}

impl OnlineScoreArgs {
    /// Validate raw arguments: per-field rules first, then the pairs
    /// cross-field constraint, all errors aggregated into one list.
    pub fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let raw = Value::Object(args.clone());
        let mut result = ONLINE_SCORE_SCHEMA.validate(&raw);

        let has_pair = SCORE_PAIRS
            .iter()
            .any(|(a, b)| result.get(a).is_some() && result.get(b).is_some());
        if !has_pair {
            let pairs = SCORE_PAIRS
                .map(|(a, b)| format!("({a}, {b})"))
                .join(" or ");
            result.push_error(format!(
                "at least one of the pairs {pairs} must be fully supplied"
            ));
        }

        if !result.is_valid() {
            return Err(result.into());
        }

        let supplied = result.supplied_fields().to_vec();
        Ok(Self {
            first_name: take_text(&mut result, "first_name"),
            last_name: take_text(&mut result, "last_name"),
            email: take_text(&mut result, "email"),
            phone: take_text(&mut result, "phone"),
            birthday: result.take("birthday").and_then(|v| v.as_date()),
            gender: result.take("gender").and_then(|v| v.as_gender()),
            supplied,
        })
    }
}

// ---------------------------------------------------------------------------
// Clients interests
// ---------------------------------------------------------------------------

static CLIENTS_INTERESTS_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "client_ids",
        kind: FieldKind::ClientIds,
        required: true,
        nullable: false,
    },
    FieldSpec {
        name: "date",
        kind: FieldKind::Date,
        required: false,
        nullable: true,
    },
];

static CLIENTS_INTERESTS_SCHEMA: Schema = Schema::new(CLIENTS_INTERESTS_FIELDS);

/// Validated clients-interests arguments.
#[derive(Debug, Clone)]
pub struct ClientsInterestsArgs {
    pub client_ids: Vec<i64>,
    pub date: Option<NaiveDate>,
}

impl ClientsInterestsArgs {
    /// Validate raw arguments against the clients-interests schema.
    pub fn from_args(args: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let raw = Value::Object(args.clone());
        let mut result = CLIENTS_INTERESTS_SCHEMA.validate(&raw);
        if !result.is_valid() {
            return Err(result.into());
        }
        Ok(Self {
            client_ids: match result.take("client_ids") {
                Some(FieldValue::ClientIds(ids)) => ids,
                _ => Vec::new(),
            },
            date: result.take("date").and_then(|v| v.as_date()),
        })
    }
}

fn take_text(result: &mut ValidatedRequest, name: &str) -> Option<String> {
    match result.take(name) {
        Some(FieldValue::Text(s)) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    // ---- envelope ----

    #[test]
    fn envelope_extracts_all_fields() {
        let call = MethodCall::from_value(&json!({
            "account": "horns&hoofs",
            "login": "h&f",
            "token": "55cc",
            "arguments": {"phone": "79175002040"},
            "method": "online_score",
        }))
        .unwrap();
        assert_eq!(call.account.as_deref(), Some("horns&hoofs"));
        assert_eq!(call.login, "h&f");
        assert_eq!(call.token, "55cc");
        assert_eq!(call.method, "online_score");
        assert_eq!(call.arguments.len(), 1);
    }

    #[test]
    fn envelope_missing_required_fields_aggregates_errors() {
        let errors = MethodCall::from_value(&json!({"account": "x"})).unwrap_err();
        assert_eq!(
            errors.as_slice(),
            [
                "login: field is required",
                "token: field is required",
                "arguments: field is required",
                "method: field is required",
            ]
        );
    }

    #[test]
    fn envelope_accepts_nullable_empties_with_defaults() {
        let call = MethodCall::from_value(&json!({
            "login": "",
            "token": "",
            "arguments": {},
            "method": "online_score",
        }))
        .unwrap();
        assert_eq!(call.login, "");
        assert_eq!(call.token, "");
        assert!(call.arguments.is_empty());
        assert!(call.account.is_none());
    }

    #[test]
    fn envelope_rejects_empty_method() {
        let errors = MethodCall::from_value(&json!({
            "login": "a",
            "token": "b",
            "arguments": {},
            "method": "",
        }))
        .unwrap_err();
        assert_eq!(errors.as_slice(), ["method: field must not be empty"]);
    }

    #[test]
    fn envelope_rejects_non_object_arguments() {
        let errors = MethodCall::from_value(&json!({
            "login": "a",
            "token": "b",
            "arguments": [1, 2],
            "method": "m",
        }))
        .unwrap_err();
        assert_eq!(errors.as_slice(), ["arguments: expected an object value"]);
    }

    // ---- online score ----

    #[test]
    fn score_args_accept_one_full_pair() {
        let parsed = OnlineScoreArgs::from_args(&args(json!({
            "gender": 1,
            "birthday": "01.01.1990",
        })))
        .unwrap();
        assert_eq!(parsed.gender, Some(Gender::Male));
        assert_eq!(
            parsed.birthday,
            NaiveDate::from_ymd_opt(1990, 1, 1)
        );
        assert_eq!(parsed.supplied, ["birthday", "gender"]);
    }

    #[test]
    fn score_args_reject_a_lone_half_pair() {
        let errors = OnlineScoreArgs::from_args(&args(json!({"first_name": "A"}))).unwrap_err();
        let message = errors.to_string();
        assert!(message.contains("(phone, email)"), "got: {message}");
        assert!(message.contains("(first_name, last_name)"), "got: {message}");
        assert!(message.contains("(gender, birthday)"), "got: {message}");
    }

    #[test]
    fn score_args_gender_unknown_counts_as_supplied() {
        // Gender 0 is a value, not an empty sentinel.
        let parsed = OnlineScoreArgs::from_args(&args(json!({
            "gender": 0,
            "birthday": "01.01.2000",
        })))
        .unwrap();
        assert_eq!(parsed.gender, Some(Gender::Unknown));
    }

    #[test]
    fn score_args_empty_half_of_pair_does_not_satisfy_it() {
        let errors = OnlineScoreArgs::from_args(&args(json!({
            "phone": "79175002040",
            "email": "",
        })))
        .unwrap_err();
        assert!(errors.to_string().contains("pairs"));
    }

    #[test]
    fn score_args_field_errors_and_pairs_error_aggregate() {
        let errors = OnlineScoreArgs::from_args(&args(json!({
            "email": "broken",
            "phone": "123",
        })))
        .unwrap_err();
        assert_eq!(errors.as_slice().len(), 3, "got: {errors}");
    }

    #[test]
    fn score_args_full_payload_extracts_every_field() {
        let parsed = OnlineScoreArgs::from_args(&args(json!({
            "first_name": "a",
            "last_name": "b",
            "email": "a@b.ru",
            "phone": 79175002040_i64,
            "birthday": "01.01.1990",
            "gender": 2,
        })))
        .unwrap();
        assert_eq!(parsed.phone.as_deref(), Some("79175002040"));
        assert_eq!(parsed.supplied.len(), 6);
    }

    // ---- clients interests ----

    #[test]
    fn interests_args_require_client_ids() {
        let errors = ClientsInterestsArgs::from_args(&args(json!({}))).unwrap_err();
        assert_eq!(errors.as_slice(), ["client_ids: field is required"]);

        let errors = ClientsInterestsArgs::from_args(&args(json!({"client_ids": []})))
            .unwrap_err();
        assert_eq!(errors.as_slice(), ["client_ids: field must not be empty"]);
    }

    #[test]
    fn interests_args_extract_ids_and_optional_date() {
        let parsed = ClientsInterestsArgs::from_args(&args(json!({
            "client_ids": [1, 2, 3],
            "date": "19.07.2017",
        })))
        .unwrap();
        assert_eq!(parsed.client_ids, [1, 2, 3]);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2017, 7, 19));

        let parsed =
            ClientsInterestsArgs::from_args(&args(json!({"client_ids": [0]}))).unwrap();
        assert_eq!(parsed.client_ids, [0]);
        assert!(parsed.date.is_none());
    }

    #[test]
    fn interests_args_reject_non_integer_ids() {
        let errors = ClientsInterestsArgs::from_args(&args(json!({
            "client_ids": [1, "2"],
            "date": "XXX",
        })))
        .unwrap_err();
        assert_eq!(errors.as_slice().len(), 2);
    }
}
