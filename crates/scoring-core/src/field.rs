//! # Field Primitives
//!
//! A field is a named, typed validation rule applied to one input value.
//! Each [`FieldKind`] defines a pure `parse` function from raw JSON to a
//! typed [`FieldValue`]. Requiredness and nullability are enforced by the
//! schema engine, not here: an empty string is structurally valid text.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum age, in years, accepted by the birthday rule.
pub const AGE_LIMIT: i32 = 70;

/// Wire format for dates: day.month.year.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^7\d{10}$").unwrap());

/// Shape pre-check for `DD.MM.YYYY` input. Rejects five-digit years and
/// other near-miss formats before chrono sees the string, and guarantees
/// that a parsed date re-formats byte-for-byte to the original input.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").unwrap());

/// Gender code carried by online-score requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Decode a wire integer (`0`, `1` or `2`).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }

    /// The wire integer for this gender.
    pub fn code(&self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Male => 1,
            Self::Female => 2,
        }
    }

    /// Human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// A single field's parse failure. The schema engine prefixes the field
/// name when aggregating, so messages here describe only the rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The value is not a JSON string.
    #[error("expected a string value")]
    ExpectedString,

    /// The value is not a JSON object.
    #[error("expected an object value")]
    ExpectedObject,

    /// The value does not look like `local@domain`.
    #[error("email validation failed")]
    InvalidEmail,

    /// The value is not 11 digits starting with 7.
    #[error("phone validation failed, expected 11 digits starting with 7")]
    InvalidPhone,

    /// The value is not a parsable `DD.MM.YYYY` calendar date.
    #[error("date validation failed, expected DD.MM.YYYY")]
    InvalidDate,

    /// The date is more than [`AGE_LIMIT`] years in the past.
    #[error("age limit validation failed, maximum is {AGE_LIMIT} years")]
    AgeLimitExceeded,

    /// The value is not one of the gender codes 0, 1, 2.
    #[error("gender validation failed, expected 0, 1 or 2")]
    InvalidGender,

    /// The value is not a list made up entirely of integers.
    #[error("expected a list of integer values")]
    ExpectedIntegerList,
}

/// Discriminator selecting the parse rule for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON string, including the empty string.
    Text,
    /// A JSON object, carried opaquely for method-specific validation.
    Arguments,
    /// A string matching the `local@domain` email pattern.
    Email,
    /// Eleven digits starting with `7`; integer input is accepted and
    /// rendered to its decimal digits first.
    Phone,
    /// A `DD.MM.YYYY` calendar date.
    Date,
    /// A `DD.MM.YYYY` date no more than [`AGE_LIMIT`] years in the past.
    Birthday,
    /// An integer gender code: 0 unknown, 1 male, 2 female.
    Gender,
    /// A list whose every element is an integer.
    ClientIds,
}

/// Descriptor for one field of a request schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key looked up in the raw input. Unique within a schema.
    pub name: &'static str,
    /// Parse rule applied to a present, non-empty value.
    pub kind: FieldKind,
    /// A missing key is an error when set.
    pub required: bool,
    /// An empty-sentinel value is accepted (and skipped) when set.
    pub nullable: bool,
}

/// A successfully parsed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Map(Map<String, Value>),
    Date(NaiveDate),
    Gender(Gender),
    ClientIds(Vec<i64>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_gender(&self) -> Option<Gender> {
        match self {
            Self::Gender(g) => Some(*g),
            _ => None,
        }
    }

    pub fn as_client_ids(&self) -> Option<&[i64]> {
        match self {
            Self::ClientIds(ids) => Some(ids),
            _ => None,
        }
    }
}

impl FieldKind {
    /// Parse a raw JSON value under this kind's rule.
    ///
    /// Pure: the only ambient input is the current year, used by the
    /// birthday age bound.
    pub fn parse(&self, value: &Value) -> Result<FieldValue, ParseError> {
        match self {
            Self::Text => parse_text(value),
            Self::Arguments => parse_arguments(value),
            Self::Email => parse_email(value),
            Self::Phone => parse_phone(value),
            Self::Date => parse_date(value),
            Self::Birthday => parse_birthday(value),
            Self::Gender => parse_gender(value),
            Self::ClientIds => parse_client_ids(value),
        }
    }
}

/// The values the engine treats as semantically empty: JSON null, the
/// empty string, the empty array and the empty object. Enumerated
/// explicitly — emptiness of one type never bleeds into another, and a
/// numeric `0` is never empty.
pub fn is_empty_sentinel(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    }
}

fn parse_text(value: &Value) -> Result<FieldValue, ParseError> {
    value
        .as_str()
        .map(|s| FieldValue::Text(s.to_owned()))
        .ok_or(ParseError::ExpectedString)
}

fn parse_arguments(value: &Value) -> Result<FieldValue, ParseError> {
    value
        .as_object()
        .map(|m| FieldValue::Map(m.clone()))
        .ok_or(ParseError::ExpectedObject)
}

fn parse_email(value: &Value) -> Result<FieldValue, ParseError> {
    let s = value.as_str().ok_or(ParseError::InvalidEmail)?;
    if !EMAIL_RE.is_match(s) {
        return Err(ParseError::InvalidEmail);
    }
    Ok(FieldValue::Text(s.to_owned()))
}

fn parse_phone(value: &Value) -> Result<FieldValue, ParseError> {
    let digits = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        _ => return Err(ParseError::InvalidPhone),
    };
    if !PHONE_RE.is_match(&digits) {
        return Err(ParseError::InvalidPhone);
    }
    Ok(FieldValue::Text(digits))
}

fn parse_date(value: &Value) -> Result<FieldValue, ParseError> {
    let s = value.as_str().ok_or(ParseError::InvalidDate)?;
    if !DATE_RE.is_match(s) {
        return Err(ParseError::InvalidDate);
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map(FieldValue::Date)
        .map_err(|_| ParseError::InvalidDate)
}

fn parse_birthday(value: &Value) -> Result<FieldValue, ParseError> {
    let parsed = parse_date(value)?;
    let FieldValue::Date(date) = parsed else {
        return Err(ParseError::InvalidDate);
    };
    // Year arithmetic only, matching the wire contract: a birthday is
    // rejected when current_year - birth_year exceeds the limit.
    if Utc::now().year() - date.year() > AGE_LIMIT {
        return Err(ParseError::AgeLimitExceeded);
    }
    Ok(FieldValue::Date(date))
}

fn parse_gender(value: &Value) -> Result<FieldValue, ParseError> {
    let code = match value {
        Value::Number(n) => n.as_i64().ok_or(ParseError::InvalidGender)?,
        _ => return Err(ParseError::InvalidGender),
    };
    Gender::from_code(code)
        .map(FieldValue::Gender)
        .ok_or(ParseError::InvalidGender)
}

fn parse_client_ids(value: &Value) -> Result<FieldValue, ParseError> {
    let items = value.as_array().ok_or(ParseError::ExpectedIntegerList)?;
    let mut ids = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Number(n) if n.is_i64() || n.is_u64() => {
                ids.push(n.as_i64().ok_or(ParseError::ExpectedIntegerList)?);
            }
            _ => return Err(ParseError::ExpectedIntegerList),
        }
    }
    Ok(FieldValue::ClientIds(ids))
}
