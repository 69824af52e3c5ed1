//! # scoring-core — Declarative Request Validation
//!
//! Turns raw, untyped JSON input into checked, typed request objects with
//! aggregated error reporting. Three layers, leaves first:
//!
//! - [`field`] — per-value parse rules ([`FieldKind`]) producing typed
//!   [`FieldValue`]s, plus the explicit empty-sentinel predicate.
//! - [`schema`] — ordered field sets ([`Schema`]) and the validation engine
//!   that runs them, collecting every violation before reporting.
//! - [`requests`] — the concrete request shapes (method-call envelope,
//!   online-score arguments, clients-interests arguments) with their
//!   cross-field constraints and typed extraction structs.
//!
//! ## Error Reporting Contract
//!
//! Validation never short-circuits: the caller sees every violation in one
//! pass, joined with `", "` for display. A request is valid iff its
//! aggregated error list is empty.
//!
//! ## Crate Policy
//!
//! - Pure computation only — no I/O, no clocks beyond the birthday age
//!   bound, no global mutable state.
//! - Schemas are immutable statics built once per request variant.

pub mod field;
pub mod requests;
pub mod schema;

pub use field::{FieldKind, FieldSpec, FieldValue, Gender, ParseError, AGE_LIMIT, DATE_FORMAT};
pub use requests::{ClientsInterestsArgs, MethodCall, OnlineScoreArgs, ValidationErrors};
pub use schema::{Schema, ValidatedRequest};
