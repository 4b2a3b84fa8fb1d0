//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - Datetimes are serialised as RFC 3339 strings.
//! - Question options are decoded into proper lists.

pub mod answer;
pub mod auth;
pub mod report;
pub mod survey;
