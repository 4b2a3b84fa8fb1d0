//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in a DB-friendly way, e.g.:
//!
//! - IDs live in the `_id` field.
//! - Datetimes are serialised in MongoDB's own format.
//! - Question options are kept in their raw stored string form.

pub mod answer;
pub mod question;
pub mod survey;
pub mod user;

pub use answer::Answer;
pub use question::Question;
pub use survey::Survey;
pub use user::{User, UserCore};
