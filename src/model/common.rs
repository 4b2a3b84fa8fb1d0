//! Identifier types and enumerations shared between the DB and API layers.

use std::fmt::Display;

use mongodb::bson::{self, Bson};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Our user IDs are integers.
pub type UserId = u32;
/// Our survey IDs are integers.
pub type SurveyId = u32;
/// Our question IDs are integers.
pub type QuestionId = u32;
/// Our answer IDs are integers.
pub type AnswerId = u32;

/// The role of an account, which decides what it is allowed to do.
/// Regular users take surveys; admins also author them and read reports.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Role {
    User = 0,
    Admin = 1,
}

impl Display for Role {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::User => "user",
                Self::Admin => "admin",
            }
        )
    }
}

impl From<Role> for Bson {
    fn from(role: Role) -> Self {
        bson::to_bson(&role).unwrap() // Infallible.
    }
}

/// The type of a question: free text or a choice between declared options.
///
/// Deserialisation is deliberately permissive: any stored value other than
/// `choice` is treated as `text`, so pre-existing or partially-migrated data
/// never fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum QuestionType {
    Text,
    Choice,
}

impl From<String> for QuestionType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "choice" => Self::Choice,
            _ => Self::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn question_type_decodes_permissively() {
        let choice: QuestionType = serde_json::from_value(json!("choice")).unwrap();
        assert_eq!(QuestionType::Choice, choice);

        let text: QuestionType = serde_json::from_value(json!("text")).unwrap();
        assert_eq!(QuestionType::Text, text);

        // Unknown values fall back to text rather than failing.
        let unknown: QuestionType = serde_json::from_value(json!("ranked")).unwrap();
        assert_eq!(QuestionType::Text, unknown);

        let empty: QuestionType = serde_json::from_value(json!("")).unwrap();
        assert_eq!(QuestionType::Text, empty);
    }

    #[test]
    fn question_type_serialises_lowercase() {
        assert_eq!(json!("choice"), serde_json::to_value(QuestionType::Choice).unwrap());
        assert_eq!(json!("text"), serde_json::to_value(QuestionType::Text).unwrap());
    }
}
