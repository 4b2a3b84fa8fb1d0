use serde::{Deserialize, Serialize};

use crate::model::{
    common::{QuestionId, QuestionType, SurveyId},
    options::decode_options,
};

/// A single question belonging to a survey.
///
/// The option list is kept in its raw stored string form and decoded on
/// demand, so the stored form is the single source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: QuestionId,
    /// The survey this question belongs to.
    pub survey_id: SurveyId,
    /// Question text.
    pub text: String,
    /// Question type; unknown stored values decode as `text`.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Candidate answers in their stored string form. Empty for `text`
    /// questions.
    pub options: Option<String>,
}

impl Question {
    /// The decoded option list. Recomputed from the stored form on each
    /// access to avoid divergence.
    pub fn options_list(&self) -> Vec<String> {
        decode_options(self.options.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::options::encode_options;

    #[test]
    fn options_decode_from_stored_form() {
        let question = Question {
            id: 1,
            survey_id: 1,
            text: "Favourite colour?".to_string(),
            question_type: QuestionType::Choice,
            options: Some(encode_options(&[
                "Red".to_string(),
                "Green".to_string(),
            ])),
        };
        assert_eq!(vec!["Red", "Green"], question.options_list());

        let text_question = Question {
            id: 2,
            survey_id: 1,
            text: "Any comments?".to_string(),
            question_type: QuestionType::Text,
            options: None,
        };
        assert!(text_question.options_list().is_empty());
    }
}
