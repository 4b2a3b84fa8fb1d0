use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{QuestionId, QuestionType, SurveyId, UserId},
    db::{question::Question, survey::Survey},
    options::encode_options,
};

/// A survey as submitted by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySpec {
    pub title: String,
}

/// A question as submitted by an admin, with its options as a proper list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
}

impl QuestionSpec {
    /// Is this spec acceptable? Choice questions must declare at least one
    /// option.
    pub fn is_valid(&self) -> bool {
        self.question_type != QuestionType::Choice || !self.options.is_empty()
    }

    /// Convert into a DB question under the given survey, encoding the
    /// options into their stored form.
    pub fn into_question(self, id: QuestionId, survey_id: SurveyId) -> Question {
        Question {
            id,
            survey_id,
            text: self.text,
            question_type: self.question_type,
            options: Some(encode_options(&self.options)),
        }
    }
}

/// Top-level survey metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub id: SurveyId,
    pub title: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<Survey> for SurveySummary {
    fn from(survey: Survey) -> Self {
        Self {
            id: survey.id,
            title: survey.title,
            created_by: survey.created_by,
            created_at: survey.created_at,
        }
    }
}

/// A question with its options decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDescription {
    pub id: QuestionId,
    pub survey_id: SurveyId,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
}

impl From<Question> for QuestionDescription {
    fn from(question: Question) -> Self {
        let options = question.options_list();
        Self {
            id: question.id,
            survey_id: question.survey_id,
            text: question.text,
            question_type: question.question_type,
            options,
        }
    }
}

/// A full survey: metadata plus its questions in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyDescription {
    #[serde(flatten)]
    pub survey: SurveySummary,
    pub questions: Vec<QuestionDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_specs_require_options() {
        let spec = QuestionSpec {
            text: "Favourite colour?".to_string(),
            question_type: QuestionType::Choice,
            options: Vec::new(),
        };
        assert!(!spec.is_valid());

        let spec = QuestionSpec {
            options: vec!["Red".to_string()],
            ..spec
        };
        assert!(spec.is_valid());
    }

    #[test]
    fn text_specs_need_no_options() {
        let spec = QuestionSpec {
            text: "Any comments?".to_string(),
            question_type: QuestionType::Text,
            options: Vec::new(),
        };
        assert!(spec.is_valid());
    }

    #[test]
    fn spec_round_trips_through_db_question() {
        let spec = QuestionSpec {
            text: "Favourite colour?".to_string(),
            question_type: QuestionType::Choice,
            options: vec!["Red".to_string(), "Green".to_string()],
        };
        let question = spec.clone().into_question(3, 1);
        let description = QuestionDescription::from(question);
        assert_eq!(spec.text, description.text);
        assert_eq!(spec.question_type, description.question_type);
        assert_eq!(spec.options, description.options);
    }
}
