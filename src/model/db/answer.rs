use serde::{Deserialize, Serialize};

use crate::model::common::{AnswerId, QuestionId, SurveyId, UserId};

/// One respondent's submitted value for one question.
///
/// For text questions `answer_text` is free-form. For choice questions it
/// holds the selected options joined by a comma. Answers are insert-only;
/// duplicate submissions per (survey, question, user) are valid data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "_id")]
    pub id: AnswerId,
    pub survey_id: SurveyId,
    pub question_id: QuestionId,
    pub user_id: UserId,
    pub answer_text: String,
}
