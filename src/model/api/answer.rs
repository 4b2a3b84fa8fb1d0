use serde::{Deserialize, Serialize};

use crate::model::{
    common::{AnswerId, QuestionId, UserId},
    db::answer::Answer,
};

/// One answer as submitted by a respondent. The submitting user is taken
/// from the auth token, never from the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSpec {
    pub question_id: QuestionId,
    pub answer_text: String,
}

/// A raw answer row as returned to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDescription {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub user_id: UserId,
    pub answer_text: String,
}

impl From<Answer> for AnswerDescription {
    fn from(answer: Answer) -> Self {
        Self {
            id: answer.id,
            question_id: answer.question_id,
            user_id: answer.user_id,
            answer_text: answer.answer_text,
        }
    }
}
