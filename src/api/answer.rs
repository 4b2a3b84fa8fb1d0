use std::collections::HashSet;

use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            answer::{AnswerDescription, AnswerSpec},
            auth::{AdminToken, AuthToken},
        },
        common::{AnswerId, QuestionId, SurveyId},
        db::{answer::Answer, question::Question, survey::Survey},
        mongodb::{Coll, Counter, ANSWER_IDS},
    },
};

use super::survey::{questions_for_survey, survey_by_id};

pub fn routes() -> Vec<Route> {
    routes![submit_answers, get_answers]
}

#[post("/surveys/<survey_id>/answers", data = "<specs>", format = "json")]
async fn submit_answers(
    token: AuthToken,
    survey_id: SurveyId,
    specs: Json<Vec<AnswerSpec>>,
    surveys: Coll<Survey>,
    questions: Coll<Question>,
    answers: Coll<Answer>,
    counters: Coll<Counter>,
) -> Result<Json<Vec<AnswerId>>> {
    survey_by_id(survey_id, &surveys).await?;

    // Ensure every answered question belongs to the survey before inserting
    // anything.
    let known: HashSet<QuestionId> = questions_for_survey(survey_id, &questions)
        .await?
        .into_iter()
        .map(|question| question.id)
        .collect();
    for spec in specs.0.iter() {
        if !known.contains(&spec.question_id) {
            return Err(Error::not_found(format!(
                "Question {} in survey {}",
                spec.question_id, survey_id
            )));
        }
    }

    // Sequential independent inserts; a mid-way failure leaves the earlier
    // answers in place.
    let mut inserted = Vec::with_capacity(specs.0.len());
    for spec in specs.0 {
        let id = Counter::next(&counters, ANSWER_IDS).await?;
        let answer = Answer {
            id,
            survey_id,
            question_id: spec.question_id,
            // The respondent's identity comes from the token, never the body.
            user_id: token.id,
            answer_text: spec.answer_text,
        };
        answers.insert_one(&answer, None).await?;
        inserted.push(id);
    }

    Ok(Json(inserted))
}

#[get("/surveys/<survey_id>/answers")]
async fn get_answers(
    _token: AdminToken,
    survey_id: SurveyId,
    surveys: Coll<Survey>,
    answers: Coll<Answer>,
) -> Result<Json<Vec<AnswerDescription>>> {
    survey_by_id(survey_id, &surveys).await?;

    let by_submission = FindOptions::builder().sort(doc! { "_id": 1 }).build();
    let rows: Vec<Answer> = answers
        .find(doc! { "survey_id": survey_id }, by_submission)
        .await?
        .try_collect()
        .await?;
    Ok(Json(rows.into_iter().map(AnswerDescription::from).collect()))
}
