use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, serde::json::Json, Route};

use crate::{
    error::Result,
    model::{
        api::{auth::AdminToken, report::SurveyReport},
        common::SurveyId,
        db::{answer::Answer, question::Question, survey::Survey},
        mongodb::Coll,
    },
};

use super::survey::{questions_for_survey, survey_by_id};

pub fn routes() -> Vec<Route> {
    routes![survey_report]
}

/// Compute the aggregate report for a survey.
///
/// The three reads are independent, so a report computed while submissions
/// are in flight may observe a partial answer set. The aggregation itself
/// is a pure in-memory transform, recomputed fresh on every request.
#[get("/surveys/<survey_id>/report")]
async fn survey_report(
    _token: AdminToken,
    survey_id: SurveyId,
    surveys: Coll<Survey>,
    questions: Coll<Question>,
    answers: Coll<Answer>,
) -> Result<Json<SurveyReport>> {
    let survey = survey_by_id(survey_id, &surveys).await?;
    let questions = questions_for_survey(survey_id, &questions).await?;

    let by_submission = FindOptions::builder().sort(doc! { "_id": 1 }).build();
    let answers: Vec<Answer> = answers
        .find(doc! { "survey_id": survey_id }, by_submission)
        .await?
        .try_collect()
        .await?;

    Ok(Json(SurveyReport::generate(survey, questions, &answers)))
}
