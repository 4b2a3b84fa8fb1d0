use chrono::Utc;
use mongodb::{bson::doc, options::FindOptions};
use rocket::{futures::TryStreamExt, http::Status, serde::json::Json, Route};

use crate::{
    error::{Error, Result},
    model::{
        api::{
            auth::{AdminToken, AuthToken},
            survey::{
                QuestionDescription, QuestionSpec, SurveyDescription, SurveySpec, SurveySummary,
            },
        },
        common::{QuestionId, SurveyId},
        db::{answer::Answer, question::Question, survey::Survey},
        mongodb::{Coll, Counter, QUESTION_IDS, SURVEY_IDS},
    },
};

pub fn routes() -> Vec<Route> {
    routes![
        create_survey,
        get_surveys,
        get_survey,
        update_survey,
        delete_survey,
        create_question,
        update_question,
        delete_question,
    ]
}

#[post("/surveys", data = "<spec>", format = "json")]
async fn create_survey(
    token: AdminToken,
    spec: Json<SurveySpec>,
    surveys: Coll<Survey>,
    counters: Coll<Counter>,
) -> Result<Json<SurveySummary>> {
    let id = Counter::next(&counters, SURVEY_IDS).await?;
    let survey = Survey {
        id,
        title: spec.0.title,
        created_by: token.0.id,
        created_at: Utc::now(),
    };
    surveys.insert_one(&survey, None).await?;
    Ok(Json(survey.into()))
}

#[get("/surveys")]
async fn get_surveys(_token: AuthToken, surveys: Coll<Survey>) -> Result<Json<Vec<SurveySummary>>> {
    let all: Vec<Survey> = surveys.find(None, None).await?.try_collect().await?;
    Ok(Json(all.into_iter().map(SurveySummary::from).collect()))
}

#[get("/surveys/<survey_id>")]
async fn get_survey(
    _token: AuthToken,
    survey_id: SurveyId,
    surveys: Coll<Survey>,
    questions: Coll<Question>,
) -> Result<Json<SurveyDescription>> {
    let survey = survey_by_id(survey_id, &surveys).await?;
    let questions = questions_for_survey(survey_id, &questions).await?;
    Ok(Json(SurveyDescription {
        survey: survey.into(),
        questions: questions.into_iter().map(QuestionDescription::from).collect(),
    }))
}

#[put("/surveys/<survey_id>", data = "<spec>", format = "json")]
async fn update_survey(
    _token: AdminToken,
    survey_id: SurveyId,
    spec: Json<SurveySpec>,
    surveys: Coll<Survey>,
) -> Result<()> {
    // Only the title is mutable.
    let update = doc! {
        "$set": { "title": &spec.title }
    };
    let result = surveys
        .update_one(doc! { "_id": survey_id }, update, None)
        .await?;
    if result.matched_count == 0 {
        return Err(Error::not_found(format!("Survey {}", survey_id)));
    }
    Ok(())
}

#[delete("/surveys/<survey_id>")]
async fn delete_survey(
    _token: AdminToken,
    survey_id: SurveyId,
    surveys: Coll<Survey>,
    questions: Coll<Question>,
    answers: Coll<Answer>,
) -> Result<()> {
    // The cascade is application-level: sequential independent deletes,
    // no transaction.
    let result = surveys.delete_one(doc! { "_id": survey_id }, None).await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!("Survey {}", survey_id)));
    }
    questions
        .delete_many(doc! { "survey_id": survey_id }, None)
        .await?;
    answers
        .delete_many(doc! { "survey_id": survey_id }, None)
        .await?;
    Ok(())
}

#[post("/surveys/<survey_id>/questions", data = "<spec>", format = "json")]
async fn create_question(
    _token: AdminToken,
    survey_id: SurveyId,
    spec: Json<QuestionSpec>,
    surveys: Coll<Survey>,
    questions: Coll<Question>,
    counters: Coll<Counter>,
) -> Result<Json<QuestionDescription>> {
    survey_by_id(survey_id, &surveys).await?;
    validate_spec(&spec)?;

    let id = Counter::next(&counters, QUESTION_IDS).await?;
    let question = spec.0.into_question(id, survey_id);
    questions.insert_one(&question, None).await?;
    Ok(Json(question.into()))
}

#[put("/questions/<question_id>", data = "<spec>", format = "json")]
async fn update_question(
    _token: AdminToken,
    question_id: QuestionId,
    spec: Json<QuestionSpec>,
    questions: Coll<Question>,
) -> Result<Json<QuestionDescription>> {
    let existing = questions
        .find_one(doc! { "_id": question_id }, None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Question {}", question_id)))?;
    validate_spec(&spec)?;

    // Text, type and options are all mutable in place.
    let question = spec.0.into_question(question_id, existing.survey_id);
    questions
        .replace_one(doc! { "_id": question_id }, &question, None)
        .await?;
    Ok(Json(question.into()))
}

#[delete("/questions/<question_id>")]
async fn delete_question(
    _token: AdminToken,
    question_id: QuestionId,
    questions: Coll<Question>,
    answers: Coll<Answer>,
) -> Result<()> {
    let result = questions
        .delete_one(doc! { "_id": question_id }, None)
        .await?;
    if result.deleted_count == 0 {
        return Err(Error::not_found(format!("Question {}", question_id)));
    }
    answers
        .delete_many(doc! { "question_id": question_id }, None)
        .await?;
    Ok(())
}

/// Reject choice questions with no declared options.
fn validate_spec(spec: &QuestionSpec) -> Result<()> {
    if !spec.is_valid() {
        return Err(Error::Status(
            Status::BadRequest,
            "A choice question must declare at least one option".to_string(),
        ));
    }
    Ok(())
}

/// Look up a survey, 404 if absent.
pub(super) async fn survey_by_id(survey_id: SurveyId, surveys: &Coll<Survey>) -> Result<Survey> {
    surveys
        .find_one(doc! { "_id": survey_id }, None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey {}", survey_id)))
}

/// All questions of a survey in stored (creation) order.
pub(super) async fn questions_for_survey(
    survey_id: SurveyId,
    questions: &Coll<Question>,
) -> Result<Vec<Question>> {
    let by_creation = FindOptions::builder().sort(doc! { "_id": 1 }).build();
    let questions = questions
        .find(doc! { "survey_id": survey_id }, by_creation)
        .await?
        .try_collect()
        .await?;
    Ok(questions)
}
