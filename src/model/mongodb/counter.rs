use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::Coll;

/// Counter allocating user IDs.
pub const USER_IDS: &str = "user_ids";
/// Counter allocating survey IDs.
pub const SURVEY_IDS: &str = "survey_ids";
/// Counter allocating question IDs.
pub const QUESTION_IDS: &str = "question_ids";
/// Counter allocating answer IDs.
pub const ANSWER_IDS: &str = "answer_ids";

const ALL_COUNTERS: [&str; 4] = [USER_IDS, SURVEY_IDS, QUESTION_IDS, ANSWER_IDS];

/// A counter object used to implement auto-increment IDs, one per entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub next: u32,
}

impl Counter {
    /// Atomically retrieve the next value of the counter with the given name.
    pub async fn next(counters: &Coll<Counter>, name: &str) -> Result<u32> {
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options: FindOneAndUpdateOptions = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::Before)
            .build();
        let counter = counters
            .find_one_and_update(doc! { "_id": name }, update, options)
            .await?
            .ok_or_else(|| {
                Error::Status(
                    Status::InternalServerError,
                    format!("Failed to find counter {}", name),
                )
            })?;
        Ok(counter.next)
    }
}

/// Ensure every ID counter exists, starting at 1.
///
/// This operation is idempotent.
pub async fn ensure_counters_exist(counters: &Coll<Counter>) -> Result<()> {
    debug!("Ensuring ID counters exist");

    for name in ALL_COUNTERS {
        let existing = counters.find_one(doc! { "_id": name }, None).await?;
        if existing.is_none() {
            let counter = Counter {
                id: name.to_string(),
                next: 1,
            };
            counters.insert_one(counter, None).await?;
        }
    }

    Ok(())
}
