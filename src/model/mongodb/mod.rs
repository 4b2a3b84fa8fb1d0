mod collection;
mod counter;

pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
pub use counter::{
    ensure_counters_exist, Counter, ANSWER_IDS, QUESTION_IDS, SURVEY_IDS, USER_IDS,
};
