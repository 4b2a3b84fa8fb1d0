//! Report aggregation: the pure transform from raw survey, question and
//! answer rows into per-question statistics.
//!
//! This is a stateless computation over already-fetched data. It performs
//! no I/O, never fails, and degrades to empty collections on missing or
//! malformed input, so a structurally complete report comes back for any
//! survey.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{
    common::QuestionType,
    db::{answer::Answer, question::Question, survey::Survey},
    options::decode_selection,
};

use super::survey::{QuestionDescription, SurveySummary};

/// The tally for one declared option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionCount {
    pub option: String,
    pub count: u32,
    /// Share of this option among the question's answers, rounded to the
    /// nearest whole percent. Display-only.
    pub percent: u32,
}

/// Aggregated statistics for one question across all its answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerQuestionStats {
    pub question: QuestionDescription,
    /// Count of answer rows for this question, including empty ones.
    pub total_answers: u32,
    /// Non-empty free-text answers in submission order (text questions).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_answers: Option<Vec<String>>,
    /// Tallies for every declared option, in declared order, including
    /// options nobody selected (choice questions).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_counts: Option<Vec<OptionCount>>,
}

impl PerQuestionStats {
    /// Aggregate all answers belonging to the given question.
    ///
    /// Selection values that do not exactly match a declared option are
    /// dropped without being counted; there is deliberately no "other"
    /// bucket.
    pub fn tally(question: Question, answers: &[Answer]) -> Self {
        let matching = answers
            .iter()
            .filter(|answer| answer.question_id == question.id)
            .collect::<Vec<_>>();
        // Rows count towards the total even when their text is empty.
        let total_answers = matching.len() as u32;

        let (text_answers, choice_counts) = match question.question_type {
            QuestionType::Text => {
                let texts = matching
                    .iter()
                    .filter(|answer| !answer.answer_text.is_empty())
                    .map(|answer| answer.answer_text.clone())
                    .collect();
                (Some(texts), None)
            }
            QuestionType::Choice => {
                // Seed the histogram with every declared option so the full
                // option universe always renders, zeroes included.
                let mut counts = question
                    .options_list()
                    .into_iter()
                    .map(|option| (option, 0_u32))
                    .collect::<Vec<_>>();

                for answer in &matching {
                    for selected in decode_selection(&answer.answer_text) {
                        // Exact match only; case is significant.
                        if let Some((_, count)) =
                            counts.iter_mut().find(|(option, _)| *option == selected)
                        {
                            *count += 1;
                        }
                    }
                }

                let counts = counts
                    .into_iter()
                    .map(|(option, count)| OptionCount {
                        option,
                        count,
                        percent: percentage(count, total_answers),
                    })
                    .collect();
                (None, Some(counts))
            }
        };

        Self {
            question: question.into(),
            total_answers,
            text_answers,
            choice_counts,
        }
    }
}

/// `round(100 * count / total)`, or 0 when there are no answers.
fn percentage(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * f64::from(count) / f64::from(total)).round() as u32
}

/// The full aggregated output for a survey, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub survey: SurveySummary,
    /// Distinct respondents across the whole survey's answers.
    pub total_respondents: u32,
    pub questions: Vec<PerQuestionStats>,
}

impl SurveyReport {
    /// Assemble the report: per-question stats in stored question order,
    /// plus the distinct-respondent count over the entire answer set.
    pub fn generate(survey: Survey, questions: Vec<Question>, answers: &[Answer]) -> Self {
        let respondents = answers
            .iter()
            .map(|answer| answer.user_id)
            .collect::<HashSet<_>>();

        let questions = questions
            .into_iter()
            .map(|question| PerQuestionStats::tally(question, answers))
            .collect();

        Self {
            survey: survey.into(),
            total_respondents: respondents.len() as u32,
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::model::options::encode_options;

    use super::*;

    fn survey() -> Survey {
        Survey {
            id: 1,
            title: "Office catering".to_string(),
            created_by: 1,
            created_at: Utc::now(),
        }
    }

    fn choice_question(id: u32, options: &[&str]) -> Question {
        let options = options.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Question {
            id,
            survey_id: 1,
            text: format!("Question {id}"),
            question_type: QuestionType::Choice,
            options: Some(encode_options(&options)),
        }
    }

    fn text_question(id: u32) -> Question {
        Question {
            id,
            survey_id: 1,
            text: format!("Question {id}"),
            question_type: QuestionType::Text,
            options: None,
        }
    }

    fn answer(id: u32, question_id: u32, user_id: u32, text: &str) -> Answer {
        Answer {
            id,
            survey_id: 1,
            question_id,
            user_id,
            answer_text: text.to_string(),
        }
    }

    fn counts(stats: &PerQuestionStats) -> Vec<(&str, u32, u32)> {
        stats
            .choice_counts
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| (c.option.as_str(), c.count, c.percent))
            .collect()
    }

    #[test]
    fn choice_counts_and_percentages() {
        let answers = vec![
            answer(1, 1, 1, "A"),
            answer(2, 1, 2, "B"),
            answer(3, 1, 3, "A"),
        ];
        let stats = PerQuestionStats::tally(choice_question(1, &["A", "B"]), &answers);

        assert_eq!(3, stats.total_answers);
        assert!(stats.text_answers.is_none());
        assert_eq!(vec![("A", 2, 67), ("B", 1, 33)], counts(&stats));
    }

    #[test]
    fn unmatched_selections_are_dropped_silently() {
        let answers = vec![answer(1, 1, 1, "C")];
        let stats = PerQuestionStats::tally(choice_question(1, &["A", "B"]), &answers);

        assert_eq!(1, stats.total_answers);
        assert_eq!(vec![("A", 0, 0), ("B", 0, 0)], counts(&stats));
    }

    #[test]
    fn multi_select_increments_each_selected_option_once() {
        let answers = vec![answer(1, 1, 1, "A, B"), answer(2, 1, 2, "A,B")];
        let stats = PerQuestionStats::tally(choice_question(1, &["A", "B", "C"]), &answers);

        assert_eq!(2, stats.total_answers);
        assert_eq!(vec![("A", 2, 100), ("B", 2, 100), ("C", 0, 0)], counts(&stats));
    }

    #[test]
    fn case_is_significant_when_matching_options() {
        let answers = vec![answer(1, 1, 1, "a")];
        let stats = PerQuestionStats::tally(choice_question(1, &["A"]), &answers);

        assert_eq!(vec![("A", 0, 0)], counts(&stats));
    }

    #[test]
    fn text_answers_keep_order_and_skip_empties() {
        let answers = vec![
            answer(1, 1, 1, "hi"),
            answer(2, 1, 2, ""),
            answer(3, 1, 3, "bye"),
        ];
        let stats = PerQuestionStats::tally(text_question(1), &answers);

        // The empty row still counts towards the total.
        assert_eq!(3, stats.total_answers);
        assert_eq!(
            Some(vec!["hi".to_string(), "bye".to_string()]),
            stats.text_answers
        );
        assert!(stats.choice_counts.is_none());
    }

    #[test]
    fn question_with_no_answers_is_all_zero() {
        let stats = PerQuestionStats::tally(choice_question(1, &["A", "B"]), &[]);

        assert_eq!(0, stats.total_answers);
        assert_eq!(vec![("A", 0, 0), ("B", 0, 0)], counts(&stats));
    }

    #[test]
    fn answers_for_other_questions_are_ignored() {
        let answers = vec![answer(1, 2, 1, "A"), answer(2, 1, 1, "A")];
        let stats = PerQuestionStats::tally(choice_question(1, &["A"]), &answers);

        assert_eq!(1, stats.total_answers);
        assert_eq!(vec![("A", 1, 100)], counts(&stats));
    }

    #[test]
    fn respondents_are_counted_distinctly_across_questions() {
        let questions = vec![choice_question(1, &["A", "B"]), text_question(2)];
        let answers = vec![
            answer(1, 1, 1, "A"),
            answer(2, 2, 1, "great"),
            answer(3, 1, 2, "B"),
            answer(4, 2, 3, "fine"),
        ];
        let report = SurveyReport::generate(survey(), questions, &answers);

        assert_eq!(3, report.total_respondents);
        assert_eq!(2, report.questions.len());
        assert_eq!(1, report.survey.id);
    }

    #[test]
    fn empty_survey_produces_a_complete_report() {
        let report = SurveyReport::generate(survey(), Vec::new(), &[]);

        assert_eq!(0, report.total_respondents);
        assert!(report.questions.is_empty());
    }

    #[test]
    fn duplicate_submissions_inflate_totals_but_not_respondents() {
        let answers = vec![answer(1, 1, 5, "A"), answer(2, 1, 5, "A")];
        let report = SurveyReport::generate(
            survey(),
            vec![choice_question(1, &["A"])],
            &answers,
        );

        assert_eq!(1, report.total_respondents);
        assert_eq!(2, report.questions[0].total_answers);
        assert_eq!(vec![("A", 2, 100)], counts(&report.questions[0]));
    }

    #[test]
    fn malformed_stored_options_still_aggregate() {
        // Not valid JSON; the codec falls back to comma-splitting.
        let question = Question {
            id: 1,
            survey_id: 1,
            text: "Question 1".to_string(),
            question_type: QuestionType::Choice,
            options: Some("Red, Green".to_string()),
        };
        let answers = vec![answer(1, 1, 1, "Green")];
        let stats = PerQuestionStats::tally(question, &answers);

        assert_eq!(vec![("Red", 0, 0), ("Green", 1, 100)], counts(&stats));
    }
}
