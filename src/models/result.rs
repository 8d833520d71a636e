// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::models::question::PublicQuestion;

/// Represents the 'exam_results' table in the database. Append-only: a
/// retake inserts a new row rather than updating the old one.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: i64,
    pub user_id: i64,
    pub exam_id: i64,
    pub score: i32,
    pub total_marks: i32,
    pub correct_count: i32,
    pub wrong_count: i32,
    /// Parallel to the exam's `question_ids` at submission time;
    /// `null` entries are unanswered questions.
    pub answers: Json<Vec<Option<i32>>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A result row joined with its exam title, for result listings.
#[derive(Debug, FromRow, Serialize)]
pub struct ResultWithExam {
    pub id: i64,
    pub user_id: i64,
    pub exam_id: i64,
    pub exam_title: String,
    pub score: i32,
    pub total_marks: i32,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting an exam attempt. `answers[i]` is the chosen option
/// index for the exam's `question_ids[i]`; nulls mark skipped questions.
#[derive(Debug, Deserialize)]
pub struct SubmitExamRequest {
    pub exam_id: i64,
    pub answers: Vec<Option<i32>>,
}

/// Per-question review payload: the result plus its questions in exam order
/// (correct indices included, since the attempt is already graded).
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub exam_title: String,
    pub score: i32,
    pub total_marks: i32,
    pub correct_count: i32,
    pub wrong_count: i32,
    pub questions: Vec<ReviewQuestion>,
    pub answers: Vec<Option<i32>>,
}

/// A question as shown on the review page.
#[derive(Debug, Serialize)]
pub struct ReviewQuestion {
    #[serde(flatten)]
    pub question: PublicQuestion,
    pub correct_index: i32,
}
