// src/models/exam.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::QuestionDraft;

/// Represents the 'exams' table in the database.
///
/// `question_ids` is ordered: presentation order and the positional
/// alignment of submitted answers both follow it. Paper-mode exams carry a
/// `paper_url` instead and may have an empty id list.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub title: String,
    pub duration_minutes: i32,
    pub question_ids: Vec<i64>,
    pub paper_url: Option<String>,
    pub is_published: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Fallback exam length in minutes when the request omits one.
pub const DEFAULT_DURATION_MINUTES: i32 = 180;

/// Fallback size of a randomly generated exam.
pub const DEFAULT_QUESTION_COUNT: i64 = 50;

/// DTO for uploading questions, optionally composing an exam from them.
/// Without a title only the questions are stored.
#[derive(Debug, Deserialize, Validate)]
pub struct UploadQuestionsRequest {
    #[validate(nested)]
    pub questions: Vec<QuestionDraft>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(range(min = 1, max = 600))]
    pub duration: Option<i32>,
}

/// DTO for generating a random exam from the question bank.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(range(min = 1, max = 500))]
    pub question_count: Option<i64>,
    #[validate(range(min = 1, max = 600))]
    pub duration: Option<i32>,
    pub category: Option<String>,
}
