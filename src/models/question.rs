// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The text content of the question.
    /// Exposed to clients as 'text'.
    #[serde(rename = "text")]
    pub question_text: String,

    pub image_url: Option<String>,

    /// Ordered list of 2-4 option strings, stored as a JSON array.
    pub options: Json<Vec<String>>,

    /// Zero-based index into `options` of the correct answer.
    pub correct_index: i32,

    pub category: String,

    pub points: i32,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending a question to a student taking an exam
/// (excludes the correct index).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    pub image_url: Option<String>,
    pub options: Json<Vec<String>>,
    pub points: i32,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.question_text,
            image_url: q.image_url,
            options: q.options,
            points: q.points,
        }
    }
}

/// A question ready for persistence, produced by manual upload or by the
/// PDF extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_correct_index))]
pub struct QuestionDraft {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_index: i32,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_points")]
    pub points: i32,
}

fn default_category() -> String {
    crate::extract::DEFAULT_CATEGORY.to_string()
}

fn default_points() -> i32 {
    1
}

fn validate_options(options: &Vec<String>) -> Result<(), validator::ValidationError> {
    if !(2..=4).contains(&options.len()) {
        return Err(validator::ValidationError::new("need_2_to_4_options"));
    }
    for opt in options {
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

fn validate_correct_index(draft: &QuestionDraft) -> Result<(), validator::ValidationError> {
    if draft.correct_index < 0 || draft.correct_index as usize >= draft.options.len() {
        return Err(validator::ValidationError::new("correct_index_out_of_range"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(options: &[&str], correct_index: i32) -> QuestionDraft {
        QuestionDraft {
            text: "Q?".to_string(),
            image_url: None,
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_index,
            category: default_category(),
            points: 1,
        }
    }

    #[test]
    fn accepts_well_formed_drafts() {
        assert!(draft(&["a", "b"], 1).validate().is_ok());
        assert!(draft(&["a", "b", "c", "d"], 3).validate().is_ok());
    }

    #[test]
    fn rejects_bad_option_counts() {
        assert!(draft(&["only"], 0).validate().is_err());
        assert!(draft(&["a", "b", "c", "d", "e"], 0).validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        assert!(draft(&["a", "b"], 2).validate().is_err());
        assert!(draft(&["a", "b"], -1).validate().is_err());
    }
}
