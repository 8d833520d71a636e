// src/handlers/exam.rs

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::{FromRow, PgPool, types::Json as SqlJson};

use crate::{
    error::AppError,
    models::{
        exam::Exam,
        question::{PublicQuestion, Question},
        result::{ResultWithExam, ReviewQuestion, ReviewResponse, SubmitExamRequest},
    },
    scoring::{self, QuestionKey},
    utils::auth::Claims,
};

/// Grading-relevant columns of a question row.
#[derive(FromRow)]
struct KeyRow {
    id: i64,
    correct_index: i32,
    points: i32,
}

async fn fetch_exam(pool: &PgPool, id: i64) -> Result<Exam, AppError> {
    sqlx::query_as::<_, Exam>("SELECT * FROM exams WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))
}

/// Fetches the questions named by `ids` and returns them in `ids` order.
/// Stale ids (deleted questions) are dropped.
async fn fetch_ordered_questions(pool: &PgPool, ids: &[i64]) -> Result<Vec<Question>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE id = ANY($1)")
        .bind(ids.to_vec())
        .fetch_all(pool)
        .await?;

    let mut by_id: HashMap<i64, Question> = rows.into_iter().map(|q| (q.id, q)).collect();
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Lists exams visible to students.
pub async fn published_exams(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let exams = sqlx::query_as::<_, Exam>(
        "SELECT * FROM exams WHERE is_published = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch published exams: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(exams))
}

/// Returns an exam and its questions in presentation order, with correct
/// indices hidden. Paper-mode exams come back with an empty question list.
pub async fn exam_questions(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam = fetch_exam(&pool, id).await?;
    let questions: Vec<PublicQuestion> = fetch_ordered_questions(&pool, &exam.question_ids)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(Json(serde_json::json!({
        "exam": exam,
        "questions": questions,
    })))
}

/// Grades a submission and stores the result.
///
/// Answers are positional against the exam's `question_ids`. Questions
/// deleted since the exam was composed are excluded from the totals without
/// failing the submission. Results are append-only: retakes insert new rows.
pub async fn submit_exam(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let exam = fetch_exam(&pool, payload.exam_id).await?;

    let keys: HashMap<i64, QuestionKey> = sqlx::query_as::<_, KeyRow>(
        "SELECT id, correct_index, points FROM questions WHERE id = ANY($1)",
    )
    .bind(exam.question_ids.clone())
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|row| {
        (
            row.id,
            QuestionKey {
                correct_index: row.correct_index,
                points: row.points,
            },
        )
    })
    .collect();

    let summary = scoring::score(&exam.question_ids, &keys, &payload.answers);

    let result_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO exam_results
        (user_id, exam_id, score, total_marks, correct_count, wrong_count, answers)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(claims.user_id())
    .bind(exam.id)
    .bind(summary.score)
    .bind(summary.total_marks)
    .bind(summary.correct_count)
    .bind(summary.wrong_count)
    .bind(SqlJson(&payload.answers))
    .fetch_one(&pool)
    .await?;

    Ok(Json(serde_json::json!({
        "id": result_id,
        "message": "Exam submitted successfully",
        "score": summary.score,
        "total_marks": summary.total_marks,
        "correct_count": summary.correct_count,
        "wrong_count": summary.wrong_count,
    })))
}

/// Lists the caller's results, newest first.
pub async fn my_results(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let results = sqlx::query_as::<_, ResultWithExam>(
        r#"
        SELECT er.id, er.user_id, er.exam_id, e.title AS exam_title,
               er.score, er.total_marks, er.correct_count, er.wrong_count,
               er.completed_at
        FROM exam_results er
        JOIN exams e ON er.exam_id = e.id
        WHERE er.user_id = $1
        ORDER BY er.completed_at DESC
        "#,
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await?;

    Ok(Json(results))
}

async fn fetch_owned_result(
    pool: &PgPool,
    id: i64,
    claims: &Claims,
) -> Result<ResultWithExam, AppError> {
    let result = sqlx::query_as::<_, ResultWithExam>(
        r#"
        SELECT er.id, er.user_id, er.exam_id, e.title AS exam_title,
               er.score, er.total_marks, er.correct_count, er.wrong_count,
               er.completed_at
        FROM exam_results er
        JOIN exams e ON er.exam_id = e.id
        WHERE er.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Result not found".to_string()))?;

    if result.user_id != claims.user_id() && !claims.is_admin() {
        return Err(AppError::Forbidden("Not your result".to_string()));
    }

    Ok(result)
}

/// Returns a single result. Owner or admin only.
pub async fn get_result(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = fetch_owned_result(&pool, id, &claims).await?;
    Ok(Json(result))
}

/// Returns everything the review page needs: the result summary, the exam's
/// questions in order (correct indices included) and the submitted answers.
/// Owner or admin only.
pub async fn result_review(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = fetch_owned_result(&pool, id, &claims).await?;

    let answers: Vec<Option<i32>> = sqlx::query_scalar::<_, SqlJson<Vec<Option<i32>>>>(
        "SELECT answers FROM exam_results WHERE id = $1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await?
    .0;

    let exam = fetch_exam(&pool, result.exam_id).await?;
    let questions: Vec<ReviewQuestion> = fetch_ordered_questions(&pool, &exam.question_ids)
        .await?
        .into_iter()
        .map(|q| {
            let correct_index = q.correct_index;
            ReviewQuestion {
                question: PublicQuestion::from(q),
                correct_index,
            }
        })
        .collect();

    Ok(Json(ReviewResponse {
        exam_title: result.exam_title,
        score: result.score,
        total_marks: result.total_marks,
        correct_count: result.correct_count,
        wrong_count: result.wrong_count,
        questions,
        answers,
    }))
}
