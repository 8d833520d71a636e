// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, Transaction, types::Json as SqlJson};
use validator::Validate;

use crate::{
    compose,
    error::AppError,
    extract,
    models::{
        exam::{
            DEFAULT_DURATION_MINUTES, DEFAULT_QUESTION_COUNT, Exam, GenerateExamRequest,
            UploadQuestionsRequest,
        },
        question::QuestionDraft,
        user::User,
    },
    utils::pdf,
};

/// Inserts question drafts inside the caller's transaction, returning the
/// new ids in draft order.
async fn insert_questions(
    tx: &mut Transaction<'_, Postgres>,
    drafts: &[QuestionDraft],
) -> Result<Vec<i64>, AppError> {
    let mut ids = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO questions
            (question_text, image_url, options, correct_index, category, points)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&draft.text)
        .bind(&draft.image_url)
        .bind(SqlJson(&draft.options))
        .bind(draft.correct_index)
        .bind(&draft.category)
        .bind(draft.points)
        .fetch_one(&mut **tx)
        .await?;
        ids.push(id);
    }
    Ok(ids)
}

/// Inserts a published exam over the given question ids.
async fn insert_exam(
    tx: &mut Transaction<'_, Postgres>,
    title: &str,
    duration: Option<i32>,
    question_ids: Vec<i64>,
) -> Result<Exam, AppError> {
    let exam = sqlx::query_as::<_, Exam>(
        r#"
        INSERT INTO exams (title, duration_minutes, question_ids, is_published)
        VALUES ($1, $2, $3, TRUE)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(duration.unwrap_or(DEFAULT_DURATION_MINUTES))
    .bind(question_ids)
    .fetch_one(&mut **tx)
    .await?;
    Ok(exam)
}

/// Broadcasts a notification row to every student, inside the caller's
/// transaction so it commits or rolls back with the exam itself.
async fn notify_students(
    tx: &mut Transaction<'_, Postgres>,
    title: &str,
    message: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO notifications (user_id, title, message)
        SELECT id, $1, $2 FROM users WHERE role = 'student'
        "#,
    )
    .bind(title)
    .bind(message)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Stores a batch of questions and, when a title is given, composes a
/// published exam from them in the given order. Question inserts, the exam
/// insert and the student notifications are one atomic write.
/// Admin only.
pub async fn upload_questions(
    State(pool): State<PgPool>,
    Json(payload): Json<UploadQuestionsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.questions.is_empty() {
        return Err(AppError::BadRequest("Invalid questions data".to_string()));
    }
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut tx = pool.begin().await?;

    let question_ids = insert_questions(&mut tx, &payload.questions).await?;

    let exam = match &payload.title {
        Some(title) => {
            let exam = insert_exam(&mut tx, title, payload.duration, question_ids.clone()).await?;
            notify_students(
                &mut tx,
                "New Exam Available!",
                &format!(
                    "\"{}\" is now available with {} questions!",
                    title,
                    payload.questions.len()
                ),
            )
            .await?;
            Some(exam)
        }
        None => None,
    };

    tx.commit().await?;

    let message = match &exam {
        Some(exam) => format!(
            "Exam '{}' created with {} questions",
            exam.title,
            payload.questions.len()
        ),
        None => format!("{} questions uploaded successfully", payload.questions.len()),
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": message,
            "question_ids": question_ids,
            "exam": exam,
        })),
    ))
}

/// Extracts questions from an uploaded PDF question paper.
///
/// Multipart fields: `paper` (the file), plus optional `answer_key`,
/// `title` and `duration`. An unreadable or near-empty text layer is a
/// zero-question response with no side effects, not an error.
/// Admin only.
pub async fn extract_pdf(
    State(pool): State<PgPool>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut paper: Option<axum::body::Bytes> = None;
    let mut answer_key: Option<String> = None;
    let mut title: Option<String> = None;
    let mut duration: Option<i32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "paper" => {
                paper = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "answer_key" | "answerKey" => {
                answer_key = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "duration" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                duration = Some(
                    raw.parse()
                        .map_err(|_| AppError::BadRequest("Invalid duration".to_string()))?,
                );
            }
            _ => {}
        }
    }

    let paper = paper.ok_or(AppError::BadRequest("No file uploaded".to_string()))?;

    let Some(text) = pdf::extract_text(&paper) else {
        return Ok(Json(serde_json::json!({
            "message": "No text extracted",
            "question_count": 0,
            "questions": [],
        }))
        .into_response());
    };

    let drafts = extract::extract_questions(&text, answer_key.as_deref());
    if drafts.is_empty() {
        return Ok(Json(serde_json::json!({
            "message": "No questions detected",
            "question_count": 0,
            "questions": [],
        }))
        .into_response());
    }

    let mut tx = pool.begin().await?;

    let question_ids = insert_questions(&mut tx, &drafts).await?;

    let exam = match &title {
        Some(title) => {
            let exam = insert_exam(&mut tx, title, duration, question_ids.clone()).await?;
            notify_students(
                &mut tx,
                "New Exam Available!",
                &format!("\"{}\" is now available with {} questions!", title, drafts.len()),
            )
            .await?;
            Some(exam)
        }
        None => None,
    };

    tx.commit().await?;

    Ok(Json(serde_json::json!({
        "message": "PDF extracted successfully",
        "question_count": drafts.len(),
        "question_ids": question_ids,
        "exam": exam,
    }))
    .into_response())
}

/// Generates a published exam from a random draw over the question bank,
/// optionally restricted to one category. The candidate read and the exam
/// insert share one transaction. Requesting more questions than the bank
/// holds is rejected with no exam created.
/// Admin only.
pub async fn generate_exam(
    State(pool): State<PgPool>,
    Json(payload): Json<GenerateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let count = payload.question_count.unwrap_or(DEFAULT_QUESTION_COUNT) as usize;

    let mut tx = pool.begin().await?;

    let candidates: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM questions WHERE $1::text IS NULL OR category = $1")
            .bind(&payload.category)
            .fetch_all(&mut *tx)
            .await?;

    let question_ids = compose::draw_random(candidates, count)?;

    let exam = insert_exam(&mut tx, &payload.title, payload.duration, question_ids).await?;
    notify_students(
        &mut tx,
        "New Exam Available!",
        &format!(
            "\"{}\" is now live with {} questions!",
            exam.title,
            exam.question_ids.len()
        ),
    )
    .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(exam)))
}

/// Returns headline counts for the admin dashboard.
/// Admin only.
pub async fn stats(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'student'")
        .fetch_one(&pool)
        .await?;
    let questions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(&pool)
        .await?;
    let exams: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exams")
        .fetch_one(&pool)
        .await?;

    Ok(Json(serde_json::json!({
        "students": students,
        "questions": questions,
        "exams": exams,
    })))
}

/// Lists every exam, newest first.
/// Admin only.
pub async fn list_exams(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let exams = sqlx::query_as::<_, Exam>("SELECT * FROM exams ORDER BY created_at DESC")
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list exams: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(exams))
}

/// Lists every student account.
/// Admin only.
pub async fn list_students(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let students = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE role = 'student' ORDER BY created_at DESC",
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list students: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(students))
}

/// Flips an exam's publish flag. When the flip lands on published, students
/// are notified in the same transaction.
/// Admin only.
pub async fn toggle_publish(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = pool.begin().await?;

    let exam = sqlx::query_as::<_, Exam>(
        "UPDATE exams SET is_published = NOT is_published WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    if exam.is_published {
        notify_students(
            &mut tx,
            "New Exam Published!",
            &format!("\"{}\" is now available!", exam.title),
        )
        .await?;
    }

    tx.commit().await?;

    Ok(Json(exam))
}

/// Deletes an exam; its results are removed by the schema-level cascade.
/// Admin only.
pub async fn delete_exam(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM exams WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete exam: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Exam not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
