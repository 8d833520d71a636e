// src/models/notification.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'notifications' table in the database.
/// Rows are broadcast to every student when an exam goes live.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
