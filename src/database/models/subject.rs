use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Subject row joined with its course and teacher names.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubjectRow {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub course_id: i32,
    pub teacher_id: i32,
    pub created_at: DateTime<Utc>,
    pub course_name: Option<String>,
    pub teacher_name: Option<String>,
}
