use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Course row augmented with its enrollment count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseWithCount {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub student_count: i64,
}
