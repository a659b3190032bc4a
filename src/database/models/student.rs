use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Bare student row, as returned by the create endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Student {
    pub id: i32,
    pub roll_number: String,
    pub name: String,
    pub email: Option<String>,
    pub course_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Student row with course names and the on-demand attendance percentage
/// (present-count over total marked; 0 when nothing is marked yet).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentWithAttendance {
    pub id: i32,
    pub roll_number: String,
    pub name: String,
    pub email: Option<String>,
    pub course_id: i32,
    pub created_at: DateTime<Utc>,
    pub course_name: Option<String>,
    pub course_code: Option<String>,
    pub attendance_percentage: f64,
}

/// Student row joined with course name, used by the per-student report.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentDetail {
    pub id: i32,
    pub roll_number: String,
    pub name: String,
    pub email: Option<String>,
    pub course_id: i32,
    pub created_at: DateTime<Utc>,
    pub course_name: Option<String>,
}
