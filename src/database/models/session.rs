use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Timetable slot joined with subject, teacher, and course names.
///
/// `day_of_week` is stored as text (MON..SAT); ordering happens in SQL via
/// the explicit day-name-to-ordinal mapping.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TimetableEntry {
    pub id: i32,
    pub subject_id: i32,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Option<String>,
    pub created_at: DateTime<Utc>,
    pub subject_name: String,
    pub subject_code: String,
    pub teacher_name: String,
    pub course_name: String,
}
