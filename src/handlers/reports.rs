use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::models::student::StudentDetail;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LowAttendanceParams {
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct LowAttendanceRow {
    pub id: i32,
    pub name: String,
    pub roll_number: String,
    pub course_name: Option<String>,
    pub total_classes: i64,
    pub present_count: i64,
    pub percentage: f64,
}

/// GET /reports/low-attendance?threshold=75
///
/// Students with at least one marked record and a percentage strictly below
/// the threshold, worst first. Unmarked students never appear.
pub async fn low_attendance(
    State(state): State<AppState>,
    Query(params): Query<LowAttendanceParams>,
) -> Result<Json<Vec<LowAttendanceRow>>, ApiError> {
    let threshold = params.threshold.unwrap_or(75.0);

    let rows = sqlx::query_as::<_, LowAttendanceRow>(
        "SELECT s.id, s.name, s.roll_number, c.name AS course_name,
                COUNT(a.id) AS total_classes,
                COUNT(*) FILTER (WHERE a.status = 'present') AS present_count,
                ROUND(100.0 * COUNT(*) FILTER (WHERE a.status = 'present')
                      / NULLIF(COUNT(a.id), 0), 1)::float8 AS percentage
         FROM students s
         LEFT JOIN courses c ON s.course_id = c.id
         LEFT JOIN attendance a ON s.id = a.student_id
         GROUP BY s.id, s.name, s.roll_number, c.name
         HAVING COUNT(a.id) > 0
            AND 100.0 * COUNT(*) FILTER (WHERE a.status = 'present')
                / NULLIF(COUNT(a.id), 0) < $1
         ORDER BY percentage ASC",
    )
    .bind(threshold)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryParams {
    pub course_id: Option<i32>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct SummaryRow {
    pub date: NaiveDate,
    pub present: i64,
    pub absent: i64,
    pub total: i64,
}

/// GET /reports/attendance-summary?courseId? - per-day buckets over the
/// 30 most recent marked days, newest first.
pub async fn attendance_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<Vec<SummaryRow>>, ApiError> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        "SELECT a.date,
                COUNT(*) FILTER (WHERE a.status = 'present') AS present,
                COUNT(*) FILTER (WHERE a.status = 'absent') AS absent,
                COUNT(*) AS total
         FROM attendance a
         JOIN students s ON a.student_id = s.id
         WHERE ($1::int4 IS NULL OR s.course_id = $1)
         GROUP BY a.date
         ORDER BY a.date DESC
         LIMIT 30",
    )
    .bind(params.course_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatsParams {
    pub student_id: Option<i32>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct SubjectStat {
    pub subject_name: String,
    pub total_classes: i64,
    pub present: i64,
    /// Null when the student has no marked records in the subject.
    pub percentage: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct StudentStatsResponse {
    pub student: StudentDetail,
    #[serde(rename = "subjectStats")]
    pub subject_stats: Vec<SubjectStat>,
}

/// GET /reports/student-stats?studentId=.. - per-subject breakdown over
/// every subject in the student's course.
pub async fn student_stats(
    State(state): State<AppState>,
    Query(params): Query<StudentStatsParams>,
) -> Result<Json<StudentStatsResponse>, ApiError> {
    let student_id = params
        .student_id
        .ok_or_else(|| ApiError::bad_request("studentId required"))?;

    let student = sqlx::query_as::<_, StudentDetail>(
        "SELECT s.id, s.roll_number, s.name, s.email, s.course_id, s.created_at,
                c.name AS course_name
         FROM students s
         LEFT JOIN courses c ON s.course_id = c.id
         WHERE s.id = $1",
    )
    .bind(student_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let subject_stats = sqlx::query_as::<_, SubjectStat>(
        "SELECT sub.name AS subject_name,
                COUNT(a.id) AS total_classes,
                COUNT(*) FILTER (WHERE a.status = 'present') AS present,
                ROUND(100.0 * COUNT(*) FILTER (WHERE a.status = 'present')
                      / NULLIF(COUNT(a.id), 0), 1)::float8 AS percentage
         FROM subjects sub
         JOIN sessions ss ON ss.subject_id = sub.id
         LEFT JOIN attendance a ON a.session_id = ss.id AND a.student_id = $1
         WHERE sub.course_id = $2
         GROUP BY sub.id, sub.name
         ORDER BY sub.name",
    )
    .bind(student_id)
    .bind(student.course_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(StudentStatsResponse {
        student,
        subject_stats,
    }))
}
