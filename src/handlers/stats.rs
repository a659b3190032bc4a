use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::FromRow;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_students: i64,
    pub total_courses: i64,
    pub total_subjects: i64,
    pub today_present: i64,
    pub today_total: i64,
    pub avg_attendance: f64,
    pub low_attendance_students: Vec<LowAttendanceSummary>,
}

/// Threshold-free top-5 entry; distinct from the reports threshold query.
#[derive(Debug, Serialize, FromRow)]
pub struct LowAttendanceSummary {
    pub id: i32,
    pub name: String,
    pub roll_number: String,
    pub percentage: f64,
}

/// GET /stats - dashboard aggregates.
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let total_students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(&state.pool)
        .await?;
    let total_courses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(&state.pool)
        .await?;
    let total_subjects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects")
        .fetch_one(&state.pool)
        .await?;

    let (today_present, today_total): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*) FILTER (WHERE status = 'present'), COUNT(*)
         FROM attendance
         WHERE date = CURRENT_DATE",
    )
    .fetch_one(&state.pool)
    .await?;

    let avg_attendance: f64 = sqlx::query_scalar(
        "SELECT COALESCE(
            ROUND(100.0 * COUNT(*) FILTER (WHERE status = 'present')
                  / NULLIF(COUNT(*), 0), 1),
            0)::float8
         FROM attendance",
    )
    .fetch_one(&state.pool)
    .await?;

    // Five lowest percentages under 75; students with no marked records
    // never appear (the HAVING clause also keeps the division non-null).
    let low_attendance_students = sqlx::query_as::<_, LowAttendanceSummary>(
        "SELECT s.id, s.name, s.roll_number,
                ROUND(100.0 * COUNT(*) FILTER (WHERE a.status = 'present')
                      / NULLIF(COUNT(a.id), 0), 1)::float8 AS percentage
         FROM students s
         LEFT JOIN attendance a ON s.id = a.student_id
         GROUP BY s.id, s.name, s.roll_number
         HAVING COUNT(a.id) > 0
            AND 100.0 * COUNT(*) FILTER (WHERE a.status = 'present')
                / NULLIF(COUNT(a.id), 0) < 75
         ORDER BY percentage ASC
         LIMIT 5",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(StatsResponse {
        total_students,
        total_courses,
        total_subjects,
        today_present,
        today_total,
        avg_attendance,
        low_attendance_students,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_response_uses_camel_case_keys() {
        let response = StatsResponse {
            total_students: 10,
            total_courses: 2,
            total_subjects: 4,
            today_present: 8,
            today_total: 10,
            avg_attendance: 80.0,
            low_attendance_students: vec![],
        };
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["totalStudents"], 10);
        assert_eq!(value["avgAttendance"], 80.0);
        assert!(value["lowAttendanceStudents"].as_array().unwrap().is_empty());
    }
}
