use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::session::TimetableEntry;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub day: Option<String>,
    pub course_id: Option<i32>,
}

/// GET /timetable - weekly sessions, optionally filtered by day and course.
///
/// Day-of-week is stored as text, so ordering maps names to ordinals
/// explicitly (MON=1..SAT=6, anything else last) before start time.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TimetableEntry>>, ApiError> {
    let sessions = sqlx::query_as::<_, TimetableEntry>(
        "SELECT ss.id, ss.subject_id, ss.day_of_week, ss.start_time, ss.end_time,
                ss.room, ss.created_at,
                sub.name AS subject_name, sub.code AS subject_code,
                u.full_name AS teacher_name, c.name AS course_name
         FROM sessions ss
         JOIN subjects sub ON ss.subject_id = sub.id
         JOIN users u ON sub.teacher_id = u.id
         JOIN courses c ON sub.course_id = c.id
         WHERE ($1::text IS NULL OR ss.day_of_week = $1)
           AND ($2::int4 IS NULL OR sub.course_id = $2)
         ORDER BY
           CASE ss.day_of_week
             WHEN 'MON' THEN 1 WHEN 'TUE' THEN 2 WHEN 'WED' THEN 3
             WHEN 'THU' THEN 4 WHEN 'FRI' THEN 5 WHEN 'SAT' THEN 6
             ELSE 7
           END,
           ss.start_time",
    )
    .bind(params.day)
    .bind(params.course_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(sessions))
}
