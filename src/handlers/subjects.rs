use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::subject::SubjectRow;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub course_id: Option<i32>,
}

/// GET /subjects - optionally filtered by course.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SubjectRow>>, ApiError> {
    let subjects = sqlx::query_as::<_, SubjectRow>(
        "SELECT s.id, s.name, s.code, s.course_id, s.teacher_id, s.created_at,
                c.name AS course_name, u.full_name AS teacher_name
         FROM subjects s
         LEFT JOIN courses c ON s.course_id = c.id
         LEFT JOIN users u ON s.teacher_id = u.id
         WHERE ($1::int4 IS NULL OR s.course_id = $1)
         ORDER BY s.name",
    )
    .bind(params.course_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(subjects))
}
