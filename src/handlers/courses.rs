use axum::{extract::State, Json};

use crate::database::models::course::CourseWithCount;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /courses - all courses with enrollment counts.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CourseWithCount>>, ApiError> {
    let courses = sqlx::query_as::<_, CourseWithCount>(
        "SELECT c.id, c.name, c.code, c.description, c.created_at,
                COUNT(s.id) AS student_count
         FROM courses c
         LEFT JOIN students s ON c.id = s.course_id
         GROUP BY c.id
         ORDER BY c.name",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(courses))
}
