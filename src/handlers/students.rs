use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::student::{Student, StudentWithAttendance};
use crate::error::ApiError;
use crate::middleware::{require_admin, AuthUser};
use crate::state::AppState;

const STUDENT_SELECT: &str = "\
    SELECT s.id, s.roll_number, s.name, s.email, s.course_id, s.created_at,
           c.name AS course_name, c.code AS course_code,
           COALESCE(ROUND(100.0 * COUNT(*) FILTER (WHERE a.status = 'present')
                          / NULLIF(COUNT(a.id), 0), 1), 0)::float8 AS attendance_percentage
    FROM students s
    LEFT JOIN courses c ON s.course_id = c.id
    LEFT JOIN attendance a ON s.id = a.student_id";

const STUDENT_GROUP: &str = "\
    GROUP BY s.id, c.name, c.code
    ORDER BY s.roll_number";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// Numeric course id, or "all" for no filter (the dashboard sends it).
    pub course_id: Option<String>,
    pub search: Option<String>,
}

/// GET /students - list with optional free-text search or course filter.
///
/// Search takes precedence over the course filter and matches name or roll
/// number as a case-insensitive substring.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<StudentWithAttendance>>, ApiError> {
    let course_id = params
        .course_id
        .as_deref()
        .filter(|v| *v != "all")
        .and_then(|v| v.parse::<i32>().ok());

    let students = if let Some(search) = params.search.filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        sqlx::query_as::<_, StudentWithAttendance>(&format!(
            "{STUDENT_SELECT}
             WHERE LOWER(s.name) LIKE LOWER($1) OR LOWER(s.roll_number) LIKE LOWER($1)
             {STUDENT_GROUP}"
        ))
        .bind(pattern)
        .fetch_all(&state.pool)
        .await?
    } else if let Some(course_id) = course_id {
        sqlx::query_as::<_, StudentWithAttendance>(&format!(
            "{STUDENT_SELECT}
             WHERE s.course_id = $1
             {STUDENT_GROUP}"
        ))
        .bind(course_id)
        .fetch_all(&state.pool)
        .await?
    } else {
        sqlx::query_as::<_, StudentWithAttendance>(&format!("{STUDENT_SELECT} {STUDENT_GROUP}"))
            .fetch_all(&state.pool)
            .await?
    };

    Ok(Json(students))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub roll_number: String,
    pub name: String,
    pub email: Option<String>,
    pub course_id: i32,
}

/// POST /students - admin only.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewStudent>,
) -> Result<Json<Student>, ApiError> {
    require_admin(&user)?;

    let student = sqlx::query_as::<_, Student>(
        "INSERT INTO students (roll_number, name, email, course_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, roll_number, name, email, course_id, created_at",
    )
    .bind(&payload.roll_number)
    .bind(&payload.name)
    .bind(payload.email.unwrap_or_default())
    .bind(payload.course_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(student))
}

/// DELETE /students/{id} - admin only.
///
/// Dependent attendance rows go first, then the student, in one
/// transaction. Deleting an unknown id still reports success.
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    let mut tx = state.pool.begin().await?;

    sqlx::query("DELETE FROM attendance WHERE student_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub students: Vec<NewStudent>,
}

/// POST /students/import - admin only bulk insert.
///
/// Rows are independent: a duplicate roll number is skipped silently and a
/// failed row does not abort the rest. `imported` counts actual inserts.
pub async fn import(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    let mut imported: u64 = 0;
    for s in &payload.students {
        let result = sqlx::query(
            "INSERT INTO students (roll_number, name, email, course_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (roll_number) DO NOTHING",
        )
        .bind(&s.roll_number)
        .bind(&s.name)
        .bind(s.email.clone().unwrap_or_default())
        .bind(s.course_id)
        .execute(&state.pool)
        .await;

        match result {
            Ok(done) => imported += done.rows_affected(),
            Err(e) => {
                tracing::warn!("Skipping student row {}: {}", s.roll_number, e);
            }
        }
    }

    Ok(Json(json!({ "success": true, "imported": imported })))
}
