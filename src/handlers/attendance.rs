use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::database::models::attendance::{
    AttendanceStatus, RecentRecord, SessionRecord, SessionRosterEntry, StudentHistoryRecord,
};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub student_id: Option<i32>,
    pub session_id: Option<i32>,
    pub date: Option<NaiveDate>,
}

/// Which of the three read shapes a legacy `/attendance` request asked for.
#[derive(Debug, PartialEq, Eq)]
enum QueryKind {
    ByStudent(i32),
    BySession { session_id: i32, date: NaiveDate },
    Recent,
}

/// Legacy dispatch precedence: studentId wins, then sessionId+date,
/// otherwise the recent feed. A sessionId without a date falls through to
/// the feed, matching the legacy contract.
fn classify(params: &AttendanceQuery) -> QueryKind {
    if let Some(student_id) = params.student_id {
        return QueryKind::ByStudent(student_id);
    }
    if let (Some(session_id), Some(date)) = (params.session_id, params.date) {
        return QueryKind::BySession { session_id, date };
    }
    QueryKind::Recent
}

async fn student_history(
    pool: &PgPool,
    student_id: i32,
) -> Result<Vec<StudentHistoryRecord>, ApiError> {
    let records = sqlx::query_as::<_, StudentHistoryRecord>(
        "SELECT a.id, a.student_id, a.session_id, a.date, a.status, a.marked_by,
                a.remarks, a.created_at,
                ss.day_of_week, sub.name AS subject_name, sub.code AS subject_code
         FROM attendance a
         JOIN sessions ss ON a.session_id = ss.id
         JOIN subjects sub ON ss.subject_id = sub.id
         WHERE a.student_id = $1
         ORDER BY a.date DESC, ss.start_time
         LIMIT 50",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

async fn session_records(
    pool: &PgPool,
    session_id: i32,
    date: NaiveDate,
) -> Result<Vec<SessionRecord>, ApiError> {
    let records = sqlx::query_as::<_, SessionRecord>(
        "SELECT a.id, a.student_id, a.session_id, a.date, a.status, a.marked_by,
                a.remarks, a.created_at,
                s.name AS student_name, s.roll_number
         FROM attendance a
         JOIN students s ON a.student_id = s.id
         WHERE a.session_id = $1 AND a.date = $2
         ORDER BY s.roll_number",
    )
    .bind(session_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

async fn recent_records(pool: &PgPool) -> Result<Vec<RecentRecord>, ApiError> {
    let records = sqlx::query_as::<_, RecentRecord>(
        "SELECT a.id, a.student_id, a.session_id, a.date, a.status, a.marked_by,
                a.remarks, a.created_at,
                s.name AS student_name, s.roll_number,
                sub.name AS subject_name, ss.day_of_week
         FROM attendance a
         JOIN students s ON a.student_id = s.id
         JOIN sessions ss ON a.session_id = ss.id
         JOIN subjects sub ON ss.subject_id = sub.id
         ORDER BY a.date DESC, a.created_at DESC
         LIMIT 100",
    )
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// GET /attendance/by-student?studentId=.. - history, newest first, cap 50.
pub async fn by_student(
    State(state): State<AppState>,
    Query(params): Query<AttendanceQuery>,
) -> Result<Json<Vec<StudentHistoryRecord>>, ApiError> {
    let student_id = params
        .student_id
        .ok_or_else(|| ApiError::bad_request("studentId required"))?;

    Ok(Json(student_history(&state.pool, student_id).await?))
}

/// GET /attendance/by-session?sessionId=..&date=.. - roster records.
pub async fn by_session(
    State(state): State<AppState>,
    Query(params): Query<AttendanceQuery>,
) -> Result<Json<Vec<SessionRecord>>, ApiError> {
    let (session_id, date) = match (params.session_id, params.date) {
        (Some(session_id), Some(date)) => (session_id, date),
        _ => return Err(ApiError::bad_request("sessionId and date required")),
    };

    Ok(Json(session_records(&state.pool, session_id, date).await?))
}

/// GET /attendance/recent - global activity feed, cap 100.
pub async fn recent(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecentRecord>>, ApiError> {
    Ok(Json(recent_records(&state.pool).await?))
}

/// GET /attendance - compatibility alias for clients of the old
/// parameter-branched endpoint; dispatches to the same queries the
/// explicit sub-resources use.
pub async fn query(
    State(state): State<AppState>,
    Query(params): Query<AttendanceQuery>,
) -> Result<Response, ApiError> {
    let response = match classify(&params) {
        QueryKind::ByStudent(student_id) => {
            Json(student_history(&state.pool, student_id).await?).into_response()
        }
        QueryKind::BySession { session_id, date } => {
            Json(session_records(&state.pool, session_id, date).await?).into_response()
        }
        QueryKind::Recent => Json(recent_records(&state.pool).await?).into_response(),
    };

    Ok(response)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRequest {
    pub session_id: i32,
    pub date: NaiveDate,
    pub records: Vec<MarkRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRecord {
    pub student_id: i32,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

/// POST /attendance/mark - batch upsert for one session+date.
///
/// Each record overwrites any prior status/marker/remarks for its
/// (student, session, date) key. The batch runs in one transaction, so a
/// mid-batch failure applies nothing.
pub async fn mark(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<MarkRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut tx = state.pool.begin().await?;

    for record in &payload.records {
        sqlx::query(
            "INSERT INTO attendance (student_id, session_id, date, status, marked_by, remarks)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (student_id, session_id, date)
             DO UPDATE SET status = EXCLUDED.status,
                           marked_by = EXCLUDED.marked_by,
                           remarks = EXCLUDED.remarks",
        )
        .bind(record.student_id)
        .bind(payload.session_id)
        .bind(payload.date)
        .bind(record.status.as_str())
        .bind(user.id)
        .bind(record.remarks.clone().unwrap_or_default())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Json(json!({ "success": true, "count": payload.records.len() })))
}

/// GET /attendance/session-students?sessionId=..&date=.. - every student in
/// the course owning the session, with any existing record for that exact
/// session+date so the client can pre-populate marked statuses.
pub async fn session_students(
    State(state): State<AppState>,
    Query(params): Query<AttendanceQuery>,
) -> Result<Json<Vec<SessionRosterEntry>>, ApiError> {
    let (session_id, date) = match (params.session_id, params.date) {
        (Some(session_id), Some(date)) => (session_id, date),
        _ => return Err(ApiError::bad_request("sessionId and date required")),
    };

    let roster = sqlx::query_as::<_, SessionRosterEntry>(
        "SELECT DISTINCT s.id, s.name, s.roll_number,
                a.status AS attendance_status, a.remarks
         FROM students s
         JOIN subjects sub ON s.course_id = sub.course_id
         JOIN sessions ss ON ss.subject_id = sub.id
         LEFT JOIN attendance a
                ON s.id = a.student_id AND a.session_id = $1 AND a.date = $2
         WHERE ss.id = $1
         ORDER BY s.roll_number",
    )
    .bind(session_id)
    .bind(date)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(roster))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        student_id: Option<i32>,
        session_id: Option<i32>,
        date: Option<&str>,
    ) -> AttendanceQuery {
        AttendanceQuery {
            student_id,
            session_id,
            date: date.map(|d| d.parse().unwrap()),
        }
    }

    #[test]
    fn student_id_takes_precedence() {
        let kind = classify(&params(Some(3), Some(9), Some("2025-01-06")));
        assert_eq!(kind, QueryKind::ByStudent(3));
    }

    #[test]
    fn session_and_date_select_session_records() {
        let kind = classify(&params(None, Some(9), Some("2025-01-06")));
        assert_eq!(
            kind,
            QueryKind::BySession {
                session_id: 9,
                date: "2025-01-06".parse().unwrap()
            }
        );
    }

    #[test]
    fn session_without_date_falls_through_to_recent() {
        assert_eq!(classify(&params(None, Some(9), None)), QueryKind::Recent);
    }

    #[test]
    fn no_params_means_recent() {
        assert_eq!(classify(&params(None, None, None)), QueryKind::Recent);
    }

    #[test]
    fn mark_request_rejects_unknown_status() {
        let result: Result<MarkRequest, _> = serde_json::from_value(serde_json::json!({
            "sessionId": 1,
            "date": "2025-01-06",
            "records": [{ "studentId": 1, "status": "excused" }]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn mark_request_parses_batch() {
        let request: MarkRequest = serde_json::from_value(serde_json::json!({
            "sessionId": 1,
            "date": "2025-01-06",
            "records": [
                { "studentId": 1, "status": "present" },
                { "studentId": 2, "status": "late", "remarks": "bus strike" }
            ]
        }))
        .unwrap();

        assert_eq!(request.records.len(), 2);
        assert_eq!(request.records[0].status, AttendanceStatus::Present);
        assert_eq!(request.records[1].remarks.as_deref(), Some("bus strike"));
    }
}
