use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{attendance, auth, courses, reports, stats, students, subjects, timetable};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the application router.
///
/// `/auth/login` and `/health` are public; everything else sits behind the
/// JWT middleware. Unmatched paths fall through to a 404 that echoes the
/// attempted path.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/stats", get(stats::dashboard))
        .route("/students", get(students::list).post(students::create))
        .route("/students/import", post(students::import))
        .route("/students/:id", delete(students::remove))
        .route("/courses", get(courses::list))
        .route("/subjects", get(subjects::list))
        .route("/timetable", get(timetable::list))
        // Explicit sub-resources plus the legacy parameter-branched alias
        .route("/attendance", get(attendance::query))
        .route("/attendance/by-student", get(attendance::by_student))
        .route("/attendance/by-session", get(attendance::by_session))
        .route("/attendance/recent", get(attendance::recent))
        .route("/attendance/mark", post(attendance::mark))
        .route("/attendance/session-students", get(attendance::session_students))
        .route("/reports/low-attendance", get(reports::low_attendance))
        .route("/reports/attendance-summary", get(reports::attendance_summary))
        .route("/reports/student-stats", get(reports::student_stats))
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::route_not_found(uri.path())
}
