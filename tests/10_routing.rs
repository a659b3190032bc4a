mod common;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn protected_route_without_token_is_401() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(Request::builder().uri("/stats").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await?;
    assert_eq!(body["error"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_401() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/attendance/recent")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_401() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/courses")
                .header(header::AUTHORIZATION, "Basic YWRtaW46YWRtaW4=")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unmatched_route_echoes_path() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/definitely-not-a-route")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await?;
    assert_eq!(body["error"], "Not found");
    assert_eq!(body["path"], "/auth/definitely-not-a-route");
    Ok(())
}

#[tokio::test]
async fn teacher_cannot_create_students() -> Result<()> {
    let app = common::test_app();
    let token = common::token_for("teacher");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/students")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"rollNumber":"CS2024099","name":"Nobody","courseId":1}"#,
                ))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await?;
    assert_eq!(body["error"], "Admin only");
    Ok(())
}

#[tokio::test]
async fn teacher_cannot_bulk_import() -> Result<()> {
    let app = common::test_app();
    let token = common::token_for("teacher");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/students/import")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"students":[]}"#))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn teacher_cannot_delete_students() -> Result<()> {
    let app = common::test_app();
    let token = common::token_for("teacher");

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/students/1")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn by_session_requires_both_params() -> Result<()> {
    let app = common::test_app();
    let token = common::token_for("teacher");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/attendance/by-session?sessionId=3")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["error"], "sessionId and date required");
    Ok(())
}

#[tokio::test]
async fn student_stats_requires_student_id() -> Result<()> {
    let app = common::test_app();
    let token = common::token_for("admin");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reports/student-stats")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["error"], "studentId required");
    Ok(())
}

#[tokio::test]
async fn health_reports_database_state() -> Result<()> {
    let app = common::test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    // OK with a reachable database, degraded without one; both are valid
    // liveness answers here.
    assert!(
        response.status() == StatusCode::OK
            || response.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        response.status()
    );
    let _body = body_json(response).await?;
    Ok(())
}
