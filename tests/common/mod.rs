use attendease_api::auth::{generate_jwt, Claims};
use attendease_api::{config, database, routes, state::AppState};
use axum::Router;

/// Point the config singleton at harmless values before its first access.
/// Tests that drive the router's auth/routing surface never reach the
/// database, so the pool below is built lazily and never connected.
pub fn init_env() {
    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }
    if std::env::var("DATABASE_URL").is_err() {
        std::env::set_var(
            "DATABASE_URL",
            "postgres://postgres@127.0.0.1:5432/attendease_test",
        );
    }
}

pub fn test_app() -> Router {
    init_env();
    let pool = database::connect_lazy(&config::config().database).expect("lazy pool");
    routes::app(AppState { pool })
}

pub fn token_for(role: &str) -> String {
    init_env();
    let claims = Claims::new(
        1,
        format!("test-{}", role),
        role.to_string(),
        "Test User".to_string(),
    );
    generate_jwt(&claims).expect("token")
}
