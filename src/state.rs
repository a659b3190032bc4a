use sqlx::PgPool;

/// Shared per-request context. Requests are stateless beyond the pool; the
/// database is the only shared mutable resource.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}
