use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::database::models::user::{User, UserSummary};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

/// POST /auth/login - verify credentials and issue a signed token.
///
/// Username lookup is case-insensitive. A missing user and a digest
/// mismatch are indistinguishable to the client.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password, full_name, role, created_at
         FROM users
         WHERE LOWER(username) = LOWER($1)",
    )
    .bind(&payload.username)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let claims = Claims::new(
        user.id,
        user.username.clone(),
        user.role.clone(),
        user.full_name.clone(),
    );
    let token = generate_jwt(&claims)?;

    Ok(Json(LoginResponse {
        token,
        user: UserSummary::from(user),
    }))
}
