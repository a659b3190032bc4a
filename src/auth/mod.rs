use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::config;

/// Identity claims embedded in every issued token.
///
/// The wire names match what the dashboard client decodes, so `full_name`
/// serializes as `fullName`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub username: String,
    pub role: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(id: i32, username: String, role: String, full_name: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            id,
            username,
            role,
            full_name,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
    HashFailure(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            AuthError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            AuthError::InvalidSecret => write!(f, "Invalid JWT secret"),
            AuthError::HashFailure(msg) => write!(f, "Password hashing error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    encode_with_secret(claims, secret)
}

/// Validate a bearer token and decode it into a principal's claims.
pub fn validate_jwt(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    decode_with_secret(token, secret)
}

fn encode_with_secret(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

fn decode_with_secret(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Produce an argon2 digest for storage. Only seeding and tests create
/// digests; the server itself only verifies them.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashFailure(e.to_string()))
}

/// Verify a plaintext password against a stored digest. An unparseable
/// digest counts as a mismatch rather than an error.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(exp: i64) -> Claims {
        Claims {
            id: 7,
            username: "teacher".to_string(),
            role: "teacher".to_string(),
            full_name: "John Teacher".to_string(),
            exp,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let claims = sample_claims((Utc::now() + Duration::hours(1)).timestamp());
        let token = encode_with_secret(&claims, "unit-test-secret").unwrap();
        let decoded = decode_with_secret(&token, "unit-test-secret").unwrap();

        assert_eq!(decoded.id, 7);
        assert_eq!(decoded.username, "teacher");
        assert_eq!(decoded.role, "teacher");
        assert_eq!(decoded.full_name, "John Teacher");
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = sample_claims((Utc::now() - Duration::hours(2)).timestamp());
        let token = encode_with_secret(&claims, "unit-test-secret").unwrap();

        assert!(decode_with_secret(&token, "unit-test-secret").is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = sample_claims((Utc::now() + Duration::hours(1)).timestamp());
        let token = encode_with_secret(&claims, "unit-test-secret").unwrap();

        assert!(decode_with_secret(&token, "other-secret").is_err());
    }

    #[test]
    fn claims_serialize_full_name_as_camel_case() {
        let claims = sample_claims((Utc::now() + Duration::hours(1)).timestamp());
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["fullName"], "John Teacher");
        assert!(value.get("full_name").is_none());
    }

    #[test]
    fn password_digest_round_trip() {
        let digest = hash_password("admin123").unwrap();
        assert!(verify_password("admin123", &digest));
        assert!(!verify_password("admin124", &digest));
    }

    #[test]
    fn garbage_digest_never_verifies() {
        assert!(!verify_password("admin123", "not-a-digest"));
    }
}
