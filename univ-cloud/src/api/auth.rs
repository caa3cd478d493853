//! Educator authentication endpoints
//!
//! POST /api/auth/register — create educator account (subdomain slug + credentials)
//! POST /api/auth/login    — verify credentials → JWT

use axum::extract::State;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::educator_auth;
use crate::db;
use crate::state::AppState;

// ── Request types ──

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub slug: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ── Helpers ──

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Slug must be a valid DNS label we are willing to hand out
fn valid_slug(slug: &str) -> bool {
    const RESERVED: &[&str] = &["www", "api", "app", "admin"];
    !slug.is_empty()
        && slug.len() <= 63
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !RESERVED.contains(&slug)
}

fn error_response(status: StatusCode, msg: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": msg })))
}

// ── POST /api/auth/register ──

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let email = req.email.trim().to_lowercase();
    let slug = req.slug.trim().to_lowercase();
    let name = req.name.trim().to_string();

    // Validate
    if email.is_empty() || !email.contains('@') {
        return error_response(StatusCode::BAD_REQUEST, "Invalid email");
    }
    if req.password.len() < 8 {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters",
        );
    }
    if !valid_slug(&slug) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid or reserved subdomain");
    }

    // Check email and slug not taken
    match db::educators::find_by_email(&state.pool, &email).await {
        Ok(Some(_)) => {
            return error_response(StatusCode::CONFLICT, "Email already registered");
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(%e, "DB error checking email");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    }
    match db::educators::find_by_slug(&state.pool, &slug).await {
        Ok(Some(_)) => {
            return error_response(StatusCode::CONFLICT, "Subdomain already taken");
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(%e, "DB error checking slug");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    }

    // Hash password
    let hashed_password = match hash_password(&req.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(%e, "Password hash error");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    };

    let educator_id = uuid::Uuid::new_v4().to_string();
    let now = shared::util::now_millis();

    if let Err(e) = db::educators::create(
        &state.pool,
        &educator_id,
        &slug,
        &name,
        &email,
        &hashed_password,
        now,
    )
    .await
    {
        tracing::error!(%e, "Failed to create educator");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
    }

    tracing::info!(educator_id = %educator_id, slug = %slug, "Educator registered");

    (
        StatusCode::OK,
        Json(json!({ "educator_id": educator_id, "slug": slug })),
    )
}

// ── POST /api/auth/login ──

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let email = req.email.trim().to_lowercase();

    let educator = match db::educators::find_by_email(&state.pool, &email).await {
        Ok(Some(e)) => e,
        Ok(None) => {
            return error_response(StatusCode::UNAUTHORIZED, "Invalid email or password");
        }
        Err(e) => {
            tracing::error!(%e, "DB error finding educator");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    };

    if educator.status != "active" || !verify_password(&req.password, &educator.hashed_password) {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }

    let token = match educator_auth::create_token(
        &educator.id,
        &educator.email,
        &educator.role,
        &state.jwt_secret,
    ) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(%e, "Failed to create token");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "token": token,
            "educator_id": educator.id,
            "slug": educator.slug,
            "role": educator.role,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slug() {
        assert!(valid_slug("acme"));
        assert!(valid_slug("acme-prep"));
        assert!(valid_slug("acme123"));

        assert!(!valid_slug(""));
        assert!(!valid_slug("-acme"));
        assert!(!valid_slug("acme-"));
        assert!(!valid_slug("Acme"));
        assert!(!valid_slug("ac me"));
        assert!(!valid_slug("a".repeat(64).as_str()));
        // reserved labels
        assert!(!valid_slug("www"));
        assert!(!valid_slug("api"));
        assert!(!valid_slug("admin"));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-phc-string"));
    }
}
