//! Educator JWT authentication for the management and billing API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// JWT claims for educator authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct EducatorClaims {
    /// Educator ID
    pub sub: String,
    /// Educator email
    pub email: String,
    /// Role: EDUCATOR | ADMIN (student tokens carry STUDENT and are rejected here)
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated educator identity extracted from JWT
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct EducatorIdentity {
    pub educator_id: String,
    pub email: String,
    pub role: String,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for an educator
pub fn create_token(
    educator_id: &str,
    email: &str,
    role: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = EducatorClaims {
        sub: educator_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that extracts and verifies the educator JWT from the Authorization header
///
/// Billing and roster routes require role EDUCATOR or ADMIN.
pub async fn educator_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| error_response(401, "Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| error_response(401, "Invalid Authorization format"))?;

    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<EducatorClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        error_response(401, "Invalid or expired token")
    })?;

    let claims = token_data.claims;
    if claims.role != "EDUCATOR" && claims.role != "ADMIN" {
        return Err(error_response(403, "Educator role required"));
    }

    let identity = EducatorIdentity {
        educator_id: claims.sub,
        email: claims.email,
        role: claims.role,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

fn error_response(status: u16, message: &str) -> Response {
    let body = serde_json::json!({ "error": message });
    let status =
        http::StatusCode::from_u16(status).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
    (status, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let token = create_token("edu_1", "a@b.test", "EDUCATOR", "test-secret").unwrap();

        let decoded = jsonwebtoken::decode::<EducatorClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, "edu_1");
        assert_eq!(decoded.claims.email, "a@b.test");
        assert_eq!(decoded.claims.role, "EDUCATOR");
        assert!(decoded.claims.exp > decoded.claims.iat);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = create_token("edu_1", "a@b.test", "EDUCATOR", "secret-a").unwrap();

        let result = jsonwebtoken::decode::<EducatorClaims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
