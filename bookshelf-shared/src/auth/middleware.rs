/// Bearer-token authentication helpers for Axum
///
/// [`authenticate`] reads `Authorization: Bearer <token>`, validates the
/// token and produces the [`AuthContext`] that the API's middleware inserts
/// into request extensions.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use bookshelf_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.given_name)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{Claims, JwtError, JwtTokenIssuer};

/// Authenticated caller, taken from validated token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Credential ID (token subject)
    pub credential_id: Uuid,

    pub given_name: String,
    pub family_name: String,

    /// Token ID (`jti`)
    pub token_id: Uuid,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            credential_id: claims.sub,
            given_name: claims.given_name,
            family_name: claims.family_name,
            token_id: claims.jti,
        }
    }
}

/// Why a request could not be authenticated
///
/// Every variant maps to 401 at the HTTP boundary.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("Missing authorization header")]
    MissingCredentials,

    #[error("Expected Bearer token")]
    InvalidFormat,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    InvalidToken,
}

impl From<JwtError> for BearerError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => BearerError::Expired,
            _ => BearerError::InvalidToken,
        }
    }
}

/// Extracts the bearer token from request headers
///
/// The scheme is matched case-insensitively; the token must be non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::MissingCredentials)?
        .to_str()
        .map_err(|_| BearerError::InvalidFormat)?;

    let (scheme, token) = value.split_once(' ').ok_or(BearerError::InvalidFormat)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(BearerError::InvalidFormat);
    }

    Ok(token)
}

/// Validates the request's bearer token
pub fn authenticate(headers: &HeaderMap, issuer: &JwtTokenIssuer) -> Result<AuthContext, BearerError> {
    let token = bearer_token(headers)?;
    let claims = issuer.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "Bearer token rejected");
        BearerError::from(e)
    })?;

    Ok(AuthContext::from_claims(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{JwtSettings, TokenIssuer};
    use crate::models::credential::{Credential, NewCredential};
    use axum::http::HeaderValue;
    use chrono::Utc;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new(JwtSettings {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            issuer: "bookshelf".to_string(),
            audience: "bookshelf-clients".to_string(),
            expiry_minutes: 5,
        })
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Ok("abc"));
        assert_eq!(
            bearer_token(&HeaderMap::new()),
            Err(BearerError::MissingCredentials)
        );
        assert_eq!(bearer_token(&headers("Basic abc")), Err(BearerError::InvalidFormat));
        assert_eq!(bearer_token(&headers("Bearer ")), Err(BearerError::InvalidFormat));
        assert_eq!(bearer_token(&headers("Bearer")), Err(BearerError::InvalidFormat));
    }

    #[test]
    fn test_authenticate_builds_context_from_claims() {
        let issuer = issuer();
        let credential = Credential::new(
            NewCredential {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
                password_hash: "hash".to_string(),
            },
            Utc::now(),
        );
        let token = issuer.issue(&credential).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let context = authenticate(&headers, &issuer).unwrap();
        assert_eq!(context.credential_id, credential.id);
        assert_eq!(context.given_name, "Jane");
        assert_eq!(context.family_name, "Doe");
    }

    #[test]
    fn test_authenticate_rejects_bad_token() {
        let result = authenticate(&headers("Bearer not-a-token"), &issuer());
        assert_eq!(result, Err(BearerError::InvalidToken));
    }
}
