/// JWT token issuance and validation
///
/// Tokens are signed with HS256 (HMAC-SHA256) using a symmetric secret from
/// configuration. Each token carries the credential id, the holder's given
/// and family names, a random token id, issuer, audience and an expiry of
/// issue time plus the configured TTL. There are no refresh tokens and no
/// revocation: a token is valid until it expires.
///
/// # Example
///
/// ```
/// use bookshelf_shared::auth::jwt::{JwtSettings, JwtTokenIssuer, TokenIssuer};
/// use bookshelf_shared::models::credential::{Credential, NewCredential};
/// use chrono::Utc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let issuer = JwtTokenIssuer::new(JwtSettings {
///     secret: "a-very-long-secret-key-of-at-least-32-bytes".to_string(),
///     issuer: "bookshelf".to_string(),
///     audience: "bookshelf-clients".to_string(),
///     expiry_minutes: 60,
/// });
///
/// let credential = Credential::new(
///     NewCredential {
///         first_name: "Jane".to_string(),
///         last_name: "Doe".to_string(),
///         email: "jane@example.com".to_string(),
///         password_hash: "hash".to_string(),
///     },
///     Utc::now(),
/// );
///
/// let token = issuer.issue(&credential)?;
/// let claims = issuer.validate(&token)?;
/// assert_eq!(claims.sub, credential.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::credential::Credential;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },

    /// Invalid audience
    #[error("Invalid audience: expected {expected}")]
    InvalidAudience { expected: String },
}

/// Signing configuration
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// HMAC secret, at least 32 bytes
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Token lifetime in minutes
    pub expiry_minutes: i64,
}

/// JWT claims
///
/// # Standard Claims
///
/// - `sub`: credential id
/// - `jti`: random token id
/// - `iss`, `aud`: from [`JwtSettings`]
/// - `iat`, `nbf`, `exp`: Unix timestamps
///
/// # Profile Claims
///
/// - `given_name`, `family_name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub given_name: String,
    pub family_name: String,
    pub jti: Uuid,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Builds claims for a credential issued at `now`
    pub fn for_credential(
        credential: &Credential,
        settings: &JwtSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let expiration = now + Duration::minutes(settings.expiry_minutes);

        Self {
            sub: credential.id,
            given_name: credential.first_name.clone(),
            family_name: credential.last_name.clone(),
            jti: Uuid::new_v4(),
            iss: settings.issuer.clone(),
            aud: settings.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Token issuance capability
pub trait TokenIssuer: Send + Sync {
    /// Issues a signed bearer token for a credential
    fn issue(&self, credential: &Credential) -> Result<String, JwtError>;
}

/// HS256 token issuer and validator
#[derive(Clone)]
pub struct JwtTokenIssuer {
    settings: JwtSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("issuer", &self.settings.issuer)
            .field("audience", &self.settings.audience)
            .field("expiry_minutes", &self.settings.expiry_minutes)
            .finish_non_exhaustive()
    }
}

impl JwtTokenIssuer {
    pub fn new(settings: JwtSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());

        Self {
            settings,
            encoding_key,
            decoding_key,
        }
    }

    pub fn settings(&self) -> &JwtSettings {
        &self.settings
    }

    /// Issues a token as if the current time were `now`
    pub fn issue_at(&self, credential: &Credential, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims::for_credential(credential, &self.settings, now);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Validates a token and extracts its claims
    ///
    /// Verifies the signature, expiry, not-before time, issuer and audience.
    ///
    /// # Errors
    ///
    /// - `JwtError::Expired` once `exp` has passed
    /// - `JwtError::InvalidIssuer` / `JwtError::InvalidAudience` on mismatch
    /// - `JwtError::InvalidFormat` for tokens that are not JWTs at all
    /// - `JwtError::ValidationError` otherwise (bad signature, wrong algorithm)
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.settings.issuer.as_str()]);
        validation.set_audience(&[self.settings.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
                    expected: self.settings.issuer.clone(),
                },
                ErrorKind::InvalidAudience => JwtError::InvalidAudience {
                    expected: self.settings.audience.clone(),
                },
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
                    JwtError::InvalidFormat(e.to_string())
                }
                _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
            })?;

        Ok(token_data.claims)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, credential: &Credential) -> Result<String, JwtError> {
        self.issue_at(credential, Utc::now())
    }
}
