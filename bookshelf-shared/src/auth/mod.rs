/// Authentication
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the password policy
/// - [`jwt`]: HS256 token issuance and validation
/// - [`service`]: registration and login
/// - [`middleware`]: bearer-token extraction and the request auth context
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use bookshelf_shared::auth::{
///     jwt::{JwtSettings, JwtTokenIssuer},
///     password::Argon2Hasher,
///     service::AuthService,
/// };
/// use bookshelf_shared::repositories::UnitOfWork;
///
/// let uow = UnitOfWork::in_memory();
/// let tokens = Arc::new(JwtTokenIssuer::new(JwtSettings {
///     secret: "a-very-long-secret-key-of-at-least-32-bytes".to_string(),
///     issuer: "bookshelf".to_string(),
///     audience: "bookshelf-clients".to_string(),
///     expiry_minutes: 60,
/// }));
/// let auth = AuthService::new(uow.credentials(), Arc::new(Argon2Hasher::default()), tokens);
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;
