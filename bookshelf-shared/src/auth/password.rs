/// Password hashing using Argon2id
///
/// [`PasswordHasher`] is the capability the authentication service depends
/// on; [`Argon2Hasher`] is the production implementation.
///
/// # Security
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash, PHC string format with a random 16-byte salt
///
/// Verification reads the parameters back from the stored hash, so hashes
/// created with other parameters still verify.
///
/// # Example
///
/// ```
/// use bookshelf_shared::auth::password::{Argon2Hasher, PasswordHasher};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = Argon2Hasher::default();
/// let hash = hasher.hash("super_secret_password_123")?;
///
/// assert!(hasher.verify("super_secret_password_123", &hash)?);
/// assert!(!hasher.verify("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// One-way password hashing capability
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into an opaque string
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Checks a plaintext password against a stored hash
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for unreadable
    /// hashes and internal failures.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Argon2id hasher
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Default memory cost in KiB
    pub const MEMORY_KIB: u32 = 65536;
    /// Default number of passes
    pub const ITERATIONS: u32 = 3;
    /// Default number of lanes
    pub const PARALLELISM: u32 = 4;
    /// Hash output length in bytes
    pub const OUTPUT_LEN: usize = 32;

    /// Creates a hasher with custom cost parameters
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if argon2 rejects the parameters.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(memory_kib)
            .t_cost(iterations)
            .p_cost(parallelism)
            .output_len(Self::OUTPUT_LEN)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        let params = Params::new(
            Self::MEMORY_KIB,
            Self::ITERATIONS,
            Self::PARALLELISM,
            Some(Self::OUTPUT_LEN),
        )
        .unwrap_or_default();

        Self { params }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        // Parameters come from the PHC string, not from self
        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
        }
    }
}

/// Password acceptance rules applied at registration
///
/// The default accepts any non-empty password. With `require_complexity`
/// set, a password also needs at least 8 characters including an uppercase
/// letter, a lowercase letter, a digit and a special character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_complexity: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 1,
            require_complexity: false,
        }
    }
}

impl PasswordPolicy {
    /// Checks a password, returning a human-readable reason on rejection
    ///
    /// # Example
    ///
    /// ```
    /// use bookshelf_shared::auth::password::PasswordPolicy;
    ///
    /// let strict = PasswordPolicy { min_length: 8, require_complexity: true };
    /// assert!(strict.check("MyP@ssw0rd!").is_ok());
    /// assert!(strict.check("Password123").is_err());
    /// ```
    pub fn check(&self, password: &str) -> Result<(), String> {
        let length = password.chars().count();
        if length < self.min_length.max(1) {
            return Err(format!(
                "Password must be at least {} characters long",
                self.min_length.max(1)
            ));
        }

        if !self.require_complexity {
            return Ok(());
        }

        if length < 8 {
            return Err("Password must be at least 8 characters long".to_string());
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err("Password must contain at least one uppercase letter".to_string());
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err("Password must contain at least one lowercase letter".to_string());
        }

        if !password.chars().any(|c| c.is_numeric()) {
            return Err("Password must contain at least one digit".to_string());
        }

        if !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err("Password must contain at least one special character".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(1024, 1, 1).expect("valid parameters")
    }

    #[test]
    fn test_hash_uses_argon2id_parameters() {
        let hash = Argon2Hasher::default()
            .hash("test_password_123")
            .expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_produces_different_salts() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("same_password").expect("Hash 1 should succeed");
        let hash2 = hasher.hash("same_password").expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_correct_and_incorrect() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct_password").expect("Hash should succeed");

        assert!(hasher.verify("correct_password", &hash).unwrap());
        assert!(!hasher.verify("wrong_password", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn test_verify_reads_parameters_from_hash() {
        let hash = fast_hasher().hash("password").unwrap();
        assert!(Argon2Hasher::default().verify("password", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = fast_hasher();
        assert!(matches!(
            hasher.verify("password", "invalid_hash"),
            Err(PasswordError::InvalidHash(_))
        ));
        assert!(hasher.verify("password", "argon2id-without-phc-prefix").is_err());
        assert!(!matches!(hasher.verify("password", "$argon2id$invalid"), Ok(true)));
    }

    #[test]
    fn test_hash_verify_unicode() {
        let hasher = fast_hasher();
        for password in ["with spaces", "unicode-密码-パスワード", "with-special-chars!@#$%"] {
            let hash = hasher.hash(password).unwrap();
            assert!(hasher.verify(password, &hash).unwrap(), "{password} should verify");
        }
    }

    #[test]
    fn test_default_policy_accepts_any_non_empty_password() {
        let policy = PasswordPolicy::default();
        assert!(policy.check("a").is_ok());
        assert!(policy.check("password").is_ok());
        assert!(policy.check("").is_err());
    }

    #[test]
    fn test_min_length_counts_characters() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_complexity: false,
        };
        assert!(policy.check("密码密码").is_ok());
        assert!(policy.check("abc").unwrap_err().contains("at least 4"));
    }

    #[test]
    fn test_complexity_rules() {
        let policy = PasswordPolicy {
            min_length: 1,
            require_complexity: true,
        };

        assert!(policy.check("MyP@ssw0rd!").is_ok());
        assert!(policy.check("Sh0rt!").unwrap_err().contains("at least 8"));
        assert!(policy.check("lowercase1!").unwrap_err().contains("uppercase"));
        assert!(policy.check("UPPERCASE1!").unwrap_err().contains("lowercase"));
        assert!(policy.check("NoDigits!").unwrap_err().contains("digit"));
        assert!(policy.check("NoSpecial123").unwrap_err().contains("special"));
    }
}
