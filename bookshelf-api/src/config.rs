/// Configuration management for the API server
///
/// Settings are read from the environment (after loading `.env` when
/// present) through the `config` crate into a flat [`Settings`] struct, then
/// checked and grouped into the typed [`Config`].
///
/// # Environment Variables
///
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `CORS_ORIGINS`: comma-separated allowed origins, `*` for any (default: *)
/// - `PRODUCTION`: enables HSTS and strict CORS handling (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `JWT_SECRET`: HMAC signing secret, at least 32 characters (required)
/// - `JWT_ISSUER`: token issuer (default: bookshelf)
/// - `JWT_AUDIENCE`: token audience (default: bookshelf-clients)
/// - `JWT_EXPIRY_MINUTES`: token lifetime (default: 60)
/// - `PASSWORD_MIN_LENGTH`: minimum password length (default: 1)
/// - `PASSWORD_REQUIRE_COMPLEXITY`: require mixed character classes (default: false)
/// - `SEED_DATA`: insert sample data into an empty catalogue (default: false)
/// - `RUST_LOG` / `LOG_FORMAT`: read by the tracing setup in `main`
///
/// # Example
///
/// ```no_run
/// use bookshelf_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use bookshelf_shared::auth::{jwt::JwtSettings, password::PasswordPolicy};
use serde::Deserialize;
use std::collections::HashMap;

/// Raw settings as they appear in the environment
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_host: String,
    pub api_port: u16,
    pub cors_origins: String,
    pub production: bool,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: Option<String>,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_minutes: i64,
    pub password_min_length: usize,
    pub password_require_complexity: bool,
    pub seed_data: bool,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtSettings,
    pub password: PasswordPolicy,

    /// Insert sample data on startup when the catalogue is empty
    pub seed_data: bool,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (HSTS header)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is
    /// invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(config::Environment::default().try_parsing(true))
    }

    /// Loads configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> anyhow::Result<Self> {
        Self::from_source(
            config::Environment::default()
                .try_parsing(true)
                .source(Some(vars.into_iter().collect())),
        )
    }

    fn from_source(environment: config::Environment) -> anyhow::Result<Self> {
        let settings: Settings = config::Config::builder()
            .set_default("api_host", "0.0.0.0")?
            .set_default("api_port", 8080)?
            .set_default("cors_origins", "*")?
            .set_default("production", false)?
            .set_default("database_max_connections", 10)?
            .set_default("jwt_issuer", "bookshelf")?
            .set_default("jwt_audience", "bookshelf-clients")?
            .set_default("jwt_expiry_minutes", 60)?
            .set_default("password_min_length", 1)?
            .set_default("password_require_complexity", false)?
            .set_default("seed_data", false)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        Self::from_settings(settings)
    }

    /// Validates raw settings
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let database_url = settings
            .database_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = settings
            .jwt_secret
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        if settings.jwt_expiry_minutes <= 0 {
            anyhow::bail!("JWT_EXPIRY_MINUTES must be greater than zero");
        }

        let cors_origins = settings
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            api: ApiConfig {
                host: settings.api_host,
                port: settings.api_port,
                cors_origins,
                production: settings.production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: settings.database_max_connections,
            },
            jwt: JwtSettings {
                secret: jwt_secret,
                issuer: settings.jwt_issuer,
                audience: settings.jwt_audience,
                expiry_minutes: settings.jwt_expiry_minutes,
            },
            password: PasswordPolicy {
                min_length: settings.password_min_length,
                require_complexity: settings.password_require_complexity,
            },
            seed_data: settings.seed_data,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
