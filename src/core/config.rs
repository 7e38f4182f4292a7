/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | tienda.db | SQLite database file |
/// | HTTP_PORT | 8033 | HTTP API port |
/// | JWT_SECRET | (random per process) | Token signing secret |
/// | ACCESS_TOKEN_MINUTES | 30 | Access token lifetime |
/// | ENVIRONMENT | development | development \| production |
/// | ADMIN_EMAIL | (unset) | Seed admin account email |
/// | ADMIN_PASSWORD | (unset) | Seed admin account password |
/// | ADMIN_USERNAME | admin | Seed admin account username |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub db_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Token signing secret; a random one is generated when unset
    pub jwt_secret: Option<String>,
    /// Access token lifetime in minutes
    pub access_token_minutes: i64,
    /// Running environment: development | production
    pub environment: String,
    /// Seed admin credentials, applied at startup when both are set
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_username: String,
    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            db_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "tienda.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8033),
            jwt_secret: std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()),
            access_token_minutes: std::env::var("ACCESS_TOKEN_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty()),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
