use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CLIENT_DOMAIN`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`).
    pub request_timeout_secs: u64,
    /// Base WebSocket URL of the LLM chat server.
    pub llm_ws_url: String,
    /// Upper bound on one generation round trip, in seconds.
    pub llm_timeout_secs: u64,
    /// Base URL of the text-to-image service.
    pub image_gen_url: String,
    /// Directory receiving character images. Also served under `/static`.
    pub upload_dir: String,
    /// Directory receiving user profile images.
    pub profile_upload_dir: String,
    /// Body size cap for multipart image uploads, in bytes (default: 20 MiB).
    pub max_upload_bytes: usize,
    /// Postgres connection string.
    pub database_url: String,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `8000`                  |
    /// | `CLIENT_DOMAIN`        | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                   |
    /// | `LLM_WS_URL`           | `ws://localhost:8001`   |
    /// | `LLM_TIMEOUT_SECS`     | `60`                    |
    /// | `IMAGE_GEN_URL`        | `http://localhost:8002` |
    /// | `UPLOAD_DIR`           | `uploads/characters`    |
    /// | `PROFILE_UPLOAD_DIR`   | `uploads/user_profiles` |
    /// | `MAX_UPLOAD_BYTES`     | `20971520` (20 MiB)     |
    /// | `DATABASE_URL`         | assembled from `DB_*`   |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "8000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(&env_or("CLIENT_DOMAIN", "http://localhost:3000"));

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "120")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let llm_timeout_secs: u64 = env_or("LLM_TIMEOUT_SECS", "60")
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = env_or("MAX_UPLOAD_BYTES", "20971520")
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            database_url_from_parts(
                &env_or("DB_USER", ""),
                &env_or("DB_PASS", ""),
                &env_or("DB_HOST", ""),
                &env_or("DB_PORT", ""),
                &env_or("DB_NAME", ""),
            )
        });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            llm_ws_url: env_or("LLM_WS_URL", "ws://localhost:8001"),
            llm_timeout_secs,
            image_gen_url: env_or("IMAGE_GEN_URL", "http://localhost:8002"),
            upload_dir: env_or("UPLOAD_DIR", "uploads/characters"),
            profile_upload_dir: env_or("PROFILE_UPLOAD_DIR", "uploads/user_profiles"),
            max_upload_bytes,
            database_url,
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Assemble a Postgres URL from its parts.
///
/// Missing parts stay empty; the resulting URL is then rejected when the
/// pool connects, not here.
pub fn database_url_from_parts(
    user: &str,
    password: &str,
    host: &str,
    port: &str,
    name: &str,
) -> String {
    format!("postgres://{user}:{password}@{host}:{port}/{name}")
}
