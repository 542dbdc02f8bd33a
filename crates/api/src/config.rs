use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Server configuration, read once at startup.
///
/// | Env Var                | Default                    |
/// |------------------------|----------------------------|
/// | `HOST`                 | `0.0.0.0`                  |
/// | `PORT`                 | `8000`                     |
/// | `CORS_ORIGINS`         | `http://localhost:5173`    |
/// | `REQUEST_TIMEOUT_SECS` | `30`                       |
/// | `MEDIA_ROOT`           | `media`                    |
/// | `PUBLIC_BASE_URL`      | `http://localhost:{PORT}`  |
/// | `MAX_UPLOAD_MB`        | `100`                      |
///
/// `JWT_SECRET` has no default; see [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin, without credentials.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub media: MediaConfig,
    pub jwt: JwtConfig,
}

/// Where uploaded blobs live and how clients reach them.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory blobs are written to and served from.
    pub root: PathBuf,
    /// Externally visible origin, without a trailing slash.
    pub public_base_url: String,
    /// Largest accepted request body in bytes, uploads included.
    pub max_upload_bytes: usize,
}

impl MediaConfig {
    /// Base URL under which `/media` blobs are reachable.
    pub fn base_url(&self) -> String {
        format!("{}/media", self.public_base_url)
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port: u16 = env_or("PORT", 8000);
        let max_upload_mb: usize = env_or("MAX_UPLOAD_MB", 100);

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port,
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            media: MediaConfig {
                root: PathBuf::from(env_or("MEDIA_ROOT", "media".to_string())),
                public_base_url,
                max_upload_bytes: max_upload_mb * 1024 * 1024,
            },
            jwt: JwtConfig::from_env(),
        }
    }

    /// Socket address to bind. Panics on a malformed `HOST`.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .parse()
            .unwrap_or_else(|e| panic!("HOST '{}' is not an IP address: {e}", self.host));
        SocketAddr::new(ip, self.port)
    }
}

/// Read `name` from the environment, falling back to `default` when unset.
/// A value that is set but unparseable stops startup.
pub(crate) fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
