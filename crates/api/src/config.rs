use skinsight_vision::client::DEFAULT_BASE_URL;
use skinsight_vision::Credentials;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// vision API key pair, which must be supplied for analyses to succeed.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Face++ key pair. Redacted in `Debug` output.
    pub face_api: Credentials,
    /// Face++ base URL (default: `https://api-us.faceplusplus.com`).
    pub face_api_base_url: String,
}

/// Request body limit. Above the 2 MiB image limit so oversize uploads get
/// the validation message instead of a bare 413.
pub const BODY_LIMIT_BYTES: usize = 8 * 1024 * 1024;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                            |
    /// |------------------------|------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                          |
    /// | `PORT`                 | `3000`                             |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`            |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                               |
    /// | `FACE_API_KEY`         | empty                              |
    /// | `FACE_API_SECRET`      | empty                              |
    /// | `FACE_API_BASE_URL`    | `https://api-us.faceplusplus.com`  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let face_api = Credentials::new(
            std::env::var("FACE_API_KEY").unwrap_or_default(),
            std::env::var("FACE_API_SECRET").unwrap_or_default(),
        );
        if !face_api.is_configured() {
            tracing::warn!("FACE_API_KEY / FACE_API_SECRET missing or too short; analyses will fail");
        }

        let face_api_base_url =
            std::env::var("FACE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            face_api,
            face_api_base_url,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test ,,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
