//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use press_core::domain::DEFAULT_MAX_UPLOAD_BYTES;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub content: ContentConfig,
    pub uploads: UploadConfig,
}

/// Where posts are stored.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub dir: PathBuf,
    pub atomic_writes: bool,
}

/// Where uploaded images are written and served from.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub url_prefix: String,
    pub max_bytes: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset or unparseable values
    /// fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            host: string("HOST", "127.0.0.1"),
            port: lookup("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            content: ContentConfig {
                dir: string("CONTENT_DIR", "src/content/blog").into(),
                atomic_writes: lookup("CONTENT_ATOMIC_WRITES")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(true),
            },
            uploads: UploadConfig {
                dir: string("UPLOAD_DIR", "public/images/uploads").into(),
                url_prefix: string("UPLOAD_URL_PREFIX", "/images/uploads"),
                max_bytes: lookup("UPLOAD_MAX_BYTES")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
        }
    }
}
