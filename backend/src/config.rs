//! Runtime settings, read from the environment (and a `.env` file if present).
//!
//! | Variable | Default |
//! |---|---|
//! | `CONTACT_HOST` | `127.0.0.1` |
//! | `CONTACT_PORT` | `5001` |
//! | `CONTACT_STORAGE` | `sqlite` (`sqlite`, `supabase` or `memory`) |
//! | `CONTACT_DATABASE` | `contact_submissions.sqlite` |
//! | `CONTACT_UPLOAD_DIR` | `uploads` |
//! | `CONTACT_MAX_CONTENT_LENGTH` | 16 MiB |
//! | `SUPABASE_URL`, `SUPABASE_KEY` | required for `supabase` |
//! | `SUPABASE_TABLE` | `contact_submissions` |

use std::path::PathBuf;

pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite { path: PathBuf },
    Supabase { url: String, key: String, table: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub upload_dir: PathBuf,
    pub max_content_length: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got `{value}`")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{0} is required when CONTACT_STORAGE=supabase")]
    Missing(&'static str),
    #[error("unknown storage backend `{0}` (expected sqlite, supabase or memory)")]
    UnknownBackend(String),
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("CONTACT_PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "CONTACT_PORT",
                expected: "a port number",
                value,
            })?,
            None => 5001,
        };
        let max_content_length = match get("CONTACT_MAX_CONTENT_LENGTH") {
            Some(value) => value.parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "CONTACT_MAX_CONTENT_LENGTH",
                expected: "a byte count",
                value,
            })?,
            None => DEFAULT_MAX_CONTENT_LENGTH,
        };

        let storage = match get("CONTACT_STORAGE").as_deref().unwrap_or("sqlite") {
            "sqlite" => StorageBackend::Sqlite {
                path: get("CONTACT_DATABASE")
                    .unwrap_or_else(|| "contact_submissions.sqlite".to_string())
                    .into(),
            },
            "supabase" => StorageBackend::Supabase {
                url: get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?,
                key: get("SUPABASE_KEY").ok_or(ConfigError::Missing("SUPABASE_KEY"))?,
                table: get("SUPABASE_TABLE").unwrap_or_else(|| "contact_submissions".to_string()),
            },
            "memory" => StorageBackend::Memory,
            other => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Settings {
            host: get("CONTACT_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            storage,
            upload_dir: get("CONTACT_UPLOAD_DIR")
                .unwrap_or_else(|| "uploads".to_string())
                .into(),
            max_content_length,
        })
    }
}
