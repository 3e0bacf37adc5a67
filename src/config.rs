use std::env;

use crate::constants::DEFAULT_STORAGE_QUOTA_BYTES;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub storage_path: String,
    pub storage_quota_bytes: usize,
    pub allowed_origins: Vec<String>,
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let storage_path =
            env::var("STORAGE_PATH").unwrap_or_else(|_| "./data/portal.redb".to_string());

        let storage_quota_bytes = env::var("STORAGE_QUOTA_BYTES")
            .unwrap_or_else(|_| DEFAULT_STORAGE_QUOTA_BYTES.to_string())
            .parse()
            .map_err(|_| "Invalid STORAGE_QUOTA_BYTES")?;

        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            server_host,
            server_port,
            storage_path,
            storage_quota_bytes,
            allowed_origins,
            environment,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Split a comma-separated origin list, dropping blanks
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
