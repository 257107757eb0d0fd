//! Configuration module
//!
//! This module provides the configuration for the gateway: server settings,
//! spool and batch limits, progress-store sizing, and the Google Drive
//! service-account credential, all read from the environment.

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_FILES_PER_BATCH, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PROGRESS_CAPACITY,
    DEFAULT_PROGRESS_TTL_SECONDS, DEFAULT_SPOOL_DIR, DEFAULT_UPLOAD_CONCURRENCY,
};

/// Google Drive service-account credential, supplied via environment variables.
///
/// Field names mirror the service-account JSON key file so values can be
/// copied over verbatim.
#[derive(Clone, Debug)]
pub struct DriveAccount {
    pub account_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_cert_url: String,
    pub client_cert_url: String,
}

impl DriveAccount {
    fn from_env() -> Self {
        DriveAccount {
            account_type: env::var("DRIVE_SA_TYPE")
                .unwrap_or_else(|_| "service_account".to_string()),
            project_id: env::var("DRIVE_SA_PROJECT_ID").unwrap_or_default(),
            private_key_id: env::var("DRIVE_SA_PRIVATE_KEY_ID").unwrap_or_default(),
            // Key files carry literal "\n" sequences when passed through env vars
            private_key: env::var("DRIVE_SA_PRIVATE_KEY")
                .unwrap_or_default()
                .replace("\\n", "\n"),
            client_email: env::var("DRIVE_SA_CLIENT_EMAIL").unwrap_or_default(),
            client_id: env::var("DRIVE_SA_CLIENT_ID").unwrap_or_default(),
            auth_uri: env::var("DRIVE_SA_AUTH_URI")
                .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/auth".to_string()),
            token_uri: env::var("DRIVE_SA_TOKEN_URI")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
            auth_provider_cert_url: env::var("DRIVE_SA_AUTH_PROVIDER_CERT_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v1/certs".to_string()),
            client_cert_url: env::var("DRIVE_SA_CLIENT_CERT_URL").unwrap_or_default(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    environment: String,
    cors_origins: Vec<String>,
    spool_dir: String,
    max_file_size_bytes: usize,
    max_files_per_batch: usize,
    upload_concurrency: usize,
    progress_ttl: Duration,
    progress_capacity: usize,
    drive_public_links: bool,
    drive_api_base_url: String,
    drive_upload_base_url: String,
    drive_account: DriveAccount,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            spool_dir: env::var("UPLOAD_TEMP_DIR")
                .unwrap_or_else(|_| DEFAULT_SPOOL_DIR.to_string()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_files_per_batch: env::var("MAX_FILES_PER_BATCH")
                .unwrap_or_else(|_| DEFAULT_MAX_FILES_PER_BATCH.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_FILES_PER_BATCH),
            upload_concurrency: env::var("UPLOAD_CONCURRENCY")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_CONCURRENCY.to_string())
                .parse()
                .unwrap_or(DEFAULT_UPLOAD_CONCURRENCY),
            progress_ttl: Duration::from_secs(
                env::var("PROGRESS_TTL_SECONDS")
                    .unwrap_or_else(|_| DEFAULT_PROGRESS_TTL_SECONDS.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_PROGRESS_TTL_SECONDS),
            ),
            progress_capacity: env::var("PROGRESS_CAPACITY")
                .unwrap_or_else(|_| DEFAULT_PROGRESS_CAPACITY.to_string())
                .parse()
                .unwrap_or(DEFAULT_PROGRESS_CAPACITY),
            drive_public_links: env::var("DRIVE_PUBLIC_LINKS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(true),
            drive_api_base_url: env::var("DRIVE_API_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/drive/v3".to_string()),
            drive_upload_base_url: env::var("DRIVE_UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/upload/drive/v3".to_string()),
            drive_account: DriveAccount::from_env(),
        };

        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_files_per_batch == 0 {
            return Err(anyhow::anyhow!("MAX_FILES_PER_BATCH must be at least 1"));
        }

        if self.upload_concurrency == 0 {
            return Err(anyhow::anyhow!("UPLOAD_CONCURRENCY must be at least 1"));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let account = &self.drive_account;
        if account.client_email.is_empty()
            || account.private_key.is_empty()
            || account.token_uri.is_empty()
        {
            return Err(anyhow::anyhow!(
                "Drive credentials missing: DRIVE_SA_CLIENT_EMAIL, DRIVE_SA_PRIVATE_KEY, and DRIVE_SA_TOKEN_URI are required"
            ));
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn spool_dir(&self) -> &str {
        &self.spool_dir
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    pub fn max_files_per_batch(&self) -> usize {
        self.max_files_per_batch
    }

    pub fn upload_concurrency(&self) -> usize {
        self.upload_concurrency
    }

    pub fn progress_ttl(&self) -> Duration {
        self.progress_ttl
    }

    pub fn progress_capacity(&self) -> usize {
        self.progress_capacity
    }

    pub fn drive_public_links(&self) -> bool {
        self.drive_public_links
    }

    pub fn drive_api_base_url(&self) -> &str {
        &self.drive_api_base_url
    }

    pub fn drive_upload_base_url(&self) -> &str {
        &self.drive_upload_base_url
    }

    pub fn drive_account(&self) -> &DriveAccount {
        &self.drive_account
    }
}
