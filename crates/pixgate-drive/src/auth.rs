//! Service-account authentication
//!
//! Mints short-lived access tokens from the service-account key: a signed
//! RS256 JWT assertion is exchanged at the token endpoint, and the resulting
//! token is cached until shortly before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use pixgate_core::config::DriveAccount;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{DriveError, DriveResult};

/// OAuth scope for full Drive access
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Assertion lifetime; Google caps service-account assertions at one hour
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh slack so a token is never handed out right before it expires
const EXPIRY_SLACK_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Caching access-token source for one service account.
pub struct TokenProvider {
    http_client: reqwest::Client,
    account: DriveAccount,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(http_client: reqwest::Client, account: DriveAccount) -> Self {
        TokenProvider {
            http_client,
            account,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid access token, minting a fresh one when the cached token
    /// is missing or about to expire.
    pub async fn access_token(&self) -> DriveResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() + Duration::seconds(EXPIRY_SLACK_SECS) {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);

        Ok(access_token)
    }

    fn signed_assertion(&self, now: DateTime<Utc>) -> DriveResult<String> {
        let claims = Claims {
            iss: self.account.client_email.clone(),
            scope: DRIVE_SCOPE.to_string(),
            aud: self.account.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        if !self.account.private_key_id.is_empty() {
            header.kid = Some(self.account.private_key_id.clone());
        }

        let key = EncodingKey::from_rsa_pem(self.account.private_key.as_bytes())
            .map_err(|e| DriveError::Auth(format!("Invalid service-account private key: {}", e)))?;

        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|e| DriveError::Auth(format!("Failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self) -> DriveResult<CachedToken> {
        let now = Utc::now();
        let assertion = self.signed_assertion(now)?;

        let response = self
            .http_client
            .post(&self.account.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Auth(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::Auth(format!("Invalid token response: {}", e)))?;

        tracing::debug!(
            client_email = %self.account.client_email,
            expires_in = token.expires_in,
            "Minted Drive access token"
        );

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}
