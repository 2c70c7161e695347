//! Google API credentials for the record store
//!
//! Production uses a service-account key: an RS256-signed JWT assertion is
//! exchanged for an OAuth access token, which is reused until shortly before
//! it expires. Development and tests can pass a ready-made bearer token.

use std::path::Path;
use std::time::{Duration, Instant};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::error::{AppError, AppResult};

/// OAuth scope granting read/write access to spreadsheets
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the token actually expires
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Subset of a Google service-account JSON key file
#[derive(Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: SecretString,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Access token minted from a service-account key
pub struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// How the store client authenticates against the Sheets API.
pub enum Credentials {
    /// Service-account key; tokens are minted on demand.
    ServiceAccount {
        key: ServiceAccountKey,
        cached: Mutex<Option<CachedToken>>,
    },
    /// Pre-issued bearer token, used verbatim.
    AccessToken(SecretString),
}

impl Credentials {
    /// Loads a service-account key file.
    pub fn from_service_account_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Auth(format!("cannot read credentials file {}: {}", path.display(), e)))?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| AppError::Auth(format!("invalid service account key {}: {}", path.display(), e)))?;
        Ok(Self::ServiceAccount {
            key,
            cached: Mutex::new(None),
        })
    }

    pub fn access_token(token: SecretString) -> Self {
        Self::AccessToken(token)
    }

    /// Bearer token for the next API call.
    pub async fn bearer(&self, http: &reqwest::Client) -> AppResult<String> {
        match self {
            Credentials::AccessToken(token) => Ok(token.expose_secret().to_string()),
            Credentials::ServiceAccount { key, cached } => {
                let mut cached = cached.lock().await;
                if let Some(current) = cached.as_ref() {
                    if Instant::now() < current.refresh_at {
                        return Ok(current.token.expose_secret().to_string());
                    }
                }

                let fresh = fetch_token(http, key).await?;
                let token = fresh.token.expose_secret().to_string();
                *cached = Some(fresh);
                Ok(token)
            }
        }
    }
}

/// Signs the JWT assertion for a service account.
fn sign_assertion(key: &ServiceAccountKey, now: i64) -> AppResult<String> {
    let claims = Claims {
        iss: &key.client_email,
        scope: SHEETS_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_bytes())
        .map_err(|e| AppError::Auth(format!("invalid private key: {}", e)))?;
    encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
        .map_err(|e| AppError::Auth(format!("cannot sign token request: {}", e)))
}

async fn fetch_token(http: &reqwest::Client, key: &ServiceAccountKey) -> AppResult<CachedToken> {
    let assertion = sign_assertion(key, chrono::Utc::now().timestamp())?;

    let response = http
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Auth(format!("token endpoint returned {}: {}", status, body)));
    }

    let parsed: TokenResponse = response.json().await?;
    log::info!("Obtained Sheets access token for {} (expires in {}s)", key.client_email, parsed.expires_in);

    let lifetime = Duration::from_secs(parsed.expires_in).saturating_sub(EXPIRY_MARGIN);
    Ok(CachedToken {
        token: SecretString::from(parsed.access_token),
        refresh_at: Instant::now() + lifetime,
    })
}
