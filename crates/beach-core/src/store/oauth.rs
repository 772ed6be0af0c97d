//! OAuth2 access tokens for a Google service account.
//!
//! Implements the JWT bearer grant: an RS256-signed assertion naming the
//! account, the Firebase scopes and the token endpoint is exchanged for a
//! short-lived access token. Tokens are cached until a minute before expiry.

use crate::error::{BeachError, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes the Realtime Database REST API accepts for service accounts.
pub const FIREBASE_SCOPES: &str =
    "https://www.googleapis.com/auth/firebase.database https://www.googleapis.com/auth/userinfo.email";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service-account JSON file needed to sign assertions.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Extract the signing fields from a service-account document.
    pub fn from_value(value: &Value) -> Result<Self> {
        let key: Self = serde_json::from_value(value.clone()).map_err(|e| {
            BeachError::Config(format!("service account is not usable for signing: {e}"))
        })?;
        if key.client_email.trim().is_empty() {
            return Err(BeachError::Config(
                "service account has an empty client_email".into(),
            ));
        }
        key.encoding_key()?;
        Ok(key)
    }

    fn encoding_key(&self) -> Result<EncodingKey> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            BeachError::Config(format!("service account private_key is not a valid RSA key: {e}"))
        })
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Mints and caches access tokens for one service account.
pub struct TokenSource {
    client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSource")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl TokenSource {
    pub fn new(client: Client, key: ServiceAccountKey) -> Result<Self> {
        let encoding_key = key.encoding_key()?;
        Ok(Self {
            client,
            key,
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    /// A valid access token, fetching a new one when the cached token is
    /// missing or about to expire.
    pub fn access_token(&self) -> Result<String> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| BeachError::Store("token cache lock poisoned".into()))?;
        if let Some(token) = cached
            .as_ref()
            .filter(|t| t.expires_at > Instant::now() + REFRESH_MARGIN)
        {
            return Ok(token.value.clone());
        }

        let fresh = self.fetch()?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    /// Signed JWT assertion for the token exchange.
    fn assertion(&self) -> Result<String> {
        let iat = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| BeachError::Store(format!("system clock before unix epoch: {e}")))?
            .as_secs();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: FIREBASE_SCOPES,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| BeachError::Store(format!("failed to sign token assertion: {e}")))
    }

    fn fetch(&self) -> Result<CachedToken> {
        let assertion = self.assertion()?;
        tracing::debug!(account = %self.key.client_email, "requesting access token");
        let requested_at = Instant::now();
        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(BeachError::Store(format!(
                "token exchange failed with {status}: {}",
                body.trim()
            )));
        }
        let token: TokenResponse = resp.json()?;
        Ok(CachedToken {
            value: token.access_token,
            expires_at: requested_at + Duration::from_secs(token.expires_in),
        })
    }
}
