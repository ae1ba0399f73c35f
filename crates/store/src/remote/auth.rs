//! OAuth bearer tokens for the hosted database
//!
//! | Source | Token |
//! |--------|-------|
//! | [`TokenSource::Anonymous`] | none, no `Authorization` header |
//! | [`TokenSource::Static`] | fixed string (emulator `owner`, `FIRESTORE_ACCESS_TOKEN`) |
//! | [`TokenSource::ServiceAccount`] | RS256 JWT assertion exchanged at the key's `token_uri` |
//! | [`TokenSource::Metadata`] | compute metadata server (Cloud Run, GCE) |
//!
//! Fetched tokens are cached and refreshed [`REFRESH_MARGIN_SECS`] before
//! they expire.

use chrono::{DateTime, Duration, Utc};
use eventdesk_core::{Error, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::client::Reply;
use super::credentials::SigningKey;

/// OAuth scope covering Firestore
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Metadata-server endpoint for the default service account's token
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// A cached token is replaced this many seconds before it expires.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Lifetime requested for signed assertions
const ASSERTION_LIFETIME_SECS: i64 = 3600;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Where bearer tokens come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Send no credentials
    Anonymous,
    /// Send this token unchanged
    Static(String),
    /// Sign assertions with a service-account key
    ServiceAccount(SigningKey),
    /// Ask the compute metadata server
    Metadata,
}

/// Claims of a service-account token assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionClaims {
    /// Issuer, the service-account email
    pub iss: String,
    /// Requested scopes, space separated
    pub scope: String,
    /// Token endpoint
    pub aud: String,
    /// Issued at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

impl AssertionClaims {
    /// Claims for `key` issued at `now`.
    pub fn new(key: &SigningKey, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: DATASTORE_SCOPE.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Sign the assertion for `key` with RS256.
pub fn sign_assertion(key: &SigningKey, now: DateTime<Utc>) -> Result<String> {
    let encoding = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| Error::Credentials(format!("invalid service account key: {}", e)))?;
    jsonwebtoken::encode(
        &Header::new(Algorithm::RS256),
        &AssertionClaims::new(key, now),
        &encoding,
    )
    .map_err(|e| Error::Credentials(format!("failed to sign token assertion: {}", e)))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CachedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Usable at `now` without a refresh.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// A token source plus its cache.
pub(crate) struct TokenProvider {
    source: TokenSource,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(source: TokenSource) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &TokenSource {
        &self.source
    }

    #[cfg(test)]
    pub fn seed(&self, token: CachedToken) {
        *self.cache.lock() = Some(token);
    }

    /// Token to send now, fetching a new one when the cache is stale.
    pub fn token(&self, agent: &ureq::Agent) -> Result<Option<String>> {
        match &self.source {
            TokenSource::Anonymous => Ok(None),
            TokenSource::Static(token) => Ok(Some(token.clone())),
            TokenSource::ServiceAccount(_) | TokenSource::Metadata => {
                let now = Utc::now();
                let mut cache = self.cache.lock();
                if let Some(cached) = cache.as_ref().filter(|c| c.is_fresh(now)) {
                    return Ok(Some(cached.value.clone()));
                }
                let fetched = self.fetch(agent, now)?;
                let value = fetched.value.clone();
                *cache = Some(fetched);
                Ok(Some(value))
            }
        }
    }

    fn fetch(&self, agent: &ureq::Agent, now: DateTime<Utc>) -> Result<CachedToken> {
        let result = match &self.source {
            TokenSource::ServiceAccount(key) => {
                debug!(issuer = %key.client_email, "Exchanging service account assertion");
                let assertion = sign_assertion(key, now)?;
                agent.post(key.token_uri.as_str()).send_form([
                    ("grant_type", JWT_BEARER_GRANT),
                    ("assertion", assertion.as_str()),
                ])
            }
            TokenSource::Metadata => {
                debug!("Requesting token from metadata server");
                agent
                    .get(METADATA_TOKEN_URL)
                    .header("Metadata-Flavor", "Google")
                    .call()
            }
            TokenSource::Anonymous | TokenSource::Static(_) => {
                return Err(Error::Credentials("token source does not refresh".to_string()))
            }
        };

        let reply = Reply::read(result).map_err(|e| {
            warn!(error = %e, "Token request failed");
            Error::Credentials(format!("token request failed: {}", e))
        })?;
        let json = reply
            .into_json()
            .map_err(|e| Error::Credentials(format!("token request rejected: {}", e)))?;
        let response: TokenResponse = serde_json::from_value(json)
            .map_err(|e| Error::Credentials(format!("invalid token response: {}", e)))?;

        info!(expires_in = response.expires_in, "Obtained access token");
        Ok(CachedToken {
            value: response.access_token,
            expires_at: now + Duration::seconds(response.expires_in),
        })
    }
}
