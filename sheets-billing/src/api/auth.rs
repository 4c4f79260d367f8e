//! Service-account authentication for the Sheets API
//!
//! Signs a short-lived RS256 assertion with the service account's private key
//! and exchanges it for a bearer token. The token is cached until shortly
//! before it expires.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::debug;
use tokio::sync::RwLock;

use super::constants::{ASSERTION_LIFETIME_SECS, JWT_BEARER_GRANT, SPREADSHEETS_SCOPE};
use super::models::{AssertionClaims, ServiceAccountCredentials, TokenInfo, TokenResponse};

/// Hands out bearer tokens for one service account
#[derive(Debug)]
pub struct AuthManager {
    http: reqwest::Client,
    credentials: ServiceAccountCredentials,
    token: RwLock<Option<TokenInfo>>,
}

impl AuthManager {
    pub fn new(http: reqwest::Client, credentials: ServiceAccountCredentials) -> Self {
        Self {
            http,
            credentials,
            token: RwLock::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    /// Get a valid access token, exchanging a new assertion if needed
    pub async fn access_token(&self) -> Result<String> {
        let now = Utc::now();
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.access_token.clone());
            }
        }

        let mut slot = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(token) = slot.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token(now).await?;
        let access_token = token.access_token.clone();
        *slot = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token so the next call re-authenticates
    pub async fn invalidate(&self) {
        *self.token.write().await = None;
    }

    async fn request_token(&self, now: DateTime<Utc>) -> Result<TokenInfo> {
        debug!(
            "Requesting access token for {} from {}",
            self.credentials.client_email, self.credentials.token_uri
        );

        let assertion = self.sign_assertion(now)?;
        let response = self
            .http
            .post(&self.credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("Failed to reach token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Token request failed with status {}: {}", status, body);
        }

        let body: TokenResponse = response
            .json()
            .await
            .context("Failed to parse token response")?;

        debug!("Obtained access token valid for {}s", body.expires_in);
        Ok(TokenInfo::from_response(body, now))
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = assertion_claims(&self.credentials, now);
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .context("Service account private key is not a valid RSA PEM key")?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .context("Failed to sign token assertion")
    }
}

/// Claims for an assertion issued at `now`
pub fn assertion_claims(
    credentials: &ServiceAccountCredentials,
    now: DateTime<Utc>,
) -> AssertionClaims {
    let iat = now.timestamp();
    AssertionClaims {
        iss: credentials.client_email.clone(),
        scope: SPREADSHEETS_SCOPE.to_string(),
        aud: credentials.token_uri.clone(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    }
}

/// Turn escaped `\n` sequences (as found in env files) into real newlines
pub fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
