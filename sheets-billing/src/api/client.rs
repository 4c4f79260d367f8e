//! Google Sheets v4 range client

use std::future::Future;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::{RequestBuilder, Response, StatusCode};

use super::auth::AuthManager;
use super::constants::{INSERT_DATA_OPTION, VALUE_INPUT_OPTION};
use super::models::{ServiceAccountCredentials, ValueRange};
use super::{RangeStore, Row};
use crate::config::SheetsConfig;
use crate::error::{StoreError, StoreResult};

/// Range adapter backed by one spreadsheet
#[derive(Debug)]
pub struct SheetsClient {
    http: reqwest::Client,
    auth: AuthManager,
    spreadsheet_id: String,
    api_base: String,
}

impl SheetsClient {
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sheets-billing/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let credentials = ServiceAccountCredentials {
            client_email: config.service_account_email.clone(),
            private_key: config.private_key.clone(),
            token_uri: config.token_uri.clone(),
        };

        Ok(Self {
            auth: AuthManager::new(http.clone(), credentials),
            http,
            spreadsheet_id: config.spreadsheet_id.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// URL of the values resource for `range`, with an optional `:verb` suffix
    fn values_url(&self, range: &str, suffix: &str) -> String {
        values_url(&self.api_base, &self.spreadsheet_id, range, suffix)
    }

    /// Attach the bearer token, send, and turn non-2xx statuses into errors
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let token = self.auth.access_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .context("Request to Sheets API failed")?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.auth.invalidate().await;
        }
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Sheets API returned {}: {}", status, body)
    }
}

/// Run one remote call, logging and wrapping any failure
async fn remote<T>(
    range: &str,
    operation: &'static str,
    call: impl Future<Output = Result<T>>,
) -> StoreResult<T> {
    call.await.map_err(|err| {
        error!("Error during {} of sheet range {}: {:#}", operation, range, err);
        StoreError::remote(range, operation, err)
    })
}

fn values_url(api_base: &str, spreadsheet_id: &str, range: &str, suffix: &str) -> String {
    format!(
        "{}/spreadsheets/{}/values/{}{}",
        api_base,
        urlencoding::encode(spreadsheet_id),
        urlencoding::encode(range),
        suffix
    )
}

#[async_trait]
impl RangeStore for SheetsClient {
    async fn fetch_range(&self, range: &str) -> StoreResult<Vec<Row>> {
        remote(range, "fetch", async {
            let response = self.send(self.http.get(self.values_url(range, ""))).await?;
            let body: ValueRange = response
                .json()
                .await
                .context("Failed to parse values response")?;
            let rows = body.into_rows();
            debug!("Fetched {} rows from {}", rows.len(), range);
            Ok(rows)
        })
        .await
    }

    async fn append_rows(&self, range: &str, rows: Vec<Row>) -> StoreResult<()> {
        remote(range, "append", async {
            let count = rows.len();
            let request = self
                .http
                .post(self.values_url(range, ":append"))
                .query(&[
                    ("valueInputOption", VALUE_INPUT_OPTION),
                    ("insertDataOption", INSERT_DATA_OPTION),
                ])
                .json(&ValueRange::from_rows(range, rows));
            self.send(request).await?;
            debug!("Appended {} rows to {}", count, range);
            Ok(())
        })
        .await
    }

    async fn overwrite_range(&self, range: &str, rows: Vec<Row>) -> StoreResult<()> {
        remote(range, "overwrite", async {
            let count = rows.len();
            let request = self
                .http
                .put(self.values_url(range, ""))
                .query(&[("valueInputOption", VALUE_INPUT_OPTION)])
                .json(&ValueRange::from_rows(range, rows));
            self.send(request).await?;
            debug!("Overwrote {} with {} rows", range, count);
            Ok(())
        })
        .await
    }

    async fn clear_range(&self, range: &str) -> StoreResult<()> {
        remote(range, "clear", async {
            let request = self
                .http
                .post(self.values_url(range, ":clear"))
                .json(&serde_json::json!({}));
            self.send(request).await?;
            debug!("Cleared {}", range);
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_base: &str) -> SheetsConfig {
        SheetsConfig {
            service_account_email: "svc@example.iam.gserviceaccount.com".into(),
            private_key: "not a key".into(),
            spreadsheet_id: "1AbC-sheet".into(),
            api_base: api_base.into(),
            token_uri: "http://127.0.0.1:9/token".into(),
        }
    }

    #[test]
    fn test_values_url() {
        let client = SheetsClient::new(&config("https://sheets.googleapis.com/v4/")).unwrap();
        assert_eq!(
            client.values_url("Bills", ""),
            "https://sheets.googleapis.com/v4/spreadsheets/1AbC-sheet/values/Bills"
        );
        assert_eq!(
            client.values_url("Bills", ":append"),
            "https://sheets.googleapis.com/v4/spreadsheets/1AbC-sheet/values/Bills:append"
        );
    }

    #[test]
    fn test_values_url_encodes_range() {
        let url = values_url("https://x/v4", "id", "Old Bills!A1:I", ":clear");
        assert_eq!(url, "https://x/v4/spreadsheets/id/values/Old%20Bills%21A1%3AI:clear");
    }

    #[tokio::test]
    async fn test_auth_failure_is_remote_unavailable() {
        // The private key is invalid, so the call fails before any network I/O
        let client = SheetsClient::new(&config("http://127.0.0.1:9/v4")).unwrap();
        let err = client.fetch_range("Customers").await.unwrap_err();
        match err {
            StoreError::RemoteUnavailable {
                range, operation, ..
            } => {
                assert_eq!(range, "Customers");
                assert_eq!(operation, "fetch");
            }
            other => panic!("expected RemoteUnavailable, got {:?}", other),
        }
    }
}
