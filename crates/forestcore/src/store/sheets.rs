//! Google Sheets implementation of the record store
//!
//! Talks to the Sheets REST API v4 directly over `reqwest`:
//! - read-range:   `GET  /spreadsheets/{id}/values/{range}`
//! - append-row:   `POST /spreadsheets/{id}/values/{range}:append`
//! - write-range:  `PUT  /spreadsheets/{id}/values/{range}`
//!
//! Every directory operation starts with a fresh full read of `A:K`; the
//! sheet has no index, so lookups are linear scans over the returned rows.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::auth::Credentials;
use super::row::{self, HEADERS, HEADER_RANGE, RECORD_COLUMNS};
use super::RecordStore;
use crate::core::config::AppConfig;
use crate::core::error::{AppError, AppResult};
use crate::models::{UserRecord, UserRole, UserStatus};

/// Longest slice of an error body kept in error messages
const ERROR_BODY_EXCERPT: usize = 300;

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
struct ValueRangeBody<'a> {
    range: &'a str,
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: Vec<Vec<Value>>,
}

/// Record store backed by one spreadsheet tab.
pub struct SheetsStore {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    sheet_name: Option<String>,
    credentials: Credentials,
}

impl SheetsStore {
    pub fn new(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        sheet_name: Option<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.filter(|name| !name.trim().is_empty()),
            credentials,
        })
    }

    /// Builds the store from application config.
    ///
    /// A configured access token wins over the service-account key file.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let credentials = match &config.sheets_access_token {
            Some(token) => Credentials::access_token(SecretString::from(token.expose_secret().to_string())),
            None => Credentials::from_service_account_file(&config.credentials_path)?,
        };
        Self::new(
            config.sheets_api_url.clone(),
            config.spreadsheet_id.clone(),
            config.sheet_name.clone(),
            credentials,
            config.request_timeout(),
        )
    }

    /// Writes the header row. One-time bootstrap, not part of normal operation.
    pub async fn setup_headers(&self) -> AppResult<()> {
        let header = HEADERS.iter().map(|h| Value::String((*h).to_string())).collect();
        self.write_range(HEADER_RANGE, vec![header]).await?;
        log::info!("Header row written to spreadsheet {}", self.spreadsheet_id);
        Ok(())
    }

    /// A1 range for request bodies: the raw quoted tab name plus `a1`.
    fn qualified(&self, a1: &str) -> String {
        row::a1_range(self.sheet_name.as_deref(), a1)
    }

    /// Same range for the URL path; only the tab name is percent-encoded.
    fn values_url(&self, a1: &str) -> String {
        let range = match &self.sheet_name {
            Some(name) => format!("{}!{}", urlencoding::encode(&row::quoted_sheet_name(name)), a1),
            None => a1.to_string(),
        };
        format!("{}/spreadsheets/{}/values/{}", self.base_url, self.spreadsheet_id, range)
    }

    async fn authorized(&self, builder: reqwest::RequestBuilder) -> AppResult<reqwest::RequestBuilder> {
        let token = self.credentials.bearer(&self.http).await?;
        Ok(builder.bearer_auth(token))
    }

    async fn read_rows(&self) -> AppResult<Vec<Vec<Value>>> {
        let request = self.authorized(self.http.get(self.values_url(RECORD_COLUMNS))).await?;
        let response = ensure_success(request.send().await?, "read").await?;
        let range: ValueRange = response.json().await?;
        Ok(range.values)
    }

    async fn write_range(&self, a1: &str, values: Vec<Vec<Value>>) -> AppResult<()> {
        let range = self.qualified(a1);
        let body = ValueRangeBody {
            range: &range,
            major_dimension: "ROWS",
            values,
        };
        let request = self
            .http
            .put(self.values_url(a1))
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        let request = self.authorized(request).await?;
        ensure_success(request.send().await?, "update").await?;
        Ok(())
    }

    async fn append_row(&self, row: Vec<Value>) -> AppResult<()> {
        let range = self.qualified(RECORD_COLUMNS);
        let body = ValueRangeBody {
            range: &range,
            major_dimension: "ROWS",
            values: vec![row],
        };
        let request = self
            .http
            .post(format!("{}:append", self.values_url(RECORD_COLUMNS)))
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&body);
        let request = self.authorized(request).await?;
        ensure_success(request.send().await?, "append").await?;
        Ok(())
    }
}

/// Maps a non-2xx answer to [`AppError::Store`] with a short body excerpt.
async fn ensure_success(response: reqwest::Response, operation: &str) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
    Err(AppError::Store(format!("{} failed with {}: {}", operation, status, excerpt)))
}

#[async_trait]
impl RecordStore for SheetsStore {
    async fn get(&self, telegram_id: i64) -> AppResult<UserRecord> {
        let rows = self.read_rows().await?;
        row::records_from_rows(&rows)
            .into_iter()
            .map(|(_, record)| record)
            .find(|record| record.telegram_id == telegram_id)
            .ok_or(AppError::NotFound(telegram_id))
    }

    async fn append(&self, record: &UserRecord) -> AppResult<()> {
        self.append_row(row::row_from_record(record)).await?;
        log::info!("Appended record for user {}", record.telegram_id);
        Ok(())
    }

    async fn update_status(
        &self,
        telegram_id: i64,
        status: UserStatus,
        role: UserRole,
        comment: &str,
    ) -> AppResult<()> {
        let rows = self.read_rows().await?;
        let index = row::records_from_rows(&rows)
            .into_iter()
            .find(|(_, record)| record.telegram_id == telegram_id)
            .map(|(index, _)| index)
            .ok_or(AppError::NotFound(telegram_id))?;

        let sheet_row = row::sheet_row(index);
        let range = row::status_range(sheet_row, !comment.is_empty());
        self.write_range(&range, vec![row::status_cells(status, role, comment)])
            .await?;
        log::info!(
            "Updated user {} on sheet row {}: status={}, role={}",
            telegram_id,
            sheet_row,
            status,
            role
        );
        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<UserRecord>> {
        let rows = self.read_rows().await?;
        Ok(row::records_from_rows(&rows)
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }
}
