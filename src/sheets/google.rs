//! Google Sheets v4 REST backend.

use super::{SheetBackend, column_letter};
use crate::errors::{AppError, AppResult};
use reqwest::{Response, Url};
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Clone)]
pub struct GoogleSheets {
    http: reqwest::Client,
    api_base: String,
    spreadsheet_id: String,
    access_token: String,
    template_sheet: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// `A1` notation needs sheet titles quoted, with inner quotes doubled.
fn quoted(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

impl GoogleSheets {
    pub fn new(spreadsheet_id: &str, access_token: &str, template_sheet: &str) -> AppResult<Self> {
        Self::with_api_base(spreadsheet_id, access_token, template_sheet, DEFAULT_API_BASE)
    }

    pub fn with_api_base(
        spreadsheet_id: &str,
        access_token: &str,
        template_sheet: &str,
        api_base: &str,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rtimeclock/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
            template_sheet: template_sheet.to_string(),
        })
    }

    /// `{base}/{id}` followed by `segments`, each percent-encoded
    fn url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}/", self.api_base))
            .map_err(|e| AppError::Config(format!("invalid sheets api base: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::Config("sheets api base cannot be a base url".into()))?;
            path.pop_if_empty().push(&self.spreadsheet_id);
            path.extend(segments);
        }
        Ok(url)
    }

    async fn check(resp: Response, what: &str) -> AppResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(AppError::Sheets(format!("{what} failed ({status}): {body}")))
    }

    async fn list_sheets(&self) -> AppResult<Vec<SheetProperties>> {
        let mut url = self.url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let meta: SpreadsheetMeta = Self::check(resp, "spreadsheet lookup").await?.json().await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties).collect())
    }

    async fn duplicate(&self, source_sheet_id: i64, new_name: &str) -> AppResult<()> {
        // `{id}:batchUpdate` is a single path segment
        let mut url = self.url(&[])?;
        let path = format!("{}:batchUpdate", url.path());
        url.set_path(&path);

        let body = json!({
            "requests": [{
                "duplicateSheet": {
                    "sourceSheetId": source_sheet_id,
                    "newSheetName": new_name,
                }
            }]
        });
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(resp, "duplicate worksheet").await?;
        Ok(())
    }
}

impl SheetBackend for GoogleSheets {
    async fn ensure_worksheet(&self, name: &str) -> AppResult<()> {
        let sheets = self.list_sheets().await?;
        if sheets.iter().any(|s| s.title == name) {
            return Ok(());
        }

        let template = sheets
            .iter()
            .find(|s| s.title == self.template_sheet)
            .ok_or_else(|| AppError::WorksheetNotFound(self.template_sheet.clone()))?;

        tracing::info!(worksheet = name, template = %self.template_sheet, "creating month worksheet");
        self.duplicate(template.sheet_id, name).await
    }

    async fn row_count(&self, name: &str) -> AppResult<usize> {
        let url = self.url(&["values", &quoted(name)])?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let range: ValueRange = Self::check(resp, "read values").await?.json().await?;
        Ok(range.values.len())
    }

    async fn write_cells(
        &self,
        name: &str,
        row: usize,
        first_col: usize,
        values: &[String],
    ) -> AppResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let last_col = first_col + values.len() - 1;
        let range = format!(
            "{}!{}{}:{}{}",
            quoted(name),
            column_letter(first_col),
            row,
            column_letter(last_col),
            row
        );

        let mut url = self.url(&["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [values],
        });
        let resp = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(resp, "update values").await?;
        tracing::debug!(worksheet = name, %range, "cells written");
        Ok(())
    }
}
