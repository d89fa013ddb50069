//! Spreadsheet collaborator. One worksheet per month, rows addressed by
//! 1-based position; columns are 1-based too (A = 1).

pub mod csv_book;
pub mod google;

pub use csv_book::CsvWorkbook;
pub use google::GoogleSheets;

use crate::config::{Config, SheetsBackendKind};
use crate::errors::{AppError, AppResult};
use std::future::Future;
use std::path::Path;

pub trait SheetBackend: Send + Sync {
    /// Make sure worksheet `name` exists, duplicating the template if needed.
    fn ensure_worksheet(&self, name: &str) -> impl Future<Output = AppResult<()>> + Send;

    /// Number of rows up to and including the last non-empty one.
    fn row_count(&self, name: &str) -> impl Future<Output = AppResult<usize>> + Send;

    /// Write `values` into consecutive cells of `row`, starting at `first_col`.
    fn write_cells(
        &self,
        name: &str,
        row: usize,
        first_col: usize,
        values: &[String],
    ) -> impl Future<Output = AppResult<()>> + Send;
}

/// Backend chosen by `sheets.backend` at startup
#[derive(Debug)]
pub enum Workbook {
    Google(GoogleSheets),
    Csv(CsvWorkbook),
}

impl Workbook {
    /// Relative `csv_dir` values are resolved against `base_dir`.
    pub fn from_config(cfg: &Config, base_dir: &Path) -> AppResult<Self> {
        let s = &cfg.sheets;
        match s.backend {
            SheetsBackendKind::Google => {
                if s.spreadsheet_id.trim().is_empty() {
                    return Err(AppError::Config(
                        "sheets.spreadsheet_id is not set (config file or GOOGLE_SPREADSHEET_ID)"
                            .into(),
                    ));
                }
                if s.access_token.trim().is_empty() {
                    return Err(AppError::Config(
                        "sheets.access_token is not set (config file or GOOGLE_ACCESS_TOKEN)"
                            .into(),
                    ));
                }
                Ok(Workbook::Google(GoogleSheets::new(
                    &s.spreadsheet_id,
                    &s.access_token,
                    &s.template_sheet,
                )?))
            }
            SheetsBackendKind::Csv => {
                let dir = crate::utils::path::anchored(&s.csv_dir, base_dir);
                Ok(Workbook::Csv(CsvWorkbook::new(dir, &s.template_sheet)))
            }
        }
    }
}

impl SheetBackend for Workbook {
    async fn ensure_worksheet(&self, name: &str) -> AppResult<()> {
        match self {
            Workbook::Google(g) => g.ensure_worksheet(name).await,
            Workbook::Csv(c) => c.ensure_worksheet(name).await,
        }
    }

    async fn row_count(&self, name: &str) -> AppResult<usize> {
        match self {
            Workbook::Google(g) => g.row_count(name).await,
            Workbook::Csv(c) => c.row_count(name).await,
        }
    }

    async fn write_cells(
        &self,
        name: &str,
        row: usize,
        first_col: usize,
        values: &[String],
    ) -> AppResult<()> {
        match self {
            Workbook::Google(g) => g.write_cells(name, row, first_col, values).await,
            Workbook::Csv(c) => c.write_cells(name, row, first_col, values).await,
        }
    }
}

/// 1 → A, 26 → Z, 27 → AA
pub fn column_letter(col: usize) -> String {
    let mut n = col;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}
