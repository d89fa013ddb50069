//! Local workbook: a directory with one `<worksheet>.csv` per worksheet.

use super::SheetBackend;
use crate::errors::{AppError, AppResult};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Header row written into a freshly created template
pub const TEMPLATE_HEADER: [&str; 4] = ["Date", "Start", "End", "Hours"];

#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
    template_sheet: String,
}

impl CsvWorkbook {
    pub fn new(dir: impl Into<PathBuf>, template_sheet: &str) -> Self {
        Self {
            dir: dir.into(),
            template_sheet: template_sheet.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sheet_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }

    /// Create the directory and a template with a header row, if missing.
    pub fn init_template(&self) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.sheet_path(&self.template_sheet);
        if !path.exists() {
            let header: Vec<String> = TEMPLATE_HEADER.iter().map(|s| s.to_string()).collect();
            write_rows(&path, &[header])?;
        }
        Ok(path)
    }

    /// All rows of a worksheet, trailing empty rows dropped
    pub fn read_rows(&self, name: &str) -> AppResult<Vec<Vec<String>>> {
        let path = self.sheet_path(name);
        if !path.exists() {
            return Err(AppError::WorksheetNotFound(name.to_string()));
        }
        read_rows(&path)
    }
}

fn read_rows(path: &Path) -> AppResult<Vec<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for rec in rdr.records() {
        rows.push(rec?.iter().map(str::to_string).collect::<Vec<_>>());
    }

    while rows
        .last()
        .is_some_and(|r: &Vec<String>| r.iter().all(|c| c.trim().is_empty()))
    {
        rows.pop();
    }
    Ok(rows)
}

fn write_rows(path: &Path, rows: &[Vec<String>]) -> AppResult<()> {
    let mut wtr = WriterBuilder::new().flexible(true).from_path(path)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

impl SheetBackend for CsvWorkbook {
    async fn ensure_worksheet(&self, name: &str) -> AppResult<()> {
        let path = self.sheet_path(name);
        if path.exists() {
            return Ok(());
        }

        let template = self.sheet_path(&self.template_sheet);
        if !template.exists() {
            return Err(AppError::WorksheetNotFound(self.template_sheet.clone()));
        }

        tracing::info!(worksheet = name, template = %self.template_sheet, "creating month worksheet");
        fs::copy(&template, &path)?;
        Ok(())
    }

    async fn row_count(&self, name: &str) -> AppResult<usize> {
        Ok(self.read_rows(name)?.len())
    }

    async fn write_cells(
        &self,
        name: &str,
        row: usize,
        first_col: usize,
        values: &[String],
    ) -> AppResult<()> {
        if row == 0 || first_col == 0 {
            return Err(AppError::Other(format!(
                "cell positions are 1-based (row {row}, col {first_col})"
            )));
        }

        let mut rows = self.read_rows(name)?;
        if rows.len() < row {
            rows.resize_with(row, Vec::new);
        }

        let target = &mut rows[row - 1];
        let needed = first_col - 1 + values.len();
        if target.len() < needed {
            target.resize(needed, String::new());
        }
        for (i, v) in values.iter().enumerate() {
            target[first_col - 1 + i] = v.clone();
        }

        write_rows(&self.sheet_path(name), &rows)
    }
}
