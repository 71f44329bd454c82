// src/reader/mod.rs
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde_json::Value;
use tracing::{debug, warn};

use crate::extract::{columns, extract_key_fields, KeyFieldRecord};
use crate::normalize::{clean_value, render_value, RawRow, RECORD_NUMBER_KEY};

/// Field delimiter used by the registry exports.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Suffix appended to the input file stem for the default output path.
const PROCESSED_SUFFIX: &str = "_processed";

/// Reads and writes `;`-delimited UTF-8 registry exports. Holds no parse
/// state between calls: every read re-opens the file, so callers that look
/// things up repeatedly should keep the materialized rows themselves.
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_delimiter(path, DEFAULT_DELIMITER)
    }

    pub fn with_delimiter(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        let path = path.into();
        debug!(path = %path.display(), delimiter = %delimiter as char, "initialized CsvReader");
        Self { path, delimiter }
    }

    /// Read every company row: the first line is the header, each later line
    /// becomes one `RawRow` with per-cell normalization applied and a 1-based
    /// record number under `"number"`. Row order follows the file.
    #[tracing::instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub async fn read_companies(&self) -> Result<Vec<RawRow>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading CSV file {}", self.path.display()))?;

        let companies = self.parse_content(&content)?;
        debug!("read {} companies from CSV file", companies.len());
        Ok(companies)
    }

    fn parse_content(&self, content: &str) -> Result<Vec<RawRow>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true) // records may be shorter or longer than the header
            .from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .with_context(|| format!("reading CSV header row of {}", self.path.display()))?
            .clone();

        let mut companies = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result.with_context(|| {
                format!(
                    "CSV parse error in {} at record {}",
                    self.path.display(),
                    idx + 1
                )
            })?;

            // Every header key is present in every row: cells missing from a
            // short record read as null, extra trailing cells are dropped.
            let mut row = RawRow::new();
            for (i, header) in headers.iter().enumerate() {
                let value = record.get(i).map(clean_value).unwrap_or(Value::Null);
                row.insert(header.to_string(), value);
            }
            row.insert(RECORD_NUMBER_KEY.to_string(), Value::from((idx + 1) as i64));
            companies.push(row);
        }

        Ok(companies)
    }

    /// Read the file once and return the full rows together with the
    /// parallel key-field records, 1:1 by ordinal position.
    #[tracing::instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub async fn read_companies_with_key_fields(
        &self,
    ) -> Result<(Vec<RawRow>, Vec<KeyFieldRecord>)> {
        let companies = self.read_companies().await?;
        let key_fields: Vec<KeyFieldRecord> = companies.iter().map(extract_key_fields).collect();
        debug!("extracted {} key-field records", key_fields.len());
        Ok((companies, key_fields))
    }

    /// Write rows back out as delimited text. The header is taken from the
    /// first record's keys in key order; fields a later record has but the
    /// first does not are dropped (schema from first row, known limitation).
    /// Null cells serialize as the empty string. No quoting is performed.
    #[tracing::instrument(level = "debug", skip(self, companies))]
    pub async fn write_companies(
        &self,
        companies: &[RawRow],
        output_path: Option<&Path>,
    ) -> Result<PathBuf> {
        let output_path = match output_path {
            Some(p) => p.to_path_buf(),
            None => self.default_output_path(),
        };

        if companies.is_empty() {
            warn!("no companies to write");
            return Ok(output_path);
        }

        let delimiter = (self.delimiter as char).to_string();
        // Field list is fixed once, from the first record, before the loop.
        let fieldnames: Vec<&String> = companies[0].keys().collect();

        let mut out = String::new();
        out.push_str(
            &fieldnames
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(&delimiter),
        );
        out.push('\n');

        for company in companies {
            let line = fieldnames
                .iter()
                .map(|field| {
                    company
                        .get(field.as_str())
                        .map(render_value)
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .join(&delimiter);
            out.push_str(&line);
            out.push('\n');
        }

        tokio::fs::write(&output_path, out)
            .await
            .with_context(|| format!("writing CSV file {}", output_path.display()))?;

        debug!(
            "wrote {} companies to CSV file: {}",
            companies.len(),
            output_path.display()
        );
        Ok(output_path)
    }

    fn default_output_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("companies");
        self.path
            .with_file_name(format!("{stem}{PROCESSED_SUFFIX}.csv"))
    }

    /// Find the first row whose `"ИНН"` cell renders to `inn`. Linear scan
    /// over a fresh read; first match wins when duplicates exist.
    pub async fn get_company_by_inn(&self, inn: &str) -> Result<Option<RawRow>> {
        let companies = self.read_companies().await?;
        Ok(companies
            .into_iter()
            .find(|c| c.get(columns::INN).map(|v| render_value(v)).as_deref() == Some(inn)))
    }

    /// All rows whose `"Основная отрасль"` cell equals `industry` exactly.
    pub async fn get_companies_by_industry(&self, industry: &str) -> Result<Vec<RawRow>> {
        let companies = self.read_companies().await?;
        Ok(companies
            .into_iter()
            .filter(|c| matches!(c.get(columns::MAIN_INDUSTRY), Some(Value::String(s)) if s == industry))
            .collect())
    }

    /// All rows whose `"Статус ИТОГ"` cell equals `status` exactly.
    pub async fn get_companies_by_status(&self, status: &str) -> Result<Vec<RawRow>> {
        let companies = self.read_companies().await?;
        Ok(companies
            .into_iter()
            .filter(|c| matches!(c.get(columns::FINAL_STATUS), Some(Value::String(s)) if s == status))
            .collect())
    }
}
