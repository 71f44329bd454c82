// src/parser/mod.rs
//! Emulated parser front-end: serves pre-collected registry data from a CSV
//! file through the same operations a live scraper would expose.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::classify::company_size_from_revenue;
use crate::extract::{columns, KeyFieldRecord};
use crate::normalize::{render_value, RawRow};
use crate::reader::CsvReader;

/// Distribution counts over the whole dataset. Maps are ordered so that
/// repeated runs report categories in a stable order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Statistics {
    pub total_companies: usize,
    pub industries: BTreeMap<String, u64>,
    pub sub_industries: BTreeMap<String, u64>,
    pub company_sizes: BTreeMap<String, u64>,
    pub support_measures: BTreeMap<String, u64>,
    pub special_statuses: BTreeMap<String, u64>,
    pub districts: BTreeMap<String, u64>,
    pub organization_types: BTreeMap<String, u64>,
    pub years: BTreeMap<String, u64>,
}

/// Reads prepared registry data instead of scraping it live. Thin wrapper
/// over [`CsvReader`] that adds info-level logging around each operation.
pub struct ParserEmulator {
    csv_reader: CsvReader,
}

impl ParserEmulator {
    pub fn new(data_file_path: impl Into<PathBuf>) -> Self {
        let path = data_file_path.into();
        info!(path = %path.display(), "parser emulator initialized");
        Self {
            csv_reader: CsvReader::new(path),
        }
    }

    /// Emulate a full parse run: every company in the source file.
    pub async fn parse_companies(&self) -> Result<Vec<RawRow>> {
        info!("starting emulated company parse");
        let companies = self.csv_reader.read_companies().await?;
        info!("emulated parse finished: {} companies", companies.len());
        Ok(companies)
    }

    /// Full rows plus the key-field records the persistence layer stores.
    pub async fn parse_companies_with_key_fields(
        &self,
    ) -> Result<(Vec<RawRow>, Vec<KeyFieldRecord>)> {
        info!("starting emulated parse with key fields");
        let (companies, key_fields) = self.csv_reader.read_companies_with_key_fields().await?;
        info!(
            "emulated parse finished: {} full records, {} key-field records",
            companies.len(),
            key_fields.len()
        );
        Ok((companies, key_fields))
    }

    pub async fn get_company_by_inn(&self, inn: &str) -> Result<Option<RawRow>> {
        info!(inn, "looking up company by ИНН");
        let company = self.csv_reader.get_company_by_inn(inn).await?;
        match &company {
            Some(c) => info!(
                "company found: {}",
                c.get(columns::NAME).map(render_value).unwrap_or_default()
            ),
            None => info!("company not found"),
        }
        Ok(company)
    }

    pub async fn get_companies_by_industry(&self, industry: &str) -> Result<Vec<RawRow>> {
        info!(industry, "looking up companies by industry");
        let companies = self.csv_reader.get_companies_by_industry(industry).await?;
        info!("found {} companies in industry '{}'", companies.len(), industry);
        Ok(companies)
    }

    pub async fn get_companies_by_status(&self, status: &str) -> Result<Vec<RawRow>> {
        info!(status, "looking up companies by status");
        let companies = self.csv_reader.get_companies_by_status(status).await?;
        info!("found {} companies with status '{}'", companies.len(), status);
        Ok(companies)
    }

    /// Count category distributions across the dataset. Cells that are
    /// missing or null count under the per-field "not specified" label.
    pub async fn get_statistics(&self) -> Result<Statistics> {
        info!("computing dataset statistics");
        let companies = self.parse_companies().await?;

        let mut stats = Statistics {
            total_companies: companies.len(),
            ..Statistics::default()
        };

        for company in &companies {
            bump(&mut stats.industries, company, columns::MAIN_INDUSTRY, "Не указана");
            bump(&mut stats.sub_industries, company, columns::SUB_INDUSTRY, "Не указана");
            *stats
                .company_sizes
                .entry(
                    company_size_from_revenue(
                        company.get(columns::REVENUE).unwrap_or(&Value::Null),
                    )
                    .label()
                    .to_string(),
                )
                .or_default() += 1;
            bump(
                &mut stats.support_measures,
                company,
                columns::SUPPORT_MEASURES,
                "Не указано",
            );
            bump(
                &mut stats.special_statuses,
                company,
                columns::SPECIAL_STATUS,
                "Не указан",
            );
            bump(&mut stats.districts, company, columns::DISTRICT, "Не указан");
            bump(
                &mut stats.organization_types,
                company,
                columns::ORGANIZATION_TYPE,
                "Не указан",
            );
            bump(&mut stats.years, company, columns::YEAR, "Не указан");
        }

        info!("statistics computed over {} companies", stats.total_companies);
        Ok(stats)
    }
}

fn bump(counts: &mut BTreeMap<String, u64>, company: &RawRow, column: &str, missing: &str) {
    let key = match company.get(column) {
        None | Some(Value::Null) => missing.to_string(),
        Some(value) => render_value(value),
    };
    *counts.entry(key).or_default() += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,regingest::parser=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn fixture() -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(
            "ИНН;Наименование организации;Основная отрасль;Выручка предприятия, тыс. руб;Округ;Год\n\
             111;ООО Первая;IT;2500000;ЦАО;2023\n\
             222;ООО Вторая;IT;900000;;2023\n\
             333;ООО Третья;Промышленность;100000;ЦАО;2022\n"
                .as_bytes(),
        )?;
        Ok(tmp)
    }

    #[tokio::test]
    async fn parse_and_lookup_delegate_to_the_reader() -> Result<()> {
        init_test_logging();
        let tmp = fixture()?;
        let parser = ParserEmulator::new(tmp.path());

        let companies = parser.parse_companies().await?;
        assert_eq!(companies.len(), 3);

        let (all, key_fields) = parser.parse_companies_with_key_fields().await?;
        assert_eq!(all.len(), key_fields.len());

        let found = parser.get_company_by_inn("222").await?;
        assert!(found.is_some());

        let it = parser.get_companies_by_industry("IT").await?;
        assert_eq!(it.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn statistics_count_every_distribution() -> Result<()> {
        init_test_logging();
        let tmp = fixture()?;
        let parser = ParserEmulator::new(tmp.path());

        let stats = parser.get_statistics().await?;
        assert_eq!(stats.total_companies, 3);
        assert_eq!(stats.industries.get("IT"), Some(&2));
        assert_eq!(stats.industries.get("Промышленность"), Some(&1));
        assert_eq!(stats.company_sizes.get("Крупное"), Some(&1));
        assert_eq!(stats.company_sizes.get("Среднее"), Some(&1));
        assert_eq!(stats.company_sizes.get("Малое"), Some(&1));
        // Null district falls under the missing label.
        assert_eq!(stats.districts.get("ЦАО"), Some(&2));
        assert_eq!(stats.districts.get("Не указан"), Some(&1));
        assert_eq!(stats.years.get("2023"), Some(&2));
        assert_eq!(stats.years.get("2022"), Some(&1));
        Ok(())
    }
}
