// src/extract/mod.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::classify::{company_size_from_revenue, parse_special_status, parse_support_measures};
use crate::normalize::RawRow;

/// Source column headers, exactly as they appear in the registry exports.
/// These strings are the wire format of the subsystem and must match the
/// files byte-for-byte.
pub mod columns {
    pub const INN: &str = "ИНН";
    pub const NAME: &str = "Наименование организации";
    pub const MAIN_INDUSTRY: &str = "Основная отрасль";
    pub const SUB_INDUSTRY: &str = "Подотрасль (Основная)";
    pub const REVENUE: &str = "Выручка предприятия, тыс. руб";
    pub const SUPPORT_MEASURES: &str = "Данные об оказанных мерах поддержки";
    pub const SPECIAL_STATUS: &str = "Наличие особого статуса";
    pub const ORGANIZATION_TYPE: &str = "Вид организации";
    pub const YEAR: &str = "Год";
    pub const FINAL_STATUS: &str = "Статус ИТОГ";
    pub const DISTRICT: &str = "Округ";
}

/// SPARK status assigned to every ingested record.
pub const DEFAULT_SPARK_STATUS: &str = "Действующая";

/// The canonical subset of fields the persistence layer stores per company.
/// Untyped fields keep whatever the normalizer produced for the cell (a
/// numeric ИНН stays a number, one with a leading zero stays text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFieldRecord {
    pub inn: Value,
    pub name: Value,
    pub full_name: Value,
    pub spark_status: String,
    pub main_industry: Value,
    pub company_size_final: String,
    pub organization_type: Value,
    pub support_measures: bool,
    pub special_status: String,
    pub year: Value,
}

/// Extract the key fields of one raw row. Pure: the same row always yields
/// the same record. `full_name` duplicates `name` since the exports carry no
/// separate full-name column.
pub fn extract_key_fields(row: &RawRow) -> KeyFieldRecord {
    let field = |name: &str| row.get(name).cloned().unwrap_or(Value::Null);

    KeyFieldRecord {
        inn: field(columns::INN),
        name: field(columns::NAME),
        full_name: field(columns::NAME),
        spark_status: DEFAULT_SPARK_STATUS.to_string(),
        main_industry: field(columns::MAIN_INDUSTRY),
        company_size_final: company_size_from_revenue(&field(columns::REVENUE))
            .label()
            .to_string(),
        organization_type: field(columns::ORGANIZATION_TYPE),
        support_measures: parse_support_measures(&field(columns::SUPPORT_MEASURES)),
        special_status: parse_special_status(&field(columns::SPECIAL_STATUS)),
        year: field(columns::YEAR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::clean_value;

    fn row(fields: &[(&str, &str)]) -> RawRow {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), clean_value(v)))
            .collect()
    }

    #[test]
    fn full_row_maps_to_key_fields() {
        let row = row(&[
            (columns::INN, "7701234567"),
            (columns::NAME, "ООО Ромашка"),
            (columns::MAIN_INDUSTRY, "IT"),
            (columns::REVENUE, "2500000"),
            (columns::SUPPORT_MEASURES, "Да"),
            (columns::SPECIAL_STATUS, "Резидент ОЭЗ"),
            (columns::ORGANIZATION_TYPE, "Коммерческая"),
            (columns::YEAR, "2023"),
        ]);

        let record = extract_key_fields(&row);
        assert_eq!(record.inn, Value::from(7701234567i64));
        assert_eq!(record.name, Value::String("ООО Ромашка".into()));
        assert_eq!(record.full_name, record.name);
        assert_eq!(record.spark_status, DEFAULT_SPARK_STATUS);
        assert_eq!(record.main_industry, Value::String("IT".into()));
        assert_eq!(record.company_size_final, "Крупное");
        assert_eq!(record.organization_type, Value::String("Коммерческая".into()));
        assert!(record.support_measures);
        assert_eq!(record.special_status, "Резидент ОЭЗ");
        assert_eq!(record.year, Value::from(2023i64));
    }

    #[test]
    fn missing_columns_degrade_to_defaults() {
        let record = extract_key_fields(&RawRow::new());
        assert_eq!(record.inn, Value::Null);
        assert_eq!(record.name, Value::Null);
        assert_eq!(record.company_size_final, "Не указан");
        assert!(!record.support_measures);
        assert_eq!(record.special_status, "Нет");
        assert_eq!(record.year, Value::Null);
    }

    #[test]
    fn extraction_is_pure() {
        let row = row(&[(columns::INN, "123"), (columns::REVENUE, "900000")]);
        assert_eq!(extract_key_fields(&row), extract_key_fields(&row));
    }
}
