// src/classify/mod.rs
use serde_json::Value;

use crate::normalize::render_value;

/// Revenue band thresholds, in thousands of rubles (the unit the source
/// column is stored in). Both bounds are inclusive at the bottom of their
/// band: ≥ 2 billion is large, ≥ 800 million is medium.
const LARGE_REVENUE_THRESHOLD: f64 = 2_000_000.0;
const MEDIUM_REVENUE_THRESHOLD: f64 = 800_000.0;

/// Tokens meaning "support was received" (compared lowercased and trimmed).
const SUPPORT_YES_TOKENS: [&str; 6] = ["да", "есть", "получены", "оказаны", "true", "1"];

/// Tokens meaning "no support".
const SUPPORT_NO_TOKENS: [&str; 6] = ["нет", "не получены", "не оказаны", "false", "0", ""];

/// Tokens meaning "no special status" (compared case-insensitively).
const NO_STATUS_TOKENS: [&str; 3] = ["сведения отсутствуют", "нет", "отсутствует"];

/// Label used when a special status is absent.
pub const NO_SPECIAL_STATUS: &str = "Нет";

/// Company size class derived from annual revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanySize {
    Large,
    Medium,
    Small,
    Unspecified,
}

impl CompanySize {
    /// The Russian label stored in `company_size_final`.
    pub fn label(self) -> &'static str {
        match self {
            CompanySize::Large => "Крупное",
            CompanySize::Medium => "Среднее",
            CompanySize::Small => "Малое",
            CompanySize::Unspecified => "Не указан",
        }
    }
}

/// Coerce a normalized revenue cell to a float. String cells get the same
/// comma→period fix the normalizer applies, so a value that skipped
/// normalization still classifies.
fn revenue_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', ".").trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Classify a company by its revenue cell. Null, non-numeric, or
/// unparseable input classifies as `Unspecified`; anything below the medium
/// threshold, negative values included, is `Small`.
pub fn company_size_from_revenue(revenue: &Value) -> CompanySize {
    let revenue = match revenue_as_f64(revenue) {
        Some(v) => v,
        None => return CompanySize::Unspecified,
    };

    if revenue >= LARGE_REVENUE_THRESHOLD {
        CompanySize::Large
    } else if revenue >= MEDIUM_REVENUE_THRESHOLD {
        CompanySize::Medium
    } else {
        CompanySize::Small
    }
}

/// Parse the free-text support-measures cell into a flag. Unrecognized
/// non-empty text counts as support: the column holds descriptions of the
/// measures received, not just yes/no answers.
pub fn parse_support_measures(value: &Value) -> bool {
    let token = render_value(value).trim().to_lowercase();

    if SUPPORT_YES_TOKENS.contains(&token.as_str()) {
        true
    } else if SUPPORT_NO_TOKENS.contains(&token.as_str()) {
        false
    } else {
        !token.is_empty()
    }
}

/// Normalize the special-status cell: the various "no information" spellings
/// collapse to `"Нет"`, anything else passes through trimmed.
pub fn parse_special_status(value: &Value) -> String {
    let text = render_value(value).trim().to_string();

    if text.is_empty() || NO_STATUS_TOKENS.contains(&text.to_lowercase().as_str()) {
        NO_SPECIAL_STATUS.to_string()
    } else {
        text
    }
}
