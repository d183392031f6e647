// Core structs: ProductEntry, ComparisonResult, ShoppingAdvice
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Weight or volume unit of a single product item. Milliliters map onto
/// grams and liters onto kilograms (same factor of 1000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightUnit {
    Grams,
    Kilograms,
}

impl WeightUnit {
    /// Converts an amount in this unit to kilograms-equivalent.
    pub fn to_kg(self, amount: f64) -> f64 {
        match self {
            WeightUnit::Grams => amount / 1000.0,
            WeightUnit::Kilograms => amount,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Grams => write!(f, "g"),
            WeightUnit::Kilograms => write!(f, "kg"),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "g" | "ml" => Ok(WeightUnit::Grams),
            "kg" | "l" => Ok(WeightUnit::Kilograms),
            other => Err(format!("unknown unit '{}', expected g/ml or kg/l", other)),
        }
    }
}

/// A single product as entered by the user. Numeric fields are `None` while
/// the corresponding input is still empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEntry {
    pub id: String,
    pub name: String,
    pub weight: Option<f64>,
    pub unit: WeightUnit,
    pub quantity: Option<f64>,
    pub price_eur: Option<f64>,
}

impl ProductEntry {
    /// An entry is comparable once it has a positive weight and a positive
    /// total price. Everything else is a normal mid-entry state.
    pub fn is_comparable(&self) -> bool {
        matches!(self.weight, Some(w) if w > 0.0) && matches!(self.price_eur, Some(p) if p > 0.0)
    }

    /// Pack multiplier; an unset or non-positive quantity counts as 1.
    pub fn effective_quantity(&self) -> f64 {
        match self.quantity {
            Some(q) if q > 0.0 => q,
            _ => 1.0,
        }
    }
}

/// Per-entry comparison outcome, recomputed from scratch on every edit.
/// A zero `price_per_kg_eur` marks an entry that is not computable yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub id: String,
    pub price_per_kg_eur: f64,
    pub price_per_kg_bgn: f64,
    pub is_best_value: bool,
    pub total_weight_kg: f64,
}

impl ComparisonResult {
    pub fn not_computable(id: &str) -> Self {
        Self {
            id: id.to_string(),
            price_per_kg_eur: 0.0,
            price_per_kg_bgn: 0.0,
            is_best_value: false,
            total_weight_kg: 0.0,
        }
    }
}

/// A single edit to one product field. One variant per editable field keeps
/// the update surface closed and each value correctly typed.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Weight(Option<f64>),
    Unit(WeightUnit),
    Quantity(Option<f64>),
    PriceEur(Option<f64>),
}

/// Web source backing a grounded advice answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCitation {
    pub title: String,
    pub uri: String,
}

/// Advice returned by the AI boundary. Always well-formed: failures are
/// folded into fixed fallback text before this struct is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingAdvice {
    pub text: String,
    pub sources: Vec<SourceCitation>,
    pub grounded: bool,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API responded with status {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parses_volume_aliases() {
        assert_eq!("ml".parse::<WeightUnit>(), Ok(WeightUnit::Grams));
        assert_eq!("L".parse::<WeightUnit>(), Ok(WeightUnit::Kilograms));
        assert!("oz".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn unit_converts_to_kg() {
        assert_eq!(WeightUnit::Grams.to_kg(250.0), 0.25);
        assert_eq!(WeightUnit::Kilograms.to_kg(1.5), 1.5);
    }

    #[test]
    fn comparability_requires_positive_weight_and_price() {
        let mut entry = ProductEntry {
            id: "1".to_string(),
            name: String::new(),
            weight: Some(100.0),
            unit: WeightUnit::Grams,
            quantity: None,
            price_eur: Some(2.99),
        };
        assert!(entry.is_comparable());

        entry.weight = None;
        assert!(!entry.is_comparable());
        entry.weight = Some(0.0);
        assert!(!entry.is_comparable());

        entry.weight = Some(100.0);
        entry.price_eur = Some(-1.0);
        assert!(!entry.is_comparable());
    }

    #[test]
    fn missing_quantity_defaults_to_one() {
        let mut entry = ProductEntry {
            id: "1".to_string(),
            name: String::new(),
            weight: Some(100.0),
            unit: WeightUnit::Grams,
            quantity: None,
            price_eur: Some(2.99),
        };
        assert_eq!(entry.effective_quantity(), 1.0);
        entry.quantity = Some(-2.0);
        assert_eq!(entry.effective_quantity(), 1.0);
        entry.quantity = Some(2.5);
        assert_eq!(entry.effective_quantity(), 2.5);
    }
}
