//! Configuration structures for the receipt pipeline.

use std::fmt;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::{default_category_rules, Category};
use crate::error::{ReceiptError, ReciboError};

/// Main configuration for the recibo pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Header and table detection.
    pub scanner: ScannerConfig,

    /// Row extraction and consistency checking.
    pub extraction: ExtractionConfig,

    /// Product categorization rules, first match wins.
    pub categories: Vec<CategoryRule>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            extraction: ExtractionConfig::default(),
            categories: default_category_rules(),
        }
    }
}

/// A case-insensitive pattern with an optional label attached to its matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Regular expression tested against a whole line.
    pub pattern: String,

    /// Replacement text for the matched value. When absent the value is
    /// taken from the line itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PatternRule {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: None,
        }
    }

    pub fn labeled(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: Some(label.into()),
        }
    }
}

/// A pattern mapping product names to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: Category,
}

impl CategoryRule {
    pub fn new(pattern: impl Into<String>, category: Category) -> Self {
        Self {
            pattern: pattern.into(),
            category,
        }
    }
}

/// Structural scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Number of leading lines searched for store and date.
    pub header_window: usize,

    /// Store name detectors, tried in order.
    pub store_patterns: Vec<PatternRule>,

    /// Shape of a date inside a header line.
    pub date_shape: String,

    /// Product column keywords; the table header matches all three.
    pub product_keywords: String,

    /// Quantity column keywords.
    pub quantity_keywords: String,

    /// Price column keywords.
    pub price_keywords: String,

    /// Lines matching this are totals, never products.
    pub total_line: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            header_window: 10,
            store_patterns: vec![
                PatternRule::new("REDE SOL"),
                PatternRule::new("POTY"),
                PatternRule::new("MERCADO"),
                PatternRule::new("SUPERMERCADO"),
                PatternRule::new("ATACADO"),
                PatternRule::new("ATACADAO"),
            ],
            date_shape: r"\d{2}.\d{2}.\d{4}".to_string(),
            product_keywords: r"PRODUTO|ITEM|DESCRI[ÇC][ÃA]O".to_string(),
            quantity_keywords: r"QTDE?|QUANT".to_string(),
            price_keywords: r"PRE[ÇC]O|VALOR".to_string(),
            total_line: r"TOTAL|SUBTOTAL".to_string(),
        }
    }
}

/// Row extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Which extraction strategy to run.
    pub strategy: ExtractionStrategy,

    /// Token marking a monetary value.
    pub currency_marker: String,

    /// Column separator for delimited tables.
    pub column_separator: char,

    /// Header announcing a delimited table.
    pub delimited_header: String,

    /// Allowed gap between stated and computed line totals.
    pub tolerance: Decimal,

    /// Row error handling for delimited tables.
    pub delimited_policy: RowPolicy,

    /// Row error handling for positional receipts.
    pub positional_policy: RowPolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategy: ExtractionStrategy::Auto,
            currency_marker: "R$".to_string(),
            column_separator: '|',
            delimited_header: r"\b[a1]\s*-\s*nome\s+do\s+produto".to_string(),
            tolerance: Decimal::new(1, 2),
            delimited_policy: RowPolicy::Strict,
            positional_policy: RowPolicy::Lenient,
        }
    }
}

/// How product rows are located and split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Delimited when a delimited header is present, positional otherwise.
    #[default]
    Auto,
    /// Six pipe-separated columns per row.
    Delimited,
    /// Whitespace-separated tokens anchored on currency markers.
    Positional,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractionStrategy::Auto => "auto",
            ExtractionStrategy::Delimited => "delimited",
            ExtractionStrategy::Positional => "positional",
        };
        f.write_str(name)
    }
}

/// What a malformed row does to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// The first bad row fails the whole parse.
    Strict,
    /// Bad rows are dropped and reported.
    Lenient,
}

impl RowPolicy {
    /// Whether a failed row is dropped instead of failing the document.
    /// Incomplete rows are dropped under either policy.
    pub fn drops(self, error: &ReceiptError) -> bool {
        matches!(error, ReceiptError::IncompleteRow { .. }) || self == RowPolicy::Lenient
    }
}

impl ParserConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ReciboError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ReciboError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
