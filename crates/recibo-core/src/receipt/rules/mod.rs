//! Rule-based detectors and normalizers for receipt text.

pub mod amounts;
pub mod dates;
pub mod detectors;
pub mod patterns;

pub use amounts::{parse_decimal_amount, parse_price, parse_quantity};
pub use dates::parse_date;
pub use detectors::{DateDetector, KeywordDetector, StoreDetector};

use lazy_static::lazy_static;
use rust_decimal::Decimal;

use crate::categories::Categorizer;
use crate::models::config::{ExtractionStrategy, ParserConfig, RowPolicy};

/// A detector accepts a line and either returns a match or passes.
pub trait LineDetector {
    /// The type of value this detector produces.
    type Output;

    /// Inspect a single line.
    fn detect(&self, line: &str) -> Option<Self::Output>;
}

/// A detected value together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch<T> {
    /// Detected value.
    pub value: T,
    /// 1-based line number in the source text.
    pub line_number: usize,
}

impl<T> LineMatch<T> {
    pub fn new(value: T, line_number: usize) -> Self {
        Self { value, line_number }
    }
}

lazy_static! {
    static ref DEFAULT_RULES: RuleSet = RuleSet::from_config(&ParserConfig::default())
        .expect("built-in receipt patterns are valid");
}

/// Every detector and setting the pipeline needs, compiled once.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub header_window: usize,
    pub store: StoreDetector,
    pub date: DateDetector,
    pub table_header: KeywordDetector,
    pub total_line: KeywordDetector,
    pub delimited_header: KeywordDetector,
    pub strategy: ExtractionStrategy,
    pub currency_marker: String,
    pub column_separator: char,
    pub tolerance: Decimal,
    pub delimited_policy: RowPolicy,
    pub positional_policy: RowPolicy,
    pub categorizer: Categorizer,
}

impl RuleSet {
    /// Compile every pattern in the configuration.
    pub fn from_config(config: &ParserConfig) -> crate::Result<Self> {
        let scanner = &config.scanner;
        let extraction = &config.extraction;

        if extraction.currency_marker.trim().is_empty() {
            return Err(crate::ReciboError::Config(
                "currency marker must not be empty".to_string(),
            ));
        }
        if extraction.tolerance < Decimal::ZERO {
            return Err(crate::ReciboError::Config(
                "total tolerance must not be negative".to_string(),
            ));
        }

        Ok(Self {
            header_window: scanner.header_window,
            store: StoreDetector::new(&scanner.store_patterns)?,
            date: DateDetector::new(&scanner.date_shape)?,
            table_header: KeywordDetector::all_of(&[
                scanner.product_keywords.as_str(),
                scanner.quantity_keywords.as_str(),
                scanner.price_keywords.as_str(),
            ])?,
            total_line: KeywordDetector::all_of(&[scanner.total_line.as_str()])?,
            delimited_header: KeywordDetector::all_of(&[extraction.delimited_header.as_str()])?,
            strategy: extraction.strategy,
            currency_marker: extraction.currency_marker.trim().to_string(),
            column_separator: extraction.column_separator,
            tolerance: extraction.tolerance,
            delimited_policy: extraction.delimited_policy,
            positional_policy: extraction.positional_policy,
            categorizer: Categorizer::from_rules(&config.categories)?,
        })
    }

    /// Row policy for a resolved strategy.
    pub fn policy_for(&self, strategy: ExtractionStrategy) -> RowPolicy {
        match strategy {
            ExtractionStrategy::Delimited => self.delimited_policy,
            ExtractionStrategy::Positional | ExtractionStrategy::Auto => self.positional_policy,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Category;
    use crate::models::config::{CategoryRule, PatternRule};
    use crate::ReciboError;

    #[test]
    fn test_default_rules() {
        let rules = RuleSet::default();
        assert_eq!(rules.header_window, 10);
        assert_eq!(rules.currency_marker, "R$");
        assert_eq!(rules.policy_for(ExtractionStrategy::Delimited), RowPolicy::Strict);
        assert_eq!(rules.policy_for(ExtractionStrategy::Positional), RowPolicy::Lenient);
    }

    #[test]
    fn test_invalid_store_pattern_is_reported() {
        let mut config = ParserConfig::default();
        config.scanner.store_patterns.push(PatternRule::new("[unclosed"));

        assert!(matches!(RuleSet::from_config(&config), Err(ReciboError::Pattern(_))));
    }

    #[test]
    fn test_invalid_category_pattern_is_reported() {
        let mut config = ParserConfig::default();
        config.categories.push(CategoryRule::new("(unclosed", Category::Outros));

        assert!(matches!(RuleSet::from_config(&config), Err(ReciboError::Pattern(_))));
    }

    #[test]
    fn test_empty_currency_marker_is_rejected() {
        let mut config = ParserConfig::default();
        config.extraction.currency_marker = "  ".to_string();

        assert!(matches!(RuleSet::from_config(&config), Err(ReciboError::Config(_))));
    }
}
