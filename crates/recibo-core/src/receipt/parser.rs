//! Receipt pipeline tying detection, extraction, consistency and validation together.

use tracing::{debug, info, warn};

use crate::categories::Categorizer;
use crate::error::ReceiptError;
use crate::models::config::{ExtractionStrategy, ParserConfig, RowPolicy};
use crate::models::purchase::PurchaseLine;

use super::consistency::check_total;
use super::extractor::{extract_delimited, extract_positional, ExtractedRow};
use super::rules::RuleSet;
use super::scanner::{find_table_start, scan_header, split_lines, SourceLine};
use super::{ReceiptParser, Result};

/// A product line dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source text.
    pub line_number: usize,
    /// Why the line was dropped.
    pub error: ReceiptError,
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    /// Accepted records, in receipt order. Never empty.
    pub lines: Vec<PurchaseLine>,
    /// Strategy that produced the records.
    pub strategy: ExtractionStrategy,
    /// Rows dropped without failing the document.
    pub skipped: Vec<SkippedRow>,
}

/// Text-to-records pipeline.
///
/// Holds only compiled rules, so one instance can parse any number of
/// receipts, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ReceiptPipeline {
    rules: RuleSet,
}

impl ReceiptPipeline {
    /// Create a pipeline with the built-in Brazilian rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline from configuration.
    pub fn from_config(config: &ParserConfig) -> crate::Result<Self> {
        Ok(Self {
            rules: RuleSet::from_config(config)?,
        })
    }

    /// Force an extraction strategy.
    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.rules.strategy = strategy;
        self
    }

    /// Set the row policy of a strategy.
    pub fn with_policy(mut self, strategy: ExtractionStrategy, policy: RowPolicy) -> Self {
        match strategy {
            ExtractionStrategy::Delimited => self.rules.delimited_policy = policy,
            ExtractionStrategy::Positional => self.rules.positional_policy = policy,
            ExtractionStrategy::Auto => {
                self.rules.delimited_policy = policy;
                self.rules.positional_policy = policy;
            }
        }
        self
    }

    /// Product categorizer compiled from the configured category rules.
    pub fn categorizer(&self) -> &Categorizer {
        &self.rules.categorizer
    }

    fn resolve_strategy(&self, lines: &[SourceLine<'_>]) -> ExtractionStrategy {
        match self.rules.strategy {
            ExtractionStrategy::Auto => {
                let delimited = lines
                    .iter()
                    .any(|line| self.rules.delimited_header.is_match(line.text));
                if delimited {
                    ExtractionStrategy::Delimited
                } else {
                    ExtractionStrategy::Positional
                }
            }
            forced => forced,
        }
    }

    fn extract_rows(
        &self,
        lines: &[SourceLine<'_>],
        strategy: ExtractionStrategy,
    ) -> Result<Vec<ExtractedRow>> {
        match strategy {
            ExtractionStrategy::Delimited => extract_delimited(lines, &self.rules),
            ExtractionStrategy::Positional | ExtractionStrategy::Auto => {
                let header = scan_header(lines, &self.rules)?;
                let table_start = find_table_start(lines, &self.rules)?;
                Ok(extract_positional(lines, table_start, &header, &self.rules))
            }
        }
    }
}

impl ReceiptParser for ReceiptPipeline {
    fn parse(&self, text: &str) -> Result<ParseReport> {
        let lines = split_lines(text);
        let strategy = self.resolve_strategy(&lines);
        let policy = self.rules.policy_for(strategy);

        info!(
            "Parsing receipt from {} characters ({} lines) with {} strategy",
            text.len(),
            lines.len(),
            strategy
        );

        let rows = self.extract_rows(&lines, strategy)?;
        debug!("{} candidate product rows", rows.len());

        let mut accepted = Vec::with_capacity(rows.len());
        let mut skipped = Vec::new();

        for row in rows {
            let checked = row
                .outcome
                .and_then(|candidate| check_total(candidate, self.rules.tolerance));

            match checked {
                Ok(line) => accepted.push(line),
                Err(error) if policy.drops(&error) => {
                    warn!("Dropping line {}: {}", row.line_number, error);
                    skipped.push(SkippedRow {
                        line_number: row.line_number,
                        error,
                    });
                }
                Err(error) => {
                    debug!("Line {} fails the receipt: {}", row.line_number, error);
                    return Err(error);
                }
            }
        }

        super::validator::validate_lines(&accepted)?;

        debug!(
            "Accepted {} lines, skipped {}",
            accepted.len(),
            skipped.len()
        );

        Ok(ParseReport {
            lines: accepted,
            strategy,
            skipped,
        })
    }
}
