//! Receipt text parsing module.

mod consistency;
mod extractor;
mod parser;
mod scanner;
mod validator;
pub mod rules;

pub use consistency::check_total;
pub use extractor::{
    extract_delimited, extract_positional, parse_delimited_row, parse_positional_row,
    CandidateLine, ExtractedRow, DELIMITED_COLUMNS,
};
pub use parser::{ParseReport, ReceiptPipeline, SkippedRow};
pub use scanner::{find_table_start, scan_header, split_lines, HeaderInfo, SourceLine};
pub use validator::validate_lines;

use crate::error::ReceiptError;
use crate::models::purchase::PurchaseLine;

/// Result type for receipt parsing.
pub type Result<T> = std::result::Result<T, ReceiptError>;

/// Trait for receipt text parsers.
pub trait ReceiptParser {
    /// Parse the text of one receipt into accepted records.
    fn parse(&self, text: &str) -> Result<ParseReport>;

    /// Parse and keep only the records.
    fn parse_lines(&self, text: &str) -> Result<Vec<PurchaseLine>> {
        self.parse(text).map(|report| report.lines)
    }
}

/// Parse receipt text with the built-in rules.
pub fn parse_receipt(text: &str) -> Result<Vec<PurchaseLine>> {
    ReceiptPipeline::default().parse_lines(text)
}
