//! Structural scanner: header region and product table detection.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::ReceiptError;

use super::rules::{LineDetector, LineMatch, RuleSet};
use super::Result;

/// A trimmed, non-blank line of the input with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number in the original text.
    pub number: usize,
    pub text: &'a str,
}

/// Split text into trimmed, non-blank lines, keeping original order.
pub fn split_lines(text: &str) -> Vec<SourceLine<'_>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| SourceLine {
            number: i + 1,
            text: line.trim(),
        })
        .filter(|line| !line.text.is_empty())
        .collect()
}

/// Store and purchase date shared by every line of a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub store: LineMatch<String>,
    pub date: LineMatch<NaiveDate>,
}

/// Find store name and purchase date within the header window.
///
/// Lines past the window are never inspected, even when the header is
/// printed further down.
pub fn scan_header(lines: &[SourceLine<'_>], rules: &RuleSet) -> Result<HeaderInfo> {
    let mut store: Option<LineMatch<String>> = None;
    let mut date: Option<LineMatch<NaiveDate>> = None;

    for line in lines.iter().take(rules.header_window) {
        if store.is_none() {
            if let Some(name) = rules.store.detect(line.text) {
                debug!("Store '{}' detected on line {}", name, line.number);
                store = Some(LineMatch::new(name, line.number));
            }
        }

        if date.is_none() {
            if let Some(value) = rules.date.detect(line.text) {
                debug!("Purchase date {} detected on line {}", value, line.number);
                date = Some(LineMatch::new(value, line.number));
            }
        }

        if store.is_some() && date.is_some() {
            break;
        }
    }

    match (store, date) {
        (Some(store), Some(date)) => Ok(HeaderInfo { store, date }),
        _ => Err(ReceiptError::HeaderNotFound),
    }
}

/// Index (into `lines`) of the product table header.
pub fn find_table_start(lines: &[SourceLine<'_>], rules: &RuleSet) -> Result<usize> {
    let index = lines
        .iter()
        .position(|line| rules.table_header.is_match(line.text))
        .ok_or(ReceiptError::TableNotFound)?;

    debug!("Product table starts at line {}", lines[index].number);
    Ok(index)
}
