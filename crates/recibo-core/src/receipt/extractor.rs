//! Record extraction from product lines.
//!
//! Two layouts are supported:
//! - delimited: a labeled header followed by rows of six columns
//!   (`product | unit price | quantity | date | total | store`);
//! - positional: free-form receipt lines where the unit price and the line
//!   total are the first two tokens carrying the currency marker, the token
//!   right before the unit price is the quantity and everything before that
//!   is the product name.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::error::ReceiptError;

use super::rules::patterns::COLUMN_LABEL;
use super::rules::{parse_date, parse_price, parse_quantity, RuleSet};
use super::scanner::{HeaderInfo, SourceLine};
use super::Result;

/// Columns in a delimited row.
pub const DELIMITED_COLUMNS: usize = 6;

/// Fields a positional row must provide: name, quantity, unit price, total.
const POSITIONAL_FIELDS: usize = 4;

/// A fully populated row, before its total is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLine {
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub purchase_date: NaiveDate,
    pub store: String,
    /// Line total as printed; only used for the consistency check.
    pub stated_total: Decimal,
}

/// Outcome of extracting one product line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRow {
    /// 1-based line number in the source text.
    pub line_number: usize,
    /// Either a complete candidate or the field that failed.
    pub outcome: Result<CandidateLine>,
}

fn is_total_line(line: &SourceLine<'_>, rules: &RuleSet) -> bool {
    let is_total = rules.total_line.is_match(line.text);
    if is_total {
        trace!("Skipping total line {}", line.number);
    }
    is_total
}

/// Extract every delimited row after the delimited header.
///
/// Fails with `TableNotFound` when no line carries the column-label header.
pub fn extract_delimited(lines: &[SourceLine<'_>], rules: &RuleSet) -> Result<Vec<ExtractedRow>> {
    let header = lines
        .iter()
        .position(|line| rules.delimited_header.is_match(line.text))
        .ok_or(ReceiptError::TableNotFound)?;

    debug!("Delimited header found on line {}", lines[header].number);

    let rows = lines[header + 1..]
        .iter()
        .filter(|line| line.text.contains(rules.column_separator))
        .filter(|line| !is_total_line(line, rules))
        .map(|line| ExtractedRow {
            line_number: line.number,
            outcome: parse_delimited_row(line.text, line.number, rules),
        })
        .collect();

    Ok(rows)
}

/// Split one delimited row into a candidate.
pub fn parse_delimited_row(line: &str, line_number: usize, rules: &RuleSet) -> Result<CandidateLine> {
    let separator = rules.column_separator;
    let body = line
        .trim()
        .trim_start_matches(separator)
        .trim_end_matches(separator);

    let cells: Vec<&str> = body
        .split(separator)
        .take(DELIMITED_COLUMNS)
        .enumerate()
        .map(|(index, cell)| strip_column_label(cell.trim(), index))
        .collect();

    let found = cells.iter().filter(|cell| !cell.is_empty()).count();
    if cells.len() < DELIMITED_COLUMNS || found < DELIMITED_COLUMNS {
        return Err(ReceiptError::IncompleteRow {
            line: line_number,
            found,
            expected: DELIMITED_COLUMNS,
        });
    }

    let marker = rules.currency_marker.as_str();
    Ok(CandidateLine {
        product_name: cells[0].to_string(),
        unit_price: parse_price(cells[1], marker)?,
        quantity: parse_quantity(cells[2])?,
        purchase_date: parse_date(cells[3])?,
        stated_total: parse_price(cells[4], marker)?,
        store: cells[5].to_string(),
    })
}

/// Remove the enumerated label of column `index` ("A- ", "1-") from a cell.
fn strip_column_label(cell: &str, index: usize) -> &str {
    let Some(caps) = COLUMN_LABEL.captures(cell) else {
        return cell;
    };

    let label = caps[1].chars().next().unwrap_or_default().to_ascii_uppercase();
    let letter = (b'A' + index as u8) as char;
    let digit = char::from_digit(index as u32 + 1, 10).unwrap_or_default();

    if label == letter || label == digit {
        cell[caps[0].len()..].trim()
    } else {
        cell
    }
}

/// Extract candidates from the lines following the table header.
///
/// Lines with fewer than two currency markers are not product lines and
/// produce nothing.
pub fn extract_positional(
    lines: &[SourceLine<'_>],
    table_start: usize,
    header: &HeaderInfo,
    rules: &RuleSet,
) -> Vec<ExtractedRow> {
    lines
        .iter()
        .skip(table_start + 1)
        .filter(|line| !is_total_line(line, rules))
        .filter_map(|line| {
            parse_positional_row(line.text, line.number, header, rules).map(|outcome| {
                ExtractedRow {
                    line_number: line.number,
                    outcome,
                }
            })
        })
        .collect()
}

/// Split one positional line, or `None` when it is not a product line.
pub fn parse_positional_row(
    line: &str,
    line_number: usize,
    header: &HeaderInfo,
    rules: &RuleSet,
) -> Option<Result<CandidateLine>> {
    let marker = rules.currency_marker.as_str();
    let tokens = tokenize(line, marker);

    let markers: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.contains(marker))
        .map(|(index, _)| index)
        .collect();

    if markers.len() < 2 {
        trace!("Line {} has {} currency markers, not a product", line_number, markers.len());
        return None;
    }

    let (price_index, total_index) = (markers[0], markers[1]);
    if price_index < 2 {
        return Some(Err(ReceiptError::IncompleteRow {
            line: line_number,
            found: price_index + 2,
            expected: POSITIONAL_FIELDS,
        }));
    }

    let quantity_index = price_index - 1;
    let outcome = (|| -> Result<CandidateLine> {
        Ok(CandidateLine {
            product_name: tokens[..quantity_index].join(" "),
            quantity: parse_quantity(&tokens[quantity_index])?,
            unit_price: parse_price(&tokens[price_index], marker)?,
            stated_total: parse_price(&tokens[total_index], marker)?,
            purchase_date: header.date.value,
            store: header.store.value.clone(),
        })
    })();

    Some(outcome)
}

/// Whitespace tokens, with a lone currency marker glued to the amount after it.
fn tokenize(line: &str, marker: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut words = line.split_whitespace();

    while let Some(word) = words.next() {
        if word == marker {
            if let Some(amount) = words.next() {
                tokens.push(format!("{}{}", word, amount));
                continue;
            }
        }
        tokens.push(word.to_string());
    }

    tokens
}
