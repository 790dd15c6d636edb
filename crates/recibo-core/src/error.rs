//! Error types for the recibo-core library.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the recibo library.
#[derive(Error, Debug)]
pub enum ReciboError {
    /// Receipt parsing failed.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// A configured pattern is not a valid regular expression.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures reported by the receipt pipeline.
///
/// Every message is meant to be shown to the person who photographed the
/// receipt; none of them is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    /// Store name or purchase date missing from the header window.
    #[error("could not find the store name or the purchase date at the top of the receipt")]
    HeaderNotFound,

    /// No line announces the product table.
    #[error("could not find the product table in the receipt")]
    TableNotFound,

    /// A date token matched none of the accepted shapes.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A price token is not a positive amount.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A quantity token is not a positive amount.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A row has fewer populated fields than its layout requires.
    #[error("receipt line {line} is incomplete ({found} of {expected} fields filled)")]
    IncompleteRow {
        line: usize,
        found: usize,
        expected: usize,
    },

    /// Unit price times quantity does not match the stated line total.
    #[error("inconsistent total for product {product}: expected {expected}, receipt says {stated}")]
    InconsistentTotal {
        product: String,
        expected: Decimal,
        stated: Decimal,
    },

    /// A line total or receipt total does not fit in a decimal amount.
    #[error("amount out of range for product {product}")]
    AmountOverflow { product: String },

    /// Nothing survived extraction.
    #[error("no products were found in the receipt")]
    EmptyReceipt,

    /// A record broke a field invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// First field violation found by the document validator.
///
/// `record` is the 1-based position of the offending record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid product name in item {record}")]
    InvalidProductName { record: usize },

    #[error("invalid unit price in item {record}")]
    InvalidUnitPrice { record: usize },

    #[error("invalid quantity in item {record}")]
    InvalidQuantity { record: usize },

    #[error("invalid purchase date in item {record}")]
    InvalidPurchaseDate { record: usize },

    #[error("invalid store name in item {record}")]
    InvalidStore { record: usize },
}

/// Result type for the recibo library.
pub type Result<T> = std::result::Result<T, ReciboError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inconsistent_total_names_product() {
        let err = ReceiptError::InconsistentTotal {
            product: "Arroz Tipo 1".to_string(),
            expected: Decimal::new(2290, 2),
            stated: Decimal::new(2500, 2),
        };
        let message = err.to_string();
        assert!(message.contains("Arroz Tipo 1"));
        assert!(message.contains("22.90"));
        assert!(message.contains("25.00"));
    }

    #[test]
    fn test_overflow_names_product() {
        let err = ReceiptError::AmountOverflow {
            product: "LIXO".to_string(),
        };
        assert_eq!(err.to_string(), "amount out of range for product LIXO");
    }

    #[test]
    fn test_validation_error_wraps_transparently() {
        let err: ReceiptError = ValidationError::InvalidStore { record: 2 }.into();
        assert_eq!(err.to_string(), "invalid store name in item 2");
    }
}
