//! Whole-document validation of parsed purchase lines.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::error::{ReceiptError, ValidationError};
use crate::models::purchase::PurchaseLine;

use super::Result;

/// Check that the set is non-empty and every record is well formed.
///
/// Stops at the first violation. Fields are checked in record order:
/// product name, unit price, quantity, purchase date, store.
pub fn validate_lines(lines: &[PurchaseLine]) -> Result<()> {
    if lines.is_empty() {
        return Err(ReceiptError::EmptyReceipt);
    }

    for (index, line) in lines.iter().enumerate() {
        validate_line(line, index + 1)?;
    }

    Ok(())
}

fn validate_line(line: &PurchaseLine, record: usize) -> std::result::Result<(), ValidationError> {
    if line.product_name.trim().is_empty() {
        return Err(ValidationError::InvalidProductName { record });
    }
    if line.unit_price <= Decimal::ZERO {
        return Err(ValidationError::InvalidUnitPrice { record });
    }
    if line.quantity <= Decimal::ZERO {
        return Err(ValidationError::InvalidQuantity { record });
    }
    // Every accepted date shape carries a four-digit year.
    if !(1000..=9999).contains(&line.purchase_date.year()) {
        return Err(ValidationError::InvalidPurchaseDate { record });
    }
    if line.store.trim().is_empty() {
        return Err(ValidationError::InvalidStore { record });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn valid_line() -> PurchaseLine {
        PurchaseLine {
            product_name: "Feijao Carioca".to_string(),
            unit_price: Decimal::new(850, 2),
            quantity: Decimal::new(2, 0),
            purchase_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            store: "Supermercado ABC".to_string(),
        }
    }

    #[test]
    fn test_valid_lines_pass() {
        assert_eq!(validate_lines(&[valid_line(), valid_line()]), Ok(()));
    }

    #[test]
    fn test_empty_set_is_rejected() {
        assert_eq!(validate_lines(&[]), Err(ReceiptError::EmptyReceipt));
    }

    #[test]
    fn test_field_violations() {
        let mut line = valid_line();
        line.product_name = "   ".to_string();
        assert_eq!(
            validate_lines(&[line]),
            Err(ValidationError::InvalidProductName { record: 1 }.into())
        );

        let mut line = valid_line();
        line.unit_price = Decimal::ZERO;
        assert_eq!(
            validate_lines(&[line]),
            Err(ValidationError::InvalidUnitPrice { record: 1 }.into())
        );

        let mut line = valid_line();
        line.quantity = Decimal::new(-1, 0);
        assert_eq!(
            validate_lines(&[line]),
            Err(ValidationError::InvalidQuantity { record: 1 }.into())
        );

        let mut line = valid_line();
        line.purchase_date = NaiveDate::from_ymd_opt(24, 3, 15).unwrap();
        assert_eq!(
            validate_lines(&[line]),
            Err(ValidationError::InvalidPurchaseDate { record: 1 }.into())
        );

        let mut line = valid_line();
        line.store = String::new();
        assert_eq!(
            validate_lines(&[line]),
            Err(ValidationError::InvalidStore { record: 1 }.into())
        );
    }

    #[test]
    fn test_first_violation_wins() {
        let mut second = valid_line();
        second.store = String::new();
        let mut third = valid_line();
        third.product_name = String::new();

        assert_eq!(
            validate_lines(&[valid_line(), second, third]),
            Err(ValidationError::InvalidStore { record: 2 }.into())
        );
    }
}
