//! Line total consistency check.

use rust_decimal::Decimal;

use crate::error::ReceiptError;
use crate::models::purchase::{round_money, PurchaseLine};

use super::extractor::CandidateLine;
use super::Result;

/// Accept a candidate when `round(unit_price * quantity, 2)` is within
/// `tolerance` of the printed total. The printed total is dropped.
///
/// A product too large for a `Decimal` fails with `AmountOverflow`.
pub fn check_total(candidate: CandidateLine, tolerance: Decimal) -> Result<PurchaseLine> {
    let Some(product) = candidate.unit_price.checked_mul(candidate.quantity) else {
        return Err(ReceiptError::AmountOverflow {
            product: candidate.product_name,
        });
    };
    let calculated = round_money(product);

    if (calculated - candidate.stated_total).abs() > tolerance {
        return Err(ReceiptError::InconsistentTotal {
            product: candidate.product_name,
            expected: calculated,
            stated: candidate.stated_total,
        });
    }

    Ok(PurchaseLine {
        product_name: candidate.product_name,
        unit_price: candidate.unit_price,
        quantity: candidate.quantity,
        purchase_date: candidate.purchase_date,
        store: candidate.store,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn candidate(price: &str, quantity: &str, total: &str) -> CandidateLine {
        CandidateLine {
            product_name: "Arroz Tipo 1".to_string(),
            unit_price: Decimal::from_str(price).unwrap(),
            quantity: Decimal::from_str(quantity).unwrap(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            store: "Supermercado ABC".to_string(),
            stated_total: Decimal::from_str(total).unwrap(),
        }
    }

    fn tolerance() -> Decimal {
        Decimal::new(1, 2)
    }

    #[test]
    fn test_exact_total_is_accepted() {
        let line = check_total(candidate("22.90", "1", "22.90"), tolerance()).unwrap();
        assert_eq!(line.product_name, "Arroz Tipo 1");
        assert_eq!(line.line_total(), Some(Decimal::from_str("22.90").unwrap()));
    }

    #[test]
    fn test_one_cent_gap_is_accepted() {
        assert!(check_total(candidate("5.99", "3", "17.98"), tolerance()).is_ok());
        assert!(check_total(candidate("5.99", "3", "17.96"), tolerance()).is_ok());
    }

    #[test]
    fn test_weight_items_round_before_comparing() {
        // 39.90 * 0.347 = 13.8453
        assert!(check_total(candidate("39.90", "0.347", "13.85"), tolerance()).is_ok());
        assert!(check_total(candidate("39.90", "0.347", "13.83"), tolerance()).is_err());
    }

    #[test]
    fn test_mismatch_names_product() {
        let err = check_total(candidate("22.90", "1", "25.00"), tolerance()).unwrap_err();
        assert_eq!(
            err,
            ReceiptError::InconsistentTotal {
                product: "Arroz Tipo 1".to_string(),
                expected: Decimal::from_str("22.90").unwrap(),
                stated: Decimal::from_str("25.00").unwrap(),
            }
        );
    }

    #[test]
    fn test_overflowing_product_is_an_error() {
        let err = check_total(
            candidate("99999999999999999", "99999999999999999", "1.00"),
            tolerance(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ReceiptError::AmountOverflow {
                product: "Arroz Tipo 1".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_tolerance() {
        assert!(check_total(candidate("5.99", "3", "17.97"), Decimal::ZERO).is_ok());
        assert!(check_total(candidate("5.99", "3", "17.98"), Decimal::ZERO).is_err());
    }
}
