//! Price and quantity normalization for Brazilian receipts.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ReceiptError;
use crate::models::purchase::round_money;

use super::patterns::{AMOUNT_TOKEN, QUANTITY_TOKEN};

/// Parse a unit price or line total.
///
/// The currency marker and all whitespace are removed, a comma is read as the
/// decimal separator, and the result is rounded to cents. Zero and negative
/// amounts are rejected.
pub fn parse_price(token: &str, currency_marker: &str) -> Result<Decimal, ReceiptError> {
    let invalid = || ReceiptError::InvalidPrice(token.trim().to_string());

    let stripped = if currency_marker.is_empty() {
        token.to_string()
    } else {
        token.replace(currency_marker, "")
    };
    let cleaned: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();

    if !AMOUNT_TOKEN.is_match(&cleaned) {
        return Err(invalid());
    }

    let price = parse_decimal_amount(&cleaned).map(round_money).ok_or_else(invalid)?;
    if price <= Decimal::ZERO {
        return Err(invalid());
    }

    Ok(price)
}

/// Parse a quantity, allowing fractional weights.
///
/// Accepts an optional unit suffix (`UN`, `KG`, `L`, ...) and rounds to three
/// fractional digits. Zero and negative quantities are rejected.
pub fn parse_quantity(token: &str) -> Result<Decimal, ReceiptError> {
    let invalid = || ReceiptError::InvalidQuantity(token.trim().to_string());

    let caps = QUANTITY_TOKEN.captures(token.trim()).ok_or_else(invalid)?;
    let quantity = parse_decimal_amount(&caps[1])
        .map(|q| q.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(invalid)?;

    if quantity <= Decimal::ZERO {
        return Err(invalid());
    }

    Ok(quantity)
}

/// Parse a number written with either decimal separator ("22,90", "1.234,56", "22.90").
///
/// When both separators appear, the last one is the decimal separator.
pub fn parse_decimal_amount(s: &str) -> Option<Decimal> {
    let normalized = if s.contains(',') && !s.contains('.') {
        s.replace(',', ".")
    } else if s.contains(',') && s.contains('.') {
        match (s.rfind(','), s.rfind('.')) {
            (Some(c), Some(d)) if c > d => s.replace('.', "").replace(',', "."),
            _ => s.replace(',', ""),
        }
    } else {
        s.to_string()
    };

    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("22.90", "R$").unwrap(), dec("22.90"));
        assert_eq!(parse_price("R$ 22,90", "R$").unwrap(), dec("22.90"));
        assert_eq!(parse_price("R$22,90", "R$").unwrap(), dec("22.90"));
        assert_eq!(parse_price("1.234,56", "R$").unwrap(), dec("1234.56"));
        assert_eq!(parse_price("1,234.56", "R$").unwrap(), dec("1234.56"));
    }

    #[test]
    fn test_parse_price_rounds_to_cents() {
        assert_eq!(parse_price("3.499", "R$").unwrap(), dec("3.50"));
        assert_eq!(parse_price("7", "R$").unwrap(), dec("7"));
    }

    #[test]
    fn test_zero_and_negative_prices_are_rejected() {
        assert_eq!(parse_price("0", "R$"), Err(ReceiptError::InvalidPrice("0".to_string())));
        assert!(parse_price("0,00", "R$").is_err());
        assert!(parse_price("0.001", "R$").is_err());
        assert!(parse_price("-5,00", "R$").is_err());
    }

    #[test]
    fn test_non_numeric_prices_are_rejected() {
        assert!(parse_price("R$", "R$").is_err());
        assert!(parse_price("abc", "R$").is_err());
        assert!(parse_price("12,9O", "R$").is_err());
        assert!(parse_price("1,2,3", "R$").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1").unwrap(), dec("1"));
        assert_eq!(parse_quantity("0,350").unwrap(), dec("0.350"));
        assert_eq!(parse_quantity("0.3456").unwrap(), dec("0.346"));
        assert_eq!(parse_quantity("2UN").unwrap(), dec("2"));
        assert_eq!(parse_quantity("1,5 kg").unwrap(), dec("1.5"));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        assert_eq!(parse_quantity("0"), Err(ReceiptError::InvalidQuantity("0".to_string())));
        assert!(parse_quantity("0,0001").is_err());
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("UN").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn test_parse_decimal_amount() {
        assert_eq!(parse_decimal_amount("1234,56"), Some(dec("1234.56")));
        assert_eq!(parse_decimal_amount("12.345.678,90"), Some(dec("12345678.90")));
        assert_eq!(parse_decimal_amount("1.2.3"), None);
    }
}
