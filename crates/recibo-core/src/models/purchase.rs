//! Purchase records produced by the receipt pipeline.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ReceiptError;

/// One product bought on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    /// Product description as printed, trimmed.
    pub product_name: String,

    /// Price of a single unit, two fractional digits.
    pub unit_price: Decimal,

    /// Units or weight bought, three fractional digits.
    pub quantity: Decimal,

    /// Day of purchase.
    pub purchase_date: NaiveDate,

    /// Store the purchase was made at.
    pub store: String,
}

impl PurchaseLine {
    /// Price paid for the line, rounded to cents, or `None` on overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(self.quantity).map(round_money)
    }
}

/// Round a monetary amount to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Purchase lines grouped as a single shopping trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Store of the first line.
    pub store: String,

    /// Purchase date of the first line.
    pub date: NaiveDate,

    /// Items in receipt order.
    pub items: Vec<PurchaseLine>,

    /// Sum of every line total.
    pub total: Decimal,
}

impl Receipt {
    /// Group parsed lines into a receipt with its aggregate total.
    pub fn from_lines(items: Vec<PurchaseLine>) -> Result<Self, ReceiptError> {
        let first = items.first().ok_or(ReceiptError::EmptyReceipt)?;
        let store = first.store.clone();
        let date = first.purchase_date;

        let mut total = Decimal::ZERO;
        for item in &items {
            total = item
                .line_total()
                .and_then(|line_total| total.checked_add(line_total))
                .ok_or_else(|| ReceiptError::AmountOverflow {
                    product: item.product_name.clone(),
                })?;
        }

        Ok(Self {
            store,
            date,
            items,
            total,
        })
    }

    /// Render the receipt as a short human-readable block.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Loja: {}\n", self.store));
        output.push_str(&format!("Data: {}\n\n", self.date.format("%d/%m/%Y")));

        for item in &self.items {
            output.push_str(&format!("{}\n", item.product_name));
            output.push_str(&format!(
                "  {}x {} = {}\n",
                format_quantity(item.quantity),
                format_brl(item.unit_price),
                item.line_total().map(format_brl).unwrap_or_default()
            ));
        }

        output.push_str(&format!("\nTotal: {}\n", format_brl(self.total)));
        output
    }
}

/// Format amount in Brazilian style (R$ 1.234,56).
pub fn format_brl(amount: Decimal) -> String {
    let s = format!("{:.2}", round_money(amount).abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}R$ {},{}", sign, grouped, decimal_part)
}

fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string().replace('.', ",")
}
