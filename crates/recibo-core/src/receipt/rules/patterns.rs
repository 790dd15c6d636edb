//! Fixed regex patterns for receipt field normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Brazilian day-first dates
    pub static ref DATE_DMY_SLASH: Regex = Regex::new(
        r"\b(\d{2})/(\d{2})/(\d{4})\b"
    ).unwrap();

    pub static ref DATE_DMY_DASH: Regex = Regex::new(
        r"\b(\d{2})-(\d{2})-(\d{4})\b"
    ).unwrap();

    pub static ref DATE_DMY_DOT: Regex = Regex::new(
        r"\b(\d{2})\.(\d{2})\.(\d{4})\b"
    ).unwrap();

    // Year-first dates
    pub static ref DATE_YMD_SLASH: Regex = Regex::new(
        r"\b(\d{4})/(\d{2})/(\d{2})\b"
    ).unwrap();

    // Amount after the currency marker is removed: "22.90", "22,90", "1.234,56"
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"^[+-]?\d[\d.,]*$"
    ).unwrap();

    // Quantity with an optional unit suffix: "2", "0,350", "1UN", "0.5 KG"
    pub static ref QUANTITY_TOKEN: Regex = Regex::new(
        r"(?i)^([+-]?\d[\d.,]*)\s*(?:x|un|und|unid|kg|g|l|ml)?$"
    ).unwrap();

    // Enumerated column label: "A- ", "1-", "c - "
    pub static ref COLUMN_LABEL: Regex = Regex::new(
        r"^([A-Za-z]|\d)\s*-\s*"
    ).unwrap();
}
