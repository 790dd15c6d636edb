//! Core library for Brazilian grocery receipt parsing.
//!
//! This crate provides:
//! - Receipt text normalization (dates, prices, quantities in pt-BR notation)
//! - Header and product table detection for free-form receipts
//! - Delimited (column-labeled) and positional record extraction
//! - Line total consistency checks and document validation
//! - Product categorization and BRL formatting

pub mod categories;
pub mod error;
pub mod models;
pub mod receipt;

pub use categories::{categorize, Categorizer, Category};
pub use error::{ReceiptError, ReciboError, Result, ValidationError};
pub use models::config::{ExtractionStrategy, ParserConfig, RowPolicy};
pub use models::purchase::{format_brl, PurchaseLine, Receipt};
pub use receipt::{parse_receipt, ParseReport, ReceiptParser, ReceiptPipeline, SkippedRow};
