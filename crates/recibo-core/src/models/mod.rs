//! Data models for parsed receipts and pipeline configuration.

pub mod config;
pub mod purchase;
