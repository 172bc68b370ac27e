//! Exchange pair reconciliation
//!
//! Pulls instrument listings and trade data from Binance and OKEx, compares
//! the two instrument sets and exports everything to one spreadsheet.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
