//! Core domain types and logic.

pub mod trade;
pub mod record_parser;
pub mod ledger;
pub mod window;
pub mod report;
pub mod checker;
pub mod config_validation;
pub mod error;
