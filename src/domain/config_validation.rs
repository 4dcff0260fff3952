//! Configuration validation.
//!
//! Validates the `[checker]` section before any input is read. Every key is
//! optional; a missing key falls back to the built-in rule.

use crate::domain::error::CancelCheckError;
use crate::domain::record_parser::DEFAULT_DELIMITER;
use crate::domain::window::{Ratio, WindowPolicy, DEFAULT_WINDOW_SECONDS};
use crate::ports::config_port::ConfigPort;

pub const SECTION: &str = "checker";

pub fn validate_checker_config(config: &dyn ConfigPort) -> Result<(), CancelCheckError> {
    window_seconds(config)?;
    max_cancel_ratio(config)?;
    delimiter(config)?;
    Ok(())
}

/// Builds the window policy from config, using defaults for absent keys.
pub fn policy_from_config(config: &dyn ConfigPort) -> Result<WindowPolicy, CancelCheckError> {
    Ok(WindowPolicy {
        window_seconds: window_seconds(config)?,
        max_cancel_ratio: max_cancel_ratio(config)?,
    })
}

pub fn window_seconds(config: &dyn ConfigPort) -> Result<f64, CancelCheckError> {
    let raw = match config.get_string(SECTION, "window_seconds") {
        None => return Ok(DEFAULT_WINDOW_SECONDS),
        Some(s) => s,
    };
    parse_window_seconds(&raw).map_err(|reason| invalid("window_seconds", reason))
}

pub fn max_cancel_ratio(config: &dyn ConfigPort) -> Result<Ratio, CancelCheckError> {
    match config.get_string(SECTION, "max_cancel_ratio") {
        None => Ok(Ratio::default()),
        Some(s) => s
            .parse::<Ratio>()
            .map_err(|e| invalid("max_cancel_ratio", e.to_string())),
    }
}

pub fn delimiter(config: &dyn ConfigPort) -> Result<char, CancelCheckError> {
    match config.get_string(SECTION, "delimiter") {
        None => Ok(DEFAULT_DELIMITER),
        Some(s) => parse_delimiter(&s).map_err(|reason| invalid("delimiter", reason)),
    }
}

pub fn parse_window_seconds(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{raw:?} is not a number"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err("window_seconds must be a positive number".to_string());
    }
    Ok(value)
}

/// A single character, or one of `comma`, `semicolon`, `tab`, `pipe`.
///
/// The names exist because `;` starts an INI comment and surrounding
/// whitespace is trimmed from INI values.
pub fn parse_delimiter(raw: &str) -> Result<char, String> {
    match raw.to_lowercase().as_str() {
        "comma" => return Ok(','),
        "semicolon" => return Ok(';'),
        "tab" => return Ok('\t'),
        "pipe" => return Ok('|'),
        _ => {}
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!(
            "expected a single character or comma/semicolon/tab/pipe, got {raw:?}"
        )),
    }
}

fn invalid(key: &str, reason: String) -> CancelCheckError {
    CancelCheckError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason,
    }
}
