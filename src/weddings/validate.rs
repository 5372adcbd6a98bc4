use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

pub const PIN_LEN: usize = 6;

lazy_static! {
    // ASCII only: `\d` would also accept other Unicode digits.
    static ref PIN_INPUT_RE: Regex = Regex::new(r"^[0-9]{1,6}$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Validate a PIN coming from a host and return its stored form.
///
/// Blank input fails with `blank_msg`. Otherwise the trimmed input must be
/// one to six ASCII digits; it is left-padded with zeros to six characters.
pub fn validate_pin(raw: Option<&str>, blank_msg: &str) -> AppResult<String> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(AppError::validation(blank_msg));
    }
    if !PIN_INPUT_RE.is_match(trimmed) {
        return Err(AppError::validation("PIN must be exactly 6 digits"));
    }
    Ok(pad_pin(trimmed))
}

/// Canonical form of a PIN read back from storage.
pub fn normalize_stored_pin(stored: &str) -> String {
    let trimmed = stored.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        pad_pin(trimmed)
    }
}

fn pad_pin(pin: &str) -> String {
    format!("{:0>width$}", pin, width = PIN_LEN)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(raw: &str) -> AppResult<String> {
    let email = normalize_email(raw);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    Ok(email)
}

pub fn require_non_blank(value: &str, msg: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(msg));
    }
    Ok(())
}
