//! Postal code extraction and validation

use super::FieldOutcome;
use super::country::has_malaysian_indicator;
use crate::constants::POSTAL_CODE_LENGTH;
use regex::Regex;
use std::sync::LazyLock;

static POSTAL_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bsingapore\s*(\d{6})\b|\bS(\d{6})\b").expect("Invalid postal code regex")
});

/// First `SINGAPORE 123456` or `S123456` token in an address
///
/// No match yields an empty value; this is counted but never an error.
pub fn extract_postal_code(address: &str) -> FieldOutcome {
    let found = POSTAL_CODE_REGEX.captures(address).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    });

    match found {
        Some(code) => FieldOutcome::ok(code),
        None if address.trim().is_empty() => FieldOutcome::ok(""),
        None => FieldOutcome::failed("", "no postal code in address"),
    }
}

/// Normalize a dedicated postal code cell to six digits
///
/// Spreadsheets store postal codes as numbers, so a leading zero is lost and
/// `018956` arrives as `18956`; five-digit values are zero-padded back.
pub fn normalize_postal_column(raw: &str) -> FieldOutcome {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return if raw.trim().is_empty() {
            FieldOutcome::ok("")
        } else {
            FieldOutcome::failed("", format!("postal code '{}' has no digits", raw.trim()))
        };
    }

    let padded = if digits.len() == POSTAL_CODE_LENGTH - 1 {
        format!("0{}", digits)
    } else {
        digits
    };

    if padded.len() == POSTAL_CODE_LENGTH {
        FieldOutcome::ok(padded)
    } else {
        FieldOutcome::failed("", format!("postal code '{}' is not six digits", raw.trim()))
    }
}

/// PostalCode for a row from its postal column (if mapped) and address
///
/// An explicit `SINGAPORE 123456` or `S123456` token always counts, even on
/// streets named after Malaysian states (Penang Road, Selangor Road). Only
/// when the address is Malaysian and carries no such token is a five-digit
/// postcode dropped instead of padded into a Singapore code.
pub fn derive_postal_code(column: Option<&str>, address: &str) -> FieldOutcome {
    let malaysian = has_malaysian_indicator(address) && !POSTAL_CODE_REGEX.is_match(address);

    match column.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) if malaysian && is_malaysian_postcode(value) => FieldOutcome::ok(""),
        Some(value) => normalize_postal_column(value),
        None if malaysian => FieldOutcome::ok(""),
        None => extract_postal_code(address),
    }
}

fn is_malaysian_postcode(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    digits == POSTAL_CODE_LENGTH - 1 && value.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
}

/// True for an empty string or exactly six ASCII digits
pub fn is_valid_postal_code(code: &str) -> bool {
    code.is_empty() || (code.len() == POSTAL_CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit()))
}
