//! Country inference from address text

use crate::app::models::Country;
use crate::constants::MALAYSIAN_INDICATORS;
use regex::Regex;
use std::sync::LazyLock;

static MALAYSIAN_INDICATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = MALAYSIAN_INDICATORS
        .iter()
        .map(|indicator| regex::escape(indicator).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives))
        .expect("Invalid Malaysian indicator regex")
});

/// True when the address names a Malaysian state, city or the country itself
pub fn has_malaysian_indicator(address: &str) -> bool {
    MALAYSIAN_INDICATOR_REGEX.is_match(address)
}

/// A Singapore postal code settles the question; otherwise the address text does
pub fn infer_country(address: &str, postal_code: &str) -> Country {
    if !postal_code.is_empty() {
        Country::Singapore
    } else if has_malaysian_indicator(address) {
        Country::Malaysia
    } else {
        Country::Singapore
    }
}
