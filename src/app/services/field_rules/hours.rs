//! Operating-hours consolidation
//!
//! Slot layouts carry one cell per AM/PM/NIGHT sub-column and are joined as
//! `am/pm/night`. Free-text layouts carry one string per day group from which
//! up to [`MAX_FREE_TEXT_RANGES`] time ranges are extracted.

use super::{FieldOutcome, clean_text};
use crate::constants::{CLOSED, HOURS_SEPARATOR, MAX_FREE_TEXT_RANGES};
use regex::Regex;
use std::sync::LazyLock;

static TIME_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{1,2}(?:[.:]\d{2})?\s*[ap]\.?m\.?)\s*(?:-|–|—|to)\s*(\d{1,2}(?:[.:]\d{2})?\s*[ap]\.?m\.?)",
    )
    .expect("Invalid time range regex")
});

fn slot_value(raw: Option<&str>) -> String {
    let value = raw.map(clean_text).unwrap_or_default();
    if value.is_empty() {
        CLOSED.to_string()
    } else {
        value
    }
}

/// Join AM/PM/NIGHT values, substituting `CLOSED` for blanks
pub fn combine_slots(am: Option<&str>, pm: Option<&str>, night: Option<&str>) -> FieldOutcome {
    let value = [am, pm, night]
        .into_iter()
        .map(slot_value)
        .collect::<Vec<_>>()
        .join(HOURS_SEPARATOR);
    FieldOutcome::ok(value)
}

/// A day group published as one column: the value fills the first slot
pub fn simple_hours(raw: &str) -> FieldOutcome {
    combine_slots(Some(raw), None, None)
}

fn normalize_time(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    compact
        .trim_end_matches('.')
        .replace("a.m", "am")
        .replace("p.m", "pm")
}

/// Extract `H.MMam - H.MMpm` style ranges from free text and slash-join them
pub fn extract_free_text_hours(text: &str) -> FieldOutcome {
    let cleaned = clean_text(text);
    let ranges: Vec<String> = TIME_RANGE_REGEX
        .captures_iter(&cleaned)
        .take(MAX_FREE_TEXT_RANGES)
        .map(|caps| {
            format!(
                "{} - {}",
                normalize_time(&caps[1]),
                normalize_time(&caps[2])
            )
        })
        .collect();

    if !ranges.is_empty() {
        return FieldOutcome::ok(ranges.join(HOURS_SEPARATOR));
    }

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(CLOSED) {
        FieldOutcome::ok(CLOSED)
    } else {
        FieldOutcome::failed(CLOSED, format!("no time range found in '{}'", cleaned))
    }
}
