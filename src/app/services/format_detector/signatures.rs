//! Header signatures for the supported layouts

use crate::app::models::FormatKind;
use std::collections::HashSet;

/// Keyword profile of one layout's header row
#[derive(Debug)]
pub struct Signature {
    pub kind: FormatKind,
    /// Header keywords; a row must match more distinct ones than the threshold
    pub keywords: &'static [&'static str],
    /// Every group must have at least one keyword present in the row
    pub anchors: &'static [&'static [&'static str]],
    pub requires_merge: bool,
}

/// Signatures in detection order, most specific first
pub static SIGNATURES: &[Signature] = &[
    Signature {
        kind: FormatKind::MergedMultiLevel,
        keywords: &[
            "zone",
            "estate",
            "clinic name",
            "clinic code",
            "code",
            "tel",
            "address",
            "postal code",
            "mon",
            "fri",
            "sat",
            "sun",
            "public holiday",
            "am",
            "pm",
            "night",
        ],
        anchors: &[&["zone", "estate"]],
        requires_merge: true,
    },
    Signature {
        kind: FormatKind::ComponentAddress,
        keywords: &[
            "physician",
            "master code",
            "blk",
            "block",
            "road name",
            "street name",
            "unit no",
            "building name",
            "postal code",
            "clinic name",
            "tel",
            "operating hours",
        ],
        anchors: &[&["blk", "block", "road name", "street name", "building name"]],
        requires_merge: false,
    },
    Signature {
        kind: FormatKind::MultiPartAddress,
        keywords: &[
            "specialty",
            "speciality",
            "doctor",
            "address1",
            "address 1",
            "address2",
            "address 2",
            "address3",
            "address 3",
            "address4",
            "address 4",
            "clinic name",
            "tel",
        ],
        anchors: &[
            &["specialty", "speciality", "doctor"],
            &["address1", "address 1", "address line 1"],
        ],
        requires_merge: false,
    },
    Signature {
        kind: FormatKind::Standard,
        keywords: &[
            "s n",
            "no",
            "clinic id",
            "clinic code",
            "provider code",
            "clinic name",
            "region",
            "area",
            "zone",
            "tel",
            "telephone",
            "phone",
            "remarks",
            "address",
        ],
        anchors: &[&["clinic", "id", "code", "name"]],
        requires_merge: false,
    },
];

impl Signature {
    pub fn for_kind(kind: FormatKind) -> Option<&'static Signature> {
        SIGNATURES.iter().find(|s| s.kind == kind)
    }

    /// Distinct keywords present in a row
    pub fn keyword_hits(&self, row: &[String]) -> usize {
        let cells = normalized_cells(row);
        self.keywords
            .iter()
            .filter(|k| cells.iter().any(|c| contains_phrase(c, k)))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Whether a row qualifies as this layout's header
    pub fn matches_row(&self, row: &[String], threshold: usize) -> bool {
        let cells = normalized_cells(row);
        if cells.is_empty() {
            return false;
        }

        let anchored = self
            .anchors
            .iter()
            .all(|group| group.iter().any(|a| cells.iter().any(|c| contains_phrase(c, a))));

        anchored && self.keyword_hits(row) > threshold
    }
}

/// Lowercase alphanumeric tokens joined by single spaces
///
/// `"S/N"` becomes `"s n"`, `"MON - FRI (AM)"` becomes `"mon fri am"`.
pub fn normalize_label(label: &str) -> String {
    label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalized_cells(row: &[String]) -> Vec<String> {
    row.iter()
        .map(|c| normalize_label(c))
        .filter(|c| !c.is_empty())
        .collect()
}

/// Whole-token phrase containment
fn contains_phrase(cell: &str, phrase: &str) -> bool {
    format!(" {} ", cell).contains(&format!(" {} ", phrase))
}
