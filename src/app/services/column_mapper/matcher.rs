//! Header label matching

use super::synonyms::SynonymTable;
use super::{ColumnMapping, SourceColumn};
use crate::app::models::{FormatKind, SourceField};
use crate::app::services::format_detector::normalize_label;
use crate::config::MappingConfig;
use crate::constants::{MIN_CONTAINMENT_SYNONYM_LEN, MIN_EDIT_DISTANCE_SYNONYM_LEN};
use crate::{Error, Result};
use rapidfuzz::distance::levenshtein;
use std::cmp::Ordering;
use tracing::debug;

/// Fields every panel sheet must map
pub const MANDATORY_FIELDS: [SourceField; 2] = [SourceField::Code, SourceField::Name];

/// Maps header labels to source fields
#[derive(Debug, Clone, Default)]
pub struct ColumnMapper {
    config: MappingConfig,
}

struct Candidate {
    field_rank: usize,
    field: SourceField,
    column: usize,
    score: f64,
}

impl ColumnMapper {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Synonym table in effect for a layout
    pub fn table(&self, kind: FormatKind) -> SynonymTable {
        SynonymTable::configured(kind, &self.config)
    }

    /// Map a panel sheet's header, failing when Code or Name is missing
    pub fn map_sheet(
        &self,
        sheet_name: &str,
        labels: &[String],
        kind: FormatKind,
    ) -> Result<ColumnMapping> {
        let mapping = self.map_labels(labels, kind);
        let missing = mapping.missing(&MANDATORY_FIELDS);
        if !missing.is_empty() {
            return Err(Error::mapping(
                sheet_name,
                missing.iter().map(|f| f.key()).collect(),
            ));
        }
        Ok(mapping)
    }

    /// Best-effort mapping with no mandatory fields
    pub fn map_labels(&self, labels: &[String], kind: FormatKind) -> ColumnMapping {
        let table = self.table(kind);
        let mut mapping = ColumnMapping::new();
        let mut claimed = vec![false; labels.len()];

        // Exact pass
        let exact_keys: Vec<String> = labels.iter().map(|l| exact_key(l)).collect();
        for (field, synonyms) in table.entries() {
            let hit = synonyms.iter().find_map(|synonym| {
                exact_keys
                    .iter()
                    .enumerate()
                    .find(|(i, key)| !claimed[*i] && !key.is_empty() && *key == synonym)
                    .map(|(i, _)| i)
            });
            if let Some(index) = hit {
                claimed[index] = true;
                mapping.insert(*field, column(labels, index));
            }
        }

        // Fuzzy pass over what is left
        let normalized: Vec<String> = labels.iter().map(|l| normalize_label(l)).collect();
        let mut candidates = Vec::new();
        for (rank, (field, synonyms)) in table.entries().iter().enumerate() {
            if mapping.contains(*field) {
                continue;
            }
            for (index, label) in normalized.iter().enumerate() {
                if claimed[index] || label.is_empty() {
                    continue;
                }
                let score = synonyms
                    .iter()
                    .filter_map(|s| self.fuzzy_score(&normalize_label(s), label))
                    .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));
                if let Some(score) = score {
                    candidates.push(Candidate {
                        field_rank: rank,
                        field: *field,
                        column: index,
                        score,
                    });
                }
            }
        }

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.field_rank.cmp(&b.field_rank))
                .then(a.column.cmp(&b.column))
        });

        for candidate in candidates {
            if claimed[candidate.column] || mapping.contains(candidate.field) {
                continue;
            }
            debug!(
                "Fuzzy mapped '{}' to {} (score {:.2})",
                labels[candidate.column], candidate.field, candidate.score
            );
            claimed[candidate.column] = true;
            mapping.insert(candidate.field, column(labels, candidate.column));
        }

        mapping
    }

    /// Similarity of a normalized synonym and header label, if they match
    ///
    /// Equality scores 1.0; an edit-distance match scores by the share of
    /// characters kept; containment scores by the length ratio.
    pub fn fuzzy_score(&self, synonym: &str, label: &str) -> Option<f64> {
        if synonym.is_empty() || label.is_empty() {
            return None;
        }

        let compact_synonym: String = synonym.chars().filter(|c| *c != ' ').collect();
        let compact_label: String = label.chars().filter(|c| *c != ' ').collect();
        if compact_synonym == compact_label {
            return Some(1.0);
        }

        let mut best: Option<f64> = None;

        let synonym_len = compact_synonym.chars().count();
        if synonym_len >= MIN_EDIT_DISTANCE_SYNONYM_LEN {
            let distance = levenshtein::distance(compact_synonym.chars(), compact_label.chars());
            if distance <= self.config.max_edit_distance {
                let longest = synonym_len.max(compact_label.chars().count()) as f64;
                best = Some(1.0 - distance as f64 / longest);
            }
        }

        if synonym.len() >= MIN_CONTAINMENT_SYNONYM_LEN
            && format!(" {} ", label).contains(&format!(" {} ", synonym))
        {
            let ratio = synonym.len() as f64 / label.len() as f64;
            if ratio >= self.config.min_containment_ratio {
                best = Some(best.map_or(ratio, |b| b.max(ratio)));
            }
        }

        best
    }
}

/// Lowercase label with whitespace runs collapsed
fn exact_key(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn column(labels: &[String], index: usize) -> SourceColumn {
    SourceColumn {
        index,
        label: labels[index].trim().to_string(),
    }
}
