//! Termination entries from sheets and external lists

use super::TerminationSet;
use crate::app::models::{FormatKind, RawSheet, RowKind, SourceField};
use crate::app::services::column_mapper::{
    ColumnMapper, ColumnMapping, HeaderLayout, build_header_layout,
};
use crate::app::services::field_rules::{build_address, derive_postal_code};
use crate::app::services::format_detector::{FormatDetector, unmerge};
use crate::app::services::workbook_reader::{classify_sheets, read_workbook};
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info, warn};

const LOCATION_FIELDS: [SourceField; 4] = [
    SourceField::PostalCode,
    SourceField::Address,
    SourceField::Address1,
    SourceField::AddressRoad,
];

fn has_termination_keys(mapping: &ColumnMapping) -> bool {
    mapping.contains(SourceField::Code)
        || (mapping.contains(SourceField::Name)
            && LOCATION_FIELDS.iter().any(|f| mapping.contains(*f)))
}

/// Header and mapping of a termination sheet
///
/// Termination lists are often too sparse for panel layout detection (a bare
/// `Clinic Code, Clinic Name` list), so when the detected header lacks the
/// keys every row in the scan window is tried as a standard header instead.
fn locate_termination_header(
    sheet: &RawSheet,
    detector: &FormatDetector,
    mapper: &ColumnMapper,
) -> Result<(HeaderLayout, ColumnMapping)> {
    if let Ok(detection) = detector.detect(sheet) {
        let layout = build_header_layout(sheet, detection.kind, detection.header_row);
        let mapping = mapper.map_labels(&layout.labels, detection.kind);
        if has_termination_keys(&mapping) {
            return Ok((layout, mapping));
        }
    }

    let scan = sheet.row_count().min(detector.scan_rows());
    (0..scan)
        .map(|row| {
            let layout = build_header_layout(sheet, FormatKind::Standard, row);
            let mapping = mapper.map_labels(&layout.labels, FormatKind::Standard);
            (layout, mapping)
        })
        .find(|(_, mapping)| has_termination_keys(mapping))
        .ok_or_else(|| {
            Error::mapping(
                &sheet.name,
                vec![SourceField::Code.key(), SourceField::Name.key()],
            )
        })
}

/// Collect termination entries from one sheet
///
/// The sheet needs a code column, or a name column together with a postal
/// code or address column.
pub fn termination_entries_from_sheet(
    sheet: &RawSheet,
    detector: &FormatDetector,
    mapper: &ColumnMapper,
) -> Result<TerminationSet> {
    let sheet = unmerge(sheet);
    let (layout, mapping) = locate_termination_header(&sheet, detector, mapper)?;

    let mut set = TerminationSet::new();
    for row in sheet.rows.iter().skip(layout.data_start()) {
        if RowKind::classify(row) != RowKind::Data {
            continue;
        }

        let (_, address) = build_address(&mapping.address_parts(row));
        let postal = derive_postal_code(mapping.value(row, SourceField::PostalCode), &address.value);
        set.insert(
            mapping.text(row, SourceField::Code),
            &postal.value,
            mapping.text(row, SourceField::Name),
        );
    }

    debug!(
        "Sheet '{}': {} terminated codes, {} composites, {} unusable entries",
        sheet.name,
        set.code_count(),
        set.composite_count(),
        set.mismatches()
    );
    Ok(set)
}

/// Load an external termination list
///
/// Termination-named sheets are used when the workbook has any; otherwise
/// every sheet is read as a termination list. Sheets that cannot be mapped
/// are skipped with a warning.
pub fn load_termination_file(
    path: &Path,
    detector: &FormatDetector,
    mapper: &ColumnMapper,
) -> Result<TerminationSet> {
    let workbook = read_workbook(path)?;
    let names = workbook.sheet_names();
    let classification = classify_sheets(&names);
    let selected = if classification.termination.is_empty() {
        names
    } else {
        classification.termination
    };

    let mut set = TerminationSet::new();
    for name in &selected {
        let Some(sheet) = workbook.sheet(name) else {
            continue;
        };
        match termination_entries_from_sheet(sheet, detector, mapper) {
            Ok(entries) => set.extend(entries),
            Err(e) => warn!(
                "Skipping termination sheet '{}' in {}: {}",
                name,
                path.display(),
                e
            ),
        }
    }

    info!(
        "Loaded {} terminated codes from {}",
        set.code_count(),
        path.display()
    );
    Ok(set)
}
