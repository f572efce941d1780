//! Row to record transformation

use crate::app::models::{DayGroup, FormatKind, HourSlot, NormalizedRecord, SourceField};
use crate::app::services::column_mapper::ColumnMapping;
use crate::app::services::field_rules::{
    FieldOutcome, build_address, clean_text, combine_phone_remarks, combine_slots,
    derive_postal_code, extract_free_text_hours, infer_country, normalize_code, simple_hours,
};
use crate::constants::CLOSED;

/// A transformed row and the output fields whose rules failed
#[derive(Debug, Clone)]
pub struct RowTransform {
    pub record: NormalizedRecord,
    pub failures: Vec<&'static str>,
}

/// Output column a day group's hours land in
pub fn hours_column(group: DayGroup) -> &'static str {
    match group {
        DayGroup::Weekday => "MonToFri",
        DayGroup::Saturday => "Saturday",
        DayGroup::Sunday => "Sunday",
        DayGroup::PublicHoliday => "PublicHoliday",
    }
}

/// Hours string for one day group
///
/// Slot columns win when any are mapped; a single hours column is read as
/// free text or as a simple value depending on the layout; an unmapped
/// group is closed.
pub fn hours_for(
    row: &[String],
    mapping: &ColumnMapping,
    kind: FormatKind,
    group: DayGroup,
) -> FieldOutcome {
    let slot = |s: HourSlot| mapping.value(row, SourceField::Slot(group, s));
    let has_slots = HourSlot::ALL
        .iter()
        .any(|s| mapping.contains(SourceField::Slot(group, *s)));

    if has_slots {
        return combine_slots(slot(HourSlot::Am), slot(HourSlot::Pm), slot(HourSlot::Night));
    }

    match mapping.value(row, SourceField::Hours(group)) {
        Some(text) if kind.uses_free_text_hours() => extract_free_text_hours(text),
        Some(text) => simple_hours(text),
        None if kind.uses_free_text_hours() => FieldOutcome::ok(CLOSED),
        None => combine_slots(None, None, None),
    }
}

fn clinic_name(raw: &str) -> FieldOutcome {
    let name = clean_text(raw);
    if name.is_empty() {
        FieldOutcome::failed(name, "name is empty")
    } else {
        FieldOutcome::ok(name)
    }
}

/// Apply every field rule to one data row
pub fn transform_row(row: &[String], mapping: &ColumnMapping, kind: FormatKind) -> RowTransform {
    let mut failures = Vec::new();
    let mut take = |column: &'static str, outcome: FieldOutcome| {
        if !outcome.ok {
            failures.push(column);
        }
        outcome.into_value()
    };

    let code = take("Code", normalize_code(mapping.text(row, SourceField::Code)));

    let name = take("Name", clinic_name(mapping.text(row, SourceField::Name)));

    let mut zone = clean_text(mapping.text(row, SourceField::Zone));
    let mut area = clean_text(mapping.text(row, SourceField::Area));
    if zone.is_empty() {
        zone = area.clone();
    } else if area.is_empty() {
        area = zone.clone();
    }

    let (lines, address) = build_address(&mapping.address_parts(row));
    let address = take("Address1", address);
    let postal_code = take(
        "PostalCode",
        derive_postal_code(mapping.value(row, SourceField::PostalCode), &address),
    );
    let country = infer_country(&address, &postal_code);

    let phone_number = take(
        "PhoneNumber",
        combine_phone_remarks(
            mapping.text(row, SourceField::Telephone),
            mapping.text(row, SourceField::Remarks),
        ),
    );

    let [mon_to_fri, saturday, sunday, public_holiday] =
        DayGroup::ALL.map(|group| take(hours_column(group), hours_for(row, mapping, kind, group)));

    RowTransform {
        record: NormalizedRecord {
            code,
            name,
            zone,
            area,
            specialty: clean_text(mapping.text(row, SourceField::Specialty)),
            doctor: clean_text(mapping.text(row, SourceField::Doctor)),
            address1: lines.address1,
            address2: lines.address2,
            address3: lines.address3,
            postal_code,
            country,
            phone_number,
            mon_to_fri,
            saturday,
            sunday,
            public_holiday,
            latitude: None,
            longitude: None,
            google_map_url: String::new(),
        },
        failures,
    }
}
