//! Synonym tables per layout
//!
//! Defaults cover the header spellings seen across insurer panel exports.
//! Configuration may replace the list for any field, either for every
//! layout (`[mapping.synonyms.default]`) or for one layout.

use crate::app::models::{DayGroup, FormatKind, HourSlot, SourceField};
use crate::config::MappingConfig;

const CODE: &[&str] = &[
    "ihp clinic id",
    "provider code",
    "clinic id",
    "id",
    "clinic code",
    "provider id",
    "clinic no",
    "code",
];
const NAME: &[&str] = &[
    "clinic name",
    "name",
    "provider name",
    "name of clinic",
    "clinic",
];
const ZONE: &[&str] = &["region", "zone", "district", "sector", "location", "state"];
const AREA: &[&str] = &["area", "estate", "locality", "town"];
const SPECIALTY: &[&str] = &[
    "specialty",
    "speciality",
    "specialisation",
    "specialization",
    "discipline",
];
const DOCTOR: &[&str] = &[
    "doctor",
    "doctor name",
    "physician",
    "doctor in charge",
];
const ADDRESS: &[&str] = &["address", "clinic address", "full address"];
const BLOCK: &[&str] = &["blk", "block", "blk no", "block no"];
const ROAD: &[&str] = &["road name", "street name", "street", "road"];
const UNIT: &[&str] = &["unit no.", "unit no", "unit", "#"];
const BUILDING: &[&str] = &["building name", "building"];
const POSTAL_CODE: &[&str] = &["postal code", "postcode", "zip code", "zip", "postal"];
const TELEPHONE: &[&str] = &[
    "tel no.",
    "tel no",
    "tel",
    "phone",
    "telephone",
    "contact",
    "contact no",
    "phone number",
    "mobile",
];
const REMARKS: &[&str] = &["remarks", "comment", "note", "remark", "notes"];

fn group_labels(group: DayGroup) -> &'static [&'static str] {
    match group {
        DayGroup::Weekday => &[
            "mon - fri",
            "mon-fri",
            "mon to fri",
            "monday - friday",
            "monday to friday",
            "weekday",
            "weekdays",
        ],
        DayGroup::Saturday => &["sat", "saturday"],
        DayGroup::Sunday => &["sun", "sunday"],
        DayGroup::PublicHoliday => &["ph", "public holiday", "public holidays", "holiday"],
    }
}

fn slot_labels(slot: HourSlot) -> &'static [&'static str] {
    match slot {
        HourSlot::Am => &["am"],
        HourSlot::Pm => &["pm"],
        HourSlot::Night => &["night", "evening"],
    }
}

fn address_lines(n: usize) -> Vec<String> {
    vec![
        format!("address{}", n),
        format!("address {}", n),
        format!("address line {}", n),
        format!("addr{}", n),
    ]
}

fn to_owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Default synonyms for a field
pub fn default_synonyms(field: SourceField) -> Vec<String> {
    match field {
        SourceField::Code => to_owned(CODE),
        SourceField::Name => to_owned(NAME),
        SourceField::Zone => to_owned(ZONE),
        SourceField::Area => to_owned(AREA),
        SourceField::Specialty => to_owned(SPECIALTY),
        SourceField::Doctor => to_owned(DOCTOR),
        SourceField::Address => to_owned(ADDRESS),
        SourceField::Address1 => address_lines(1),
        SourceField::Address2 => address_lines(2),
        SourceField::Address3 => address_lines(3),
        SourceField::Address4 => address_lines(4),
        SourceField::AddressBlock => to_owned(BLOCK),
        SourceField::AddressUnit => to_owned(UNIT),
        SourceField::AddressRoad => to_owned(ROAD),
        SourceField::AddressBuilding => to_owned(BUILDING),
        SourceField::PostalCode => to_owned(POSTAL_CODE),
        SourceField::Telephone => to_owned(TELEPHONE),
        SourceField::Remarks => to_owned(REMARKS),
        SourceField::Slot(group, slot) => {
            let mut synonyms = Vec::new();
            for g in group_labels(group) {
                for s in slot_labels(slot) {
                    synonyms.push(format!("{} ({})", g, s));
                    synonyms.push(format!("{} {}", g, s));
                    synonyms.push(format!("{}.{}", g, s));
                }
            }
            synonyms
        }
        SourceField::Hours(group) => group_labels(group)
            .iter()
            .flat_map(|g| {
                [
                    g.to_string(),
                    format!("{} hours", g),
                    format!("operating hours {}", g),
                    format!("opening hours {}", g),
                ]
            })
            .collect(),
    }
}

/// Fields a layout can carry, in mapping priority order
pub fn fields_for(kind: FormatKind) -> Vec<SourceField> {
    let common = [
        SourceField::Code,
        SourceField::Name,
        SourceField::Zone,
        SourceField::Area,
    ];
    let contact = [
        SourceField::PostalCode,
        SourceField::Telephone,
        SourceField::Remarks,
    ];
    let slots = SourceField::all()
        .into_iter()
        .filter(|f| matches!(f, SourceField::Slot(..)));
    let hours = DayGroup::ALL.map(SourceField::Hours);

    let mut fields: Vec<SourceField> = common.to_vec();
    match kind {
        FormatKind::Standard | FormatKind::MergedMultiLevel | FormatKind::Unknown => {
            fields.push(SourceField::Address);
            fields.extend(contact);
            fields.extend(slots);
        }
        FormatKind::ComponentAddress => {
            fields.extend([
                SourceField::Specialty,
                SourceField::Doctor,
                SourceField::AddressBlock,
                SourceField::AddressRoad,
                SourceField::AddressUnit,
                SourceField::AddressBuilding,
                SourceField::Address,
            ]);
            fields.extend(contact);
        }
        FormatKind::MultiPartAddress => {
            fields.extend([
                SourceField::Specialty,
                SourceField::Doctor,
                SourceField::Address1,
                SourceField::Address2,
                SourceField::Address3,
                SourceField::Address4,
                SourceField::Address,
            ]);
            fields.extend(contact);
        }
    }
    fields.extend(hours);
    fields
}

/// Ordered field to synonym list table for one layout
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymTable {
    entries: Vec<(SourceField, Vec<String>)>,
}

impl SynonymTable {
    /// Default table for a layout
    pub fn for_format(kind: FormatKind) -> Self {
        let mut entries: Vec<(SourceField, Vec<String>)> = fields_for(kind)
            .into_iter()
            .map(|field| (field, default_synonyms(field)))
            .collect();

        if kind == FormatKind::ComponentAddress {
            for (field, synonyms) in &mut entries {
                if *field == SourceField::Code {
                    synonyms.insert(0, "master code".to_string());
                }
            }
        }

        Self { entries }
    }

    /// Default table with configured replacements applied
    pub fn configured(kind: FormatKind, config: &MappingConfig) -> Self {
        let mut table = Self::for_format(kind);
        for (field, synonyms) in config.overrides_for(kind) {
            table.replace(field, synonyms);
        }
        table
    }

    /// Replace one field's synonyms, adding the field when absent
    pub fn replace(&mut self, field: SourceField, synonyms: Vec<String>) {
        let synonyms = synonyms.into_iter().map(|s| s.to_lowercase()).collect();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = synonyms,
            None => self.entries.push((field, synonyms)),
        }
    }

    pub fn synonyms(&self, field: SourceField) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, s)| s.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = SourceField> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    pub fn entries(&self) -> &[(SourceField, Vec<String>)] {
        &self.entries
    }
}
