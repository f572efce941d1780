//! Data models for clinic panel processing
//!
//! This module contains the core data structures: the raw cell matrix read
//! from a workbook, the closed set of source fields a layout can carry, and
//! the canonical normalized record written to output.

use crate::constants::{COUNTRY_MALAYSIA, COUNTRY_SINGAPORE, MAP_URL_BASE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Raw Sheet
// =============================================================================

/// Inclusive rectangle of merged cells, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRange {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl MergedRange {
    pub fn new(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// True when the range spans more than one column
    pub fn is_multi_column(&self) -> bool {
        self.end_col > self.start_col
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.start_row..=self.end_row).contains(&row)
            && (self.start_col..=self.end_col).contains(&col)
    }
}

/// Cell matrix of one sheet, every cell rendered as trimmed text
///
/// Rows may be ragged; missing trailing cells read as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
    pub merged: Vec<MergedRange>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
            merged: Vec::new(),
        }
    }

    /// Attach merged ranges to the sheet
    pub fn with_merged(mut self, merged: Vec<MergedRange>) -> Self {
        self.merged = merged;
        self
    }

    /// Build a sheet from string slices, mostly for fixtures
    pub fn from_rows<R, C>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.as_ref().trim().to_string()).collect())
            .collect();
        Self::new(name, rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row(&self, row: usize) -> &[String] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// How a row below the header is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Blank,
    /// Banner, section title or disclaimer: a single distinct value
    Metadata,
    Data,
}

impl RowKind {
    pub fn classify(row: &[String]) -> Self {
        let mut distinct: Vec<&str> = row
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        distinct.sort_unstable();
        distinct.dedup();

        match distinct.len() {
            0 => RowKind::Blank,
            1 => RowKind::Metadata,
            _ => RowKind::Data,
        }
    }
}

// =============================================================================
// Layout Kinds and Source Fields
// =============================================================================

/// Known spreadsheet layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatKind {
    /// Flat table with a single address column
    Standard,
    /// Address split into block, unit, road and building columns
    ComponentAddress,
    /// Address spread over numbered address lines
    MultiPartAddress,
    /// Merged two-level header with AM/PM/NIGHT sub-columns
    MergedMultiLevel,
    Unknown,
}

impl FormatKind {
    /// Configuration key for this layout
    pub fn key(self) -> &'static str {
        match self {
            FormatKind::Standard => "standard",
            FormatKind::ComponentAddress => "component_address",
            FormatKind::MultiPartAddress => "multi_part_address",
            FormatKind::MergedMultiLevel => "merged_multi_level",
            FormatKind::Unknown => "unknown",
        }
    }

    /// Layouts whose hours columns hold free text rather than slot values
    pub fn uses_free_text_hours(self) -> bool {
        matches!(
            self,
            FormatKind::ComponentAddress | FormatKind::MultiPartAddress
        )
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatKind::Standard => "Standard",
            FormatKind::ComponentAddress => "ComponentAddress",
            FormatKind::MultiPartAddress => "MultiPartAddress",
            FormatKind::MergedMultiLevel => "MergedMultiLevel",
            FormatKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

impl FromStr for FormatKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(FormatKind::Standard),
            "component_address" => Ok(FormatKind::ComponentAddress),
            "multi_part_address" => Ok(FormatKind::MultiPartAddress),
            "merged_multi_level" => Ok(FormatKind::MergedMultiLevel),
            _ => Err(Error::configuration(format!("Unknown format kind '{}'", s))),
        }
    }
}

/// Day groups carried by the hours columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayGroup {
    Weekday,
    Saturday,
    Sunday,
    PublicHoliday,
}

impl DayGroup {
    pub const ALL: [DayGroup; 4] = [
        DayGroup::Weekday,
        DayGroup::Saturday,
        DayGroup::Sunday,
        DayGroup::PublicHoliday,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DayGroup::Weekday => "mon_fri",
            DayGroup::Saturday => "sat",
            DayGroup::Sunday => "sun",
            DayGroup::PublicHoliday => "holiday",
        }
    }
}

/// Sub-columns of a day group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HourSlot {
    Am,
    Pm,
    Night,
}

impl HourSlot {
    pub const ALL: [HourSlot; 3] = [HourSlot::Am, HourSlot::Pm, HourSlot::Night];

    pub fn key(self) -> &'static str {
        match self {
            HourSlot::Am => "am",
            HourSlot::Pm => "pm",
            HourSlot::Night => "night",
        }
    }
}

/// Closed set of raw inputs a layout may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceField {
    Code,
    Name,
    Zone,
    Area,
    Specialty,
    Doctor,
    Address,
    Address1,
    Address2,
    Address3,
    Address4,
    AddressBlock,
    AddressUnit,
    AddressRoad,
    AddressBuilding,
    PostalCode,
    Telephone,
    Remarks,
    /// One AM/PM/NIGHT cell of a day group
    Slot(DayGroup, HourSlot),
    /// A single hours column for a day group
    Hours(DayGroup),
}

impl SourceField {
    /// Every source field, in mapping priority order
    pub fn all() -> Vec<SourceField> {
        let mut fields = vec![
            SourceField::Code,
            SourceField::Name,
            SourceField::Zone,
            SourceField::Area,
            SourceField::Specialty,
            SourceField::Doctor,
            SourceField::Address,
            SourceField::Address1,
            SourceField::Address2,
            SourceField::Address3,
            SourceField::Address4,
            SourceField::AddressBlock,
            SourceField::AddressUnit,
            SourceField::AddressRoad,
            SourceField::AddressBuilding,
            SourceField::PostalCode,
            SourceField::Telephone,
            SourceField::Remarks,
        ];
        for group in DayGroup::ALL {
            for slot in HourSlot::ALL {
                fields.push(SourceField::Slot(group, slot));
            }
        }
        fields.extend(DayGroup::ALL.map(SourceField::Hours));
        fields
    }

    /// Configuration key, e.g. `postal_code`, `sat_pm`, `mon_fri_hours`
    pub fn key(self) -> String {
        match self {
            SourceField::Code => "code".into(),
            SourceField::Name => "name".into(),
            SourceField::Zone => "zone".into(),
            SourceField::Area => "area".into(),
            SourceField::Specialty => "specialty".into(),
            SourceField::Doctor => "doctor".into(),
            SourceField::Address => "address".into(),
            SourceField::Address1 => "address1".into(),
            SourceField::Address2 => "address2".into(),
            SourceField::Address3 => "address3".into(),
            SourceField::Address4 => "address4".into(),
            SourceField::AddressBlock => "address_block".into(),
            SourceField::AddressUnit => "address_unit".into(),
            SourceField::AddressRoad => "address_road".into(),
            SourceField::AddressBuilding => "address_building".into(),
            SourceField::PostalCode => "postal_code".into(),
            SourceField::Telephone => "telephone".into(),
            SourceField::Remarks => "remarks".into(),
            SourceField::Slot(group, slot) => format!("{}_{}", group.key(), slot.key()),
            SourceField::Hours(group) => format!("{}_hours", group.key()),
        }
    }
}

impl fmt::Display for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for SourceField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        SourceField::all()
            .into_iter()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| Error::configuration(format!("Unknown source field '{}'", s)))
    }
}

// =============================================================================
// Geocoding Values
// =============================================================================

/// WGS84 coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Map link for these coordinates
    pub fn map_url(&self) -> String {
        format!("{}{},{}", MAP_URL_BASE, self.latitude, self.longitude)
    }
}

/// Where a record's coordinates came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeocodeSource {
    PostalLookup,
    Api,
    None,
}

/// Outcome of resolving one record's location
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub coordinates: Option<Coordinates>,
    pub map_url: String,
    pub source: GeocodeSource,
}

impl GeocodeResult {
    pub fn postal_lookup(coordinates: Coordinates) -> Self {
        Self::found(coordinates, GeocodeSource::PostalLookup)
    }

    pub fn api(coordinates: Coordinates) -> Self {
        Self::found(coordinates, GeocodeSource::Api)
    }

    pub fn none() -> Self {
        Self {
            coordinates: None,
            map_url: String::new(),
            source: GeocodeSource::None,
        }
    }

    fn found(coordinates: Coordinates, source: GeocodeSource) -> Self {
        Self {
            map_url: coordinates.map_url(),
            coordinates: Some(coordinates),
            source,
        }
    }

    pub fn is_success(&self) -> bool {
        self.coordinates.is_some()
    }
}

// =============================================================================
// Normalized Record
// =============================================================================

/// Country a clinic is located in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Country {
    #[default]
    Singapore,
    Malaysia,
}

impl Country {
    pub fn as_str(self) -> &'static str {
        match self {
            Country::Singapore => COUNTRY_SINGAPORE,
            Country::Malaysia => COUNTRY_MALAYSIA,
        }
    }

    /// Suffix used for per-country output files
    pub fn partition_suffix(self) -> &'static str {
        match self {
            Country::Singapore => "sg",
            Country::Malaysia => "my",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical output row
///
/// PostalCode is either empty or exactly six ASCII digits; Code is uppercase
/// alphanumeric. Latitude/Longitude are `None` when geocoding failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub code: String,
    pub name: String,
    pub zone: String,
    pub area: String,
    pub specialty: String,
    pub doctor: String,
    pub address1: String,
    pub address2: String,
    pub address3: String,
    pub postal_code: String,
    pub country: Country,
    pub phone_number: String,
    pub mon_to_fri: String,
    pub saturday: String,
    pub sunday: String,
    pub public_holiday: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub google_map_url: String,
}

impl NormalizedRecord {
    /// Full address as a single line for geocoding queries
    pub fn full_address(&self) -> String {
        [&self.address1, &self.address2, &self.address3]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Copy a geocoding outcome into the record
    pub fn apply_geocode(&mut self, result: &GeocodeResult) {
        self.latitude = result.coordinates.map(|c| c.latitude);
        self.longitude = result.coordinates.map(|c| c.longitude);
        self.google_map_url = result.map_url.clone();
    }
}
