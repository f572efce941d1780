//! Application constants for clinic panel processor
//!
//! This module contains the canonical output schema, default limits,
//! and keyword tables used throughout the processor.

// =============================================================================
// Output Schema
// =============================================================================

/// Canonical output columns in their fixed order
pub const OUTPUT_COLUMNS: [&str; 19] = [
    "Code",
    "Name",
    "Zone",
    "Area",
    "Specialty",
    "Doctor",
    "Address1",
    "Address2",
    "Address3",
    "PostalCode",
    "Country",
    "PhoneNumber",
    "MonToFri",
    "Saturday",
    "Sunday",
    "PublicHoliday",
    "Latitude",
    "Longitude",
    "GoogleMapURL",
];

/// Placeholder for an hour slot with no value
pub const CLOSED: &str = "CLOSED";

/// Separator between slot values in a combined hours string
pub const HOURS_SEPARATOR: &str = "/";

/// Separator between telephone and remarks in PhoneNumber
pub const PHONE_REMARKS_SEPARATOR: &str = " - ";

/// Maximum number of time ranges kept from a free-text hours cell
pub const MAX_FREE_TEXT_RANGES: usize = 3;

/// Country labels written to the Country column
pub const COUNTRY_SINGAPORE: &str = "SINGAPORE";
pub const COUNTRY_MALAYSIA: &str = "MALAYSIA";

/// Supported input file extensions (lowercase, without dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods", "csv"];

// =============================================================================
// Geocoding
// =============================================================================

/// Base of the map link written to GoogleMapURL
pub const MAP_URL_BASE: &str = "https://maps.google.com/?q=";

/// Google Geocoding API endpoint
pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Per-request timeout for the external geocoder
pub const DEFAULT_GEOCODE_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// In-flight geocode requests per sheet
pub const DEFAULT_GEOCODE_CONCURRENCY: usize = 4;

/// Records geocoded between yields back to the runtime
pub const GEOCODE_YIELD_INTERVAL: usize = 256;

/// Default postal code index locations, tried in order after env overrides
pub const DEFAULT_POSTAL_INDEX_PATHS: &[&str] = &[
    "../data/postal_code_master.xlsx",
    "data/postal_code_master.xlsx",
    "postal_code_master.xlsx",
];

/// Postal code index files above this size are skipped
pub const DEFAULT_POSTAL_INDEX_MAX_FILE_SIZE_MB: u64 = 50;

/// Length of a Singapore postal code
pub const POSTAL_CODE_LENGTH: usize = 6;

// =============================================================================
// Environment Variables
// =============================================================================

pub mod env_vars {
    pub const GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
    pub const POSTAL_CODE_MASTER_FILE: &str = "POSTAL_CODE_MASTER_FILE";
    pub const POSTAL_CODE_FALLBACK_PATH: &str = "POSTAL_CODE_FALLBACK_PATH";
    pub const PROCESSED_FOLDER: &str = "PROCESSED_FOLDER";
    pub const PANEL_WORKERS: &str = "PANEL_WORKERS";
}

// =============================================================================
// Detection and Mapping Defaults
// =============================================================================

/// Rows scanned from the top of a sheet when looking for a header
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 10;

/// A header row must match strictly more distinct keywords than this
pub const DEFAULT_KEYWORD_THRESHOLD: usize = 2;

/// Levenshtein distance allowed when fuzzy matching header labels
pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;

/// Minimum synonym/header length ratio for containment matches
pub const DEFAULT_MIN_CONTAINMENT_RATIO: f64 = 0.4;

/// Synonyms shorter than this never take part in edit-distance matching
pub const MIN_EDIT_DISTANCE_SYNONYM_LEN: usize = 5;

/// Synonyms shorter than this never take part in containment matching
pub const MIN_CONTAINMENT_SYNONYM_LEN: usize = 3;

// =============================================================================
// Batch Limits
// =============================================================================

/// Upper bound for the auto-detected worker count
pub const MAX_DEFAULT_WORKERS: usize = 4;

/// Batches allowed to wait for admission beyond the running ones
pub const DEFAULT_QUEUE_CAPACITY: usize = 4;

/// Per-file size ceiling
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;

/// Per-batch file count ceiling
pub const DEFAULT_MAX_FILES_PER_BATCH: usize = 50;

/// Per-file processing timeout
pub const DEFAULT_FILE_TIMEOUT_SECS: u64 = 300;

/// Soft batch deadline; no new files or sheets start after it
pub const DEFAULT_BATCH_TIMEOUT_SECS: u64 = 1_800;

/// Grace period after the soft deadline before in-flight tasks are abandoned
pub const DEFAULT_BATCH_GRACE_SECS: u64 = 60;

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "./processed";

// =============================================================================
// Sheet Classification
// =============================================================================

/// Sheet name fragments marking a termination list
pub const TERMINATION_SHEET_KEYWORDS: &[&str] = &["terminat", "remov", "cancel", "delist"];

/// Sheet name fragments marking a panel listing
pub const PANEL_SHEET_KEYWORDS: &[&str] = &[
    "gp",
    "tcm",
    "dental",
    "clinic",
    "panel",
    "sp list",
    "sp clinic",
    "specialist",
    "sg",
    "my",
    "msia",
    "malaysia",
    "singapore",
    "blue",
    "red",
    "flexi",
    "aia",
    "medical",
    "health",
    "doctor",
];

/// Address fragments that place a clinic in Malaysia
pub const MALAYSIAN_INDICATORS: &[&str] = &[
    "malaysia",
    "johor",
    "johor bahru",
    "kuala lumpur",
    "selangor",
    "penang",
    "perak",
    "kedah",
    "kelantan",
    "terengganu",
    "pahang",
    "negeri sembilan",
    "melaka",
    "sabah",
    "sarawak",
    "perlis",
    "putrajaya",
    "labuan",
    "kl",
    "shah alam",
    "petaling jaya",
];

/// Characters removed from sheet names when building output file names
pub const FILENAME_FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
