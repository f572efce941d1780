//! Records to DataFrame conversion

use crate::Result;
use crate::app::models::NormalizedRecord;
use crate::constants::OUTPUT_COLUMNS;
use polars::prelude::*;

fn text_column(name: &str, records: &[NormalizedRecord], get: impl Fn(&NormalizedRecord) -> &str) -> Column {
    let values: Vec<&str> = records.iter().map(get).collect();
    Column::new(name.into(), values)
}

/// Build a frame with the canonical column order
///
/// Latitude and Longitude are nullable floats; everything else is text.
pub fn records_to_dataframe(records: &[NormalizedRecord]) -> Result<DataFrame> {
    let latitude: Vec<Option<f64>> = records.iter().map(|r| r.latitude).collect();
    let longitude: Vec<Option<f64>> = records.iter().map(|r| r.longitude).collect();

    let columns = vec![
        text_column(OUTPUT_COLUMNS[0], records, |r| r.code.as_str()),
        text_column(OUTPUT_COLUMNS[1], records, |r| r.name.as_str()),
        text_column(OUTPUT_COLUMNS[2], records, |r| r.zone.as_str()),
        text_column(OUTPUT_COLUMNS[3], records, |r| r.area.as_str()),
        text_column(OUTPUT_COLUMNS[4], records, |r| r.specialty.as_str()),
        text_column(OUTPUT_COLUMNS[5], records, |r| r.doctor.as_str()),
        text_column(OUTPUT_COLUMNS[6], records, |r| r.address1.as_str()),
        text_column(OUTPUT_COLUMNS[7], records, |r| r.address2.as_str()),
        text_column(OUTPUT_COLUMNS[8], records, |r| r.address3.as_str()),
        text_column(OUTPUT_COLUMNS[9], records, |r| r.postal_code.as_str()),
        text_column(OUTPUT_COLUMNS[10], records, |r| r.country.as_str()),
        text_column(OUTPUT_COLUMNS[11], records, |r| r.phone_number.as_str()),
        text_column(OUTPUT_COLUMNS[12], records, |r| r.mon_to_fri.as_str()),
        text_column(OUTPUT_COLUMNS[13], records, |r| r.saturday.as_str()),
        text_column(OUTPUT_COLUMNS[14], records, |r| r.sunday.as_str()),
        text_column(OUTPUT_COLUMNS[15], records, |r| r.public_holiday.as_str()),
        Column::new(OUTPUT_COLUMNS[16].into(), latitude),
        Column::new(OUTPUT_COLUMNS[17].into(), longitude),
        text_column(OUTPUT_COLUMNS[18], records, |r| r.google_map_url.as_str()),
    ];

    Ok(DataFrame::new(columns)?)
}
