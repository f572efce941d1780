//! Shared sheet fixtures for layout detection and mapping tests

use crate::app::models::{MergedRange, RawSheet};


/// Standard listing with a title banner and a disclaimer row
pub fn standard_sheet() -> RawSheet {
    RawSheet::from_rows(
        "GP Clinics",
        vec![
            vec!["Panel Clinic Listing as of 1 Jan"],
            vec![""],
            vec![
                "S/N",
                "Region",
                "Area",
                "Clinic ID",
                "Clinic Name",
                "Address",
                "Tel No.",
                "Remarks",
                "Mon - Fri (AM)",
                "Mon - Fri (PM)",
                "Mon - Fri (Night)",
                "Sat (AM)",
                "Sat (PM)",
                "Sun",
                "Public Holiday",
            ],
            vec![
                "1",
                "North",
                "Woodlands",
                "gp-001",
                "Woodlands Family Clinic",
                "Blk 888 Woodlands Drive 50 #01-12 Singapore 730888",
                "6363 1234",
                "Closed on alternate Sundays",
                "8.30am - 12.30pm",
                "2.00pm - 5.00pm",
                "",
                "8.30am - 12.30pm",
                "",
                "",
                "",
            ],
            vec![
                "2",
                "",
                "Bedok",
                "GP002",
                "Bedok Medical Centre",
                "10 Bedok North Ave 1 Singapore 469662",
                "6444 5678",
                "",
                "9am - 1pm",
                "2pm - 6pm",
                "7pm - 9pm",
                "",
                "",
                "9am - 12pm",
                "CLOSED",
            ],
        ],
    )
}

/// Two-level header: day groups merged over AM/PM/NIGHT sub-columns
pub fn merged_multi_level_sheet() -> RawSheet {
    let header: Vec<&str> = vec![
        "ZONE",
        "ESTATE",
        "CLINIC CODE",
        "CLINIC NAME",
        "ADDRESS",
        "POSTAL CODE",
        "TEL",
        "MON - FRI",
        "",
        "",
        "SAT",
        "",
        "",
        "SUN",
        "",
        "",
        "PUBLIC HOLIDAY",
        "",
        "",
    ];
    let sub: Vec<&str> = vec![
        "", "", "", "", "", "", "", "AM", "PM", "NIGHT", "AM", "PM", "NIGHT", "AM", "PM",
        "NIGHT", "AM", "PM", "NIGHT",
    ];
    let data: Vec<&str> = vec![
        "EAST",
        "TAMPINES",
        "TP01",
        "Tampines Clinic",
        "201 Tampines St 21 #01-1145",
        "520201",
        "6781 2345",
        "8AM-12PM",
        "2PM-5PM",
        "6PM-9PM",
        "8AM-12PM",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
    ];

    RawSheet::from_rows("Panel SG", vec![header, sub, data]).with_merged(vec![
        MergedRange::new(0, 7, 0, 9),
        MergedRange::new(0, 10, 0, 12),
        MergedRange::new(0, 13, 0, 15),
        MergedRange::new(0, 16, 0, 18),
        MergedRange::new(0, 0, 1, 0),
    ])
}

/// Address split into block/road/unit/building columns
pub fn component_address_sheet() -> RawSheet {
    RawSheet::from_rows(
        "SP Clinic",
        vec![
            vec![
                "Master Code",
                "Clinic Name",
                "Physician",
                "Blk",
                "Road Name",
                "Unit No.",
                "Building Name",
                "Postal Code",
                "Tel",
                "Mon - Fri",
                "Sat",
                "Sun",
                "Public Holiday",
            ],
            vec![
                "sp 100",
                "Heart Specialists",
                "Dr Tan",
                "38",
                "Irrawaddy Road",
                "08-22",
                "Mount Elizabeth Novena",
                "329563",
                "6235 1111",
                "9.00am - 1.00pm, 2.00pm - 5.30pm",
                "9.00am to 12.30pm",
                "Closed",
                "Closed",
            ],
        ],
    )
}

/// Address spread over numbered lines with a specialty column
pub fn multi_part_address_sheet() -> RawSheet {
    RawSheet::from_rows(
        "Specialist",
        vec![
            vec![
                "Code",
                "Clinic Name",
                "Specialty",
                "Doctor",
                "Address1",
                "Address2",
                "Address3",
                "Address4",
                "Tel",
                "Operating Hours Mon-Fri",
            ],
            vec![
                "MP9",
                "KL Eye Centre",
                "Ophthalmology",
                "Dr Lim",
                "Level 3",
                "Jalan Ampang",
                "50450",
                "Kuala Lumpur",
                "+60 3 1234 5678",
                "9am-5pm",
            ],
        ],
    )
}
