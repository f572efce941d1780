//! Shared test utilities for field rule tests

use crate::app::services::field_rules::AddressParts;


/// Address parts carrying only components
pub fn component_parts<'a>(
    block: &'a str,
    unit: &'a str,
    road: &'a str,
    building: &'a str,
) -> AddressParts<'a> {
    AddressParts {
        block,
        unit,
        road,
        building,
        ..Default::default()
    }
}
