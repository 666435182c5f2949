//! Category labels the transformation matches on. These strings are part of
//! the input contract and must match the workbook labels exactly.

pub const BALANCING_FLOWS: &str = "Balancing flows";
pub const EXPORTS: &str = "Exports";
pub const IMPORTS: &str = "Imports";
pub const PRODUCTION: &str = "Production";

pub const WASTE: &str = "Waste";
pub const IN_USE_GOODS: &str = "In-use goods";
pub const GENERATED_SCRAP: &str = "Generated scrap";
pub const SCRAP_STEEL: &str = "Scrap steel";

pub const IRON_ORE: &str = "Iron ore";
pub const PIG_IRON: &str = "Pig iron";
pub const DRI: &str = "DRI";

/// Categories whose edges run against the matrix orientation. Each one is
/// swapped in its own pass, in this order.
pub const REVERSED_SOURCES: [&str; 3] = [WASTE, IN_USE_GOODS, GENERATED_SCRAP];

pub const REFERENCE_SOURCE: &str = "Reference flow start";
pub const REFERENCE_TARGET: &str = "Reference flow end";
pub const REFERENCE_TYPE: &str = "Reference";
pub const REFERENCE_VALUE: f64 = 30000.0;

/// `"Exports of steel"` style label for a generic endpoint.
pub fn qualified(endpoint: &str, category: &str) -> String {
    format!("{} of {}", endpoint, category.to_lowercase())
}
