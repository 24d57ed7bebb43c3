use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which precedence tier determined a day's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Override,
    Season,
    Weekend,
    Base,
}

/// Resolved pricing and availability for one calendar day. Recomputed on
/// every call; only persisted as part of a `MonthCalendar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPrice {
    pub base_price: f64,
    pub adjusted_price: f64,
    /// Nightly price per guest count, from base occupancy to max guests.
    pub prices: BTreeMap<u32, f64>,
    pub available: bool,
    pub minimum_stay: u32,
    /// Display flag for Fri/Sat/Sun, independent of the configured
    /// weekend-pricing day set.
    pub is_weekend: bool,
    pub season_id: Option<String>,
    pub season_name: Option<String>,
    pub override_id: Option<String>,
    pub reason: Option<String>,
    pub price_source: PriceSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub unavailable_days: u32,
    pub modified_days: u32,
    pub has_custom_prices: bool,
    pub has_seasonal_rates: bool,
}

/// The persisted per-property-month artifact the UI and quote APIs read.
/// Regenerated wholesale; a targeted day patch is only an optimization on
/// top of full regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCalendar {
    pub id: String,
    pub property_id: String,
    pub year: i32,
    pub month: u32,
    pub month_str: String,
    pub days: BTreeMap<u32, DayPrice>,
    pub summary: MonthSummary,
    pub generated_at: String,
}

impl MonthCalendar {
    pub fn document_id(property_id: &str, year: i32, month: u32) -> String {
        format!("{property_id}_{year}-{month:02}")
    }
}
