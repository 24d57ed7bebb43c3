use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_BASE_PRICE: f64 = 100.0;
pub const DEFAULT_BASE_OCCUPANCY: u32 = 2;
pub const DEFAULT_MAX_GUESTS: u32 = 6;

/// Length-of-stay discount tier: `percent` off the nightly subtotal once a
/// stay reaches `min_nights`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LosDiscountTier {
    pub min_nights: u32,
    pub percent: f64,
}

/// Raw property row as stored. Pricing fields are nullable because older
/// records predate parts of the pricing config; `normalize` turns every row
/// into a strict config with safe defaults.
#[derive(Debug, FromRow)]
pub struct PropertyRow {
    pub id: String,
    pub name: String,
    pub base_price: Option<f64>,
    pub currency: Option<String>,
    pub base_occupancy: Option<i64>,
    pub extra_guest_fee: Option<f64>,
    pub max_guests: Option<i64>,
    pub weekend_adjustment: Option<f64>,
    pub weekend_pricing_enabled: Option<bool>,
    pub weekend_days: Option<String>,
    pub cleaning_fee: Option<f64>,
    pub los_discounts: Option<String>,
}

/// Strict pricing config consumed by the calculator. Built once per request
/// at the storage boundary; the pricing core never sees a partial record.
#[derive(Debug, Clone)]
pub struct PropertyPricingConfig {
    pub base_price: f64,
    pub currency: String,
    pub base_occupancy: u32,
    pub extra_guest_fee: f64,
    pub max_guests: u32,
    pub weekend_adjustment: f64,
    pub weekend_pricing_enabled: bool,
    pub weekend_days: Vec<Weekday>,
    pub cleaning_fee: f64,
    pub los_discounts: Vec<LosDiscountTier>,
}

impl PropertyRow {
    pub fn normalize(self) -> PropertyPricingConfig {
        let base_price = match self.base_price {
            Some(p) if p > 0.0 => p,
            _ => DEFAULT_BASE_PRICE,
        };
        let base_occupancy = match self.base_occupancy {
            Some(n) if n > 0 => n as u32,
            _ => DEFAULT_BASE_OCCUPANCY,
        };
        let max_guests = match self.max_guests {
            Some(n) if n as u32 >= base_occupancy => n as u32,
            _ => DEFAULT_MAX_GUESTS.max(base_occupancy),
        };

        let weekend_days = parse_weekend_days(self.weekend_days.as_deref());
        let mut los_discounts: Vec<LosDiscountTier> = self
            .los_discounts
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        los_discounts.retain(|t| t.min_nights > 0 && t.percent > 0.0);
        los_discounts.sort_by_key(|t| t.min_nights);

        PropertyPricingConfig {
            base_price,
            currency: self.currency.unwrap_or_else(|| "EUR".to_string()),
            base_occupancy,
            extra_guest_fee: self.extra_guest_fee.unwrap_or(0.0).max(0.0),
            max_guests,
            weekend_adjustment: match self.weekend_adjustment {
                Some(m) if m > 0.0 => m,
                _ => 1.0,
            },
            weekend_pricing_enabled: self.weekend_pricing_enabled.unwrap_or(false),
            weekend_days,
            cleaning_fee: self.cleaning_fee.unwrap_or(0.0).max(0.0),
            los_discounts,
        }
    }
}

fn parse_weekend_days(raw: Option<&str>) -> Vec<Weekday> {
    let names: Vec<String> = raw
        .and_then(|r| serde_json::from_str(r).ok())
        .unwrap_or_default();
    let mut days: Vec<Weekday> = names
        .iter()
        .filter_map(|n| Weekday::from_str(n).ok())
        .collect();
    days.dedup();
    if days.is_empty() {
        days = vec![Weekday::Fri, Weekday::Sat];
    }
    days
}

impl Default for PropertyPricingConfig {
    fn default() -> Self {
        PropertyPricingConfig {
            base_price: DEFAULT_BASE_PRICE,
            currency: "EUR".to_string(),
            base_occupancy: DEFAULT_BASE_OCCUPANCY,
            extra_guest_fee: 0.0,
            max_guests: DEFAULT_MAX_GUESTS,
            weekend_adjustment: 1.0,
            weekend_pricing_enabled: false,
            weekend_days: vec![Weekday::Fri, Weekday::Sat],
            cleaning_fee: 0.0,
            los_discounts: Vec::new(),
        }
    }
}
