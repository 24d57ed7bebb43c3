use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, Utc};

use crate::models::{
    DateOverride, DayPrice, MinimumStayRule, MonthCalendar, MonthSummary, PriceSource,
    PropertyPricingConfig, SeasonalPricingRule,
};
use crate::pricing::availability::resolve_availability;
use crate::pricing::calculator::{compute_day_price, round_price};

/// Number of days in a month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return 0,
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next {
        Some(n) => (n - first).num_days() as u32,
        None => 0,
    }
}

/// Materialize one property-month: every day priced and resolved, plus the
/// summary block. Idempotent apart from `generated_at`.
#[allow(clippy::too_many_arguments)]
pub fn generate_month(
    property_id: &str,
    year: i32,
    month: u32,
    config: &PropertyPricingConfig,
    seasons: &[SeasonalPricingRule],
    overrides: &[DateOverride],
    min_stay_rules: &[MinimumStayRule],
    booked_dates: &HashSet<NaiveDate>,
) -> MonthCalendar {
    let mut days = BTreeMap::new();
    for day in 1..=days_in_month(year, month) {
        let date = match NaiveDate::from_ymd_opt(year, month, day) {
            Some(d) => d,
            None => continue,
        };
        let priced = compute_day_price(config, date, seasons, overrides, min_stay_rules);
        days.insert(day, resolve_availability(priced, date, booked_dates));
    }

    let summary = summarize(&days, config.base_price);
    MonthCalendar {
        id: MonthCalendar::document_id(property_id, year, month),
        property_id: property_id.to_string(),
        year,
        month,
        month_str: format!("{year}-{month:02}"),
        days,
        summary,
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Summary statistics over a day map. Price stats cover available days
/// only; with zero available days all three collapse to the base price so
/// downstream sorting never sees NaN or zero.
pub fn summarize(days: &BTreeMap<u32, DayPrice>, base_price: f64) -> MonthSummary {
    let available: Vec<f64> = days
        .values()
        .filter(|d| d.available)
        .map(|d| d.adjusted_price)
        .collect();

    let (min_price, max_price, avg_price) = if available.is_empty() {
        (base_price, base_price, base_price)
    } else {
        let min = available.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = available.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg = available.iter().sum::<f64>() / available.len() as f64;
        (min, max, round_price(avg))
    };

    MonthSummary {
        min_price,
        max_price,
        avg_price,
        unavailable_days: days.values().filter(|d| !d.available).count() as u32,
        modified_days: days
            .values()
            .filter(|d| d.price_source != PriceSource::Base)
            .count() as u32,
        has_custom_prices: days
            .values()
            .any(|d| d.price_source == PriceSource::Override),
        has_seasonal_rates: days
            .values()
            .any(|d| d.price_source == PriceSource::Season),
    }
}
