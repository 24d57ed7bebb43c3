use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::{
    DateOverride, DayPrice, MinimumStayRule, PriceSource, PropertyPricingConfig,
    SeasonalPricingRule,
};

/// Round to whole cents; keeps multiplier math from leaking float dust into
/// stored documents and diff comparisons.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the resolved price, availability and minimum stay for one day.
///
/// Pure and infallible: every input combination produces a `DayPrice`.
/// Precedence, first match wins:
///   1. date override (absolute price)
///   2. first *enabled* seasonal rule containing the date, in the order the
///      caller supplies them; the store layer orders rules by creation
///      time, so the overlapping-season tie-break is stable across runs
///   3. weekend adjustment, when enabled and the weekday is in the
///      configured weekend set
///   4. base price
pub fn compute_day_price(
    config: &PropertyPricingConfig,
    date: NaiveDate,
    seasons: &[SeasonalPricingRule],
    overrides: &[DateOverride],
    min_stay_rules: &[MinimumStayRule],
) -> DayPrice {
    let base_price = config.base_price;

    let mut adjusted_price = base_price;
    let mut available = true;
    let mut minimum_stay: Option<u32> = None;
    let mut price_source = PriceSource::Base;
    let mut season_id = None;
    let mut season_name = None;
    let mut override_id = None;
    let mut reason = None;
    let mut flat_rate = false;

    if let Some(ovr) = overrides.iter().find(|o| o.date == date) {
        adjusted_price = ovr.custom_price;
        available = ovr.available;
        minimum_stay = ovr.minimum_stay;
        flat_rate = ovr.flat_rate;
        override_id = Some(ovr.id.clone());
        reason = ovr.reason.clone();
        price_source = PriceSource::Override;
    } else if let Some(season) = seasons.iter().find(|s| s.enabled && s.contains(date)) {
        adjusted_price = base_price * season.price_multiplier;
        minimum_stay = season.minimum_stay;
        season_id = Some(season.id.clone());
        season_name = Some(season.name.clone());
        price_source = PriceSource::Season;
    } else if config.weekend_pricing_enabled && config.weekend_days.contains(&date.weekday()) {
        adjusted_price = base_price * config.weekend_adjustment;
        price_source = PriceSource::Weekend;
    }

    let minimum_stay = minimum_stay.unwrap_or_else(|| rule_minimum_stay(min_stay_rules, date));
    let adjusted_price = round_price(adjusted_price);

    DayPrice {
        base_price,
        adjusted_price,
        prices: guest_price_table(config, adjusted_price, flat_rate),
        available,
        minimum_stay,
        is_weekend: matches!(date.weekday(), Weekday::Fri | Weekday::Sat | Weekday::Sun),
        season_id,
        season_name,
        override_id,
        reason,
        price_source,
    }
}

/// Minimum stay from standalone rules, used only when neither an override
/// nor a season sets one. Among overlapping enabled rules the narrowest
/// range wins.
fn rule_minimum_stay(rules: &[MinimumStayRule], date: NaiveDate) -> u32 {
    rules
        .iter()
        .filter(|r| r.enabled && r.contains(date))
        .min_by_key(|r| r.span_days())
        .map(|r| r.minimum_nights)
        .unwrap_or(1)
}

fn guest_price_table(
    config: &PropertyPricingConfig,
    adjusted_price: f64,
    flat_rate: bool,
) -> BTreeMap<u32, f64> {
    let mut prices = BTreeMap::new();
    for guests in config.base_occupancy..=config.max_guests {
        let price = if flat_rate {
            adjusted_price
        } else {
            let extra = guests.saturating_sub(config.base_occupancy) as f64;
            round_price(adjusted_price + extra * config.extra_guest_fee)
        };
        prices.insert(guests, price);
    }
    prices
}
