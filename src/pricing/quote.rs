use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{DayPrice, PropertyPricingConfig};
use crate::pricing::calculator::round_price;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    UnavailableDates,
    MinimumStay,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub nights: u32,
    pub guests: u32,
    pub nightly_rates: Vec<NightlyRate>,
    pub subtotal: f64,
    pub cleaning_fee: f64,
    pub length_of_stay_discount: f64,
    pub total: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
    Available(QuoteBreakdown),
    Unavailable {
        reason: UnavailableReason,
        minimum_stay: Option<u32>,
    },
}

/// Wire shape of the quote contract: `available` plus either a flattened
/// breakdown or a reason code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailableReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stay: Option<u32>,
    #[serde(flatten)]
    pub breakdown: Option<QuoteBreakdown>,
}

impl QuoteOutcome {
    pub fn into_response(self) -> QuoteResponse {
        match self {
            QuoteOutcome::Available(breakdown) => QuoteResponse {
                available: true,
                reason: None,
                minimum_stay: None,
                breakdown: Some(breakdown),
            },
            QuoteOutcome::Unavailable {
                reason,
                minimum_stay,
            } => QuoteResponse {
                available: false,
                reason: Some(reason),
                minimum_stay,
                breakdown: None,
            },
        }
    }
}

/// Price a stay of `[check_in, check_out)` for `guests` against resolved
/// days. `resolved_days` must cover every night in the range; a missing
/// night is treated as unavailable rather than guessed at.
pub fn compute_quote(
    config: &PropertyPricingConfig,
    resolved_days: &BTreeMap<NaiveDate, DayPrice>,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: u32,
) -> QuoteOutcome {
    let nights = (check_out - check_in).num_days();
    if nights <= 0 {
        return QuoteOutcome::Unavailable {
            reason: UnavailableReason::UnavailableDates,
            minimum_stay: None,
        };
    }
    let nights = nights as u32;

    let mut nightly_rates = Vec::with_capacity(nights as usize);
    let mut required_minimum = 1u32;
    let mut date = check_in;
    while date < check_out {
        let day = match resolved_days.get(&date) {
            Some(d) if d.available => d,
            _ => {
                return QuoteOutcome::Unavailable {
                    reason: UnavailableReason::UnavailableDates,
                    minimum_stay: None,
                }
            }
        };
        required_minimum = required_minimum.max(day.minimum_stay);
        nightly_rates.push(NightlyRate {
            date,
            price: nightly_price(config, day, guests),
        });
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    if nights < required_minimum {
        return QuoteOutcome::Unavailable {
            reason: UnavailableReason::MinimumStay,
            minimum_stay: Some(required_minimum),
        };
    }

    let subtotal = round_price(nightly_rates.iter().map(|n| n.price).sum());
    let discount = length_of_stay_discount(config, nights, subtotal);
    let total = round_price(subtotal - discount + config.cleaning_fee);

    QuoteOutcome::Available(QuoteBreakdown {
        nights,
        guests,
        nightly_rates,
        subtotal,
        cleaning_fee: config.cleaning_fee,
        length_of_stay_discount: discount,
        total,
        currency: config.currency.clone(),
    })
}

/// Tier lookup clamps the guest count into the table's range so a request
/// below base occupancy prices at base occupancy and one above max guests
/// prices at max guests.
fn nightly_price(config: &PropertyPricingConfig, day: &DayPrice, guests: u32) -> f64 {
    let tier = guests.clamp(config.base_occupancy, config.max_guests);
    day.prices
        .get(&tier)
        .copied()
        .unwrap_or(day.adjusted_price)
}

fn length_of_stay_discount(config: &PropertyPricingConfig, nights: u32, subtotal: f64) -> f64 {
    let percent = config
        .los_discounts
        .iter()
        .filter(|t| nights >= t.min_nights)
        .map(|t| t.percent)
        .fold(0.0, f64::max);
    round_price(subtotal * percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use crate::models::{DateOverride, LosDiscountTier, MinimumStayRule};
    use crate::pricing::availability::resolve_availability;
    use crate::pricing::calculator::compute_day_price;

    fn config() -> PropertyPricingConfig {
        PropertyPricingConfig {
            base_price: 100.0,
            extra_guest_fee: 20.0,
            cleaning_fee: 50.0,
            ..PropertyPricingConfig::default()
        }
    }

    fn resolve_range(
        config: &PropertyPricingConfig,
        overrides: &[DateOverride],
        min_stay_rules: &[MinimumStayRule],
        booked: &HashSet<NaiveDate>,
        from: &str,
        to: &str,
    ) -> BTreeMap<NaiveDate, DayPrice> {
        let mut days = BTreeMap::new();
        let mut date: NaiveDate = from.parse().unwrap();
        let end: NaiveDate = to.parse().unwrap();
        while date < end {
            let priced = compute_day_price(config, date, &[], overrides, min_stay_rules);
            days.insert(date, resolve_availability(priced, date, booked));
            date = date.succ_opt().unwrap();
        }
        days
    }

    #[test]
    fn quote_totals_add_up() {
        let config = config();
        let days = resolve_range(&config, &[], &[], &HashSet::new(), "2026-07-06", "2026-07-09");
        // Mon-Wed, no weekend pricing: 3 nights at 100 for 2 guests.
        let quote = compute_quote(
            &config,
            &days,
            "2026-07-06".parse().unwrap(),
            "2026-07-09".parse().unwrap(),
            2,
        );
        match quote {
            QuoteOutcome::Available(breakdown) => {
                assert_eq!(breakdown.nights, 3);
                assert_eq!(breakdown.subtotal, 300.0);
                assert_eq!(breakdown.cleaning_fee, 50.0);
                assert_eq!(breakdown.total, 350.0);
                assert_eq!(breakdown.nightly_rates.len(), 3);
            }
            other => panic!("expected available quote, got {other:?}"),
        }
    }

    #[test]
    fn extra_guests_raise_nightly_rates() {
        let config = config();
        let days = resolve_range(&config, &[], &[], &HashSet::new(), "2026-07-06", "2026-07-08");
        let quote = compute_quote(
            &config,
            &days,
            "2026-07-06".parse().unwrap(),
            "2026-07-08".parse().unwrap(),
            4,
        );
        match quote {
            QuoteOutcome::Available(breakdown) => {
                assert_eq!(breakdown.subtotal, 280.0); // 2 nights at 140
            }
            other => panic!("expected available quote, got {other:?}"),
        }
    }

    #[test]
    fn booked_night_in_range_is_unavailable_dates() {
        let config = config();
        let booked: HashSet<NaiveDate> = ["2026-07-07".parse().unwrap()].into_iter().collect();
        let days = resolve_range(&config, &[], &[], &booked, "2026-07-06", "2026-07-09");
        let quote = compute_quote(
            &config,
            &days,
            "2026-07-06".parse().unwrap(),
            "2026-07-09".parse().unwrap(),
            2,
        );
        assert_eq!(
            quote,
            QuoteOutcome::Unavailable {
                reason: UnavailableReason::UnavailableDates,
                minimum_stay: None,
            }
        );
    }

    #[test]
    fn minimum_stay_boundary_is_inclusive() {
        let config = config();
        let rules = vec![MinimumStayRule {
            id: "m1".to_string(),
            start_date: "2026-07-01".parse().unwrap(),
            end_date: "2026-07-31".parse().unwrap(),
            minimum_nights: 4,
            enabled: true,
        }];
        let days = resolve_range(&config, &[], &rules, &HashSet::new(), "2026-07-06", "2026-07-10");
        // Exactly 4 nights against a 4-night minimum: allowed.
        let quote = compute_quote(
            &config,
            &days,
            "2026-07-06".parse().unwrap(),
            "2026-07-10".parse().unwrap(),
            2,
        );
        assert!(matches!(quote, QuoteOutcome::Available(_)));
    }

    #[test]
    fn too_short_stay_reports_required_minimum() {
        let config = config();
        let rules = vec![MinimumStayRule {
            id: "m1".to_string(),
            start_date: "2026-07-01".parse().unwrap(),
            end_date: "2026-07-31".parse().unwrap(),
            minimum_nights: 5,
            enabled: true,
        }];
        let days = resolve_range(&config, &[], &rules, &HashSet::new(), "2026-07-06", "2026-07-10");
        let quote = compute_quote(
            &config,
            &days,
            "2026-07-06".parse().unwrap(),
            "2026-07-10".parse().unwrap(),
            2,
        );
        assert_eq!(
            quote,
            QuoteOutcome::Unavailable {
                reason: UnavailableReason::MinimumStay,
                minimum_stay: Some(5),
            }
        );
    }

    #[test]
    fn length_of_stay_discount_applies() {
        let mut config = config();
        config.los_discounts = vec![LosDiscountTier { min_nights: 7, percent: 10.0 }];
        let days = resolve_range(&config, &[], &[], &HashSet::new(), "2026-07-06", "2026-07-13");
        let quote = compute_quote(
            &config,
            &days,
            "2026-07-06".parse().unwrap(),
            "2026-07-13".parse().unwrap(),
            2,
        );
        match quote {
            QuoteOutcome::Available(breakdown) => {
                assert_eq!(breakdown.subtotal, 700.0);
                assert_eq!(breakdown.length_of_stay_discount, 70.0);
                assert_eq!(breakdown.total, 680.0);
            }
            other => panic!("expected available quote, got {other:?}"),
        }
    }

    #[test]
    fn guest_count_above_table_clamps_to_max() {
        let config = config();
        let days = resolve_range(&config, &[], &[], &HashSet::new(), "2026-07-06", "2026-07-07");
        let quote = compute_quote(
            &config,
            &days,
            "2026-07-06".parse().unwrap(),
            "2026-07-07".parse().unwrap(),
            10,
        );
        match quote {
            QuoteOutcome::Available(breakdown) => {
                // max_guests = 6 tier: 100 + 4 * 20
                assert_eq!(breakdown.subtotal, 180.0);
            }
            other => panic!("expected available quote, got {other:?}"),
        }
    }
}
