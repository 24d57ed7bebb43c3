use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{BookingRow, DayPrice};

/// Expand bookings into the set of occupied calendar days. Check-out day is
/// not occupied. Rows with unparseable dates or non-blocking statuses are
/// skipped; a bad record is logged, never fatal.
pub fn expand_booked_dates(bookings: &[BookingRow]) -> HashSet<NaiveDate> {
    let mut booked = HashSet::new();
    for booking in bookings {
        if !booking.blocks_dates() {
            continue;
        }
        let (check_in, check_out) = match (
            booking.check_in.parse::<NaiveDate>(),
            booking.check_out.parse::<NaiveDate>(),
        ) {
            (Ok(ci), Ok(co)) if ci < co => (ci, co),
            _ => {
                log::warn!(
                    "skipping booking {} with invalid date range {:?}..{:?}",
                    booking.id,
                    booking.check_in,
                    booking.check_out
                );
                continue;
            }
        };
        let mut day = check_in;
        while day < check_out {
            booked.insert(day);
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }
    booked
}

/// Merge booking occupancy into a computed day. Booked days are always
/// unavailable, even against an override that says otherwise, and the
/// override reason is dropped for them; override-driven unavailability
/// keeps its reason for audit.
pub fn resolve_availability(
    mut day_price: DayPrice,
    date: NaiveDate,
    booked_dates: &HashSet<NaiveDate>,
) -> DayPrice {
    if booked_dates.contains(&date) {
        day_price.available = false;
        day_price.reason = None;
    }
    day_price
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculator::compute_day_price;
    use crate::models::{DateOverride, PropertyPricingConfig};

    fn booking(id: &str, check_in: &str, check_out: &str, status: &str) -> BookingRow {
        BookingRow {
            id: id.to_string(),
            check_in: check_in.to_string(),
            check_out: check_out.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn checkout_day_is_not_occupied() {
        let booked = expand_booked_dates(&[booking("b1", "2026-07-10", "2026-07-13", "confirmed")]);
        assert!(booked.contains(&"2026-07-10".parse().unwrap()));
        assert!(booked.contains(&"2026-07-12".parse().unwrap()));
        assert!(!booked.contains(&"2026-07-13".parse().unwrap()));
        assert_eq!(booked.len(), 3);
    }

    #[test]
    fn cancelled_bookings_do_not_block() {
        let booked = expand_booked_dates(&[booking("b1", "2026-07-10", "2026-07-13", "cancelled")]);
        assert!(booked.is_empty());
    }

    #[test]
    fn on_hold_bookings_block() {
        let booked = expand_booked_dates(&[booking("b1", "2026-07-10", "2026-07-11", "on-hold")]);
        assert_eq!(booked.len(), 1);
    }

    #[test]
    fn malformed_booking_is_skipped_not_fatal() {
        let bookings = vec![
            booking("bad", "not-a-date", "2026-07-13", "confirmed"),
            booking("good", "2026-07-20", "2026-07-22", "confirmed"),
        ];
        let booked = expand_booked_dates(&bookings);
        assert_eq!(booked.len(), 2);
        assert!(booked.contains(&"2026-07-20".parse().unwrap()));
    }

    #[test]
    fn booking_beats_override_availability() {
        let config = PropertyPricingConfig::default();
        let date: NaiveDate = "2026-07-10".parse().unwrap();
        let overrides = vec![DateOverride {
            id: "o1".to_string(),
            date,
            custom_price: 200.0,
            available: true,
            minimum_stay: None,
            flat_rate: false,
            reason: Some("negotiated rate".to_string()),
        }];
        let booked = expand_booked_dates(&[booking("b1", "2026-07-10", "2026-07-11", "confirmed")]);
        let day = compute_day_price(&config, date, &[], &overrides, &[]);
        assert!(day.available);
        let day = resolve_availability(day, date, &booked);
        assert!(!day.available);
        assert!(day.reason.is_none());
    }

    #[test]
    fn override_block_keeps_reason() {
        let config = PropertyPricingConfig::default();
        let date: NaiveDate = "2026-07-10".parse().unwrap();
        let overrides = vec![DateOverride {
            id: "o1".to_string(),
            date,
            custom_price: 100.0,
            available: false,
            minimum_stay: None,
            flat_rate: false,
            reason: Some("maintenance".to_string()),
        }];
        let day = compute_day_price(&config, date, &[], &overrides, &[]);
        let day = resolve_availability(day, date, &HashSet::new());
        assert!(!day.available);
        assert_eq!(day.reason.as_deref(), Some("maintenance"));
    }
}
