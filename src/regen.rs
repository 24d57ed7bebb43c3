use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::MonthCalendar;
use crate::pricing::generate_month;
use crate::store::{fetch_rule_inputs, CalendarStore, StoreError};

/// Differences below one cent are rounding noise, not drift.
pub const PRICE_EPSILON: f64 = 0.01;

/// How many concrete before/after samples each month's report keeps.
const DIFF_SAMPLE_CAP: usize = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayDiff {
    pub day: u32,
    pub old_price: f64,
    pub new_price: f64,
    pub old_available: bool,
    pub new_available: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRegen {
    pub year: i32,
    pub month: u32,
    /// Days that differ from the stored calendar; a month with no stored
    /// calendar counts every day as new but reports zero diffs.
    pub diff_count: u32,
    pub samples: Vec<DayDiff>,
    pub had_stored_calendar: bool,
    pub written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenReport {
    pub property_id: String,
    pub dry_run: bool,
    pub months: Vec<MonthRegen>,
    pub total_diffs: u32,
    pub failed_months: u32,
}

/// Compare a freshly generated calendar with the stored one: adjusted
/// price beyond the epsilon, or an availability flip, counts as a diff.
pub fn diff_calendars(stored: &MonthCalendar, fresh: &MonthCalendar) -> Vec<DayDiff> {
    let mut diffs = Vec::new();
    for (day, new_day) in &fresh.days {
        let Some(old_day) = stored.days.get(day) else {
            continue;
        };
        let price_moved = (new_day.adjusted_price - old_day.adjusted_price).abs() > PRICE_EPSILON;
        let availability_flipped = new_day.available != old_day.available;
        if price_moved || availability_flipped {
            diffs.push(DayDiff {
                day: *day,
                old_price: old_day.adjusted_price,
                new_price: new_day.adjusted_price,
                old_available: old_day.available,
                new_available: new_day.available,
            });
        }
    }
    diffs
}

/// Recompute a rolling window of month calendars starting at `from`'s
/// month. Dry-run (write = false) computes and diffs only; write mode
/// additionally replaces each stored document after diffing. Rule inputs
/// are fetched once for the whole window. A failing month is recorded in
/// the report and the window continues.
pub async fn regenerate_window(
    pool: &SqlitePool,
    property_id: &str,
    from: NaiveDate,
    months: u32,
    write: bool,
) -> Result<RegenReport, StoreError> {
    let inputs = fetch_rule_inputs(pool, property_id).await?;
    let store = CalendarStore::new(pool.clone());

    let mut report = RegenReport {
        property_id: property_id.to_string(),
        dry_run: !write,
        months: Vec::with_capacity(months as usize),
        total_diffs: 0,
        failed_months: 0,
    };

    let (mut year, mut month) = (from.year(), from.month());
    for _ in 0..months {
        let outcome = regenerate_one(&store, property_id, year, month, &inputs, write).await;
        let entry = match outcome {
            Ok(entry) => entry,
            Err(err) => {
                log::error!("regeneration of {property_id} {year}-{month:02} failed: {err}");
                report.failed_months += 1;
                MonthRegen {
                    year,
                    month,
                    diff_count: 0,
                    samples: Vec::new(),
                    had_stored_calendar: false,
                    written: false,
                    error: Some(err.to_string()),
                }
            }
        };
        report.total_diffs += entry.diff_count;
        report.months.push(entry);

        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    log::info!(
        "regenerated {} months for {property_id} ({} diffs, {} failures, dry_run={})",
        report.months.len(),
        report.total_diffs,
        report.failed_months,
        report.dry_run
    );
    Ok(report)
}

async fn regenerate_one(
    store: &CalendarStore,
    property_id: &str,
    year: i32,
    month: u32,
    inputs: &crate::store::RuleInputs,
    write: bool,
) -> Result<MonthRegen, StoreError> {
    let fresh = generate_month(
        property_id,
        year,
        month,
        &inputs.config,
        &inputs.seasons,
        &inputs.overrides,
        &inputs.min_stay_rules,
        &inputs.booked_dates,
    );

    let stored = store.fetch(property_id, year, month).await?;
    let diffs = stored
        .as_ref()
        .map(|old| diff_calendars(old, &fresh))
        .unwrap_or_default();

    let mut entry = MonthRegen {
        year,
        month,
        diff_count: diffs.len() as u32,
        samples: diffs.into_iter().take(DIFF_SAMPLE_CAP).collect(),
        had_stored_calendar: stored.is_some(),
        written: false,
        error: None,
    };

    if write {
        store.upsert(&fresh).await?;
        entry.written = true;
        log::info!(
            "stored calendar {} ({} unavailable, avg {})",
            fresh.id,
            fresh.summary.unavailable_days,
            fresh.summary.avg_price
        );
    }
    Ok(entry)
}
