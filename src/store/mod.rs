use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{
    BookingRow, DateOverride, MinimumStayRule, MonthCalendar, PropertyPricingConfig,
    SeasonalPricingRule,
};
use crate::models::date_override::OverrideRow;
use crate::models::min_stay::MinStayRow;
use crate::models::property::PropertyRow;
use crate::models::season::SeasonRow;
use crate::pricing::expand_booked_dates;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("calendar document decode failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("property {0} not found")]
    PropertyNotFound(String),
}

/// Immutable snapshot of everything the resolver needs for one property.
/// Fetched once and shared across a whole regeneration window, since rules
/// do not vary by month.
#[derive(Debug, Clone)]
pub struct RuleInputs {
    pub config: PropertyPricingConfig,
    pub seasons: Vec<SeasonalPricingRule>,
    pub overrides: Vec<DateOverride>,
    pub min_stay_rules: Vec<MinimumStayRule>,
    pub booked_dates: HashSet<NaiveDate>,
}

pub async fn fetch_property_config(
    pool: &SqlitePool,
    property_id: &str,
) -> Result<PropertyPricingConfig, StoreError> {
    let row = sqlx::query_as::<_, PropertyRow>("SELECT * FROM properties WHERE id = ?")
        .bind(property_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StoreError::PropertyNotFound(property_id.to_string()))?;
    Ok(row.normalize())
}

/// One round of reads covering the full rule snapshot. Seasons come back
/// ordered by creation time so the overlapping-season tie-break in the
/// calculator is stable.
pub async fn fetch_rule_inputs(
    pool: &SqlitePool,
    property_id: &str,
) -> Result<RuleInputs, StoreError> {
    let config = fetch_property_config(pool, property_id).await?;

    let seasons = sqlx::query_as::<_, SeasonRow>(
        "SELECT id, name, season_type, start_date, end_date, price_multiplier, \
         minimum_stay, enabled \
         FROM seasonal_rules WHERE property_id = ? ORDER BY created_at, id",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(SeasonRow::normalize)
    .collect();

    let overrides = sqlx::query_as::<_, OverrideRow>(
        "SELECT id, date, custom_price, available, minimum_stay, flat_rate, reason \
         FROM date_overrides WHERE property_id = ? ORDER BY date",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(OverrideRow::normalize)
    .collect();

    let min_stay_rules = sqlx::query_as::<_, MinStayRow>(
        "SELECT id, start_date, end_date, minimum_nights, enabled \
         FROM min_stay_rules WHERE property_id = ? ORDER BY start_date, id",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(MinStayRow::normalize)
    .collect();

    let bookings = sqlx::query_as::<_, BookingRow>(
        "SELECT id, check_in, check_out, status FROM bookings WHERE property_id = ?",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?;

    Ok(RuleInputs {
        config,
        seasons,
        overrides,
        min_stay_rules,
        booked_dates: expand_booked_dates(&bookings),
    })
}

/// Persistence for month-calendar documents: one JSON document per
/// property-month, always replaced wholesale.
#[derive(Clone)]
pub struct CalendarStore {
    pool: SqlitePool,
}

impl CalendarStore {
    pub fn new(pool: SqlitePool) -> Self {
        CalendarStore { pool }
    }

    pub async fn fetch(
        &self,
        property_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<MonthCalendar>, StoreError> {
        let id = MonthCalendar::document_id(property_id, year, month);
        let row: Option<(String,)> =
            sqlx::query_as("SELECT document FROM month_calendars WHERE id = ?")
                .bind(&id)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some((document,)) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    pub async fn upsert(&self, calendar: &MonthCalendar) -> Result<(), StoreError> {
        let document = serde_json::to_string(calendar)?;
        sqlx::query(
            "INSERT INTO month_calendars (id, property_id, year, month, document, generated_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET document = excluded.document, \
             generated_at = excluded.generated_at",
        )
        .bind(&calendar.id)
        .bind(&calendar.property_id)
        .bind(calendar.year)
        .bind(calendar.month)
        .bind(&document)
        .bind(&calendar.generated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Targeted single-day update: replace one day inside the stored
    /// document and recompute the summary from the patched map. Converges
    /// to the same state as a full regeneration given the same inputs.
    /// Returns false when no calendar is stored for that month.
    pub async fn patch_day(
        &self,
        property_id: &str,
        date: NaiveDate,
        day_price: crate::models::DayPrice,
        base_price: f64,
    ) -> Result<bool, StoreError> {
        use chrono::Datelike;
        let Some(mut calendar) = self.fetch(property_id, date.year(), date.month()).await? else {
            return Ok(false);
        };
        calendar.days.insert(date.day(), day_price);
        calendar.summary = crate::pricing::summarize(&calendar.days, base_price);
        calendar.generated_at = chrono::Utc::now().to_rfc3339();
        self.upsert(&calendar).await?;
        Ok(true)
    }
}
