use chrono::NaiveDate;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct OverrideRow {
    pub id: String,
    pub date: NaiveDate,
    pub custom_price: f64,
    pub available: Option<bool>,
    pub minimum_stay: Option<i64>,
    pub flat_rate: Option<bool>,
    pub reason: Option<String>,
}

/// Administrator-set exception for one specific date. At most one per
/// property-day (enforced by a unique index at the storage layer).
#[derive(Debug, Clone)]
pub struct DateOverride {
    pub id: String,
    pub date: NaiveDate,
    pub custom_price: f64,
    pub available: bool,
    pub minimum_stay: Option<u32>,
    /// When set, the custom price applies to every guest count instead of
    /// being a base the extra-guest fee is added on top of.
    pub flat_rate: bool,
    pub reason: Option<String>,
}

impl OverrideRow {
    pub fn normalize(self) -> DateOverride {
        DateOverride {
            id: self.id,
            date: self.date,
            custom_price: self.custom_price.max(0.0),
            available: self.available.unwrap_or(true),
            minimum_stay: self.minimum_stay.and_then(|n| u32::try_from(n).ok()),
            flat_rate: self.flat_rate.unwrap_or(false),
            reason: self.reason,
        }
    }
}
