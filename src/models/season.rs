use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    Minimum,
    Low,
    Standard,
    Medium,
    High,
}

impl SeasonType {
    fn parse(raw: &str) -> SeasonType {
        match raw.to_ascii_lowercase().as_str() {
            "minimum" => SeasonType::Minimum,
            "low" => SeasonType::Low,
            "medium" => SeasonType::Medium,
            "high" => SeasonType::High,
            _ => SeasonType::Standard,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SeasonRow {
    pub id: String,
    pub name: String,
    pub season_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price_multiplier: f64,
    pub minimum_stay: Option<i64>,
    pub enabled: Option<bool>,
}

/// A named date range carrying a price multiplier. Disabled rules are kept
/// in storage so historical calendars stay explainable; the resolver only
/// sees them with `enabled = false`.
#[derive(Debug, Clone)]
pub struct SeasonalPricingRule {
    pub id: String,
    pub name: String,
    pub season_type: SeasonType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price_multiplier: f64,
    pub minimum_stay: Option<u32>,
    pub enabled: bool,
}

impl SeasonRow {
    pub fn normalize(self) -> SeasonalPricingRule {
        // Inverted ranges are stored data errors; treat them as the span
        // between the two dates rather than an empty season.
        let (start, end) = if self.start_date <= self.end_date {
            (self.start_date, self.end_date)
        } else {
            (self.end_date, self.start_date)
        };
        SeasonalPricingRule {
            id: self.id,
            name: self.name,
            season_type: SeasonType::parse(&self.season_type),
            start_date: start,
            end_date: end,
            price_multiplier: if self.price_multiplier > 0.0 {
                self.price_multiplier
            } else {
                1.0
            },
            minimum_stay: self.minimum_stay.and_then(|n| u32::try_from(n).ok()),
            enabled: self.enabled.unwrap_or(true),
        }
    }
}

impl SeasonalPricingRule {
    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
