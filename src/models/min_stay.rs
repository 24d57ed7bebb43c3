use chrono::NaiveDate;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct MinStayRow {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub minimum_nights: i64,
    pub enabled: Option<bool>,
}

/// Minimum-stay requirement scoped to a date range; a single-day rule has
/// start == end.
#[derive(Debug, Clone)]
pub struct MinimumStayRule {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub minimum_nights: u32,
    pub enabled: bool,
}

impl MinStayRow {
    pub fn normalize(self) -> MinimumStayRule {
        let (start, end) = if self.start_date <= self.end_date {
            (self.start_date, self.end_date)
        } else {
            (self.end_date, self.start_date)
        };
        MinimumStayRule {
            id: self.id,
            start_date: start,
            end_date: end,
            minimum_nights: u32::try_from(self.minimum_nights).unwrap_or(1).max(1),
            enabled: self.enabled.unwrap_or(true),
        }
    }
}

impl MinimumStayRule {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Days covered, used to rank overlapping rules by specificity.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
