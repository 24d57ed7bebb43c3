pub mod booking;
pub mod calendar;
pub mod date_override;
pub mod min_stay;
pub mod property;
pub mod season;

pub use booking::BookingRow;
pub use calendar::{DayPrice, MonthCalendar, MonthSummary, PriceSource};
pub use date_override::DateOverride;
pub use min_stay::MinimumStayRule;
pub use property::{LosDiscountTier, PropertyPricingConfig};
pub use season::{SeasonType, SeasonalPricingRule};
