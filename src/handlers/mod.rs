pub mod calendars;
pub mod quotes;
