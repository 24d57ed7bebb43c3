//! The pure pricing core: no I/O, no clocks apart from the generation
//! timestamp stamped on finished calendars. All inputs arrive as immutable
//! snapshots, so everything here is safe to call concurrently.

pub mod availability;
pub mod calculator;
pub mod calendar;
pub mod quote;

pub use availability::{expand_booked_dates, resolve_availability};
pub use calculator::compute_day_price;
pub use calendar::{days_in_month, generate_month, summarize};
pub use quote::{compute_quote, QuoteOutcome, QuoteResponse, UnavailableReason};
