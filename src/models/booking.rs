use sqlx::FromRow;

/// Booking rows are consumed, not owned: the booking/payment subsystem
/// writes them, the resolver only reads dates and status. Dates come back
/// as raw text so one malformed record cannot poison a whole calendar
/// fetch; parsing happens in the availability layer.
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: String,
    pub check_in: String,
    pub check_out: String,
    pub status: String,
}

/// Statuses that make a booking occupy its dates.
pub const BLOCKING_STATUSES: [&str; 2] = ["confirmed", "on-hold"];

impl BookingRow {
    pub fn blocks_dates(&self) -> bool {
        BLOCKING_STATUSES.contains(&self.status.as_str())
    }
}
