//! Formatting of dates into the `DD-MM-YYYY` form expected by the appointment API.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

/// Format string for API dates.
pub const API_DATE_FORMAT: &str = "%d-%m-%Y";

// Asia/Kolkata has been UTC+05:30 without daylight saving since 1945.
const KOLKATA_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The fixed Asia/Kolkata offset all zoned timestamps are normalized to.
#[must_use]
pub fn kolkata() -> FixedOffset {
    FixedOffset::east_opt(KOLKATA_OFFSET_SECS).expect("offset is less than a day")
}

/// Values that can be turned into an API date string.
pub trait ApiDate {
    /// Render as `DD-MM-YYYY`, converting zoned values to Asia/Kolkata first.
    fn to_api_date(&self) -> String;
}

impl ApiDate for NaiveDate {
    fn to_api_date(&self) -> String {
        self.format(API_DATE_FORMAT).to_string()
    }
}

impl ApiDate for NaiveDateTime {
    fn to_api_date(&self) -> String {
        self.format(API_DATE_FORMAT).to_string()
    }
}

impl<Tz: TimeZone> ApiDate for DateTime<Tz> {
    fn to_api_date(&self) -> String {
        self.with_timezone(&kolkata())
            .format(API_DATE_FORMAT)
            .to_string()
    }
}
