use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a new order id
pub fn new_order_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Calendar date of a Unix-millis timestamp in the business timezone
///
/// Out-of-range timestamps are logged and fall back to the Unix epoch date.
pub fn calendar_date(timestamp_ms: i64, tz: Tz) -> NaiveDate {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.with_timezone(&tz).date_naive(),
        None => {
            tracing::warn!(timestamp_ms, "Timestamp out of range, using epoch date");
            NaiveDate::default()
        }
    }
}

/// Today's date in the business timezone
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}
