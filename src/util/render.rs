use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Zero-padded `HH:MM:SS`, decomposed from seconds since midnight.
pub fn time_hms(time: NaiveTime) -> String {
    let total_seconds = time.num_seconds_from_midnight();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn date_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn datetime_iso(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Fees are DECIMAL in the store but plain JSON numbers on the wire.
pub fn fee_f64(fee: Decimal) -> f64 {
    fee.to_f64().unwrap_or(0.0)
}
