use chrono::{DateTime, Local, NaiveDate, TimeZone};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Formats a byte count as whole bytes, then KB, then MB, one decimal place.
pub fn format_file_size(size: u64) -> String {
    if size < KIB {
        format!("{} B", size)
    } else if size < MIB {
        format!("{:.1} KB", size as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", size as f64 / MIB as f64)
    }
}

const DATE_FORMAT: &str = "%a, %b %-d, %Y";

/// Renders an ISO-8601 upload timestamp as e.g. `Mon, Jan 6, 2025`, on the
/// viewer's local calendar. Unparsable input is returned unchanged.
pub fn format_upload_date(raw: &str) -> String {
    format_upload_date_in(raw, &Local)
}

/// [`format_upload_date`] with an explicit zone for the calendar day.
pub fn format_upload_date_in<Tz>(raw: &str, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.with_timezone(zone).format(DATE_FORMAT).to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format(DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Percentage of an upload that has been sent, rounded; 0 when the total is unknown.
pub fn progress_percent(loaded: u64, total: Option<u64>) -> u8 {
    match total {
        Some(total) if total > 0 => {
            let percent = (loaded as f64 * 100.0 / total as f64).round();
            percent.clamp(0.0, 100.0) as u8
        }
        _ => 0,
    }
}
