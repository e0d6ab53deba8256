//! Time and date labels for the views

use chrono::{DateTime, Utc};

/// Format a remaining-seconds count as `M:SS` for the countdown display.
///
/// Negative inputs clamp to `0:00`; the countdown never shows negative
/// time even when a tick lands after the deadline.
pub fn format_remaining(remaining_secs: i64) -> String {
    let clamped = remaining_secs.max(0);
    format!("{}:{:02}", clamped / 60, clamped % 60)
}

/// Short `DD/MM/YYYY` date label for history rows.
pub fn format_short_date(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_remaining_full_window() {
        assert_eq!(format_remaining(600), "10:00");
    }

    #[test]
    fn test_format_remaining_pads_seconds() {
        assert_eq!(format_remaining(61), "1:01");
        assert_eq!(format_remaining(59), "0:59");
    }

    #[test]
    fn test_format_remaining_clamps_negative() {
        assert_eq!(format_remaining(0), "0:00");
        assert_eq!(format_remaining(-5), "0:00");
    }

    #[test]
    fn test_format_short_date() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 18, 30, 0).unwrap();
        assert_eq!(format_short_date(at), "09/03/2026");
    }
}
