//! Decide whether a user may be reminded now and what the reminder says.
//!
//! Loading users and publishing the message are left to the caller.

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReminderError;
use crate::profile::UserProfile;

/// Parse a `+HH:MM` / `-HH:MM` offset, also when embedded (`UTC+05:00`).
///
/// The first sign followed by a well-formed `HH:MM` wins; earlier signs that
/// are not (`UTC-x+05:00`) are skipped.
pub fn parse_timezone_offset(input: &str) -> Result<FixedOffset, ReminderError> {
    let invalid = || ReminderError::InvalidTimezoneOffset(input.to_string());

    let seconds = input
        .match_indices(|c: char| c == '+' || c == '-')
        .find_map(|(start, _)| offset_seconds(&input.as_bytes()[start..]))
        .ok_or_else(invalid)?;
    FixedOffset::east_opt(seconds).ok_or_else(invalid)
}

/// Signed seconds of a `[+-]HH:MM` prefix of `bytes`.
fn offset_seconds(bytes: &[u8]) -> Option<i32> {
    if bytes.len() < 6 || bytes[3] != b':' {
        return None;
    }
    let two_digits = |at: usize| -> Option<i32> {
        let (h, l) = (bytes[at], bytes[at + 1]);
        if h.is_ascii_digit() && l.is_ascii_digit() {
            Some(i32::from(h - b'0') * 10 + i32::from(l - b'0'))
        } else {
            None
        }
    };
    let seconds = (two_digits(1)? * 60 + two_digits(4)?) * 60;
    Some(if bytes[0] == b'-' { -seconds } else { seconds })
}

/// Current time in the user's timezone.
pub fn client_now(offset: FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset)
}

const fn time_of_day(hour: u32, min: u32, sec: u32, milli: u32) -> NaiveTime {
    match NaiveTime::from_hms_milli_opt(hour, min, sec, milli) {
        Some(time) => time,
        None => panic!("invalid time of day"),
    }
}

const DEFAULT_START: NaiveTime = time_of_day(8, 0, 0, 0);
const DEFAULT_END: NaiveTime = time_of_day(21, 0, 0, 0);
const END_OF_DAY: NaiveTime = time_of_day(23, 59, 59, 999);

/// Local time-of-day range in which reminders may be sent (bounds excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl Default for NotificationWindow {
    /// 08:00 to 21:00.
    fn default() -> Self {
        NotificationWindow {
            start: DEFAULT_START,
            end: DEFAULT_END,
        }
    }
}

impl NotificationWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ReminderError> {
        if start >= end {
            return Err(ReminderError::EmptyWindow(start, end));
        }
        Ok(NotificationWindow { start, end })
    }

    /// 08:00 to 23:59:59.999.
    pub fn until_end_of_day() -> Self {
        NotificationWindow {
            end: END_OF_DAY,
            ..Self::default()
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Window bounds on the local date of `instant`.
    pub fn for_instant(
        &self,
        instant: &DateTime<FixedOffset>,
    ) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let offset = instant.offset();
        let date = instant.date_naive();
        let start = offset.from_local_datetime(&date.and_time(self.start)).single()?;
        let end = offset.from_local_datetime(&date.and_time(self.end)).single()?;
        Some((start, end))
    }

    pub fn contains(&self, instant: &DateTime<FixedOffset>) -> bool {
        let time = instant.time();
        self.start < time && time < self.end
    }
}

/// Whether the last weigh-in falls on (or after) the user's local date.
///
/// A profile without a weigh-in date counts as not updated.
pub fn weight_updated_today(profile: &UserProfile, now: &DateTime<FixedOffset>) -> bool {
    profile
        .last_weight_date()
        .map(|date| date >= now.date_naive())
        .unwrap_or(false)
}

/// Payload announcing a user's weigh-in status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderMessage {
    pub telegram_id: i64,
    pub status: bool,
}

impl ReminderMessage {
    pub fn for_profile(
        telegram_id: i64,
        profile: &UserProfile,
        now: &DateTime<FixedOffset>,
    ) -> Self {
        ReminderMessage {
            telegram_id,
            status: weight_updated_today(profile, now),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn at(offset: &str, rfc3339_local: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(&format!("{}{}", rfc3339_local, offset)).unwrap()
    }

    fn profile(days: &str) -> UserProfile {
        serde_json::from_value(json!({ "last_weight_date_int": days })).unwrap()
    }

    #[test]
    fn test_parse_timezone_offset() {
        assert_eq!(
            parse_timezone_offset("+05:00"),
            Ok(FixedOffset::east_opt(5 * 3600).unwrap())
        );
        assert_eq!(
            parse_timezone_offset("-03:30"),
            Ok(FixedOffset::west_opt(3 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!(
            parse_timezone_offset("UTC+00:00"),
            Ok(FixedOffset::east_opt(0).unwrap())
        );
    }

    #[test]
    fn test_parse_timezone_offset_skips_malformed_sign() {
        assert_eq!(
            parse_timezone_offset("UTC-x+05:00"),
            Ok(FixedOffset::east_opt(5 * 3600).unwrap())
        );
        assert_eq!(
            parse_timezone_offset("GMT+5 (-02:00)"),
            Ok(FixedOffset::west_opt(2 * 3600).unwrap())
        );
    }

    #[test]
    fn test_window_bounds() {
        let window = NotificationWindow::default();
        assert_eq!(window.start(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(window.end(), NaiveTime::from_hms_opt(21, 0, 0).unwrap());
        assert_eq!(
            NotificationWindow::until_end_of_day().end(),
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
    }

    #[test]
    fn test_parse_timezone_offset_invalid() {
        for input in &["", "05:00", "+5:00", "+05-00", "+0a:00", "+05:0", "+99:00"] {
            assert_eq!(
                parse_timezone_offset(input),
                Err(ReminderError::InvalidTimezoneOffset(input.to_string())),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_window_contains() {
        let window = NotificationWindow::default();
        assert!(window.contains(&at("+05:00", "2024-03-01T12:00:00")));
        assert!(window.contains(&at("+05:00", "2024-03-01T08:00:01")));
        assert!(!window.contains(&at("+05:00", "2024-03-01T08:00:00")));
        assert!(!window.contains(&at("+05:00", "2024-03-01T21:00:00")));
        assert!(!window.contains(&at("-08:00", "2024-03-01T23:30:00")));
        assert!(!window.contains(&at("+05:00", "2024-03-01T03:00:00")));
    }

    #[test]
    fn test_window_until_end_of_day() {
        let window = NotificationWindow::until_end_of_day();
        assert!(window.contains(&at("-08:00", "2024-03-01T23:30:00")));
        assert!(!window.contains(&at("-08:00", "2024-03-01T23:59:59.999")));
        assert_eq!(window.start(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    }

    #[test]
    fn test_window_new() {
        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(NotificationWindow::new(eight, nine).is_ok());
        assert_eq!(
            NotificationWindow::new(nine, eight),
            Err(ReminderError::EmptyWindow(nine, eight))
        );
    }

    #[test]
    fn test_window_for_instant() {
        let now = at("+05:00", "2024-03-01T12:34:56");
        let (start, end) = NotificationWindow::default().for_instant(&now).unwrap();
        assert_eq!(start, at("+05:00", "2024-03-01T08:00:00"));
        assert_eq!(end, at("+05:00", "2024-03-01T21:00:00"));
        assert!(start < now && now < end);
    }

    #[test]
    fn test_client_now_uses_offset() {
        let offset = parse_timezone_offset("+05:00").unwrap();
        assert_eq!(client_now(offset).offset(), &offset);
    }

    #[test]
    fn test_weight_updated_today() {
        // 19783 days after the epoch is 2024-03-01
        let now = at("+05:00", "2024-03-01T12:00:00");
        assert!(weight_updated_today(&profile("19783"), &now));
        assert!(!weight_updated_today(&profile("19782"), &now));
        assert!(!weight_updated_today(&UserProfile::default(), &now));
    }

    #[test]
    fn test_reminder_message() {
        let now = at("+05:00", "2024-03-01T12:00:00");
        let message = ReminderMessage::for_profile(42, &profile("19782"), &now);
        assert_eq!(
            message,
            ReminderMessage {
                telegram_id: 42,
                status: false
            }
        );
        let json: serde_json::Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
        assert_eq!(json, json!({"telegram_id": 42, "status": false}));
    }
}
