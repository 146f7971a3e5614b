//! Simulated clock time.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};

/// A point on the simulated clock, in minutes since midnight.
///
/// Ordering is total (`f64::total_cmp`), so times can be sorted and used as
/// tie-break keys deterministically.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::SimTime;
///
/// let t = SimTime::from_hm(10, 30);
/// assert_eq!(t.to_string(), "10:30");
/// assert_eq!(SimTime::parse_deadline("10:30 AM").unwrap(), Some(t));
/// assert_eq!(SimTime::parse_deadline("EOD").unwrap(), None);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(f64);

impl SimTime {
    /// Sentinel parked vehicles advance to once their day is over.
    pub const END_OF_DAY: SimTime = SimTime(99.0 * 24.0 * 60.0);

    /// Midnight.
    pub const MIDNIGHT: SimTime = SimTime(0.0);

    /// Creates a time from hours and minutes.
    pub fn from_hm(hours: u32, minutes: u32) -> Self {
        Self(f64::from(hours) * 60.0 + f64::from(minutes))
    }

    /// Creates a time from minutes since midnight.
    pub fn from_minutes(minutes: f64) -> Self {
        Self(minutes)
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> f64 {
        self.0
    }

    /// Returns `true` for the end-of-day sentinel (or anything past it).
    pub fn is_end_of_day(self) -> bool {
        self >= Self::END_OF_DAY
    }

    /// Time reached after driving `distance` at `speed` distance units per hour.
    pub fn after_drive(self, distance: f64, speed: f64) -> Self {
        Self(self.0 + distance / speed * 60.0)
    }

    /// Parses a 12-hour clock time such as `"9:05 am"` or `"12:30 PM"`.
    pub fn parse_clock(text: &str) -> Result<Self> {
        let invalid = || DispatchError::InvalidDeadline {
            text: text.to_string(),
        };
        let mut parts = text.split_whitespace();
        let clock = parts.next().ok_or_else(invalid)?;
        let meridiem = parts.next().ok_or_else(invalid)?.to_ascii_lowercase();
        if parts.next().is_some() {
            return Err(invalid());
        }
        let (h, m) = clock.split_once(':').ok_or_else(invalid)?;
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&hour) || minute >= 60 {
            return Err(invalid());
        }
        let hour = match (meridiem.as_str(), hour) {
            ("am", 12) => 0,
            ("am", h) => h,
            ("pm", 12) => 12,
            ("pm", h) => h + 12,
            _ => return Err(invalid()),
        };
        Ok(Self::from_hm(hour, minute))
    }

    /// Parses manifest deadline text.
    ///
    /// `"EOD"` (any case) means no deadline and yields `None`.
    pub fn parse_deadline(text: &str) -> Result<Option<Self>> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("eod") {
            return Ok(None);
        }
        Self::parse_clock(trimmed).map(Some)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end_of_day() {
            return write!(f, "EOD");
        }
        let total = self.0.round() as i64;
        write!(f, "{:02}:{:02}", total / 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10:30 AM", Some(SimTime::from_hm(10, 30)))]
    #[case("9:00 am", Some(SimTime::from_hm(9, 0)))]
    #[case("12:15 pm", Some(SimTime::from_hm(12, 15)))]
    #[case("12:05 AM", Some(SimTime::from_hm(0, 5)))]
    #[case("1:10 pm", Some(SimTime::from_hm(13, 10)))]
    #[case("EOD", None)]
    #[case(" eod ", None)]
    fn test_parse_deadline(#[case] text: &str, #[case] expected: Option<SimTime>) {
        assert_eq!(SimTime::parse_deadline(text).expect("valid"), expected);
    }

    #[rstest]
    #[case("10:30")]
    #[case("25:00 am")]
    #[case("10:75 am")]
    #[case("noon")]
    #[case("10:30 xm")]
    #[case("")]
    fn test_parse_deadline_invalid(#[case] text: &str) {
        assert!(matches!(
            SimTime::parse_deadline(text),
            Err(DispatchError::InvalidDeadline { .. })
        ));
    }

    #[test]
    fn test_after_drive() {
        // 18 miles at 18 mph is one hour
        let t = SimTime::from_hm(8, 0).after_drive(18.0, 18.0);
        assert_eq!(t, SimTime::from_hm(9, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(SimTime::from_hm(8, 5).to_string(), "08:05");
        assert_eq!(SimTime::from_minutes(600.4).to_string(), "10:00");
        assert_eq!(SimTime::END_OF_DAY.to_string(), "EOD");
    }

    #[test]
    fn test_ordering() {
        let mut times = vec![
            SimTime::from_hm(10, 0),
            SimTime::END_OF_DAY,
            SimTime::from_hm(8, 0),
        ];
        times.sort();
        assert_eq!(times[0], SimTime::from_hm(8, 0));
        assert!(times[2].is_end_of_day());
    }
}
