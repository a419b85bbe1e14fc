//! Signed difference between two instants, broken down into units.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Where the end instant falls relative to the start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// End is at or after start.
    Later,
    /// End is before start.
    Earlier,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Later => "later",
            Direction::Earlier => "earlier",
        }
    }
}

/// The magnitude of a time difference plus its direction.
///
/// `days * 86400 + hours * 3600 + minutes * 60 + seconds` always equals the
/// whole seconds of `magnitude`; the sub-second remainder only shows up in
/// [`Duration::total_seconds`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duration {
    #[serde(rename = "total_seconds", serialize_with = "serialize_seconds")]
    pub magnitude: TimeDelta,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub direction: Direction,
}

/// Compute the difference from `start` to `end`.
///
/// The zone either instant was resolved in plays no part: only the absolute
/// instants are compared.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use time_engine::{difference, Direction};
///
/// let start = Utc.with_ymd_and_hms(2025, 9, 9, 14, 30, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2025, 9, 9, 10, 0, 0).unwrap();
/// let duration = difference(start, end);
/// assert_eq!((duration.hours, duration.minutes), (4, 30));
/// assert_eq!(duration.direction, Direction::Earlier);
/// ```
pub fn difference(start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
    let delta = end - start;
    let direction = if delta >= TimeDelta::zero() {
        Direction::Later
    } else {
        Direction::Earlier
    };

    let magnitude = delta.abs();
    let whole = magnitude.num_seconds();

    let days = whole / SECONDS_PER_DAY;
    let remainder = whole % SECONDS_PER_DAY;
    let hours = remainder / SECONDS_PER_HOUR;
    let remainder = remainder % SECONDS_PER_HOUR;
    let minutes = remainder / SECONDS_PER_MINUTE;
    let seconds = remainder % SECONDS_PER_MINUTE;

    Duration {
        magnitude,
        days,
        hours,
        minutes,
        seconds,
        direction,
    }
}

impl Duration {
    /// Magnitude in seconds at full precision.
    pub fn total_seconds(&self) -> f64 {
        seconds_f64(&self.magnitude)
    }

    /// Magnitude rounded to the nearest whole second, halves rounding up.
    pub fn rounded_total_seconds(&self) -> i64 {
        let whole = self.magnitude.num_seconds();
        if self.magnitude.subsec_nanos() >= 500_000_000 {
            whole + 1
        } else {
            whole
        }
    }

    /// The most significant units, without the direction.
    ///
    /// Days show days, hours and minutes; otherwise hours show hours and
    /// minutes; otherwise minutes show minutes and seconds; otherwise only
    /// seconds.
    pub fn summary(&self) -> String {
        if self.days > 0 {
            format!(
                "{}, {}, {}",
                count(self.days, "day"),
                count(self.hours, "hour"),
                count(self.minutes, "minute")
            )
        } else if self.hours > 0 {
            format!("{}, {}", count(self.hours, "hour"), count(self.minutes, "minute"))
        } else if self.minutes > 0 {
            format!(
                "{}, {}",
                count(self.minutes, "minute"),
                count(self.seconds, "second")
            )
        } else {
            count(self.seconds, "second")
        }
    }
}

fn count(n: i64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" })
}

fn seconds_f64(delta: &TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}

fn serialize_seconds<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(seconds_f64(delta))
}
