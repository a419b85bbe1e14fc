//! Instant resolution: text (or "now") plus a zone to an absolute instant.
//!
//! Two literal shapes are accepted:
//!
//! - `YYYY-MM-DD HH:MM:SS`: civil time in the requested zone
//! - `YYYY-MM-DDTHH:MM:SS`: civil time in the requested zone, or, with a
//!   trailing `Z` or numeric offset (`+05:30`, `+0530`, `+05`), an absolute
//!   instant whose own offset wins over the requested zone
//!
//! Either shape may carry fractional seconds (`.123`). Anything else is
//! rejected; there is no guessing.

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc,
};
use serde::Serialize;

use crate::error::{Result, TimeError};
use crate::format::format_offset;
use crate::zone::Zone;

const SPACE_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f";
const ISO_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// An absolute instant together with its rendering in one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedInstant {
    /// The instant on the UTC timeline.
    pub instant: DateTime<Utc>,
    /// The same instant with the zone's offset applied. Calendar fields
    /// (year, month, day, hour, ...) come from here.
    pub local: DateTime<FixedOffset>,
    /// The zone identifier as the caller supplied it.
    pub zone: String,
    /// Zone abbreviation in force at this instant.
    pub abbreviation: String,
}

impl LocalizedInstant {
    /// Signed UTC offset as `+HHMM` / `-HHMM`.
    pub fn utc_offset(&self) -> String {
        format_offset(self.local.offset().local_minus_utc(), "")
    }

    /// Whole seconds since the Unix epoch (floored for pre-epoch instants).
    pub fn epoch_seconds(&self) -> i64 {
        self.instant.timestamp()
    }
}

/// Resolve `text` in `zone`, using `now` when the text is empty.
///
/// # Errors
///
/// Returns [`TimeError::InvalidFormat`] if the text matches neither accepted
/// shape, or [`TimeError::Unexpected`] if the zone cannot place the civil time
/// on the timeline.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use time_engine::{resolve, BundledZones, Zone};
///
/// let zone = Zone::resolve("America/New_York", &BundledZones).unwrap();
/// let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
/// let resolved = resolve("2026-03-15 10:00:00", &zone, now).unwrap();
/// // March 15 2026 is EDT (UTC-4)
/// assert_eq!(resolved.instant.to_rfc3339(), "2026-03-15T14:00:00+00:00");
/// assert_eq!(resolved.utc_offset(), "-0400");
/// ```
pub fn resolve(text: &str, zone: &Zone, now: DateTime<Utc>) -> Result<LocalizedInstant> {
    let text = text.trim();
    let instant = if text.is_empty() {
        now
    } else {
        parse_datetime(text, zone)?
    };
    Ok(zone.localize(instant))
}

/// Parse a non-empty literal into an absolute instant.
///
/// Civil times are placed with `zone`'s rules. During a fall-back overlap
/// the earlier instant is used; inside a spring-forward gap the offset in
/// force before the gap is used.
pub fn parse_datetime(text: &str, zone: &Zone) -> Result<DateTime<Utc>> {
    let text = text.trim();
    let invalid = || TimeError::InvalidFormat(text.to_string());

    match text.as_bytes().get(10) {
        Some(b' ') => {
            let naive = parse_civil(text, SPACE_LAYOUT).ok_or_else(invalid)?;
            place_in_zone(naive, zone)
        }
        Some(b'T') => {
            let (body, offset) = split_offset(text).ok_or_else(invalid)?;
            let naive = parse_civil(body, ISO_LAYOUT).ok_or_else(invalid)?;
            match offset {
                Some(offset) => with_offset(naive, offset),
                None => place_in_zone(naive, zone),
            }
        }
        _ => Err(invalid()),
    }
}

/// Parse the civil part of a literal. Leap seconds (`:60`) are rejected.
fn parse_civil(text: &str, layout: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, layout)
        .ok()
        .filter(|naive| naive.nanosecond() < 1_000_000_000)
}

/// Split an ISO literal into its civil part and an optional explicit offset.
///
/// Returns `None` when a suffix is present but is not a valid offset.
fn split_offset(text: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(body) = text.strip_suffix(['Z', 'z']) {
        return Some((body, Some(FixedOffset::east_opt(0)?)));
    }

    // Only the time part (after the 'T' at byte 10) can hold an offset sign.
    let time = &text[11..];
    match time.rfind(['+', '-']) {
        Some(pos) => {
            let split = 11 + pos;
            let offset = parse_offset(&text[split..])?;
            Some((&text[..split], Some(offset)))
        }
        None => Some((text, None)),
    }
}

/// Parse `+HH:MM`, `+HHMM` or `+HH` (and the `-` forms).
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    if !digits.is_ascii() {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits, "00"),
        4 => (&digits[..2], &digits[2..]),
        5 if digits.as_bytes()[2] == b':' => (&digits[..2], &digits[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn place_in_zone(naive: NaiveDateTime, zone: &Zone) -> Result<DateTime<Utc>> {
    match zone.offsets_at_local(&naive) {
        LocalResult::Single(offset) => with_offset(naive, offset),
        LocalResult::Ambiguous(a, b) => {
            let first = with_offset(naive, a)?;
            let second = with_offset(naive, b)?;
            Ok(first.min(second))
        }
        LocalResult::None => {
            let probe = naive
                .checked_sub_signed(TimeDelta::days(1))
                .ok_or_else(|| out_of_range(&naive))?;
            let before_gap = zone.offsets_at_local(&probe).earliest().ok_or_else(|| {
                TimeError::Unexpected(format!(
                    "no UTC offset for {} in {}",
                    naive,
                    zone.identifier()
                ))
            })?;
            with_offset(naive, before_gap)
        }
    }
}

fn with_offset(naive: NaiveDateTime, offset: FixedOffset) -> Result<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| out_of_range(&naive))
}

fn out_of_range(naive: &NaiveDateTime) -> TimeError {
    TimeError::Unexpected(format!("datetime out of range: {naive}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::BundledZones;
    use chrono::Datelike;
    use proptest::prelude::*;

    fn zone(name: &str) -> Zone {
        Zone::resolve(name, &BundledZones).unwrap()
    }

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 9, 14, 30, 0).unwrap()
    }

    // ── shapes ──────────────────────────────────────────────────────────

    #[test]
    fn test_empty_text_uses_now() {
        let resolved = resolve("", &zone("UTC"), anchor()).unwrap();
        assert_eq!(resolved.instant, anchor());
        let resolved = resolve("   ", &zone("UTC"), anchor()).unwrap();
        assert_eq!(resolved.instant, anchor());
    }

    #[test]
    fn test_space_form_in_utc() {
        let resolved = resolve("2025-09-09 10:00:00", &zone("UTC"), anchor()).unwrap();
        assert_eq!(resolved.instant, Utc.with_ymd_and_hms(2025, 9, 9, 10, 0, 0).unwrap());
        assert_eq!(resolved.utc_offset(), "+0000");
        assert_eq!(resolved.abbreviation, "UTC");
    }

    #[test]
    fn test_space_form_attaches_zone_offset() {
        // Same civil time, different instants across the DST change.
        let ny = zone("America/New_York");
        let winter = resolve("2026-01-15 09:00:00", &ny, anchor()).unwrap();
        assert_eq!(winter.instant.hour(), 14);
        assert_eq!(winter.utc_offset(), "-0500");

        let summer = resolve("2026-07-15 09:00:00", &ny, anchor()).unwrap();
        assert_eq!(summer.instant.hour(), 13);
        assert_eq!(summer.utc_offset(), "-0400");
    }

    #[test]
    fn test_iso_without_offset_uses_zone() {
        let resolved = resolve("2025-09-09T10:00:00", &zone("Asia/Tokyo"), anchor()).unwrap();
        assert_eq!(resolved.instant, Utc.with_ymd_and_hms(2025, 9, 9, 1, 0, 0).unwrap());
        assert_eq!(resolved.local.hour(), 10);
    }

    #[test]
    fn test_iso_z_suffix_is_utc() {
        let resolved = resolve("2025-09-09T10:00:00Z", &zone("Asia/Tokyo"), anchor()).unwrap();
        assert_eq!(resolved.instant, Utc.with_ymd_and_hms(2025, 9, 9, 10, 0, 0).unwrap());
        // Displayed in the requested zone.
        assert_eq!(resolved.local.hour(), 19);
        assert_eq!(resolved.utc_offset(), "+0900");
    }

    #[test]
    fn test_explicit_offset_wins_over_zone() {
        let expected = Utc.with_ymd_and_hms(2025, 9, 9, 15, 0, 0).unwrap();
        for literal in [
            "2025-09-09T10:00:00-05:00",
            "2025-09-09T10:00:00-0500",
            "2025-09-09T10:00:00-05",
        ] {
            let resolved = resolve(literal, &zone("Europe/London"), anchor()).unwrap();
            assert_eq!(resolved.instant, expected, "literal {literal}");
        }
    }

    #[test]
    fn test_half_hour_offset() {
        let resolved = resolve("2025-09-09T10:00:00+05:30", &zone("UTC"), anchor()).unwrap();
        assert_eq!(resolved.instant, Utc.with_ymd_and_hms(2025, 9, 9, 4, 30, 0).unwrap());
    }

    #[test]
    fn test_fractional_seconds_are_kept() {
        let resolved = resolve("2025-09-09 10:00:00.250", &zone("UTC"), anchor()).unwrap();
        assert_eq!(resolved.instant.nanosecond(), 250_000_000);
        assert_eq!(resolved.epoch_seconds(), 1_757_412_000);
    }

    #[test]
    fn test_rejects_other_shapes() {
        for literal in [
            "invalid-date",
            "2025-09-09",
            "09/09/2025 10:00:00",
            "2025-09-09 10:00",
            "2025-09-09T10:00:00+25:00",
            "2025-09-09T10:00:00 UTC",
            "2025-13-09 10:00:00",
            "2025-09-09 10:00:00Z",
            "2025-09-09 10:00:60",
            "2025-09-09T10:00:60Z",
            "2025-09-09T23:59:60.500+05:30",
            "tomorrow",
        ] {
            let err = resolve(literal, &zone("UTC"), anchor()).unwrap_err();
            assert_eq!(err, TimeError::InvalidFormat(literal.to_string()), "literal {literal}");
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let resolved = resolve("  2025-09-09 10:00:00 ", &zone("UTC"), anchor()).unwrap();
        assert_eq!(resolved.local.day(), 9);
        assert_eq!(resolved.local.hour(), 10);
    }

    // ── DST edges ───────────────────────────────────────────────────────

    #[test]
    fn test_overlap_takes_earlier_instant() {
        // November 1 2026, 01:30 happens first in EDT, then again in EST.
        let resolved =
            resolve("2026-11-01 01:30:00", &zone("America/New_York"), anchor()).unwrap();
        assert_eq!(resolved.instant, Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
        assert_eq!(resolved.abbreviation, "EDT");
    }

    #[test]
    fn test_gap_uses_offset_before_transition() {
        // March 8 2026, 02:30 is skipped; read it with EST and land at 03:30 EDT.
        let resolved =
            resolve("2026-03-08 02:30:00", &zone("America/New_York"), anchor()).unwrap();
        assert_eq!(resolved.instant, Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap());
        assert_eq!(resolved.local.hour(), 3);
        assert_eq!(resolved.abbreviation, "EDT");
    }

    // ── offsets ─────────────────────────────────────────────────────────

    #[test]
    fn test_utc_offset_formatting() {
        let kolkata = resolve("2025-09-09 10:00:00", &zone("Asia/Kolkata"), anchor()).unwrap();
        assert_eq!(kolkata.utc_offset(), "+0530");
        let sao_paulo =
            resolve("2025-09-09 10:00:00", &zone("America/Sao_Paulo"), anchor()).unwrap();
        assert_eq!(sao_paulo.utc_offset(), "-0300");
    }

    #[test]
    fn test_pre_epoch_seconds_are_negative() {
        let resolved = resolve("1969-12-31 23:59:00", &zone("UTC"), anchor()).unwrap();
        assert_eq!(resolved.epoch_seconds(), -60);
    }

    proptest! {
        #[test]
        fn prop_resolution_is_idempotent(
            secs in 0i64..4_102_444_800,
            zone_name in prop::sample::select(vec![
                "UTC", "America/New_York", "Europe/London", "Asia/Tokyo", "America/Sao_Paulo",
            ]),
        ) {
            let zone = zone(zone_name);
            let literal = DateTime::from_timestamp(secs, 0)
                .unwrap()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string();

            let first = resolve(&literal, &zone, anchor()).unwrap();
            let second = resolve(&literal, &zone, anchor()).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.utc_offset(), second.utc_offset());
        }

        #[test]
        fn prop_offset_literal_ignores_zone(secs in 0i64..4_102_444_800) {
            let literal = DateTime::from_timestamp(secs, 0).unwrap().to_rfc3339();
            let in_utc = resolve(&literal, &zone("UTC"), anchor()).unwrap();
            let in_tokyo = resolve(&literal, &zone("Asia/Tokyo"), anchor()).unwrap();
            prop_assert_eq!(in_utc.instant, in_tokyo.instant);
            prop_assert_eq!(in_utc.epoch_seconds(), secs);
        }
    }
}
