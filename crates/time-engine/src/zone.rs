//! Timezone lookup as a capability.
//!
//! The resolver never calls into a timezone library directly. It asks a
//! [`ZoneDatabase`] for the [`ZoneRules`] behind an identifier, and the rules
//! answer two questions: which offset applies at a UTC instant, and which
//! offsets a civil (wall-clock) time can map to. [`BundledZones`] answers them
//! from the IANA data compiled into `chrono-tz`; another database (for example
//! one backed by the platform's zoneinfo files) only has to implement the same
//! two traits.

use std::fmt;

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, TimeError};
use crate::resolve::LocalizedInstant;

/// The identifier that is resolved without a database lookup.
pub const UTC_IDENTIFIER: &str = "UTC";

/// The offset and abbreviation a zone applies at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneOffset {
    pub offset: FixedOffset,
    /// Zone abbreviation such as `EST` or `UTC`. Zones without a letter
    /// abbreviation in the database use a numeric one (e.g. `-03`).
    pub abbreviation: String,
}

/// Offset rules for a single named zone.
pub trait ZoneRules: fmt::Debug + Send + Sync {
    /// The offset in force at the given UTC instant.
    fn offset_at_utc(&self, utc: &NaiveDateTime) -> ZoneOffset;

    /// Every offset under which the given civil time exists.
    ///
    /// `Ambiguous` during a fall-back overlap, `None` inside a spring-forward gap.
    fn offsets_at_local(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset>;
}

/// A source of [`ZoneRules`] keyed by identifier.
pub trait ZoneDatabase: Send + Sync {
    fn lookup(&self, identifier: &str) -> Option<Box<dyn ZoneRules>>;
}

/// A zone with a constant offset and abbreviation.
#[derive(Debug, Clone)]
pub struct FixedRules {
    offset: ZoneOffset,
}

impl FixedRules {
    pub fn utc() -> Self {
        Self {
            offset: ZoneOffset {
                offset: Utc.fix(),
                abbreviation: UTC_IDENTIFIER.to_string(),
            },
        }
    }
}

impl ZoneRules for FixedRules {
    fn offset_at_utc(&self, _utc: &NaiveDateTime) -> ZoneOffset {
        self.offset.clone()
    }

    fn offsets_at_local(&self, _local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        LocalResult::Single(self.offset.offset)
    }
}

/// Rules for an IANA zone from the bundled `chrono-tz` database.
#[derive(Debug, Clone, Copy)]
pub struct IanaRules(Tz);

impl ZoneRules for IanaRules {
    fn offset_at_utc(&self, utc: &NaiveDateTime) -> ZoneOffset {
        let local = self.0.from_utc_datetime(utc);
        ZoneOffset {
            offset: local.offset().fix(),
            abbreviation: local.format("%Z").to_string(),
        }
    }

    fn offsets_at_local(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        self.0.offset_from_local_datetime(local).map(|o| o.fix())
    }
}

/// The IANA database compiled into the binary via `chrono-tz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledZones;

impl ZoneDatabase for BundledZones {
    fn lookup(&self, identifier: &str) -> Option<Box<dyn ZoneRules>> {
        identifier
            .parse::<Tz>()
            .ok()
            .map(|tz| Box::new(IanaRules(tz)) as Box<dyn ZoneRules>)
    }
}

/// A resolved timezone: the identifier the caller asked for plus its rules.
#[derive(Debug)]
pub struct Zone {
    identifier: String,
    rules: Box<dyn ZoneRules>,
}

impl Zone {
    /// Resolve an identifier against `database`.
    ///
    /// `"UTC"` in any letter case is the fixed zero-offset zone and never
    /// reaches the database. The identifier is kept as given for display.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::UnknownTimezone`] carrying the identifier when the
    /// database has no entry for it.
    pub fn resolve(identifier: &str, database: &dyn ZoneDatabase) -> Result<Self> {
        let trimmed = identifier.trim();
        if trimmed.eq_ignore_ascii_case(UTC_IDENTIFIER) {
            return Ok(Self {
                identifier: identifier.to_string(),
                rules: Box::new(FixedRules::utc()),
            });
        }

        database
            .lookup(trimmed)
            .map(|rules| Self {
                identifier: identifier.to_string(),
                rules,
            })
            .ok_or_else(|| TimeError::UnknownTimezone(identifier.to_string()))
    }

    pub fn utc() -> Self {
        Self {
            identifier: UTC_IDENTIFIER.to_string(),
            rules: Box::new(FixedRules::utc()),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn offset_at(&self, instant: DateTime<Utc>) -> ZoneOffset {
        self.rules.offset_at_utc(&instant.naive_utc())
    }

    pub fn offsets_at_local(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        self.rules.offsets_at_local(local)
    }

    /// Express an absolute instant in this zone.
    pub fn localize(&self, instant: DateTime<Utc>) -> LocalizedInstant {
        let ZoneOffset {
            offset,
            abbreviation,
        } = self.offset_at(instant);
        LocalizedInstant {
            instant,
            local: instant.with_timezone(&offset),
            zone: self.identifier.clone(),
            abbreviation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_utc_resolves_case_insensitively() {
        for name in ["UTC", "utc", "Utc", " UTC "] {
            let zone = Zone::resolve(name, &BundledZones).unwrap();
            assert_eq!(zone.identifier(), name);
            let offset = zone.offset_at(utc(2025, 9, 9, 12, 0, 0));
            assert_eq!(offset.offset.local_minus_utc(), 0);
            assert_eq!(offset.abbreviation, "UTC");
        }
    }

    #[derive(Debug)]
    struct EmptyDatabase;

    impl ZoneDatabase for EmptyDatabase {
        fn lookup(&self, _identifier: &str) -> Option<Box<dyn ZoneRules>> {
            None
        }
    }

    #[test]
    fn test_utc_skips_database() {
        assert!(Zone::resolve("UTC", &EmptyDatabase).is_ok());
        assert!(Zone::resolve("Europe/London", &EmptyDatabase).is_err());
    }

    #[test]
    fn test_unknown_timezone_carries_identifier() {
        let err = Zone::resolve("Invalid/Timezone", &BundledZones).unwrap_err();
        assert_eq!(err, TimeError::UnknownTimezone("Invalid/Timezone".to_string()));
        assert!(err.to_string().contains("Invalid/Timezone"));
    }

    #[test]
    fn test_new_york_offsets_follow_dst() {
        let zone = Zone::resolve("America/New_York", &BundledZones).unwrap();

        let winter = zone.offset_at(utc(2026, 1, 15, 12, 0, 0));
        assert_eq!(winter.offset.local_minus_utc(), -5 * 3600);
        assert_eq!(winter.abbreviation, "EST");

        let summer = zone.offset_at(utc(2026, 7, 15, 12, 0, 0));
        assert_eq!(summer.offset.local_minus_utc(), -4 * 3600);
        assert_eq!(summer.abbreviation, "EDT");
    }

    #[test]
    fn test_sao_paulo_has_numeric_abbreviation() {
        let zone = Zone::resolve("America/Sao_Paulo", &BundledZones).unwrap();
        let offset = zone.offset_at(utc(2025, 9, 9, 12, 0, 0));
        assert_eq!(offset.offset.local_minus_utc(), -3 * 3600);
        assert_eq!(offset.abbreviation, "-03");
    }

    #[test]
    fn test_local_gap_and_overlap() {
        let zone = Zone::resolve("America/New_York", &BundledZones).unwrap();

        // March 8 2026, 02:30 does not exist in New York.
        let gap =
            NaiveDateTime::parse_from_str("2026-03-08 02:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert!(matches!(zone.offsets_at_local(&gap), LocalResult::None));

        // November 1 2026, 01:30 happens twice.
        let overlap =
            NaiveDateTime::parse_from_str("2026-11-01 01:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert!(matches!(
            zone.offsets_at_local(&overlap),
            LocalResult::Ambiguous(_, _)
        ));
    }

    #[test]
    fn test_localize_keeps_instant() {
        let zone = Zone::resolve("Asia/Tokyo", &BundledZones).unwrap();
        let instant = utc(2026, 6, 15, 12, 0, 0);
        let localized = zone.localize(instant);
        assert_eq!(localized.instant, instant);
        assert_eq!(localized.local.with_timezone(&Utc), instant);
        assert_eq!(localized.abbreviation, "JST");
        assert_eq!(localized.zone, "Asia/Tokyo");
    }
}
