//! Text rendering for resolved instants and durations.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::duration::Duration;
use crate::resolve::LocalizedInstant;

const CIVIL_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";
const READABLE_LAYOUT: &str = "%A, %B %d, %Y at %I:%M:%S %p";
const ISO_LOCAL_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// How [`format_instant`] renders an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// RFC 3339 / ISO 8601 with the zone's offset.
    Iso,
    /// `Tuesday, September 09, 2025 at 02:30:00 PM UTC`
    Readable,
    /// Whole epoch seconds.
    Timestamp,
    /// `2025-09-09 14:30:00 UTC`
    Custom,
}

impl FormatKind {
    /// Map a requested format name to a kind, ignoring case.
    ///
    /// Unrecognised names fall back to [`FormatKind::Custom`] rather than
    /// failing.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "iso" => FormatKind::Iso,
            "readable" => FormatKind::Readable,
            "timestamp" => FormatKind::Timestamp,
            _ => FormatKind::Custom,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Iso => "iso",
            FormatKind::Readable => "readable",
            FormatKind::Timestamp => "timestamp",
            FormatKind::Custom => "custom",
        }
    }
}

/// Render a single instant.
pub fn format_instant(instant: &LocalizedInstant, kind: FormatKind) -> String {
    let local = &instant.local;
    match kind {
        FormatKind::Iso => {
            let offset_secs = local.offset().local_minus_utc();
            if offset_secs % 60 == 0 {
                local.to_rfc3339_opts(SecondsFormat::AutoSi, false)
            } else {
                // Local mean time offsets carry seconds; RFC 3339 would round them away.
                format!("{}{}", local.format(ISO_LOCAL_LAYOUT), format_offset(offset_secs, ":"))
            }
        }
        FormatKind::Readable => format!("{} {}", local.format(READABLE_LAYOUT), instant.abbreviation),
        FormatKind::Timestamp => instant.epoch_seconds().to_string(),
        FormatKind::Custom => civil(instant),
    }
}

/// The `get_current_datetime` report.
///
/// `requested_format` is echoed as given; the rendering uses
/// [`FormatKind::parse`] on it.
pub fn format_current(instant: &LocalizedInstant, requested_format: &str) -> String {
    let rendered = format_instant(instant, FormatKind::parse(requested_format));
    let mut out = String::from("🕐 Current DateTime\n");
    out.push_str("===================\n\n");
    out.push_str(&format!("**Timezone:** {}\n", instant.zone));
    out.push_str(&format!("**Format:** {}\n", requested_format));
    out.push_str(&format!("**DateTime:** {}\n", rendered));
    out.push_str(&format!("**UTC Offset:** {}\n", instant.utc_offset()));
    out
}

/// The `calculate_time_difference` report.
pub fn format_duration(
    duration: &Duration,
    start: &LocalizedInstant,
    end: &LocalizedInstant,
    zone_identifier: &str,
) -> String {
    let mut out = String::from("⏱️ Time Difference Calculation\n");
    out.push_str("=============================\n\n");
    out.push_str(&format!("**From:** {}\n", civil(start)));
    out.push_str(&format!("**To:** {}\n", civil(end)));
    out.push_str(&format!("**Timezone:** {}\n\n", zone_identifier));
    out.push_str(&format!(
        "**Total Duration:** {} seconds\n\n",
        group_thousands(duration.rounded_total_seconds())
    ));
    out.push_str("**Breakdown:**\n");
    out.push_str(&format!("- Days: {}\n", duration.days));
    out.push_str(&format!("- Hours: {}\n", duration.hours));
    out.push_str(&format!("- Minutes: {}\n", duration.minutes));
    out.push_str(&format!("- Seconds: {}\n\n", duration.seconds));
    out.push_str(&format!(
        "**Summary:** {} ({})\n",
        duration.summary(),
        duration.direction.as_str()
    ));
    out
}

/// `YYYY-MM-DD HH:MM:SS ABBR` in the instant's zone.
pub fn civil(instant: &LocalizedInstant) -> String {
    format!("{} {}", instant.local.format(CIVIL_LAYOUT), instant.abbreviation)
}

/// Insert `,` between groups of three digits: `16200` -> `16,200`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a UTC offset in seconds as `±HH{separator}MM`, followed by
/// `{separator}SS` when the offset is not a whole number of minutes.
pub(crate) fn format_offset(offset_secs: i32, separator: &str) -> String {
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    let seconds = abs_secs % 60;
    if seconds == 0 {
        format!("{sign}{hours:02}{separator}{minutes:02}")
    } else {
        format!("{sign}{hours:02}{separator}{minutes:02}{separator}{seconds:02}")
    }
}
