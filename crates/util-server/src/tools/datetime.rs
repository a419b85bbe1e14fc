//! `get_current_datetime` and `calculate_time_difference`.
//!
//! Each call reads the clock once, resolves everything against that single
//! instant, and turns every [`TimeError`] into a fixed message template.

use serde_json::json;
use time_engine::{
    civil, difference, format_current, format_duration, format_instant, resolve, Clock,
    FormatKind, TimeError, Zone, ZoneDatabase,
};
use tracing::{debug, warn};

use super::ToolOutput;

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_FORMAT: &str = "iso";

const EXAMPLE_TIMEZONES: &[&str] = &[
    "UTC",
    "America/New_York",
    "Europe/London",
    "Asia/Tokyo",
    "America/Sao_Paulo",
];
const FORMAT_HINT: &str =
    "YYYY-MM-DD HH:MM:SS or YYYY-MM-DDTHH:MM:SS (optionally with Z or an offset like +05:30)";
const RETRY_HINT: &str = "Check the inputs and try again";

/// Which datetime argument a literal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Start,
    End,
}

impl Field {
    fn as_str(&self) -> &'static str {
        match self {
            Field::Start => "start",
            Field::End => "end",
        }
    }
}

#[derive(Debug)]
struct Failure {
    error: TimeError,
    field: Option<Field>,
}

impl Failure {
    fn at(field: Field) -> impl FnOnce(TimeError) -> Failure {
        move |error| Failure {
            error,
            field: Some(field),
        }
    }
}

impl From<TimeError> for Failure {
    fn from(error: TimeError) -> Self {
        Failure { error, field: None }
    }
}

/// Render a failure. `action` completes "Error ..." for unexpected failures.
fn render_failure(failure: &Failure, action: &str) -> String {
    match &failure.error {
        TimeError::UnknownTimezone(identifier) => format!(
            "❌ Unknown timezone: {}\n💡 Try: {}",
            identifier,
            EXAMPLE_TIMEZONES.join(", ")
        ),
        TimeError::InvalidFormat(literal) => {
            let field = failure.field.map_or("input", |f| f.as_str());
            format!("❌ Invalid {field} datetime format: {literal}\n💡 Use: {FORMAT_HINT}")
        }
        TimeError::Unexpected(cause) => format!("❌ Error {action}: {cause}\n💡 {RETRY_HINT}"),
    }
}

/// The current instant rendered in `timezone_name` using `format_type`.
pub fn get_current_datetime(
    clock: &dyn Clock,
    zones: &dyn ZoneDatabase,
    timezone_name: &str,
    format_type: &str,
) -> ToolOutput {
    let now = clock.now();
    debug!(timezone = timezone_name, format = format_type, "get_current_datetime");

    let zone = match Zone::resolve(timezone_name, zones) {
        Ok(zone) => zone,
        Err(error) => {
            warn!(%error, "get_current_datetime failed");
            return ToolOutput::failure(render_failure(&error.into(), "getting current datetime"));
        }
    };

    let instant = zone.localize(now);
    let kind = FormatKind::parse(format_type);
    let structured = json!({
        "timezone": timezone_name,
        "format": format_type,
        "format_kind": kind,
        "datetime": format_instant(&instant, kind),
        "utc_offset": instant.utc_offset(),
        "abbreviation": instant.abbreviation,
        "epoch_seconds": instant.epoch_seconds(),
    });

    ToolOutput::success(format_current(&instant, format_type), Some(structured))
}

/// The difference from `start_datetime` to `end_datetime` in `timezone_name`.
///
/// An empty `end_datetime` means the instant captured from `clock` for this
/// call.
pub fn calculate_time_difference(
    clock: &dyn Clock,
    zones: &dyn ZoneDatabase,
    start_datetime: &str,
    end_datetime: &str,
    timezone_name: &str,
) -> ToolOutput {
    let now = clock.now();
    debug!(
        start = start_datetime,
        end = end_datetime,
        timezone = timezone_name,
        "calculate_time_difference"
    );

    match time_difference(now, zones, start_datetime, end_datetime, timezone_name) {
        Ok(output) => output,
        Err(failure) => {
            warn!(error = %failure.error, field = ?failure.field, "calculate_time_difference failed");
            ToolOutput::failure(render_failure(&failure, "calculating time difference"))
        }
    }
}

fn time_difference(
    now: chrono::DateTime<chrono::Utc>,
    zones: &dyn ZoneDatabase,
    start_datetime: &str,
    end_datetime: &str,
    timezone_name: &str,
) -> Result<ToolOutput, Failure> {
    let zone = Zone::resolve(timezone_name, zones)?;
    let start = resolve(start_datetime, &zone, now).map_err(Failure::at(Field::Start))?;
    let end = resolve(end_datetime, &zone, now).map_err(Failure::at(Field::End))?;

    let duration = difference(start.instant, end.instant);
    let structured = json!({
        "from": civil(&start),
        "to": civil(&end),
        "timezone": timezone_name,
        "total_seconds": duration.rounded_total_seconds(),
        "breakdown": {
            "days": duration.days,
            "hours": duration.hours,
            "minutes": duration.minutes,
            "seconds": duration.seconds,
        },
        "direction": duration.direction,
        "summary": duration.summary(),
    });

    Ok(ToolOutput::success(
        format_duration(&duration, &start, &end, timezone_name),
        Some(structured),
    ))
}
