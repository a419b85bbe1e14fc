//! # time-engine
//!
//! Deterministic timezone-aware datetime computation for agent tools.
//!
//! Every function here is a pure function of its inputs. The only wall-clock
//! read lives behind [`Clock`]; callers capture "now" once per request and
//! pass it in.
//!
//! ## Modules
//!
//! - [`zone`] — Timezone database capability and zone resolution
//! - [`resolve`] — Text or "now" plus a zone → absolute instant with local fields
//! - [`duration`] — Signed difference between instants with unit breakdown
//! - [`format`] — `iso` / `readable` / `timestamp` / `custom` rendering and reports
//! - [`clock`] — System and fixed clocks
//! - [`error`] — Error types

pub mod clock;
pub mod duration;
pub mod error;
pub mod format;
pub mod resolve;
pub mod zone;

pub use clock::{Clock, FixedClock, SystemClock};
pub use duration::{difference, Direction, Duration};
pub use error::TimeError;
pub use format::{
    civil, format_current, format_duration, format_instant, group_thousands, FormatKind,
};
pub use resolve::{parse_datetime, resolve, LocalizedInstant};
pub use zone::{BundledZones, Zone, ZoneDatabase, ZoneOffset, ZoneRules, UTC_IDENTIFIER};
