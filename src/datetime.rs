//! Timestamp encoding used by the Dispatch API.
//!
//! The API expects timestamps in the site's local time zone, never UTC.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::params::ParamValue;

/// Minute-precision timestamp format.
pub const API_MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Seconds-precision timestamp format.
pub const API_SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Literal asking the server to use the time it received the request.
pub const NOW_LITERAL: &str = "now";

/// Precision of a rendered timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// `YYYY-MM-DD HH:MM`
    Minutes,
    /// `YYYY-MM-DD HH:MM:SS`
    Seconds,
}

impl Precision {
    /// The `strftime` pattern for this precision.
    pub fn format_str(self) -> &'static str {
        match self {
            Precision::Minutes => API_MINUTE_FORMAT,
            Precision::Seconds => API_SECONDS_FORMAT,
        }
    }
}

/// Renders `dt` the way the API expects it.
pub fn format_api(dt: &NaiveDateTime, precision: Precision) -> String {
    dt.format(precision.format_str()).to_string()
}

/// A timestamp parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTime {
    /// Evaluated by the server when the request arrives.
    Now,
    /// A fixed site-local wall-clock time.
    At(NaiveDateTime, Precision),
}

impl ApiTime {
    /// Minute-precision timestamp.
    pub fn minutes(dt: NaiveDateTime) -> Self {
        ApiTime::At(dt, Precision::Minutes)
    }

    /// Seconds-precision timestamp.
    pub fn seconds(dt: NaiveDateTime) -> Self {
        ApiTime::At(dt, Precision::Seconds)
    }

    /// Renders the value for the wire.
    pub fn render(&self) -> String {
        match self {
            ApiTime::Now => NOW_LITERAL.to_string(),
            ApiTime::At(dt, precision) => format_api(dt, *precision),
        }
    }
}

impl From<ApiTime> for ParamValue {
    fn from(value: ApiTime) -> Self {
        ParamValue::Str(value.render())
    }
}

/// The current wall-clock time of the site.
///
/// Assumes the host runs in the site's time zone.
pub fn site_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Midnight at the start of `dt`'s day.
pub fn start_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    let date: NaiveDate = dt.date();
    date.and_hms_opt(0, 0, 0).unwrap_or(dt)
}
