//! ISO 8601 text conversion for dates, times and timestamps.
//!
//! Timestamps are RFC 3339 in both directions and must carry an explicit
//! offset. A timestamp that parses as a wall-clock datetime but lacks the
//! offset designator is reported as [`CodecError::MissingTimeZone`] rather
//! than a generic parse failure, so callers can tell "naive" apart from
//! "malformed". On output a UTC offset is canonicalized to `Z`.

use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use shapewire_core::CodecError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!(version = 2, "[year]-[month]-[day]");

const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    version = 2,
    "[hour]:[minute]:[second][optional [.[subsecond]]]"
);

// probe format for offset-less timestamps, to diagnose them distinctly
const NAIVE_DATETIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    version = 2,
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

// output formats; the optional blocks above are parse-only
const TIME_BASE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!(version = 2, "[hour]:[minute]:[second]");

const TIME_SUBSECOND_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!(version = 2, "[hour]:[minute]:[second].[subsecond]");

const NAIVE_DATETIME_BASE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!(version = 2, "[year]-[month]-[day]T[hour]:[minute]:[second]");

pub(crate) fn parse_date(text: &str) -> Result<Date, CodecError> {
    Date::parse(text, DATE_FORMAT).map_err(|e| CodecError::InvalidValue {
        type_name: "date".to_string(),
        message: format!("`{}` is not an ISO 8601 date: {}", text, e),
    })
}

pub(crate) fn parse_time(text: &str) -> Result<Time, CodecError> {
    Time::parse(text, TIME_FORMAT).map_err(|e| CodecError::InvalidValue {
        type_name: "time".to_string(),
        message: format!("`{}` is not an ISO 8601 time: {}", text, e),
    })
}

pub(crate) fn parse_datetime(text: &str) -> Result<OffsetDateTime, CodecError> {
    match OffsetDateTime::parse(text, &Rfc3339) {
        Ok(ts) => Ok(ts),
        Err(_) if PrimitiveDateTime::parse(text, NAIVE_DATETIME_FORMAT).is_ok() => {
            Err(CodecError::MissingTimeZone {
                value: text.to_string(),
            })
        }
        Err(e) => Err(CodecError::InvalidValue {
            type_name: "datetime".to_string(),
            message: format!("`{}` is not an RFC 3339 timestamp: {}", text, e),
        }),
    }
}

pub(crate) fn format_date(date: Date) -> Result<String, CodecError> {
    date.format(DATE_FORMAT).map_err(|e| CodecError::InvalidValue {
        type_name: "date".to_string(),
        message: e.to_string(),
    })
}

/// Formats a time, writing subseconds only when they are nonzero.
pub(crate) fn format_time(time: Time) -> Result<String, CodecError> {
    let format = if time.nanosecond() == 0 {
        TIME_BASE_FORMAT
    } else {
        TIME_SUBSECOND_FORMAT
    };
    time.format(format).map_err(|e| CodecError::InvalidValue {
        type_name: "time".to_string(),
        message: e.to_string(),
    })
}

/// Formats an RFC 3339 timestamp, writing the UTC offset as `Z`.
pub(crate) fn format_datetime(ts: OffsetDateTime) -> Result<String, CodecError> {
    let text = ts.format(&Rfc3339).map_err(|e| CodecError::InvalidValue {
        type_name: "datetime".to_string(),
        message: e.to_string(),
    })?;
    Ok(match text.strip_suffix("+00:00") {
        Some(prefix) => format!("{}Z", prefix),
        None => text,
    })
}

/// Renders a wall-clock datetime for error messages only; the encoder never
/// emits one.
pub(crate) fn format_naive(ts: PrimitiveDateTime) -> String {
    ts.format(NAIVE_DATETIME_BASE_FORMAT)
        .unwrap_or_else(|_| format!("{:?}", ts))
}
