use alloc::string::{String, ToString};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use log::warn;

use super::{NumericParsing, PrimitiveConverter};
use crate::value::{format_duration, parse_duration};
use crate::{FormatError, PrimitiveKind, PrimitiveValue};

#[cold]
fn mismatch(expected: PrimitiveKind, value: &PrimitiveValue) -> FormatError {
    FormatError::KindMismatch {
        expected,
        actual: value.kind(),
    }
}

// -----------------------------------------------------------------------------
// DateTimeOffset

/// Codec for `Edm.DateTimeOffset` in RFC 3339 form.
///
/// A zero offset is written as `Z`; fractional seconds use the shortest of
/// 0, 3, 6 or 9 digits.
pub struct DateTimeOffsetConverter {
    normalize_utc: bool,
}

impl DateTimeOffsetConverter {
    /// Keeps the offset carried by the text.
    pub const FIXED: Self = Self {
        normalize_utc: false,
    };

    /// Converts every parsed value to UTC, for `DateTime<Utc>` natives.
    pub const UTC: Self = Self {
        normalize_utc: true,
    };
}

impl PrimitiveConverter for DateTimeOffsetConverter {
    fn parse(&self, text: &str, parsing: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        const KIND: PrimitiveKind = PrimitiveKind::DateTimeOffset;

        let value = match DateTime::parse_from_rfc3339(text) {
            Ok(v) => v,
            Err(e) if !parsing.is_lenient() => {
                return Err(FormatError::invalid(KIND, text, e.to_string()));
            }
            Err(e) => {
                let naive = NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%dT%H:%M:%S%.f")
                    .map_err(|_| FormatError::invalid(KIND, text, e.to_string()))?;
                warn!("date-time `{text}` has no offset, reading it as UTC");
                naive.and_utc().fixed_offset()
            }
        };

        Ok(PrimitiveValue::DateTimeOffset(if self.normalize_utc {
            value.with_timezone(&Utc).fixed_offset()
        } else {
            value
        }))
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::DateTimeOffset(v) => Ok(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            _ => Err(mismatch(PrimitiveKind::DateTimeOffset, value)),
        }
    }
}

// -----------------------------------------------------------------------------
// Date

/// Codec for `Edm.Date` (`YYYY-MM-DD`).
pub struct DateConverter;

impl PrimitiveConverter for DateConverter {
    fn parse(&self, text: &str, _: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(PrimitiveValue::Date)
            .map_err(|e| FormatError::invalid(PrimitiveKind::Date, text, e.to_string()))
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::Date(v) => Ok(v.format("%Y-%m-%d").to_string()),
            _ => Err(mismatch(PrimitiveKind::Date, value)),
        }
    }
}

// -----------------------------------------------------------------------------
// TimeOfDay

/// Codec for `Edm.TimeOfDay` (`HH:MM:SS[.fffffff]`).
pub struct TimeOfDayConverter;

impl PrimitiveConverter for TimeOfDayConverter {
    fn parse(&self, text: &str, parsing: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        match NaiveTime::parse_from_str(text, "%H:%M:%S%.f") {
            Ok(v) => Ok(PrimitiveValue::TimeOfDay(v)),
            Err(e) => {
                if parsing.is_lenient()
                    && let Ok(v) = NaiveTime::parse_from_str(text.trim(), "%H:%M")
                {
                    return Ok(PrimitiveValue::TimeOfDay(v));
                }
                Err(FormatError::invalid(PrimitiveKind::TimeOfDay, text, e.to_string()))
            }
        }
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::TimeOfDay(v) => Ok(v.format("%H:%M:%S%.f").to_string()),
            _ => Err(mismatch(PrimitiveKind::TimeOfDay, value)),
        }
    }
}

// -----------------------------------------------------------------------------
// Duration

/// Codec for `Edm.Duration`, see [`format_duration`].
pub struct DurationConverter;

impl PrimitiveConverter for DurationConverter {
    fn parse(&self, text: &str, _: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        parse_duration(text)
            .map(PrimitiveValue::Duration)
            .map_err(|reason| FormatError::invalid(PrimitiveKind::Duration, text, reason))
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::Duration(v) => Ok(format_duration(*v)),
            _ => Err(mismatch(PrimitiveKind::Duration, value)),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
