//! Native values for each protocol primitive kind.
//!
//! - [`PrimitiveValue`]: one variant per kind.
//! - [`Decimal`]: the protocol's 96-bit decimal.
//! - [`SpatialValue`]: geography and geometry instances.
//! - [`StreamLink`]: a media resource reference.
//! - [`format_duration`] / [`parse_duration`]: ISO 8601 day-time durations.

// -----------------------------------------------------------------------------
// Modules

mod decimal;
mod duration;
mod spatial;

// -----------------------------------------------------------------------------
// Exports

pub use decimal::Decimal;
pub use duration::{format_duration, parse_duration};
pub use spatial::{Position, Shape, SpatialFamily, SpatialValue};

use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::PrimitiveKind;

// -----------------------------------------------------------------------------
// StreamLink

/// A reference to a media resource (`Edm.Stream`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamLink {
    pub read_link: String,
    pub content_type: Option<String>,
}

impl StreamLink {
    pub fn new(read_link: impl Into<String>) -> Self {
        Self {
            read_link: read_link.into(),
            content_type: None,
        }
    }
}

// -----------------------------------------------------------------------------
// PrimitiveValue

/// A materialized primitive value.
///
/// Variants line up with [`PrimitiveKind`]; every spatial kind is carried by
/// [`PrimitiveValue::Spatial`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PrimitiveValue {
    Boolean(bool),
    Byte(u8),
    SByte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Binary(Vec<u8>),
    Guid(Uuid),
    DateTimeOffset(DateTime<FixedOffset>),
    Date(NaiveDate),
    TimeOfDay(NaiveTime),
    Duration(TimeDelta),
    Stream(StreamLink),
    Spatial(SpatialValue),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
}

impl PrimitiveValue {
    /// The concrete kind of this value.
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::SByte(_) => PrimitiveKind::SByte,
            Self::Int16(_) => PrimitiveKind::Int16,
            Self::Int32(_) => PrimitiveKind::Int32,
            Self::Int64(_) => PrimitiveKind::Int64,
            Self::Single(_) => PrimitiveKind::Single,
            Self::Double(_) => PrimitiveKind::Double,
            Self::Decimal(_) => PrimitiveKind::Decimal,
            Self::String(_) => PrimitiveKind::String,
            Self::Binary(_) => PrimitiveKind::Binary,
            Self::Guid(_) => PrimitiveKind::Guid,
            Self::DateTimeOffset(_) => PrimitiveKind::DateTimeOffset,
            Self::Date(_) => PrimitiveKind::Date,
            Self::TimeOfDay(_) => PrimitiveKind::TimeOfDay,
            Self::Duration(_) => PrimitiveKind::Duration,
            Self::Stream(_) => PrimitiveKind::Stream,
            Self::Spatial(v) => v.kind(),
            Self::UInt16(_) => PrimitiveKind::UInt16,
            Self::UInt32(_) => PrimitiveKind::UInt32,
            Self::UInt64(_) => PrimitiveKind::UInt64,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an `i128` for any integral variant.
    pub const fn as_integer(&self) -> Option<i128> {
        Some(match *self {
            Self::Byte(v) => v as i128,
            Self::SByte(v) => v as i128,
            Self::Int16(v) => v as i128,
            Self::Int32(v) => v as i128,
            Self::Int64(v) => v as i128,
            Self::UInt16(v) => v as i128,
            Self::UInt32(v) => v as i128,
            Self::UInt64(v) => v as i128,
            _ => return None,
        })
    }
}

macro_rules! impl_from_native {
    ($($ty:ty => $variant:ident,)*) => {
        $(
            impl From<$ty> for PrimitiveValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_native! {
    bool => Boolean,
    u8 => Byte,
    i8 => SByte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Single,
    f64 => Double,
    Decimal => Decimal,
    String => String,
    Vec<u8> => Binary,
    Uuid => Guid,
    DateTime<FixedOffset> => DateTimeOffset,
    NaiveDate => Date,
    NaiveTime => TimeOfDay,
    TimeDelta => Duration,
    StreamLink => Stream,
    SpatialValue => Spatial,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
}

impl From<&str> for PrimitiveValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl From<char> for PrimitiveValue {
    #[inline]
    fn from(value: char) -> Self {
        Self::String(value.into())
    }
}

impl From<DateTime<Utc>> for PrimitiveValue {
    #[inline]
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTimeOffset(value.fixed_offset())
    }
}

// -----------------------------------------------------------------------------
// Floating point text

/// Formats a float in the invariant text form.
///
/// Non-finite values use the `INF`, `-INF` and `NaN` literals. Very large and
/// very small magnitudes use an exponent (`1E+300`, `1E-7`).
pub(crate) fn format_f64(value: f64) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "INF" } else { "-INF" });
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-5..1e17).contains(&magnitude) {
        alloc::format!("{value}")
    } else {
        exponent_form(alloc::format!("{value:e}"))
    }
}

/// See [`format_f64`]. Uses the shortest text that reads back as the same `f32`.
pub(crate) fn format_f32(value: f32) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "INF" } else { "-INF" });
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-5..1e17).contains(&magnitude) {
        alloc::format!("{value}")
    } else {
        exponent_form(alloc::format!("{value:e}"))
    }
}

// `1e300` -> `1E+300`, `1e-7` -> `1E-7`
fn exponent_form(text: String) -> String {
    match text.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => alloc::format!("{mantissa}E{exp}"),
        Some((mantissa, exp)) => alloc::format!("{mantissa}E+{exp}"),
        None => text,
    }
}

/// Parses the invariant float grammar: decimal digits with optional fraction
/// and exponent, or one of `INF`, `-INF`, `NaN`.
pub(crate) fn parse_f64_literal(text: &str) -> Option<f64> {
    match text {
        "INF" => return Some(f64::INFINITY),
        "-INF" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }
    // Rust also accepts `inf`, `infinity` and `nan`; the protocol does not.
    let body = text.strip_prefix(['-', '+']).unwrap_or(text);
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) {
        return None;
    }
    text.parse().ok()
}

// -----------------------------------------------------------------------------
// Tests
