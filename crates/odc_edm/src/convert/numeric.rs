use alloc::string::{String, ToString};
use core::marker::PhantomData;

use log::warn;

use super::{NumericParsing, PrimitiveConverter, strip_suffix};
use crate::value::{Decimal, format_f32, format_f64, parse_f64_literal};
use crate::{FormatError, PrimitiveKind, PrimitiveValue};

// -----------------------------------------------------------------------------
// Integers

/// Native integer types with a primitive kind.
pub trait Integral: Copy + Send + Sync + 'static {
    const KIND: PrimitiveKind;

    fn from_i128(value: i128) -> Option<Self>;
    fn wrap(self) -> PrimitiveValue;
    fn unwrap(value: &PrimitiveValue) -> Option<Self>;
    fn parse_exact(text: &str) -> Option<Self>;
}

macro_rules! impl_integral {
    ($($ty:ty => $variant:ident,)*) => {
        $(
            impl Integral for $ty {
                const KIND: PrimitiveKind = PrimitiveKind::$variant;

                #[inline]
                fn from_i128(value: i128) -> Option<Self> {
                    <$ty>::try_from(value).ok()
                }

                #[inline]
                fn wrap(self) -> PrimitiveValue {
                    PrimitiveValue::$variant(self)
                }

                #[inline]
                fn unwrap(value: &PrimitiveValue) -> Option<Self> {
                    match *value {
                        PrimitiveValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                #[inline]
                fn parse_exact(text: &str) -> Option<Self> {
                    text.parse().ok()
                }
            }
        )*
    };
}

impl_integral! {
    u8 => Byte,
    i8 => SByte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
}

/// Codec for every integral kind.
///
/// # Examples
///
/// ```
/// use odc_edm::convert::{IntegerConverter, NumericParsing, PrimitiveConverter};
/// use odc_edm::PrimitiveValue;
///
/// let c = IntegerConverter::<i32>::new();
/// assert_eq!(c.parse("12.0", NumericParsing::Lenient), Ok(PrimitiveValue::Int32(12)));
/// assert!(c.parse("12.0", NumericParsing::Strict).is_err());
/// assert!(c.parse("12.5", NumericParsing::Lenient).is_err());
/// ```
pub struct IntegerConverter<T>(PhantomData<fn() -> T>);

impl<T> IntegerConverter<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for IntegerConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Integral> PrimitiveConverter for IntegerConverter<T> {
    fn parse(&self, text: &str, parsing: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        if let Some(v) = T::parse_exact(text) {
            return Ok(v.wrap());
        }
        if !parsing.is_lenient() {
            return Err(FormatError::invalid(T::KIND, text, "not an integer"));
        }

        let trimmed = text.trim();
        let body = strip_suffix(trimmed, &['L', 'l']).unwrap_or(trimmed);
        let value = Decimal::parse_literal(body, true)
            .map_err(|reason| FormatError::invalid(T::KIND, text, reason))?
            .to_integer()
            .ok_or_else(|| FormatError::invalid(T::KIND, text, "value has a fractional part"))?;
        let value = T::from_i128(value)
            .ok_or_else(|| FormatError::invalid(T::KIND, text, "value is out of range"))?;

        warn!("accepted non-canonical {} literal `{text}`", T::KIND);
        Ok(value.wrap())
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match (T::unwrap(value), value.as_integer()) {
            (Some(_), Some(v)) => Ok(v.to_string()),
            _ => Err(FormatError::KindMismatch {
                expected: T::KIND,
                actual: value.kind(),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Floating point

/// Codec for `Edm.Single` and `Edm.Double`.
pub struct FloatConverter {
    kind: PrimitiveKind,
}

impl FloatConverter {
    pub const SINGLE: Self = Self {
        kind: PrimitiveKind::Single,
    };

    pub const DOUBLE: Self = Self {
        kind: PrimitiveKind::Double,
    };

    fn suffixes(&self) -> &'static [char] {
        match self.kind {
            PrimitiveKind::Single => &['f', 'F'],
            _ => &['d', 'D'],
        }
    }

    fn read(&self, text: &str, parsing: NumericParsing) -> Option<f64> {
        if let Some(v) = parse_f64_literal(text) {
            return Some(v);
        }
        if !parsing.is_lenient() {
            return None;
        }
        let trimmed = text.trim();
        let body = strip_suffix(trimmed, self.suffixes()).unwrap_or(trimmed);
        let value = parse_f64_literal(body)?;
        warn!("accepted non-canonical {} literal `{text}`", self.kind);
        Some(value)
    }
}

impl PrimitiveConverter for FloatConverter {
    fn parse(&self, text: &str, parsing: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        let value = self
            .read(text, parsing)
            .ok_or_else(|| FormatError::invalid(self.kind, text, "not a floating point number"))?;

        if self.kind == PrimitiveKind::Double {
            return Ok(PrimitiveValue::Double(value));
        }
        let single = value as f32;
        if single.is_infinite() && value.is_finite() {
            return Err(FormatError::invalid(self.kind, text, "value is out of range"));
        }
        Ok(PrimitiveValue::Single(single))
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match (self.kind, value) {
            (PrimitiveKind::Single, PrimitiveValue::Single(v)) => Ok(format_f32(*v)),
            (PrimitiveKind::Double, PrimitiveValue::Double(v)) => Ok(format_f64(*v)),
            _ => Err(FormatError::KindMismatch {
                expected: self.kind,
                actual: value.kind(),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Decimal

/// Codec for `Edm.Decimal`.
pub struct DecimalConverter;

impl PrimitiveConverter for DecimalConverter {
    fn parse(&self, text: &str, parsing: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        const KIND: PrimitiveKind = PrimitiveKind::Decimal;

        match Decimal::parse_literal(text, false) {
            Ok(v) => Ok(PrimitiveValue::Decimal(v)),
            Err(reason) if !parsing.is_lenient() => Err(FormatError::invalid(KIND, text, reason)),
            Err(_) => {
                let trimmed = text.trim();
                let body = strip_suffix(trimmed, &['m', 'M']).unwrap_or(trimmed);
                let value = Decimal::parse_literal(body, true)
                    .map_err(|reason| FormatError::invalid(KIND, text, reason))?;
                warn!("accepted non-canonical {KIND} literal `{text}`");
                Ok(PrimitiveValue::Decimal(value))
            }
        }
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::Decimal(v) => Ok(v.to_string()),
            _ => Err(FormatError::KindMismatch {
                expected: PrimitiveKind::Decimal,
                actual: value.kind(),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Boolean

/// Codec for `Edm.Boolean`. Accepts `true`, `false`, `1` and `0`.
pub struct BooleanConverter;

impl PrimitiveConverter for BooleanConverter {
    fn parse(&self, text: &str, parsing: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        let body = if parsing.is_lenient() { text.trim() } else { text };
        match body {
            "true" | "1" => Ok(PrimitiveValue::Boolean(true)),
            "false" | "0" => Ok(PrimitiveValue::Boolean(false)),
            _ => Err(FormatError::invalid(PrimitiveKind::Boolean, text, "expected `true` or `false`")),
        }
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::Boolean(v) => Ok(String::from(if *v { "true" } else { "false" })),
            _ => Err(FormatError::KindMismatch {
                expected: PrimitiveKind::Boolean,
                actual: value.kind(),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
