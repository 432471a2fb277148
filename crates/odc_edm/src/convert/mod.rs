//! Per-kind string codecs.
//!
//! Every registered primitive type owns a [`PrimitiveConverter`] that parses
//! wire text into a [`PrimitiveValue`], formats a value back into its
//! culture-invariant text, and optionally reads a [`ParserToken`] from
//! markup.

// -----------------------------------------------------------------------------
// Modules

mod numeric;
mod spatial;
mod temporal;
mod text;

// -----------------------------------------------------------------------------
// Exports

pub use numeric::{BooleanConverter, DecimalConverter, FloatConverter, IntegerConverter, Integral};
pub use spatial::SpatialConverter;
pub use temporal::{DateConverter, DateTimeOffsetConverter, DurationConverter, TimeOfDayConverter};
pub use text::{
    BinaryConverter, CharConverter, GuidConverter, StreamConverter, StringConverter,
};

use alloc::string::String;

use crate::{FormatError, MarkupReader, ParserToken, PrimitiveValue};

// -----------------------------------------------------------------------------
// NumericParsing

/// How strictly numeric and temporal text is parsed.
///
/// [`Lenient`](Self::Lenient) keeps compatibility with older payloads:
///
/// - integers may be written in decimal or exponent form as long as the value
///   is integral and fits the target (`"12.0"` reads as `12`),
/// - legacy type suffixes are dropped (`1.5d`, `2f`, `3.1m`, `10L`),
/// - booleans and numbers may carry surrounding whitespace,
/// - date-times without an offset are read as UTC,
/// - GUIDs may use the braced, simple or URN forms.
///
/// [`Strict`](Self::Strict) only accepts the nominal grammar of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NumericParsing {
    #[default]
    Lenient,
    Strict,
}

impl NumericParsing {
    #[inline]
    pub const fn is_lenient(self) -> bool {
        matches!(self, Self::Lenient)
    }
}

// -----------------------------------------------------------------------------
// PrimitiveConverter

/// String codec for one primitive kind.
///
/// Implementations must be stateless apart from configuration fixed at
/// construction; a registry shares them across threads.
pub trait PrimitiveConverter: Send + Sync + 'static {
    /// Parses wire text.
    fn parse(&self, text: &str, parsing: NumericParsing) -> Result<PrimitiveValue, FormatError>;

    /// Formats a value. Fails only if `value` has the wrong variant.
    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError>;

    /// Reads the current element into a token.
    ///
    /// The default defers parsing by capturing the element text.
    fn tokenize(&self, reader: &mut dyn MarkupReader) -> Result<ParserToken, FormatError> {
        reader.read_element_text().map(ParserToken::Textual)
    }
}

/// Drops a one-character legacy suffix, if present.
fn strip_suffix<'a>(text: &'a str, suffixes: &[char]) -> Option<&'a str> {
    text.strip_suffix(suffixes).filter(|rest| !rest.is_empty())
}
