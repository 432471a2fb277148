use alloc::string::{String, ToString};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use super::{NumericParsing, PrimitiveConverter};
use crate::value::StreamLink;
use crate::{FormatError, PrimitiveKind, PrimitiveValue};

#[cold]
fn mismatch(expected: PrimitiveKind, value: &PrimitiveValue) -> FormatError {
    FormatError::KindMismatch {
        expected,
        actual: value.kind(),
    }
}

// -----------------------------------------------------------------------------
// String

/// Codec for `Edm.String`. Text is taken verbatim.
pub struct StringConverter;

impl PrimitiveConverter for StringConverter {
    fn parse(&self, text: &str, _: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        Ok(PrimitiveValue::String(String::from(text)))
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        value
            .as_str()
            .map(String::from)
            .ok_or_else(|| mismatch(PrimitiveKind::String, value))
    }
}

/// Codec for a single character carried as `Edm.String`.
pub struct CharConverter;

impl CharConverter {
    fn check(text: &str) -> Result<(), FormatError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(_), None) => Ok(()),
            _ => Err(FormatError::invalid(
                PrimitiveKind::String,
                text,
                "expected exactly one character",
            )),
        }
    }
}

impl PrimitiveConverter for CharConverter {
    fn parse(&self, text: &str, _: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        Self::check(text)?;
        Ok(PrimitiveValue::String(String::from(text)))
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        let text = value
            .as_str()
            .ok_or_else(|| mismatch(PrimitiveKind::String, value))?;
        Self::check(text)?;
        Ok(String::from(text))
    }
}

// -----------------------------------------------------------------------------
// Guid

/// Codec for `Edm.Guid`, formatted as lowercase hyphenated hex.
pub struct GuidConverter;

impl PrimitiveConverter for GuidConverter {
    fn parse(&self, text: &str, parsing: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        const KIND: PrimitiveKind = PrimitiveKind::Guid;

        let parsed = if parsing.is_lenient() {
            Uuid::parse_str(text.trim())
        } else if text.len() == 36 {
            Uuid::try_parse(text)
        } else {
            return Err(FormatError::invalid(KIND, text, "expected the hyphenated form"));
        };
        parsed
            .map(PrimitiveValue::Guid)
            .map_err(|e| FormatError::invalid(KIND, text, e.to_string()))
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::Guid(v) => Ok(v.hyphenated().to_string()),
            _ => Err(mismatch(PrimitiveKind::Guid, value)),
        }
    }
}

// -----------------------------------------------------------------------------
// Binary

/// Codec for `Edm.Binary`, using standard padded base64.
pub struct BinaryConverter;

impl PrimitiveConverter for BinaryConverter {
    fn parse(&self, text: &str, _: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        STANDARD
            .decode(text)
            .map(PrimitiveValue::Binary)
            .map_err(|e| FormatError::invalid(PrimitiveKind::Binary, text, e.to_string()))
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::Binary(v) => Ok(STANDARD.encode(v)),
            _ => Err(mismatch(PrimitiveKind::Binary, value)),
        }
    }
}

// -----------------------------------------------------------------------------
// Stream

/// Codec for `Edm.Stream`. The text form is the read link.
pub struct StreamConverter;

impl PrimitiveConverter for StreamConverter {
    fn parse(&self, text: &str, _: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        if text.is_empty() {
            return Err(FormatError::invalid(PrimitiveKind::Stream, text, "empty link"));
        }
        Ok(PrimitiveValue::Stream(StreamLink::new(text)))
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::Stream(v) => Ok(v.read_link.clone()),
            _ => Err(mismatch(PrimitiveKind::Stream, value)),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
