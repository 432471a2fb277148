use alloc::borrow::Cow;
use alloc::string::String;

use thiserror::Error;

use crate::PrimitiveKind;

// -----------------------------------------------------------------------------
// Error

/// A string to value conversion failed.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum FormatError {
    #[error("`{text}` is not a valid {kind} value: {reason}")]
    InvalidLiteral {
        kind: PrimitiveKind,
        text: String,
        reason: Cow<'static, str>,
    },

    #[error("expected a {expected} value but received {actual}")]
    KindMismatch {
        expected: PrimitiveKind,
        actual: PrimitiveKind,
    },

    #[error("malformed markup: {0}")]
    InvalidMarkup(Cow<'static, str>),
}

impl FormatError {
    #[cold]
    pub(crate) fn invalid(
        kind: PrimitiveKind,
        text: &str,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidLiteral {
            kind,
            text: String::from(text),
            reason: reason.into(),
        }
    }
}

/// A native type or a protocol type name could not be mapped.
///
/// [`NotPrimitive`](Self::NotPrimitive) is the ordinary outcome for
/// structured types; callers fall back to enum, complex or collection
/// handling when they receive it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TypeResolutionError {
    #[error("`{0}` is not a recognized primitive type")]
    NotPrimitive(&'static str),

    #[error("`{0}` has no reverse mapping to a native type")]
    UnsupportedReverseMapping(&'static str),

    #[error("`{0}` is not a known protocol primitive type name")]
    UnknownTypeName(String),

    #[error("a pre-materialized {actual} value cannot be materialized as {expected}")]
    MismatchedToken {
        expected: PrimitiveKind,
        actual: PrimitiveKind,
    },
}

/// Any failure raised by this crate.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EdmError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    TypeResolution(#[from] TypeResolutionError),
}
