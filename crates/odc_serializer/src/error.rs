use alloc::string::String;

use odc_edm::{FormatError, TypeResolutionError};
use thiserror::Error;

use crate::writer::EntryState;

// -----------------------------------------------------------------------------
// Error

/// The object graph of an entry cannot be turned into value nodes.
///
/// `name` is the offending property, or the structural type name when the
/// property is not known.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    #[error("cycle detected in complex-type graph at `{name}`")]
    CycleDetected { name: String },

    #[error("null is not supported for `{name}`")]
    NullNotSupported { name: String },

    #[error("null item is not supported in collection `{name}`")]
    NullCollectionItem { name: String },

    #[error("`{name}` needs a protocol type name, but `{edm}` has no reverse mapping")]
    UnsupportedReverseMapping { name: String, edm: &'static str },

    #[error("`{name}` is declared primitive, but `{native}` is not a primitive type")]
    NotPrimitive { name: String, native: &'static str },

    #[error("type `{type_name}` has no property `{name}`")]
    UnknownProperty { type_name: String, name: String },

    #[error("`{name}` holds a value that is not a {expected} value")]
    KindMismatch { name: String, expected: &'static str },

    #[error("`{name}` is nested {depth} levels deep, exceeding the configured limit")]
    TooDeep { name: String, depth: usize },
}

impl GraphError {
    /// Adds property context to a registry failure.
    pub(crate) fn from_resolution(name: &str, error: TypeResolutionError) -> Self {
        match error {
            TypeResolutionError::UnsupportedReverseMapping(edm) => Self::UnsupportedReverseMapping {
                name: name.into(),
                edm,
            },
            TypeResolutionError::NotPrimitive(native) => Self::NotPrimitive {
                name: name.into(),
                native,
            },
            TypeResolutionError::MismatchedToken { expected, .. } => Self::KindMismatch {
                name: name.into(),
                expected: expected.edm_name(),
            },
            _ => Self::KindMismatch {
                name: name.into(),
                expected: "primitive",
            },
        }
    }
}

/// The writer API was used in a way the protocol does not allow.
///
/// These are programming errors; retrying will not help.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtocolUsageError {
    #[error("parameter `{parameter}` has kind `{kind}`, which is not valid in this position")]
    InvalidParameterType {
        parameter: String,
        kind: &'static str,
    },

    #[error("the entry has already been closed")]
    EntryClosed,

    #[error("cannot {event} while the entry is {state}")]
    UnexpectedEvent {
        state: EntryState,
        event: &'static str,
    },

    #[error("link target of `{name}` has no identity")]
    MissingIdentity { name: String },
}

/// Any failure of a serialization call.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerializeError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Protocol(#[from] ProtocolUsageError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    TypeResolution(#[from] TypeResolutionError),

    #[error("writer failed: {0}")]
    Writer(String),
}
