//! Collaborator interfaces of the writer orchestrator.
//!
//! - [`ODataWriter`]: the streaming payload writer.
//! - [`ParameterWriter`]: the writer of an operation-parameter body.
//! - [`WritingHooks`]: extension points around entries and nested links.
//! - [`EntryState`]: where an entry write currently stands.

// -----------------------------------------------------------------------------
// Modules

mod hooks;

#[cfg(test)]
pub(crate) mod recording;

// -----------------------------------------------------------------------------
// Exports

pub use hooks::{EntryArgs, LinkGroupArgs, NestedLinkArgs, WritingHooks};

use core::fmt;

use crate::node::ValueNode;

// -----------------------------------------------------------------------------
// Events

/// The header of a resource (entity or complex value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource<'a> {
    pub type_name: &'a str,
    pub id: Option<&'a str>,
    pub edit_link: Option<&'a str>,
}

impl<'a> Resource<'a> {
    #[inline]
    pub const fn new(type_name: &'a str) -> Self {
        Self {
            type_name,
            id: None,
            edit_link: None,
        }
    }
}

/// A nested resource info: a navigation property, or a structured property
/// whose value is written as nested resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedLink<'a> {
    pub name: &'a str,
    pub is_collection: bool,
}

// -----------------------------------------------------------------------------
// ODataWriter

/// A streaming payload writer.
///
/// The orchestrator emits events in a well-formed order: every `start_*`
/// is matched by its `end_*`, and properties of a resource come before its
/// nested links. Formatting and I/O are up to the implementation.
pub trait ODataWriter {
    type Error: fmt::Display;

    /// Starts an entity or complex resource; `None` writes a null item of a
    /// resource set.
    fn start_resource(&mut self, resource: Option<&Resource<'_>>) -> Result<(), Self::Error>;

    fn end_resource(&mut self) -> Result<(), Self::Error>;

    /// Writes a property whose value is not a resource: a primitive, an enum,
    /// a null, or a collection of primitives or enums.
    fn write_property(&mut self, name: &str, value: &ValueNode) -> Result<(), Self::Error>;

    fn start_nested_link(&mut self, link: &NestedLink<'_>) -> Result<(), Self::Error>;

    fn end_nested_link(&mut self) -> Result<(), Self::Error>;

    fn start_resource_set(&mut self, item_type_name: &str) -> Result<(), Self::Error>;

    fn end_resource_set(&mut self) -> Result<(), Self::Error>;

    /// Writes a reference to an existing entity.
    fn write_entity_reference_link(&mut self, url: &str) -> Result<(), Self::Error>;
}

// -----------------------------------------------------------------------------
// ParameterWriter

/// Writer of an operation-parameter request body.
pub trait ParameterWriter {
    type Error: fmt::Display;

    fn start_parameters(&mut self) -> Result<(), Self::Error>;

    /// Writes a primitive, enum, null, or primitive/enum collection parameter.
    fn write_value(&mut self, name: &str, value: &ValueNode) -> Result<(), Self::Error>;

    /// Starts a complex parameter; the resource is then written through the
    /// returned [`ODataWriter`].
    fn write_resource(&mut self, name: &str) -> Result<&mut dyn ODataWriter<Error = Self::Error>, Self::Error>;

    /// Starts a complex-collection parameter, as [`write_resource`](Self::write_resource).
    fn write_resource_set(&mut self, name: &str) -> Result<&mut dyn ODataWriter<Error = Self::Error>, Self::Error>;

    fn end_parameters(&mut self) -> Result<(), Self::Error>;
}

// -----------------------------------------------------------------------------
// EntryState

/// Progress of a single entry write.
///
/// ```text
/// NotStarted -> EntryOpen -> [PropertiesWritten] -> [NestedLinksWritten] -> EntryClosed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    NotStarted,
    EntryOpen,
    PropertiesWritten,
    NestedLinksWritten,
    EntryClosed,
}

impl EntryState {
    /// The state after writing a property, if allowed.
    pub(crate) fn on_property(self) -> Option<Self> {
        match self {
            Self::EntryOpen | Self::PropertiesWritten => Some(Self::PropertiesWritten),
            _ => None,
        }
    }

    /// The state after writing a nested link, if allowed.
    pub(crate) fn on_nested_link(self) -> Option<Self> {
        match self {
            Self::EntryOpen | Self::PropertiesWritten | Self::NestedLinksWritten => {
                Some(Self::NestedLinksWritten)
            }
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn is_open(self) -> bool {
        !matches!(self, Self::NotStarted | Self::EntryClosed)
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotStarted => "not started",
            Self::EntryOpen => "open",
            Self::PropertiesWritten => "writing properties",
            Self::NestedLinksWritten => "writing nested links",
            Self::EntryClosed => "closed",
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::EntryState::*;

    #[test]
    fn transitions() {
        assert_eq!(EntryOpen.on_property(), Some(PropertiesWritten));
        assert_eq!(PropertiesWritten.on_nested_link(), Some(NestedLinksWritten));
        assert_eq!(EntryOpen.on_nested_link(), Some(NestedLinksWritten));
        assert_eq!(NestedLinksWritten.on_property(), None);
        assert_eq!(NotStarted.on_property(), None);
        assert_eq!(EntryClosed.on_nested_link(), None);
        assert!(!EntryClosed.is_open());
        assert!(PropertiesWritten.is_open());
    }
}
