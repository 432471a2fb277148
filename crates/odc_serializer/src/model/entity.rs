use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::{ClientProperty, Structured};
use crate::SerializerSettings;

// -----------------------------------------------------------------------------
// EntityState

/// Change-tracking state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    Added,
    Modified,
    Unchanged,
    Deleted,
}

// -----------------------------------------------------------------------------
// EntityDescriptor

/// Read-only view of a tracked entity, supplied by the change tracker.
pub struct EntityDescriptor<'a> {
    pub state: EntityState,
    pub identity: Option<String>,
    pub edit_link: Option<String>,
    pub entity: &'a dyn Structured,
    /// Names of properties assigned since the entity was attached, if tracked.
    pub set_properties: Option<Vec<String>>,
}

impl<'a> EntityDescriptor<'a> {
    pub fn new(state: EntityState, entity: &'a dyn Structured) -> Self {
        Self {
            state,
            identity: None,
            edit_link: None,
            entity,
            set_properties: None,
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_edit_link(mut self, edit_link: impl Into<String>) -> Self {
        self.edit_link = Some(edit_link.into());
        self
    }

    pub fn with_set_properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_properties = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// The value properties to send, in declaration order.
    ///
    /// Navigation properties are never included. A modified entity with a
    /// recorded subset sends only that subset; an added one does so only
    /// when [`SerializerSettings::post_only_set_properties`] is on.
    pub fn properties_to_serialize(&self, settings: &SerializerSettings) -> Vec<&'a ClientProperty> {
        let use_subset = match self.state {
            EntityState::Added => settings.post_only_set_properties,
            EntityState::Modified => true,
            EntityState::Unchanged | EntityState::Deleted => false,
        };
        let subset = self.set_properties.as_deref().filter(|_| use_subset);

        self.entity
            .client_type()
            .properties()
            .iter()
            .filter(|p| !p.is_entity())
            .filter(|p| subset.is_none_or(|names| names.iter().any(|n| n == p.name())))
            .collect()
    }
}

impl fmt::Debug for EntityDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("state", &self.state)
            .field("type", &self.entity.client_type().name())
            .field("identity", &self.identity)
            .field("edit_link", &self.edit_link)
            .field("set_properties", &self.set_properties)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// LinkDescriptor

/// A tracked relationship from a source entity's navigation property.
pub struct LinkDescriptor<'a> {
    pub source: &'a dyn Structured,
    pub source_property: String,
    pub target: &'a dyn Structured,
    /// Identity of the target as known to the tracker.
    pub target_identity: Option<String>,
}

impl<'a> LinkDescriptor<'a> {
    pub fn new(
        source: &'a dyn Structured,
        source_property: impl Into<String>,
        target: &'a dyn Structured,
        target_identity: Option<String>,
    ) -> Self {
        Self {
            source,
            source_property: source_property.into(),
            target,
            target_identity,
        }
    }
}

impl fmt::Debug for LinkDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkDescriptor")
            .field("source_property", &self.source_property)
            .field("target_identity", &self.target_identity)
            .finish_non_exhaustive()
    }
}
