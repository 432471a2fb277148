//! The client-side metadata the serializer consumes.
//!
//! Everything here is supplied by collaborators: the metadata layer
//! describes types and properties, the change tracker describes entities and
//! links. The serializer only reads it.

// -----------------------------------------------------------------------------
// Modules

mod entity;
mod enum_type;
mod operation;
mod property;

// -----------------------------------------------------------------------------
// Exports

pub use entity::{EntityDescriptor, EntityState, LinkDescriptor};
pub use enum_type::EnumType;
pub use operation::OperationParameter;
pub use property::{ClientProperty, ClientType, FieldValue, PropertyFlags, Structured};
